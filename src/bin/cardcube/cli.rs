use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI для доски кардинальностей поверх файла дампа
#[derive(Parser, Debug)]
#[command(name = "cardcube", version, about = "CardCube board CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Add values to a (row, cell) estimator, creating it if needed
    Push {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        row: String,
        #[arg(long)]
        cell: String,
        /// Values: literal, "hex:..", "@file" (one value per line) or "-" (stdin lines)
        #[arg(required = true)]
        values: Vec<String>,
    },
    /// Cardinality estimate of one cell
    Count {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        row: String,
        #[arg(long)]
        cell: String,
    },
    /// List row names
    Rows {
        #[arg(long)]
        path: PathBuf,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List cell names of a row
    Cells {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        row: String,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Snapshot of one row (--row) or of the whole board
    Snapshot {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        row: Option<String>,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Drop a row with all its cells
    DropRow {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        row: String,
    },
    /// Merge another dump into this one (additive import)
    Merge {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        from: PathBuf,
    },
    /// Write the persisted form as JSON (payloads base64)
    ExportJson {
        #[arg(long)]
        path: PathBuf,
        /// Output file; stdout if omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Dump file, config and metrics overview
    Status {
        #[arg(long)]
        path: PathBuf,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}
