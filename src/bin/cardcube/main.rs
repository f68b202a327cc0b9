use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};
use log::error;

mod cli;
mod util;
mod cmd_push;
mod cmd_count;
mod cmd_rows;
mod cmd_cells;
mod cmd_snapshot;
mod cmd_drop_row;
mod cmd_merge;
mod cmd_export_json;
mod cmd_status;

fn init_logger() {
    // Уровень берём из RUST_LOG, иначе дефолт - info.
    // Пример: RUST_LOG=debug cardcube ...
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    if let Err(e) = run() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::Cli::parse();
    match cli.cmd {
        cli::Cmd::Push { path, row, cell, values } =>
            cmd_push::exec(path, row, cell, values),

        cli::Cmd::Count { path, row, cell } =>
            cmd_count::exec(path, row, cell),

        cli::Cmd::Rows { path, json } =>
            cmd_rows::exec(path, json),

        cli::Cmd::Cells { path, row, json } =>
            cmd_cells::exec(path, row, json),

        cli::Cmd::Snapshot { path, row, json } =>
            cmd_snapshot::exec(path, row, json),

        cli::Cmd::DropRow { path, row } =>
            cmd_drop_row::exec(path, row),

        cli::Cmd::Merge { path, from } =>
            cmd_merge::exec(path, from),

        cli::Cmd::ExportJson { path, out } =>
            cmd_export_json::exec(path, out),

        cli::Cmd::Status { path, json } =>
            cmd_status::exec(path, json),
    }
}
