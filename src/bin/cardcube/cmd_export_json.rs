use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use super::util::open_board;

pub fn exec(path: PathBuf, out: Option<PathBuf>) -> Result<()> {
    let (board, _cfg) = open_board(&path)?;
    let data = board.export()?;
    let text = serde_json::to_string_pretty(&data)?;

    match out {
        Some(out_path) => {
            if let Some(parent) = out_path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let mut f = OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(&out_path)
                .with_context(|| format!("open {}", out_path.display()))?;
            f.write_all(text.as_bytes())?;
            f.sync_all()?;
            println!(
                "exported {} row(s), {} cell(s) -> {}",
                data.row_count(),
                data.cell_total(),
                out_path.display()
            );
        }
        None => println!("{}", text),
    }
    Ok(())
}
