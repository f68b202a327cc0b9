use anyhow::Result;
use std::path::PathBuf;

use super::util::open_board;

pub fn exec(path: PathBuf, json: bool) -> Result<()> {
    let (board, _cfg) = open_board(&path)?;
    let names = board.row_names();
    if json {
        println!("{}", serde_json::to_string(&names)?);
        return Ok(());
    }
    for name in &names {
        println!("{}\t{} cell(s)", name, board.cell_count(name));
    }
    println!("rows: {}", names.len());
    Ok(())
}
