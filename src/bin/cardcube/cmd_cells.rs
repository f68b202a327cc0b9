use anyhow::Result;
use std::path::PathBuf;

use super::util::open_board;

pub fn exec(path: PathBuf, row: String, json: bool) -> Result<()> {
    let (board, _cfg) = open_board(&path)?;
    if !board.row_exists(&row) {
        println!("NOT FOUND row '{}'", row);
        return Ok(());
    }
    let names = board.cell_names(&row);
    if json {
        println!("{}", serde_json::to_string(&names)?);
        return Ok(());
    }
    for name in &names {
        println!("{}", name);
    }
    println!("cells: {}", names.len());
    Ok(())
}
