use anyhow::Result;
use std::path::PathBuf;

use super::util::open_board;

pub fn exec(path: PathBuf, row: String, cell: String) -> Result<()> {
    let (board, _cfg) = open_board(&path)?;
    match board.count(&row, &cell) {
        Some(n) => println!("{}", n),
        None => println!("NOT FOUND '{}/{}'", row, cell),
    }
    Ok(())
}
