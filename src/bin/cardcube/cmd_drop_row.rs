use anyhow::Result;
use std::path::PathBuf;

use super::util::{open_board, save_board};

pub fn exec(path: PathBuf, row: String) -> Result<()> {
    let (board, cfg) = open_board(&path)?;
    if board.drop_row(&row) {
        save_board(&board, &cfg, &path)?;
        println!("DROPPED row '{}'", row);
    } else {
        println!("NOT FOUND row '{}'", row);
    }
    Ok(())
}
