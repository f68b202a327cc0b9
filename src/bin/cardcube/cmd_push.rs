use anyhow::Result;
use std::path::PathBuf;

use super::util::{decode_values_arg, open_board, save_board};

pub fn exec(path: PathBuf, row: String, cell: String, values: Vec<String>) -> Result<()> {
    let (board, cfg) = open_board(&path)?;

    let mut pushed = 0usize;
    for arg in &values {
        for v in decode_values_arg(arg)? {
            board.push(&row, &cell, &v);
            pushed += 1;
        }
    }

    save_board(&board, &cfg, &path)?;
    let est = board.count(&row, &cell).unwrap_or(0);
    println!("pushed {} value(s) into {}/{}; estimate={}", pushed, row, cell, est);
    Ok(())
}
