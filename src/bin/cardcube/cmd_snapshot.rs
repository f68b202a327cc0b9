use anyhow::Result;
use std::path::PathBuf;

use CardCube::RowSnapshot;

use super::util::open_board;

fn print_row(name: &str, ss: &RowSnapshot) {
    println!("[{}]", name);
    for (cell, n) in &ss.cells {
        println!("  {}\t{}", cell, n);
    }
}

pub fn exec(path: PathBuf, row: Option<String>, json: bool) -> Result<()> {
    let (board, _cfg) = open_board(&path)?;

    if let Some(row) = row {
        match board.row_snapshot(&row) {
            Some(ss) if json => println!("{}", serde_json::to_string_pretty(&ss)?),
            Some(ss) => print_row(&row, &ss),
            None => println!("NOT FOUND row '{}'", row),
        }
        return Ok(());
    }

    let ss = board.board_snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(&ss)?);
    } else {
        for (name, rs) in &ss.rows {
            print_row(name, rs);
        }
        println!("rows: {}, cells: {}", ss.row_count(), ss.cell_total());
    }
    Ok(())
}
