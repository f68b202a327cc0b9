use anyhow::{anyhow, Result};
use std::path::PathBuf;

use CardCube::persist::load_board_file;

use super::util::{open_board, save_board};

/// CLI: merge - аддитивный import чужого дампа (ячейки с теми же именами перезаписываются).
pub fn exec(path: PathBuf, from: PathBuf) -> Result<()> {
    let incoming = load_board_file(&from)?
        .ok_or_else(|| anyhow!("source dump {} not found", from.display()))?;

    let (board, cfg) = open_board(&path)?;
    board.import(&incoming)?;
    save_board(&board, &cfg, &path)?;

    println!(
        "merged {} row(s), {} cell(s) from {}; board now has {} row(s)",
        incoming.row_count(),
        incoming.cell_total(),
        from.display(),
        board.row_count()
    );
    Ok(())
}
