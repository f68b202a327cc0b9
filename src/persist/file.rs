//! persist/file - дамп доски в файл и обратно.
//!
//! Запись атомарная: `<dump>.tmp` + fsync + rename под exclusive lock `<dump>.lock`.
//! Чтение под shared lock. Отсутствующий файл - это «пустая доска» (Ok(None)).

use anyhow::{Context, Result};
use log::{debug, info};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use super::codec::{decode_board, encode_board, DumpOptions};
use super::PersistedBoard;
use crate::board::Board;
use crate::consts::DUMP_TMP_SUFFIX;
use crate::lock::{acquire_lock, sibling_with_suffix, LockMode};
use crate::metrics::{record_dump_loaded, record_dump_written};
use crate::row::RowStore;

/// Write a persisted board to `path`. Returns the number of bytes written.
pub fn save_board_file(path: &Path, board: &PersistedBoard, opts: DumpOptions) -> Result<usize> {
    let bytes = encode_board(board, opts)?;
    let guard = acquire_lock(path, LockMode::Exclusive)?;
    debug!("save_board_file: holding {}", guard.path().display());

    let tmp = sibling_with_suffix(path, DUMP_TMP_SUFFIX);
    {
        let mut f = OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(&tmp)
            .with_context(|| format!("open {}", tmp.display()))?;
        f.write_all(&bytes)
            .with_context(|| format!("write {}", tmp.display()))?;
        f.sync_all()
            .with_context(|| format!("fsync {}", tmp.display()))?;
    }
    fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;

    record_dump_written(bytes.len());
    debug!(
        "save_board_file: {} rows, {} cells, {} bytes -> {}",
        board.row_count(),
        board.cell_total(),
        bytes.len(),
        path.display()
    );
    Ok(bytes.len())
}

/// Read and verify a dump. Missing file yields Ok(None).
pub fn load_board_file(path: &Path) -> Result<Option<PersistedBoard>> {
    if !path.exists() {
        debug!("load_board_file: {} not found, nothing to load", path.display());
        return Ok(None);
    }
    let _guard = acquire_lock(path, LockMode::Shared)?;
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let board = decode_board(&bytes).with_context(|| format!("decode dump {}", path.display()))?;
    record_dump_loaded();
    Ok(Some(board))
}

/// Export `board` and write it to `path`.
pub fn dump_board<R: RowStore>(board: &Board<R>, path: &Path, opts: DumpOptions) -> Result<usize> {
    let data = board.export()?;
    let n = save_board_file(path, &data, opts)?;
    info!(
        "board dumped: {} rows, {} cells -> {} ({} bytes)",
        data.row_count(),
        data.cell_total(),
        path.display(),
        n
    );
    Ok(n)
}

/// Merge the dump at `path` into `board`. Returns false if there was no dump.
pub fn restore_board<R: RowStore>(board: &Board<R>, path: &Path) -> Result<bool> {
    let Some(data) = load_board_file(path)? else {
        return Ok(false);
    };
    board.import(&data)?;
    info!(
        "board restored: {} rows, {} cells <- {}",
        data.row_count(),
        data.cell_total(),
        path.display()
    );
    Ok(true)
}
