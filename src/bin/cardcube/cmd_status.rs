use anyhow::Result;
use std::path::PathBuf;

use CardCube::metrics;

use super::util::open_board;

pub fn exec(path: PathBuf, json: bool) -> Result<()> {
    let dump_bytes = std::fs::metadata(&path).map(|m| m.len()).ok();
    let (board, cfg) = open_board(&path)?;
    let rows = board.row_count();
    let cells = board.cell_total();
    let m = metrics::snapshot();

    if json {
        let obj = serde_json::json!({
            "path": path.display().to_string(),
            "dump_bytes": dump_bytes,
            "rows": rows,
            "cells": cells,
            "config": {
                "hll_precision": cfg.hll_precision,
                "cell_lock_stripes": cfg.cell_lock_stripes,
                "dump_zstd": cfg.dump_zstd,
                "zstd_level": cfg.zstd_level,
            },
            "metrics": m,
        });
        println!("{}", serde_json::to_string_pretty(&obj)?);
        return Ok(());
    }

    println!("CardCube status");
    println!("  path:       {}", path.display());
    match dump_bytes {
        Some(n) => println!("  dump:       {} B", n),
        None => println!("  dump:       (none)"),
    }
    println!("  rows:       {}", rows);
    println!("  cells:      {}", cells);
    println!("  config:     {}", cfg);
    println!("  loaded:     {} dump(s), {} cell(s) imported", m.dumps_loaded, m.cells_imported);
    Ok(())
}
