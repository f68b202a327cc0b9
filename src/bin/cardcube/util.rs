use anyhow::{anyhow, Result};
use std::io::{BufRead, BufReader};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use CardCube::persist::{dump_board, restore_board, DumpOptions};
use CardCube::{Board, CubeConfig};

/// Открыть доску: конфиг из ENV + содержимое дампа (если файл есть).
pub fn open_board(path: &Path) -> Result<(Board, CubeConfig)> {
    let cfg = CubeConfig::from_env();
    let board = Board::from_config(&cfg);
    restore_board(&board, path)?;
    Ok((board, cfg))
}

pub fn save_board(board: &Board, cfg: &CubeConfig, path: &Path) -> Result<usize> {
    dump_board(board, path, DumpOptions::from_config(cfg))
}

/// Разобрать аргумент значения в список значений:
/// - "-"      - строки из stdin
/// - "@file"  - строки файла
/// - "hex:.." - одно бинарное значение
/// - иначе    - литерал
pub fn decode_values_arg(arg: &str) -> Result<Vec<Vec<u8>>> {
    if arg == "-" {
        let stdin = std::io::stdin();
        return read_lines(stdin.lock());
    }
    if let Some(p) = arg.strip_prefix('@') {
        let path = PathBuf::from(p);
        let f = OpenOptions::new()
            .read(true)
            .open(&path)
            .map_err(|e| anyhow!("open values file {}: {}", path.display(), e))?;
        return read_lines(BufReader::new(f));
    }
    if let Some(hx) = arg.strip_prefix("hex:") {
        return Ok(vec![decode_hex(hx)?]);
    }
    Ok(vec![arg.as_bytes().to_vec()])
}

fn read_lines<R: BufRead>(r: R) -> Result<Vec<Vec<u8>>> {
    let mut out = Vec::new();
    for line in r.lines() {
        let line = line?;
        let line = line.trim_end_matches('\r');
        if !line.is_empty() {
            out.push(line.as_bytes().to_vec());
        }
    }
    Ok(out)
}

pub fn decode_hex(s: &str) -> Result<Vec<u8>> {
    let s = s.trim();
    if s.len() % 2 != 0 {
        return Err(anyhow!("hex string must have even length"));
    }
    let mut out = Vec::with_capacity(s.len() / 2);
    let bytes = s.as_bytes();
    for i in (0..bytes.len()).step_by(2) {
        let h = (bytes[i] as char)
            .to_digit(16)
            .ok_or_else(|| anyhow!("invalid hex at pos {}", i))?;
        let l = (bytes[i + 1] as char)
            .to_digit(16)
            .ok_or_else(|| anyhow!("invalid hex at pos {}", i + 1))?;
        out.push(((h << 4) | l) as u8);
    }
    Ok(out)
}
