//! persist/codec - бинарный дамп доски.
//!
//! Header (28 B, LE):
//!   [magic8="CCBOARD1"][ver u32=1][flags u32][body_len u64][crc32 u32]
//! Body (до сжатия):
//!   [rows u32]
//!     { [name_len u16][name utf8][cells u32]
//!         { [name_len u16][name utf8][payload_len u32][payload] } }
//!
//! Замечания:
//! - flags bit0 (DUMP_FLAG_ZSTD): body хранится сжатым zstd.
//! - body_len и crc32 считаются по ХРАНИМЫМ байтам body (после сжатия).
//! - Хвост после body - ошибка (обрезанный/склеенный файл).
//! - Повтор имени строки (или ячейки внутри строки) - ошибка.
//! - Распакованный body ограничен `DUMP_MAX_RAW_BODY`.

use anyhow::{anyhow, Context, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use crc32fast::Hasher as Crc32;
use std::io::{Cursor, Read, Write};

use super::{PersistedBoard, PersistedCell, PersistedRow};
use crate::config::CubeConfig;
use crate::consts::{
    DUMP_FLAG_ZSTD, DUMP_HDR_SIZE, DUMP_MAGIC, DUMP_MAX_RAW_BODY, DUMP_VERSION,
};

/// Options for encoding a dump.
#[derive(Debug, Clone, Copy, Default)]
pub struct DumpOptions {
    pub zstd: bool,
    pub zstd_level: i32,
}

impl DumpOptions {
    pub fn from_config(cfg: &CubeConfig) -> Self {
        Self {
            zstd: cfg.dump_zstd,
            zstd_level: cfg.zstd_level,
        }
    }
}

fn write_name<W: Write>(w: &mut W, name: &str) -> Result<()> {
    let len = u16::try_from(name.len())
        .map_err(|_| anyhow!("name too long for dump ({} bytes): {:.32}...", name.len(), name))?;
    w.write_u16::<LittleEndian>(len)?;
    w.write_all(name.as_bytes())?;
    Ok(())
}

fn read_name<R: Read>(r: &mut R) -> Result<String> {
    let len = r.read_u16::<LittleEndian>()? as usize;
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    String::from_utf8(buf).map_err(|_| anyhow!("dump: name is not valid UTF-8"))
}

fn encode_body(board: &PersistedBoard) -> Result<Vec<u8>> {
    let mut out: Vec<u8> = Vec::new();
    out.write_u32::<LittleEndian>(board.rows.len() as u32)?;
    for (row_name, row) in &board.rows {
        write_name(&mut out, row_name)?;
        out.write_u32::<LittleEndian>(row.cells.len() as u32)?;
        for (cell_name, cell) in &row.cells {
            write_name(&mut out, cell_name)?;
            let plen = u32::try_from(cell.payload.len())
                .map_err(|_| anyhow!("cell payload too large: {}/{}", row_name, cell_name))?;
            out.write_u32::<LittleEndian>(plen)?;
            out.write_all(&cell.payload)?;
        }
    }
    Ok(out)
}

fn decode_body(body: &[u8]) -> Result<PersistedBoard> {
    let mut cur = Cursor::new(body);
    let mut board = PersistedBoard::default();

    let rows = cur.read_u32::<LittleEndian>().context("dump: read row count")?;
    for _ in 0..rows {
        let row_name = read_name(&mut cur).context("dump: read row name")?;
        if board.rows.contains_key(&row_name) {
            return Err(anyhow!("dump: duplicate row '{}'", row_name));
        }
        let cells = cur
            .read_u32::<LittleEndian>()
            .with_context(|| format!("dump: read cell count of row '{}'", row_name))?;
        let mut row = PersistedRow::default();
        for _ in 0..cells {
            let cell_name = read_name(&mut cur)
                .with_context(|| format!("dump: read cell name in row '{}'", row_name))?;
            if row.cells.contains_key(&cell_name) {
                return Err(anyhow!(
                    "dump: duplicate cell '{}' in row '{}'",
                    cell_name,
                    row_name
                ));
            }
            let plen = cur.read_u32::<LittleEndian>()? as usize;
            let remaining = body.len() - cur.position() as usize;
            if plen > remaining {
                return Err(anyhow!(
                    "dump: payload of {}/{} claims {} bytes, only {} left",
                    row_name,
                    cell_name,
                    plen,
                    remaining
                ));
            }
            let mut payload = vec![0u8; plen];
            cur.read_exact(&mut payload)?;
            row.cells.insert(cell_name, PersistedCell::new(payload));
        }
        board.rows.insert(row_name, row);
    }

    if (cur.position() as usize) != body.len() {
        return Err(anyhow!(
            "dump: {} trailing bytes after body",
            body.len() - cur.position() as usize
        ));
    }
    Ok(board)
}

/// Encode a persisted board into a self-describing dump.
pub fn encode_board(board: &PersistedBoard, opts: DumpOptions) -> Result<Vec<u8>> {
    let raw = encode_body(board)?;
    let (flags, body) = if opts.zstd {
        let packed = zstd::bulk::compress(&raw, opts.zstd_level).context("zstd compress dump body")?;
        (DUMP_FLAG_ZSTD, packed)
    } else {
        (0u32, raw)
    };

    let mut h = Crc32::new();
    h.update(&body);
    let crc = h.finalize();

    let mut out = Vec::with_capacity(DUMP_HDR_SIZE + body.len());
    out.write_all(DUMP_MAGIC)?;
    out.write_u32::<LittleEndian>(DUMP_VERSION)?;
    out.write_u32::<LittleEndian>(flags)?;
    out.write_u64::<LittleEndian>(body.len() as u64)?;
    out.write_u32::<LittleEndian>(crc)?;
    out.write_all(&body)?;
    Ok(out)
}

/// Decode and verify a dump produced by `encode_board`.
pub fn decode_board(buf: &[u8]) -> Result<PersistedBoard> {
    decode_board_with_limit(buf, DUMP_MAX_RAW_BODY)
}

/// Same as `decode_board`, with an explicit cap on the decompressed body size.
pub fn decode_board_with_limit(buf: &[u8], max_raw_body: usize) -> Result<PersistedBoard> {
    if buf.len() < DUMP_HDR_SIZE {
        return Err(anyhow!("dump too small ({} bytes < header)", buf.len()));
    }
    let mut cur = Cursor::new(buf);
    let mut magic = [0u8; 8];
    cur.read_exact(&mut magic)?;
    if &magic != DUMP_MAGIC {
        return Err(anyhow!("bad dump magic"));
    }
    let ver = cur.read_u32::<LittleEndian>()?;
    if ver != DUMP_VERSION {
        return Err(anyhow!("unsupported dump version {}", ver));
    }
    let flags = cur.read_u32::<LittleEndian>()?;
    if flags & !DUMP_FLAG_ZSTD != 0 {
        return Err(anyhow!("unknown dump flags 0x{:08x}", flags));
    }
    let body_len = cur.read_u64::<LittleEndian>()? as usize;
    let crc_expected = cur.read_u32::<LittleEndian>()?;

    let body = &buf[DUMP_HDR_SIZE..];
    if body.len() != body_len {
        return Err(anyhow!(
            "dump body length mismatch: header says {}, file has {}",
            body_len,
            body.len()
        ));
    }

    let mut h = Crc32::new();
    h.update(body);
    let crc_actual = h.finalize();
    if crc_actual != crc_expected {
        return Err(anyhow!(
            "dump crc mismatch (expected 0x{:08x}, got 0x{:08x})",
            crc_expected,
            crc_actual
        ));
    }

    if flags & DUMP_FLAG_ZSTD != 0 {
        let mut raw = Vec::new();
        // +1 байт: отличить «ровно лимит» от «больше лимита»
        zstd::stream::read::Decoder::new(body)
            .context("zstd decoder")?
            .take(max_raw_body as u64 + 1)
            .read_to_end(&mut raw)
            .context("zstd decompress dump body")?;
        if raw.len() > max_raw_body {
            return Err(anyhow!(
                "dump body expands beyond {} bytes, refusing",
                max_raw_body
            ));
        }
        decode_body(&raw)
    } else {
        decode_body(body)
    }
}
