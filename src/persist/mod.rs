//! persist - persisted form of a board.
//!
//! Раскладка:
//! - mod.rs   - типы PersistedBoard / PersistedRow / PersistedCell (serde).
//! - codec.rs - бинарный дамп (заголовок + crc32, опционально zstd).
//! - file.rs  - сохранение/загрузка дампа в файл (tmp+rename, advisory lock).
//!
//! BTreeMap везде: порядок строк/ячеек в дампе детерминирован.

pub mod codec;
pub mod file;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use codec::{decode_board, decode_board_with_limit, encode_board, DumpOptions};
pub use file::{dump_board, load_board_file, restore_board, save_board_file};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedBoard {
    pub rows: BTreeMap<String, PersistedRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedRow {
    pub cells: BTreeMap<String, PersistedCell>,
}

/// Opaque cell payload (encoding is owned by the cell factory).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedCell {
    #[serde(with = "payload_b64")]
    pub payload: Vec<u8>,
}

impl PersistedBoard {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn cell_total(&self) -> usize {
        self.rows.values().map(|r| r.cells.len()).sum()
    }
}

impl PersistedCell {
    pub fn new(payload: Vec<u8>) -> Self {
        Self { payload }
    }
}

// В JSON полезная нагрузка идёт base64-строкой.
mod payload_b64 {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(d)?;
        base64::engine::general_purpose::STANDARD
            .decode(s.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
