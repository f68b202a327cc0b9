//! cell - ячейка доски: потокобезопасная обёртка над HLL скетчем.
//!
//! Ячейка живёт за `Arc<Cell>` и пишется многими потоками одновременно,
//! поэтому скетч спрятан под собственный Mutex.

pub mod hll;

use anyhow::{anyhow, Result};
use std::sync::{Mutex, MutexGuard};

pub use hll::HyperLogLog;

/// Происхождение ячейки.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellOrigin {
    /// Создана фабрикой впервые (lazy creation).
    Generated,
    /// Восстановлена из байтов (import / load).
    Deserialized,
}

#[derive(Debug)]
pub struct Cell {
    origin: CellOrigin,
    sketch: Mutex<HyperLogLog>,
}

impl Cell {
    pub fn new(sketch: HyperLogLog, origin: CellOrigin) -> Self {
        Self {
            origin,
            sketch: Mutex::new(sketch),
        }
    }

    #[inline]
    pub fn origin(&self) -> CellOrigin {
        self.origin
    }

    // Чтение/запись переживают poisoned mutex (запись регистра - один max()).
    // Экспорт (to_bytes) такой скетч не сериализует.
    fn sketch(&self) -> MutexGuard<'_, HyperLogLog> {
        self.sketch.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn insert(&self, value: &[u8]) {
        self.sketch().insert(value);
    }

    pub fn insert_hash(&self, h: u64) {
        self.sketch().insert_hash(h);
    }

    /// Current cardinality estimate.
    pub fn count(&self) -> u64 {
        self.sketch().estimate()
    }

    pub fn precision(&self) -> u8 {
        self.sketch().precision()
    }

    /// Merge another cell's registers into this one.
    pub fn merge(&self, other: &Cell) -> Result<()> {
        if std::ptr::eq(self, other) {
            return Ok(());
        }
        // Копируем чужой скетч до захвата своего, чтобы не держать два mutex сразу.
        let theirs = other.sketch().clone();
        self.sketch().merge(&theirs)
    }

    /// Opaque payload for the persisted form.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let guard = self
            .sketch
            .lock()
            .map_err(|_| anyhow!("cell sketch poisoned"))?;
        Ok(guard.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash64_default;

    fn cell(p: u8) -> Cell {
        Cell::new(HyperLogLog::with_clamped_precision(p), CellOrigin::Generated)
    }

    #[test]
    fn merge_is_union() {
        let a = cell(12);
        let b = cell(12);
        for i in 0..100u32 {
            a.insert(&i.to_le_bytes());
        }
        for i in 50..150u32 {
            b.insert(&i.to_le_bytes());
        }
        a.merge(&b).unwrap();
        let est = a.count();
        assert!((135..=165).contains(&est), "union estimate {est}");
        // источник не меняется
        assert!((90..=110).contains(&b.count()));
    }

    #[test]
    fn self_merge_is_noop() {
        let a = cell(10);
        for i in 0..40u32 {
            a.insert(&i.to_le_bytes());
        }
        let before = a.to_bytes().unwrap();
        a.merge(&a).unwrap();
        assert_eq!(a.to_bytes().unwrap(), before);
    }

    #[test]
    fn merge_rejects_precision_mismatch() {
        let a = cell(10);
        let b = cell(12);
        b.insert(b"x");
        assert!(a.merge(&b).is_err());
        assert!(a.sketch().is_empty());
    }

    #[test]
    fn insert_hash_matches_insert() {
        let a = cell(8);
        let b = cell(8);
        for v in [&b"alpha"[..], b"beta", b"gamma"] {
            a.insert(v);
            b.insert_hash(hash64_default(v));
        }
        assert_eq!(a.to_bytes().unwrap(), b.to_bytes().unwrap());
        assert!((2..=4).contains(&b.count()));
    }
}
