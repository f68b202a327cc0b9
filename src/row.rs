//! row - строка доски: имя ячейки -> Cell.
//!
//! `RowStore` - контракт, на который опирается Board. Board не берёт
//! собственных блокировок вокруг вызовов строки: потокобезопасность
//! get/set/enumerate/snapshot - ответственность реализации.
//!
//! `Row` - реализация по умолчанию на RwLock<HashMap>.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::cell::Cell;
use crate::persist::{PersistedCell, PersistedRow};
use crate::snapshot::RowSnapshot;

/// Contract every row implementation must satisfy.
pub trait RowStore: Send + Sync + 'static {
    /// Fresh empty row.
    fn new() -> Self
    where
        Self: Sized;

    fn get_cell(&self, name: &str) -> Option<Arc<Cell>>;

    /// Insert or overwrite.
    fn set_cell(&self, name: &str, cell: Arc<Cell>);

    /// Internally consistent copy of every cell's estimate.
    fn snapshot(&self) -> RowSnapshot;

    fn cell_names(&self) -> Vec<String>;

    fn cell_count(&self) -> usize;

    /// Serialize every cell. The first failing cell aborts the export.
    fn export(&self) -> Result<PersistedRow>;
}

#[derive(Debug, Default)]
pub struct Row {
    cells: RwLock<HashMap<String, Arc<Cell>>>,
}

impl Row {
    // Значения в карте - Arc, структура карты не ломается от паники читателя.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<Cell>>> {
        self.cells.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<Cell>>> {
        self.cells.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl RowStore for Row {
    fn new() -> Self {
        Self::default()
    }

    fn get_cell(&self, name: &str) -> Option<Arc<Cell>> {
        self.read().get(name).cloned()
    }

    fn set_cell(&self, name: &str, cell: Arc<Cell>) {
        self.write().insert(name.to_string(), cell);
    }

    fn snapshot(&self) -> RowSnapshot {
        // read-lock держим на весь проход: ни одна ячейка не добавится/не заменится посреди снимка
        let guard = self.read();
        let cells = guard
            .iter()
            .map(|(name, cell)| (name.clone(), cell.count()))
            .collect();
        RowSnapshot { cells }
    }

    fn cell_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    fn cell_count(&self) -> usize {
        self.read().len()
    }

    fn export(&self) -> Result<PersistedRow> {
        let guard = self.read();
        let mut out = PersistedRow::default();
        for (name, cell) in guard.iter() {
            let payload = cell
                .to_bytes()
                .with_context(|| format!("export cell '{}'", name))?;
            out.cells.insert(name.clone(), PersistedCell::new(payload));
        }
        Ok(out)
    }
}
