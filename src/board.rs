//! board - потокобезопасная доска: имя строки -> строка -> ячейки.
//!
//! Две независимые области блокировок:
//! - `rows`: RwLock над набором строк (поиск/вставка/удаление строк, полные проходы).
//! - `cell_locks`: сериализация ПЕРВОГО создания ячейки. По умолчанию одна
//!   блокировка на всю доску; при `cell_lock_stripes > 1` - полосы по хешу имени
//!   строки (одна строка всегда попадает в одну полосу, так что «не более одного
//!   создания на ключ» сохраняется).
//!
//! Порядок захвата: rows -> cell_lock (только import). Путь создания ячейки
//! берёт cell_lock, НЕ держа rows, поэтому взаимоблокировки нет.
//!
//! Полные проходы:
//! - board_snapshot / export - shared rows на весь проход (набор строк заморожен);
//! - import - exclusive rows на весь проход.

use anyhow::Result;
use log::{debug, warn};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::cell::Cell;
use crate::config::CubeConfig;
use crate::cube::{CellFactory, Cube};
use crate::hash::stripe_of;
use crate::metrics::{
    record_board_snapshot, record_cell_created, record_create_race, record_export, record_import,
    record_row_created, record_row_dropped,
};
use crate::persist::PersistedBoard;
use crate::row::{Row, RowStore};
use crate::snapshot::{BoardSnapshot, RowSnapshot};

type RowMap<R> = HashMap<String, Arc<R>>;

pub struct Board<R: RowStore = Row> {
    factory: Arc<dyn CellFactory>,
    rows: RwLock<RowMap<R>>,
    cell_locks: Vec<Mutex<()>>,
}

impl Board<Row> {
    /// Board with the default row type and an HLL cube built from `cfg`.
    pub fn from_config(cfg: &CubeConfig) -> Self {
        Self::with_config(Arc::new(Cube::from_config(cfg)), cfg)
    }
}

impl<R: RowStore> Board<R> {
    /// Board with a single board-wide cell-creation lock.
    pub fn new(factory: Arc<dyn CellFactory>) -> Self {
        Self::with_cell_lock_stripes(factory, 1)
    }

    pub fn with_config(factory: Arc<dyn CellFactory>, cfg: &CubeConfig) -> Self {
        Self::with_cell_lock_stripes(factory, cfg.cell_lock_stripes)
    }

    pub fn with_cell_lock_stripes(factory: Arc<dyn CellFactory>, stripes: usize) -> Self {
        let stripes = stripes.max(1);
        Self {
            factory,
            rows: RwLock::new(HashMap::new()),
            cell_locks: (0..stripes).map(|_| Mutex::new(())).collect(),
        }
    }

    pub fn cell_lock_stripes(&self) -> usize {
        self.cell_locks.len()
    }

    // Под rows лежит только HashMap<String, Arc<R>>: вставка/удаление атомарны
    // с точки зрения структуры, poisoned lock можно продолжать использовать.
    fn rows_read(&self) -> RwLockReadGuard<'_, RowMap<R>> {
        self.rows.read().unwrap_or_else(|e| e.into_inner())
    }

    fn rows_write(&self) -> RwLockWriteGuard<'_, RowMap<R>> {
        self.rows.write().unwrap_or_else(|e| e.into_inner())
    }

    fn cell_lock(&self, row_name: &str) -> MutexGuard<'_, ()> {
        let idx = if self.cell_locks.len() == 1 {
            0
        } else {
            stripe_of(row_name, self.cell_locks.len())
        };
        self.cell_locks[idx].lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lookup_row(&self, row_name: &str) -> Option<Arc<R>> {
        self.rows_read().get(row_name).cloned()
    }

    /// Resolve a row, creating it if absent (double-checked under the write lock).
    fn get_or_create_row(&self, row_name: &str) -> Arc<R> {
        if let Some(row) = self.lookup_row(row_name) {
            return row;
        }
        let mut rows = self.rows_write();
        if let Some(row) = rows.get(row_name) {
            return Arc::clone(row);
        }
        let row = Arc::new(R::new());
        rows.insert(row_name.to_string(), Arc::clone(&row));
        record_row_created();
        debug!("board: row '{}' created", row_name);
        row
    }

    /// Look up a cell; with `create_if_absent` the row and the cell are created
    /// lazily, exactly once per key no matter how many callers race.
    pub fn get_cell(
        &self,
        row_name: &str,
        cell_name: &str,
        create_if_absent: bool,
    ) -> Option<Arc<Cell>> {
        let row = if create_if_absent {
            self.get_or_create_row(row_name)
        } else {
            self.lookup_row(row_name)?
        };

        if let Some(cell) = row.get_cell(cell_name) {
            return Some(cell);
        }
        if !create_if_absent {
            return None;
        }

        let _guard = self.cell_lock(row_name);
        if let Some(cell) = row.get_cell(cell_name) {
            // кто-то успел создать между первой проверкой и захватом lock
            record_create_race();
            return Some(cell);
        }
        let cell = Arc::new(self.factory.generate_cell());
        row.set_cell(cell_name, Arc::clone(&cell));
        record_cell_created();
        Some(cell)
    }

    /// Snapshot of a single row; consistency is whatever the row guarantees.
    pub fn row_snapshot(&self, row_name: &str) -> Option<RowSnapshot> {
        let row = self.lookup_row(row_name)?;
        Some(row.snapshot())
    }

    /// Snapshot of every row. The row set is frozen for the whole sweep.
    pub fn board_snapshot(&self) -> BoardSnapshot {
        let rows = self.rows_read();
        let mut ss = BoardSnapshot::default();
        for (name, row) in rows.iter() {
            ss.rows.insert(name.clone(), row.snapshot());
        }
        record_board_snapshot();
        ss
    }

    pub fn row_exists(&self, row_name: &str) -> bool {
        self.rows_read().contains_key(row_name)
    }

    /// Remove a row and all of its cells. Returns false if there was nothing to drop.
    pub fn drop_row(&self, row_name: &str) -> bool {
        let removed = self.rows_write().remove(row_name).is_some();
        if removed {
            record_row_dropped();
            debug!("board: row '{}' dropped", row_name);
        }
        removed
    }

    /// Row names, sorted.
    pub fn row_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.rows_read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn row_count(&self) -> usize {
        self.rows_read().len()
    }

    pub fn cell_names(&self, row_name: &str) -> Vec<String> {
        match self.lookup_row(row_name) {
            Some(row) => row.cell_names(),
            None => Vec::new(),
        }
    }

    pub fn cell_count(&self, row_name: &str) -> usize {
        match self.lookup_row(row_name) {
            Some(row) => row.cell_count(),
            None => 0,
        }
    }

    /// Total number of cells across all rows (one sweep under the shared lock).
    pub fn cell_total(&self) -> usize {
        self.rows_read().values().map(|r| r.cell_count()).sum()
    }

    /// Add a value to the (row, cell) estimator, creating it if needed.
    pub fn push(&self, row_name: &str, cell_name: &str, value: &[u8]) {
        if let Some(cell) = self.get_cell(row_name, cell_name, true) {
            cell.insert(value);
        }
    }

    /// Estimate of an existing cell; never creates anything.
    pub fn count(&self, row_name: &str, cell_name: &str) -> Option<u64> {
        self.get_cell(row_name, cell_name, false).map(|c| c.count())
    }

    /// Export every row. Fails fast: the first row error is returned and no
    /// partial result escapes.
    pub fn export(&self) -> Result<PersistedBoard> {
        let rows = self.rows_read();
        let mut out = PersistedBoard::default();
        for (name, row) in rows.iter() {
            match row.export() {
                Ok(data) => {
                    out.rows.insert(name.clone(), data);
                }
                Err(e) => {
                    warn!("board export aborted at row '{}': {:#}", name, e);
                    record_export(false);
                    return Err(e);
                }
            }
        }
        record_export(true);
        Ok(out)
    }

    /// Merge persisted data into the board: missing rows are created, named
    /// cells are overwritten, nothing is removed. On a deserialization error
    /// the rest is skipped; whatever merged before the error stays merged.
    pub fn import(&self, data: &PersistedBoard) -> Result<()> {
        let mut rows = self.rows_write();
        let mut merged: u64 = 0;

        for (row_name, row_data) in &data.rows {
            let existing = rows.get(row_name).cloned();
            let row = match existing {
                Some(row) => row,
                None => {
                    let row = Arc::new(R::new());
                    rows.insert(row_name.clone(), Arc::clone(&row));
                    record_row_created();
                    row
                }
            };

            for (cell_name, cell_data) in &row_data.cells {
                let cell = match self.factory.deserialize_cell(&cell_data.payload) {
                    Ok(c) => Arc::new(c),
                    Err(e) => {
                        warn!(
                            "board import aborted at '{}'/'{}' after {} cell(s): {:#}",
                            row_name, cell_name, merged, e
                        );
                        record_import(false, merged);
                        return Err(e);
                    }
                };
                // запись через тот же lock, что и ленивое создание: без гонки с get_cell
                let _guard = self.cell_lock(row_name);
                row.set_cell(cell_name, cell);
                merged += 1;
            }
        }

        record_import(true, merged);
        debug!(
            "board import: {} row(s), {} cell(s) merged",
            data.rows.len(),
            merged
        );
        Ok(())
    }
}

impl<R: RowStore> fmt::Debug for Board<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("rows", &self.row_count())
            .field("cell_lock_stripes", &self.cell_locks.len())
            .finish()
    }
}
