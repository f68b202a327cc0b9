//! Lightweight global metrics for CardCube.
//!
//! Потокобезопасные атомарные счётчики для подсистем:
//! - Board (rows / cells / гонки создания)
//! - Sweeps (snapshot / export / import)
//! - Dump files (save / load)

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

// ----- Board -----
static ROWS_CREATED: AtomicU64 = AtomicU64::new(0);
static ROWS_DROPPED: AtomicU64 = AtomicU64::new(0);
static CELLS_CREATED: AtomicU64 = AtomicU64::new(0);
static CREATE_RACES_RESOLVED: AtomicU64 = AtomicU64::new(0);

// ----- Sweeps -----
static BOARD_SNAPSHOTS: AtomicU64 = AtomicU64::new(0);
static EXPORTS_TOTAL: AtomicU64 = AtomicU64::new(0);
static EXPORTS_FAILED: AtomicU64 = AtomicU64::new(0);
static IMPORTS_TOTAL: AtomicU64 = AtomicU64::new(0);
static IMPORTS_FAILED: AtomicU64 = AtomicU64::new(0);
static CELLS_IMPORTED: AtomicU64 = AtomicU64::new(0);

// ----- Dump files -----
static DUMPS_WRITTEN: AtomicU64 = AtomicU64::new(0);
static DUMP_BYTES_WRITTEN: AtomicU64 = AtomicU64::new(0);
static DUMPS_LOADED: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsSnapshot {
    // Board
    pub rows_created: u64,
    pub rows_dropped: u64,
    pub cells_created: u64,
    pub create_races_resolved: u64,

    // Sweeps
    pub board_snapshots: u64,
    pub exports_total: u64,
    pub exports_failed: u64,
    pub imports_total: u64,
    pub imports_failed: u64,
    pub cells_imported: u64,

    // Dump files
    pub dumps_written: u64,
    pub dump_bytes_written: u64,
    pub dumps_loaded: u64,
}

impl MetricsSnapshot {
    /// Доля вызовов создания, которые на double-check увидели уже созданную ячейку.
    pub fn create_race_ratio(&self) -> f64 {
        let total = self.cells_created + self.create_races_resolved;
        if total == 0 {
            0.0
        } else {
            self.create_races_resolved as f64 / total as f64
        }
    }
}

// ----- Recorders (Board) -----
pub fn record_row_created() {
    ROWS_CREATED.fetch_add(1, Ordering::Relaxed);
}

pub fn record_row_dropped() {
    ROWS_DROPPED.fetch_add(1, Ordering::Relaxed);
}

pub fn record_cell_created() {
    CELLS_CREATED.fetch_add(1, Ordering::Relaxed);
}

pub fn record_create_race() {
    CREATE_RACES_RESOLVED.fetch_add(1, Ordering::Relaxed);
}

// ----- Recorders (Sweeps) -----
pub fn record_board_snapshot() {
    BOARD_SNAPSHOTS.fetch_add(1, Ordering::Relaxed);
}

pub fn record_export(ok: bool) {
    EXPORTS_TOTAL.fetch_add(1, Ordering::Relaxed);
    if !ok {
        EXPORTS_FAILED.fetch_add(1, Ordering::Relaxed);
    }
}

pub fn record_import(ok: bool, cells: u64) {
    IMPORTS_TOTAL.fetch_add(1, Ordering::Relaxed);
    CELLS_IMPORTED.fetch_add(cells, Ordering::Relaxed);
    if !ok {
        IMPORTS_FAILED.fetch_add(1, Ordering::Relaxed);
    }
}

// ----- Recorders (Dump files) -----
pub fn record_dump_written(bytes: usize) {
    DUMPS_WRITTEN.fetch_add(1, Ordering::Relaxed);
    DUMP_BYTES_WRITTEN.fetch_add(bytes as u64, Ordering::Relaxed);
}

pub fn record_dump_loaded() {
    DUMPS_LOADED.fetch_add(1, Ordering::Relaxed);
}

// ----- Snapshot / Reset -----
pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        rows_created: ROWS_CREATED.load(Ordering::Relaxed),
        rows_dropped: ROWS_DROPPED.load(Ordering::Relaxed),
        cells_created: CELLS_CREATED.load(Ordering::Relaxed),
        create_races_resolved: CREATE_RACES_RESOLVED.load(Ordering::Relaxed),

        board_snapshots: BOARD_SNAPSHOTS.load(Ordering::Relaxed),
        exports_total: EXPORTS_TOTAL.load(Ordering::Relaxed),
        exports_failed: EXPORTS_FAILED.load(Ordering::Relaxed),
        imports_total: IMPORTS_TOTAL.load(Ordering::Relaxed),
        imports_failed: IMPORTS_FAILED.load(Ordering::Relaxed),
        cells_imported: CELLS_IMPORTED.load(Ordering::Relaxed),

        dumps_written: DUMPS_WRITTEN.load(Ordering::Relaxed),
        dump_bytes_written: DUMP_BYTES_WRITTEN.load(Ordering::Relaxed),
        dumps_loaded: DUMPS_LOADED.load(Ordering::Relaxed),
    }
}

pub fn reset() {
    ROWS_CREATED.store(0, Ordering::Relaxed);
    ROWS_DROPPED.store(0, Ordering::Relaxed);
    CELLS_CREATED.store(0, Ordering::Relaxed);
    CREATE_RACES_RESOLVED.store(0, Ordering::Relaxed);

    BOARD_SNAPSHOTS.store(0, Ordering::Relaxed);
    EXPORTS_TOTAL.store(0, Ordering::Relaxed);
    EXPORTS_FAILED.store(0, Ordering::Relaxed);
    IMPORTS_TOTAL.store(0, Ordering::Relaxed);
    IMPORTS_FAILED.store(0, Ordering::Relaxed);
    CELLS_IMPORTED.store(0, Ordering::Relaxed);

    DUMPS_WRITTEN.store(0, Ordering::Relaxed);
    DUMP_BYTES_WRITTEN.store(0, Ordering::Relaxed);
    DUMPS_LOADED.store(0, Ordering::Relaxed);
}
