//! Point-in-time, read-only copies of row and board contents.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cell name -> cardinality estimate, taken under the row's own read lock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSnapshot {
    pub cells: BTreeMap<String, u64>,
}

impl RowSnapshot {
    pub fn get(&self, cell: &str) -> Option<u64> {
        self.cells.get(cell).copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Row name -> RowSnapshot. Row membership is fixed at the instant the sweep
/// took the board's row-set lock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub rows: BTreeMap<String, RowSnapshot>,
}

impl BoardSnapshot {
    pub fn row(&self, name: &str) -> Option<&RowSnapshot> {
        self.rows.get(name)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn cell_total(&self) -> usize {
        self.rows.values().map(RowSnapshot::len).sum()
    }
}
