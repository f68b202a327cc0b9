//! cube - фабрика ячеек (генерация и десериализация).
//!
//! Board не знает, как устроена ячейка: свежие ячейки и восстановление из байтов
//! идут через `CellFactory`.

use anyhow::{Context, Result};

use crate::cell::{Cell, CellOrigin, HyperLogLog};
use crate::config::{clamp_precision, CubeConfig};

/// Factory collaborator used by the board.
pub trait CellFactory: Send + Sync {
    /// Fresh, empty estimator.
    fn generate_cell(&self) -> Cell;

    /// Restore a cell from its opaque payload.
    fn deserialize_cell(&self, bytes: &[u8]) -> Result<Cell>;
}

/// HLL-based cube. Generated cells use the configured precision; deserialized
/// cells keep whatever precision their payload carries.
#[derive(Debug, Clone)]
pub struct Cube {
    precision: u8,
}

impl Cube {
    pub fn new(precision: u8) -> Self {
        Self {
            precision: clamp_precision(precision),
        }
    }

    pub fn from_config(cfg: &CubeConfig) -> Self {
        Self::new(cfg.hll_precision)
    }

    #[inline]
    pub fn precision(&self) -> u8 {
        self.precision
    }
}

impl Default for Cube {
    fn default() -> Self {
        Self::from_config(&CubeConfig::default())
    }
}

impl CellFactory for Cube {
    fn generate_cell(&self) -> Cell {
        Cell::new(
            HyperLogLog::with_clamped_precision(self.precision),
            CellOrigin::Generated,
        )
    }

    fn deserialize_cell(&self, bytes: &[u8]) -> Result<Cell> {
        let sketch = HyperLogLog::decode(bytes).context("deserialize cell payload")?;
        Ok(Cell::new(sketch, CellOrigin::Deserialized))
    }
}
