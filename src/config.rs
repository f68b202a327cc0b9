//! Centralized configuration and builder for CardCube.
//!
//! Goals:
//! - Single place to collect tunables instead of scattering env lookups.
//! - CubeConfig::from_env() reads CC_* env vars, builder setters override them.
//!
//! Tunables:
//! - hll_precision (ENV CC_HLL_PRECISION, default 14): precision of freshly generated cells.
//! - cell_lock_stripes (ENV CC_CELL_LOCK_STRIPES, default 1): 1 = single board-wide
//!   creation lock, N > 1 = N stripes chosen by row name hash.
//! - dump_zstd (ENV CC_DUMP_ZSTD, default false): compress dump body with zstd.
//! - zstd_level (ENV CC_ZSTD_LEVEL, default 3).

use std::fmt;

use crate::consts::{
    ENV_CELL_LOCK_STRIPES, ENV_DUMP_ZSTD, ENV_HLL_PRECISION, ENV_ZSTD_LEVEL,
    HLL_DEFAULT_PRECISION, HLL_MAX_PRECISION, HLL_MIN_PRECISION,
};

/// Top-level configuration for a cube/board pair.
#[derive(Clone, Debug)]
pub struct CubeConfig {
    /// HLL precision for generated cells (clamped to 4..=18).
    /// Env: CC_HLL_PRECISION (default 14)
    pub hll_precision: u8,

    /// Number of cell-creation lock stripes (0 is treated as 1).
    /// Env: CC_CELL_LOCK_STRIPES (default 1)
    pub cell_lock_stripes: usize,

    /// Compress dump body with zstd.
    /// Env: CC_DUMP_ZSTD = 0|1|true|false (default false)
    pub dump_zstd: bool,

    /// zstd level used when dump_zstd is on.
    /// Env: CC_ZSTD_LEVEL (default 3)
    pub zstd_level: i32,
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            hll_precision: HLL_DEFAULT_PRECISION,
            cell_lock_stripes: 1,
            dump_zstd: false,
            zstd_level: 3,
        }
    }
}

fn env_flag(v: &str) -> bool {
    let s = v.trim().to_ascii_lowercase();
    s == "1" || s == "true" || s == "on" || s == "yes"
}

impl CubeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var(ENV_HLL_PRECISION) {
            if let Ok(p) = v.trim().parse::<u8>() {
                cfg.hll_precision = clamp_precision(p);
            }
        }

        if let Ok(v) = std::env::var(ENV_CELL_LOCK_STRIPES) {
            if let Ok(n) = v.trim().parse::<usize>() {
                cfg.cell_lock_stripes = n.max(1);
            }
        }

        if let Ok(v) = std::env::var(ENV_DUMP_ZSTD) {
            cfg.dump_zstd = env_flag(&v);
        }

        if let Ok(v) = std::env::var(ENV_ZSTD_LEVEL) {
            if let Ok(n) = v.trim().parse::<i32>() {
                cfg.zstd_level = n;
            }
        }

        cfg
    }

    /// Builder starting from env.
    pub fn builder() -> CubeConfigBuilder {
        CubeConfigBuilder::new()
    }

    pub fn with_hll_precision(mut self, p: u8) -> Self {
        self.hll_precision = clamp_precision(p);
        self
    }

    pub fn with_cell_lock_stripes(mut self, n: usize) -> Self {
        self.cell_lock_stripes = n.max(1);
        self
    }

    pub fn with_dump_zstd(mut self, on: bool) -> Self {
        self.dump_zstd = on;
        self
    }

    pub fn with_zstd_level(mut self, level: i32) -> Self {
        self.zstd_level = level;
        self
    }
}

/// Precision outside 4..=18 is clamped rather than rejected.
pub fn clamp_precision(p: u8) -> u8 {
    p.clamp(HLL_MIN_PRECISION, HLL_MAX_PRECISION)
}

impl fmt::Display for CubeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CubeConfig {{ \
             hll_precision: {}, \
             cell_lock_stripes: {}, \
             dump_zstd: {}, \
             zstd_level: {} \
             }}",
            self.hll_precision,
            if self.cell_lock_stripes <= 1 {
                "board-wide".to_string()
            } else {
                self.cell_lock_stripes.to_string()
            },
            self.dump_zstd,
            self.zstd_level,
        )
    }
}

/// Lightweight builder that produces a CubeConfig.
#[derive(Clone, Debug)]
pub struct CubeConfigBuilder {
    cfg: CubeConfig,
}

impl Default for CubeConfigBuilder {
    fn default() -> Self {
        // Стартуем от ENV, затем позволяем переопределить.
        Self {
            cfg: CubeConfig::from_env(),
        }
    }
}

impl CubeConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a clean default (without reading env).
    pub fn from_default() -> Self {
        Self {
            cfg: CubeConfig::default(),
        }
    }

    pub fn hll_precision(mut self, p: u8) -> Self {
        self.cfg = self.cfg.with_hll_precision(p);
        self
    }

    pub fn cell_lock_stripes(mut self, n: usize) -> Self {
        self.cfg = self.cfg.with_cell_lock_stripes(n);
        self
    }

    pub fn dump_zstd(mut self, on: bool) -> Self {
        self.cfg.dump_zstd = on;
        self
    }

    pub fn zstd_level(mut self, level: i32) -> Self {
        self.cfg.zstd_level = level;
        self
    }

    /// Finish the builder and obtain the configuration.
    pub fn build(self) -> CubeConfig {
        self.cfg
    }
}
