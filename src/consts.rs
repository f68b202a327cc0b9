//! Общие константы форматов (board dump, HLL payload, env).

// -------- Board dump --------
pub const DUMP_MAGIC: &[u8; 8] = b"CCBOARD1";
pub const DUMP_VERSION: u32 = 1;
// [magic8][ver u32][flags u32][body_len u64][crc32 u32]
pub const DUMP_HDR_SIZE: usize = 28;

// Флаги заголовка дампа
pub const DUMP_FLAG_ZSTD: u32 = 0x1;

// Потолок распакованного body (zstd): 1 GiB
pub const DUMP_MAX_RAW_BODY: usize = 1 << 30;

// Суффиксы служебных файлов рядом с дампом
pub const DUMP_TMP_SUFFIX: &str = "tmp";
pub const DUMP_LOCK_SUFFIX: &str = "lock";

// -------- HLL payload --------
// [magic4][precision u8][hash_kind u8][registers (1 << precision) bytes]
pub const HLL_MAGIC: &[u8; 4] = b"HLL1";
pub const HLL_HDR_SIZE: usize = 6;
pub const HLL_MIN_PRECISION: u8 = 4;
pub const HLL_MAX_PRECISION: u8 = 18;
pub const HLL_DEFAULT_PRECISION: u8 = 14;

// -------- ENV --------
pub const ENV_HLL_PRECISION: &str = "CC_HLL_PRECISION";
pub const ENV_CELL_LOCK_STRIPES: &str = "CC_CELL_LOCK_STRIPES";
pub const ENV_DUMP_ZSTD: &str = "CC_DUMP_ZSTD";
pub const ENV_ZSTD_LEVEL: &str = "CC_ZSTD_LEVEL";
