//! Stable hashing utilities for sketch inputs and lock striping.
//!
//! Goals:
//! - Use a stable, explicit hash (not std::DefaultHasher) so HLL registers
//!   produced by one build stay meaningful after a dump is loaded by another.
//! - Encode hash kind into the HLL payload for forward compatibility.

use std::fmt;
use std::hash::Hasher;
use twox_hash::XxHash64;

/// Type of stable hash used by sketches.
/// Stored as u8 in the HLL payload header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashKind {
    /// 64-bit xxhash with seed=0. Fast and stable.
    Xx64Seed0 = 1,
}

impl HashKind {
    /// Compact code for on-disk storage.
    pub fn to_u8(self) -> u8 {
        match self {
            HashKind::Xx64Seed0 => 1,
        }
    }

    /// Parse from on-disk code. Unknown codes return None.
    pub fn from_u8(code: u8) -> Option<Self> {
        match code {
            1 => Some(HashKind::Xx64Seed0),
            _ => None,
        }
    }
}

impl fmt::Display for HashKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashKind::Xx64Seed0 => write!(f, "xxhash64(seed=0)"),
        }
    }
}

/// Default hash kind for new sketches.
pub const HASH_KIND_DEFAULT: HashKind = HashKind::Xx64Seed0;

/// Compute 64-bit stable hash of raw bytes for given kind.
pub fn hash64(kind: HashKind, data: &[u8]) -> u64 {
    match kind {
        HashKind::Xx64Seed0 => {
            let mut h = XxHash64::with_seed(0);
            h.write(data);
            h.finish()
        }
    }
}

/// Convenience wrapper that uses the crate-wide default hash kind.
#[inline]
pub fn hash64_default(data: &[u8]) -> u64 {
    hash64(HASH_KIND_DEFAULT, data)
}

/// Stable mapping from row name -> lock stripe.
#[inline]
pub fn stripe_of(name: &str, stripes: usize) -> usize {
    debug_assert!(stripes > 0, "stripes must be > 0");
    (hash64_default(name.as_bytes()) % (stripes as u64)) as usize
}
