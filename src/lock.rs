//! File-based locking for board dump files.
//!
//! Cross-platform (fs2) advisory locks on a sidecar file `<dump>.lock`:
//! - Exclusive: save (write tmp + rename).
//! - Shared: load; several readers may load the same dump at once.
//!
//! Lock is released on Drop.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use crate::consts::DUMP_LOCK_SUFFIX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    Shared,
    Exclusive,
}

pub struct LockGuard {
    file: std::fs::File,
    path: PathBuf,
    mode: LockMode,
}

impl LockGuard {
    fn new(file: std::fs::File, path: PathBuf, mode: LockMode) -> Self {
        Self { file, path, mode }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> LockMode {
        self.mode
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// `<dump>.lock` next to the dump file.
pub fn lock_file_path(dump: &Path) -> PathBuf {
    sibling_with_suffix(dump, DUMP_LOCK_SUFFIX)
}

pub(crate) fn sibling_with_suffix(dump: &Path, suffix: &str) -> PathBuf {
    let mut name = dump
        .file_name()
        .map(|s| s.to_os_string())
        .unwrap_or_default();
    name.push(".");
    name.push(suffix);
    dump.with_file_name(name)
}

fn open_lock_file(dump: &Path) -> Result<std::fs::File> {
    let path = lock_file_path(dump);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }
    }
    let f = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .open(&path)
        .with_context(|| format!("open lock file {}", path.display()))?;
    Ok(f)
}

/// Acquire a lock in the requested mode. Blocks until acquired.
pub fn acquire_lock(dump: &Path, mode: LockMode) -> Result<LockGuard> {
    let file = open_lock_file(dump)?;
    let path = lock_file_path(dump);
    match mode {
        LockMode::Shared => file
            .lock_shared()
            .with_context(|| format!("lock_shared {}", path.display()))?,
        LockMode::Exclusive => file
            .lock_exclusive()
            .with_context(|| format!("lock_exclusive {}", path.display()))?,
    }
    Ok(LockGuard::new(file, path, mode))
}

/// Try to acquire a lock in the requested mode. Returns Err if already locked.
pub fn try_acquire_lock(dump: &Path, mode: LockMode) -> Result<LockGuard> {
    let file = open_lock_file(dump)?;
    let path = lock_file_path(dump);
    match mode {
        LockMode::Shared => file
            .try_lock_shared()
            .with_context(|| format!("try_lock_shared failed: {}", path.display()))?,
        LockMode::Exclusive => file
            .try_lock_exclusive()
            .with_context(|| format!("try_lock_exclusive failed: {}", path.display()))?,
    }
    Ok(LockGuard::new(file, path, mode))
}
