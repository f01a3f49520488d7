//! File-based locking to prevent concurrent runs
//!
//! Two processes downloading into the same backup directory would race
//! on artifacts and rotation, so a run holds an advisory lock on the
//! directory for its duration.

use anyhow::{Context, Result};
use fd_lock::RwLock;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const LOCK_FILE_NAME: &str = ".fleet-backup.lock";

/// Exclusive lock on a backup directory, held for a whole run
pub struct RunLock {
    // Guard first: struct fields drop in declaration order, and the
    // guard borrows from the boxed lock.
    _guard: Option<fd_lock::RwLockWriteGuard<'static, File>>,
    _lock: Box<RwLock<File>>,
    lock_path: PathBuf,
}

impl RunLock {
    /// Acquire the lock for a backup directory, creating the directory
    /// if needed. Fails immediately when another process holds it.
    pub fn acquire(backup_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(backup_dir)
            .with_context(|| format!("Failed to create backup directory: {:?}", backup_dir))?;
        let lock_path = backup_dir.join(LOCK_FILE_NAME);

        debug!("Attempting to acquire lock: {:?}", lock_path);

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file: {:?}", lock_path))?;

        let mut lock = Box::new(RwLock::new(file));

        // SAFETY: the guard borrows the RwLock inside the Box. The Box
        // keeps the RwLock at a stable address for the lifetime of this
        // struct, and the guard field is declared before the lock so it
        // drops first.
        let lock_ptr: *mut RwLock<File> = &mut *lock;
        let guard = unsafe { (*lock_ptr).try_write() }.with_context(|| {
            format!("Another run is already using {:?} (lock held)", backup_dir)
        })?;
        let static_guard: fd_lock::RwLockWriteGuard<'static, File> =
            unsafe { std::mem::transmute(guard) };

        info!("Acquired run lock: {:?}", lock_path);

        Ok(Self {
            _guard: Some(static_guard),
            _lock: lock,
            lock_path,
        })
    }

    /// Lock file path (for cleanup or inspection)
    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        &self.lock_path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        // Release the lock before unlinking its file
        self._guard.take();
        info!("Released run lock: {:?}", self.lock_path);
        if let Err(e) = std::fs::remove_file(&self.lock_path) {
            debug!("Failed to remove lock file: {}", e);
        }
    }
}
