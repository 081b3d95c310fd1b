//! Advisory lock serializing the link/delete critical section.
//!
//! Two invocations racing on the same store cannot interleave their
//! cleanup-then-relink sequences while one of them holds this lock. The
//! lock file sits next to the storage directory, never inside it, so it
//! stays invisible to `list`.

use std::fs::{File, OpenOptions};
use std::path::Path;

use fs2::FileExt;

use super::error::StoreError;

/// Exclusive lock held for the duration of a mutating transition.
/// Released on drop.
pub(super) struct StoreLock {
    file: File,
}

impl StoreLock {
    /// Block until the lock at `path` can be taken exclusively.
    pub(super) fn acquire(path: &Path) -> Result<Self, StoreError> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(path)
            .map_err(|e| StoreError::io("open lock file", path, e))?;
        file.lock_exclusive()
            .map_err(|e| StoreError::io("lock", path, e))?;
        Ok(Self { file })
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}
