//! Single-instance guard
//!
//! An exclusive, non-blocking `flock` on a per-user lock file. The lock file is
//! removed when the guard is released, either explicitly or on drop.

use nix::errno::Errno;
use nix::fcntl::{Flock, FlockArg};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::common::paths;

#[derive(Debug, Error)]
pub enum LockError {
    #[error("another instance holds {}", .0.display())]
    AlreadyRunning(PathBuf),

    #[error("failed to open lock file {}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("failed to lock {}: {errno}", path.display())]
    Lock { path: PathBuf, errno: Errno },

    #[error("failed to remove lock file {}", path.display())]
    Remove { path: PathBuf, source: io::Error },
}

/// Exclusive ownership of the lock file for as long as the value lives.
pub struct InstanceLock {
    path: PathBuf,
    lock: Option<Flock<File>>,
}

impl fmt::Debug for InstanceLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceLock")
            .field("path", &self.path)
            .field("held", &self.lock.is_some())
            .finish()
    }
}

impl InstanceLock {
    /// Acquire the lock for the invoking user in the system temp directory.
    pub fn acquire() -> Result<Self, LockError> {
        Self::acquire_at(paths::lock_file_path())
    }

    /// Acquire the lock at an explicit path. Never waits: if any other open
    /// file description (in this or another process) holds the lock, this
    /// fails with [`LockError::AlreadyRunning`].
    pub fn acquire_at(path: impl Into<PathBuf>) -> Result<Self, LockError> {
        let path = path.into();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .mode(0o644)
            .open(&path)
            .map_err(|source| LockError::Open {
                path: path.clone(),
                source,
            })?;

        match Flock::lock(file, FlockArg::LockExclusiveNonblock) {
            Ok(lock) => Ok(Self {
                path,
                lock: Some(lock),
            }),
            Err((_, errno)) if errno == Errno::EWOULDBLOCK => {
                Err(LockError::AlreadyRunning(path))
            }
            Err((_, errno)) => Err(LockError::Lock { path, errno }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the lock file and unlock it.
    pub fn release(mut self) -> Result<(), LockError> {
        self.release_inner()
    }

    // The file is removed while still locked so that a process opening the
    // path afterwards always gets a fresh inode.
    fn release_inner(&mut self) -> Result<(), LockError> {
        let Some(lock) = self.lock.take() else {
            return Ok(());
        };
        let removed = match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(LockError::Remove {
                path: self.path.clone(),
                source,
            }),
        };
        if let Err((lock, errno)) = lock.unlock() {
            // Closing the descriptor drops the lock anyway.
            drop(lock);
            removed?;
            return Err(LockError::Lock {
                path: self.path.clone(),
                errno,
            });
        }
        removed
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        let _ = self.release_inner();
    }
}
