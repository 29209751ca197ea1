//! Lock files
//!
//! A writer claims `<file>.lock` with an exclusive create, writes the new
//! content into it and renames it over `<file>`. Readers never see a partial
//! file, and the claim holds across threads and processes alike. Dropping an
//! uncommitted [`Lockfile`] removes the lock file, leaving `<file>` untouched.

use crate::errors::TwigError;
use anyhow::Context;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub const LOCK_SUFFIX: &str = "lock";

/// How long to wait for another writer before giving up
pub const LOCK_TIMEOUT: Duration = Duration::from_secs(10);

const LOCK_RETRY_DELAY: Duration = Duration::from_millis(5);

#[derive(Debug)]
pub struct Lockfile {
    path: PathBuf,
    lock_path: PathBuf,
    file: Option<File>,
}

impl Lockfile {
    pub fn lock_path_for(path: &Path) -> PathBuf {
        let mut lock_path = path.as_os_str().to_owned();
        lock_path.push(".");
        lock_path.push(LOCK_SUFFIX);
        PathBuf::from(lock_path)
    }

    /// Claim `path`, waiting up to [`LOCK_TIMEOUT`] for a concurrent writer
    pub fn acquire(path: &Path) -> anyhow::Result<Self> {
        Self::acquire_within(path, LOCK_TIMEOUT)
    }

    pub fn acquire_within(path: &Path, timeout: Duration) -> anyhow::Result<Self> {
        let lock_path = Self::lock_path_for(path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }

        let started = Instant::now();
        loop {
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&lock_path)
            {
                Ok(file) => {
                    debug!(path = %lock_path.display(), "acquired lock");
                    return Ok(Lockfile {
                        path: path.to_path_buf(),
                        lock_path,
                        file: Some(file),
                    });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    if started.elapsed() >= timeout {
                        warn!(path = %lock_path.display(), "gave up waiting for lock");
                        return Err(
                            TwigError::LockUnavailable(lock_path.display().to_string()).into()
                        );
                    }
                    std::thread::sleep(LOCK_RETRY_DELAY);
                }
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("failed to create lock file {}", lock_path.display())
                    });
                }
            }
        }
    }

    pub fn write(&mut self, data: &[u8]) -> anyhow::Result<()> {
        let file = self
            .file
            .as_mut()
            .with_context(|| format!("lock {} is not held", self.lock_path.display()))?;
        file.write_all(data)
            .with_context(|| format!("failed to write lock file {}", self.lock_path.display()))
    }

    /// Replace the locked file with what was written
    pub fn commit(mut self) -> anyhow::Result<()> {
        let file = self
            .file
            .take()
            .with_context(|| format!("lock {} is not held", self.lock_path.display()))?;
        file.sync_all()
            .with_context(|| format!("failed to flush lock file {}", self.lock_path.display()))?;
        drop(file);

        std::fs::rename(&self.lock_path, &self.path)
            .with_context(|| format!("failed to move {} into place", self.lock_path.display()))
    }
}

impl Drop for Lockfile {
    fn drop(&mut self) {
        if self.file.take().is_some() {
            let _ = std::fs::remove_file(&self.lock_path);
        }
    }
}
