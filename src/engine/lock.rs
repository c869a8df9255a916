//! Per-file lock tokens.
//!
//! A lock is a `<name>.lock` file beside the source, created with
//! `create_new` so acquisition is a single atomic filesystem operation visible
//! to every process contending for the same filename. Released on drop, so
//! every exit path of the processor gives it up.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::utils::config::LOCK_SUFFIX;

/// Exclusive marker for one filename, held for the duration of processing.
#[derive(Debug)]
pub struct LockToken {
    path: PathBuf,
}

/// Result of a non-blocking acquisition attempt.
pub enum LockAttempt {
    Acquired(LockToken),
    /// Someone else holds it. Caller retreats without side effects; the next
    /// scan retries.
    Contended,
}

impl LockToken {
    /// Try to acquire the lock for `name` in `dir`. Never blocks: an existing
    /// lock file means `Contended`.
    ///
    /// The owner pid is written into the file. Nothing reclaims a lock left
    /// behind by a crashed process; the recorded pid lets an operator check
    /// liveness before removing one by hand.
    pub fn try_acquire(dir: &Path, name: &str) -> std::io::Result<LockAttempt> {
        let path = lock_path(dir, name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                let _ = writeln!(file, "{}", std::process::id());
                Ok(LockAttempt::Acquired(LockToken { path }))
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(LockAttempt::Contended),
            Err(e) => Err(e),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LockToken {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            log::warn!("failed to remove lock file {}: {}", self.path.display(), e);
        }
    }
}

/// Path of the lock artifact for `name` inside `dir`.
pub fn lock_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}{LOCK_SUFFIX}"))
}
