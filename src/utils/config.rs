//! Application configuration constants.
//! Tuning and thresholds in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    config_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                config_filename: format!(".{pkg}.toml"),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Per-directory defaults file (e.g. `.xorbatch.toml`).
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }
}

// ---- Transform I/O ----

/// Chunk size for the streaming transform (bytes). 64 KB keeps the working set
/// bounded while amortizing syscalls.
pub const TRANSFORM_CHUNK_SIZE: usize = 64 * 1024;

// ---- Lock / staging artifacts ----

/// Suffix of the per-file lock artifact, placed beside the source file.
pub const LOCK_SUFFIX: &str = ".lock";

/// Suffix of the hidden staging file in the output directory. Published by
/// rename/link only after the stream completes.
pub const PART_SUFFIX: &str = ".part";

// ---- Worker threads ----

/// Thread limits for the batch worker pool.
/// Use [`WorkerLimits::current()`] to fill `all_threads` from rayon; the rest are const.
#[derive(Clone, Copy, Debug)]
pub struct WorkerLimits {
    /// Available threads (from rayon); set by [`WorkerLimits::current()`].
    pub all_threads: usize,
    /// Cap on the pool regardless of available parallelism; file I/O saturates
    /// well before the CPU does.
    pub max: usize,
    /// Floor so a single-core host still overlaps I/O.
    pub floor: usize,
}

impl Default for WorkerLimits {
    fn default() -> Self {
        Self {
            all_threads: 0, // use current() to set from rayon
            max: Self::MAX_THREADS,
            floor: Self::FLOOR_THREADS,
        }
    }
}

impl WorkerLimits {
    pub const MAX_THREADS: usize = 8;
    pub const FLOOR_THREADS: usize = 2;

    /// Build limits with `all_threads` set from `rayon::current_num_threads()`.
    pub fn current() -> Self {
        Self {
            all_threads: rayon::current_num_threads(),
            ..Self::default()
        }
    }

    /// Effective pool size: the override when given, otherwise available
    /// threads clamped to `[floor, max]`.
    pub fn effective(&self, override_threads: Option<usize>) -> usize {
        match override_threads {
            Some(n) => n.max(1),
            None => self.all_threads.clamp(self.floor, self.max),
        }
    }
}

// ---- Scheduling ----

/// Task channel capacity. Bounded so a huge directory does not buffer every
/// name at once; the dispatcher blocks on send until a worker frees a slot.
pub const TASK_CHANNEL_CAP: usize = 1024;

/// Poll granularity for cancellation and batch-completion waits.
pub const POLL_INTERVAL_MS: u64 = 50;
