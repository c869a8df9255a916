//! Public types for the xorbatch API: run configuration, per-file outcomes, batch events.

use anyhow::{Context, Result, bail};
use std::path::PathBuf;
use std::time::Duration;

use crate::codec::Key;

/// Output filename conflict policy. Exactly one applies per run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Replace whatever is at the resolved path.
    Overwrite,
    /// Probe `"{base} {n}.{ext}"` for n = 1, 2, … until an unused name is found.
    #[default]
    Increment,
    /// Leave the existing file alone and do not write anything.
    Skip,
}

/// Immutable configuration for one batch run (or one periodic series of runs).
///
/// Built by the CLI or by a lib caller; [`RunConfig::validate`] must pass before
/// the scheduler touches any file.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Directory scanned for source files.
    pub input_dir: PathBuf,
    /// Directory transformed files are written to. Must differ from `input_dir`.
    pub output_dir: PathBuf,
    /// Filename mask. Empty matches everything; `*`/`?` are glob wildcards;
    /// anything else is a substring match (the mask `rep` matches `report.txt`).
    pub mask: String,
    /// The 8-byte keystream. XOR is its own inverse, so the same key decodes.
    pub key: Key,
    /// Delete each source file after its output has been published.
    pub delete_source: bool,
    pub conflict: ConflictPolicy,
    /// Re-scan interval for unattended operation. None runs a single batch.
    pub repeat: Option<Duration>,
    /// Override worker thread count. When None, derived from available parallelism.
    pub num_threads: Option<usize>,
}

impl RunConfig {
    /// Check the config before a run starts. Errors here are fatal and precede
    /// any file access.
    pub fn validate(&self) -> Result<()> {
        if !self.input_dir.is_dir() {
            bail!(
                "input directory does not exist: {}",
                self.input_dir.display()
            );
        }
        if !self.output_dir.is_dir() {
            bail!(
                "output directory does not exist: {}",
                self.output_dir.display()
            );
        }
        let in_canon = self
            .input_dir
            .canonicalize()
            .with_context(|| format!("canonicalize {}", self.input_dir.display()))?;
        let out_canon = self
            .output_dir
            .canonicalize()
            .with_context(|| format!("canonicalize {}", self.output_dir.display()))?;
        if in_canon == out_canon {
            bail!("input and output directories must be distinct");
        }
        if let Some(interval) = self.repeat
            && interval.is_zero()
        {
            bail!("repeat interval must be greater than zero");
        }
        if let Some(n) = self.num_threads
            && n == 0
        {
            bail!("thread count must be greater than zero");
        }
        Ok(())
    }
}

/// Terminal outcome of processing one file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Transformed and published at `output`.
    Committed { output: PathBuf },
    /// Conflict policy said no write was wanted. Not an error.
    Skipped,
    /// Another worker holds the lock for this filename. The next scan retries.
    LockContended,
    /// I/O failure scoped to this file; other files are unaffected.
    Failed(String),
}

impl ProcessOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, ProcessOutcome::Committed { .. })
    }
}

/// Tally of per-file outcomes for one finished batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub committed: usize,
    pub skipped: usize,
    pub contended: usize,
    pub failed: usize,
    /// True when cancellation was requested while the batch ran. Outcomes
    /// already recorded stand either way.
    pub canceled: bool,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: &ProcessOutcome) {
        match outcome {
            ProcessOutcome::Committed { .. } => self.committed += 1,
            ProcessOutcome::Skipped => self.skipped += 1,
            ProcessOutcome::LockContended => self.contended += 1,
            ProcessOutcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.committed + self.skipped + self.contended + self.failed
    }
}

/// Notifications the engine emits for a display layer. The engine never depends
/// on whether anyone is listening; sends to a dropped receiver are ignored.
#[derive(Clone, Debug)]
pub enum BatchEvent {
    BatchStarted {
        files: usize,
    },
    FileDone {
        name: String,
        outcome: ProcessOutcome,
    },
    BatchFinished {
        summary: BatchSummary,
    },
    BatchCanceled {
        summary: BatchSummary,
    },
}
