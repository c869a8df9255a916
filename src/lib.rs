//! Xorbatch: concurrent batch file transformer keyed by a repeating 8-byte XOR keystream.

pub mod batch;
pub mod codec;
pub mod engine;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use batch::{BatchHandle, PeriodicDriver, run_batch};

use crossbeam_channel::Sender;
use log::debug;

/// Result alias used by public xorbatch API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single blocking entry point: run one batch over `config` and return its
/// summary. Pass `events: Some(tx)` to stream per-file outcomes as they land;
/// `None` when logs are enough.
///
/// For a non-blocking handle use [`batch::run_batch`]; for timed re-scans use
/// [`batch::PeriodicDriver`].
pub fn transform_dir(config: &RunConfig, events: Option<Sender<BatchEvent>>) -> Result<BatchSummary> {
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_string().to_uppercase(),
        config
    );
    batch::run_batch(config.clone(), events)?.wait()
}
