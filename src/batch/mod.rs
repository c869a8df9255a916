//! Batch orchestration: scheduler (one run) and periodic driver (timed re-runs).

pub mod driver;
pub mod scheduler;

pub use driver::{DriverStopper, PeriodicDriver};
pub use scheduler::{BatchCanceler, BatchHandle, run_batch, scan_input};
