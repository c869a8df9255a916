//! Periodic driver: re-run the batch scheduler on a fixed interval.
//!
//! State machine per cycle: run → await completion → wait interval → run …
//! A new scan never starts while the previous batch is still running, and a
//! stop request cancels both the pending wait and the in-flight batch.

use anyhow::{Result, bail};
use crossbeam_channel::Sender;
use log::{debug, error};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::batch::scheduler::run_batch;
use crate::types::{BatchEvent, RunConfig};
use crate::utils::config::POLL_INTERVAL_MS;

/// Runs batches on a timer until stopped.
pub struct PeriodicDriver {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl PeriodicDriver {
    /// Validate and start the drive loop on its own coordinating thread.
    /// `config.repeat` must be set.
    pub fn start(config: RunConfig, events: Option<Sender<BatchEvent>>) -> Result<Self> {
        config.validate()?;
        let Some(interval) = config.repeat else {
            bail!("periodic driver requires a repeat interval");
        };
        let stop = Arc::new(AtomicBool::new(false));
        let handle = {
            let stop = Arc::clone(&stop);
            thread::spawn(move || drive_loop(config, interval, events, stop))
        };
        Ok(Self { stop, handle })
    }

    /// A cloneable stop trigger, e.g. for a Ctrl-C handler.
    pub fn stopper(&self) -> DriverStopper {
        DriverStopper(Arc::clone(&self.stop))
    }

    /// Request a stop and block until the drive loop has exited. Cancels the
    /// pending interval wait and the current batch; committed files stay.
    pub fn stop(self) -> Result<()> {
        self.stop.store(true, Ordering::SeqCst);
        self.handle
            .join()
            .map_err(|_| anyhow::anyhow!("periodic driver thread panicked"))
    }

    /// Block until the loop exits on its own (only via an external
    /// [`DriverStopper`], since the loop itself never finishes).
    pub fn join(self) -> Result<()> {
        self.handle
            .join()
            .map_err(|_| anyhow::anyhow!("periodic driver thread panicked"))
    }
}

/// Stop trigger usable from another thread or a signal handler.
#[derive(Clone, Debug)]
pub struct DriverStopper(Arc<AtomicBool>);

impl DriverStopper {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

fn drive_loop(
    config: RunConfig,
    interval: Duration,
    events: Option<Sender<BatchEvent>>,
    stop: Arc<AtomicBool>,
) {
    while !stop.load(Ordering::SeqCst) {
        let handle = match run_batch(config.clone(), events.clone()) {
            Ok(handle) => handle,
            Err(e) => {
                // Directory vanished mid-series or similar; nothing sane to
                // retry against.
                error!("periodic run aborted: {e:#}");
                break;
            }
        };

        // Await the batch's terminal state before anything else; relay a stop
        // request as a cancellation exactly once.
        let mut cancel_sent = false;
        while !handle.is_finished() {
            if stop.load(Ordering::SeqCst) && !cancel_sent {
                handle.cancel();
                cancel_sent = true;
            }
            thread::sleep(Duration::from_millis(POLL_INTERVAL_MS));
        }
        let _ = handle.wait();

        if stop.load(Ordering::SeqCst) {
            break;
        }
        debug!("next scan in {:?}", interval);
        wait_interval(interval, &stop);
    }
    debug!("periodic driver stopped");
}

/// Sleep for `interval` in small ticks so a stop request is honored promptly.
fn wait_interval(interval: Duration, stop: &AtomicBool) {
    let tick = Duration::from_millis(POLL_INTERVAL_MS);
    let mut remaining = interval;
    while !remaining.is_zero() {
        if stop.load(Ordering::SeqCst) {
            return;
        }
        let step = remaining.min(tick);
        thread::sleep(step);
        remaining = remaining.saturating_sub(step);
    }
}
