//! Batch scheduler: scan the input directory, dispatch matched files across a
//! bounded worker pool, collect per-file outcomes.
//!
//! Shape: dispatch thread → task channel → workers → outcome channel →
//! coordinator tally. No ordering between files in a batch; each task targets
//! a distinct filename so none is needed.

use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, Sender, bounded};
use log::{debug, info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use crate::engine::process::process_file;
use crate::engine::tools::mask_matches;
use crate::types::{BatchEvent, BatchSummary, ProcessOutcome, RunConfig};
use crate::utils::config::{LOCK_SUFFIX, PART_SUFFIX, PackagePaths, TASK_CHANNEL_CAP, WorkerLimits};

/// Cancellation flag for a running batch, cloneable into signal handlers.
#[derive(Clone, Debug)]
pub struct BatchCanceler(Arc<AtomicBool>);

impl BatchCanceler {
    /// Stop dispatch of not-yet-started tasks. In-flight files finish (or
    /// fail) on their own; nothing already committed is rolled back.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Handle to one in-flight batch run.
pub struct BatchHandle {
    cancel: Arc<AtomicBool>,
    coordinator: JoinHandle<BatchSummary>,
}

impl BatchHandle {
    /// Request cooperative cancellation. See [`BatchCanceler::cancel`].
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    /// A cloneable canceler, e.g. for a Ctrl-C handler.
    pub fn canceler(&self) -> BatchCanceler {
        BatchCanceler(Arc::clone(&self.cancel))
    }

    /// True once every dispatched task has reached a terminal outcome.
    pub fn is_finished(&self) -> bool {
        self.coordinator.is_finished()
    }

    /// Block until the batch reaches its terminal state.
    pub fn wait(self) -> Result<BatchSummary> {
        self.coordinator
            .join()
            .map_err(|_| anyhow::anyhow!("batch coordinator thread panicked"))
    }
}

/// Start one batch run. Non-blocking: validation and the directory scan happen
/// up front (failures here are fatal and precede any file access), then the
/// worker pool runs behind the returned handle.
pub fn run_batch(config: RunConfig, events: Option<Sender<BatchEvent>>) -> Result<BatchHandle> {
    config.validate()?;
    let tasks = scan_input(&config)?;
    let cancel = Arc::new(AtomicBool::new(false));

    let coordinator = {
        let cancel = Arc::clone(&cancel);
        thread::spawn(move || run_to_completion(config, tasks, events, cancel))
    };

    Ok(BatchHandle {
        cancel,
        coordinator,
    })
}

/// List regular files directly under the input directory whose name matches
/// the mask. Non-recursive; lock and staging artifacts and the defaults file
/// are never candidates.
pub fn scan_input(config: &RunConfig) -> Result<Vec<String>> {
    let mut tasks = Vec::new();
    for entry in walkdir::WalkDir::new(&config.input_dir)
        .min_depth(1)
        .max_depth(1)
    {
        let entry = entry.with_context(|| format!("scan {}", config.input_dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            warn!("skipping non-UTF-8 filename: {:?}", entry.file_name());
            continue;
        };
        if name.ends_with(LOCK_SUFFIX)
            || name.ends_with(PART_SUFFIX)
            || name == PackagePaths::get().config_filename()
        {
            continue;
        }
        if mask_matches(&config.mask, name) {
            tasks.push(name.to_string());
        }
    }
    debug!("scan: {} file(s) match mask {:?}", tasks.len(), config.mask);
    Ok(tasks)
}

/// Coordinator body: spawn dispatch + workers, drain outcomes, tally, report.
fn run_to_completion(
    config: RunConfig,
    tasks: Vec<String>,
    events: Option<Sender<BatchEvent>>,
    cancel: Arc<AtomicBool>,
) -> BatchSummary {
    info!(
        "batch started: {} file(s) in {}",
        tasks.len(),
        config.input_dir.display()
    );
    emit(
        &events,
        BatchEvent::BatchStarted { files: tasks.len() },
    );

    let (task_tx, task_rx) = bounded::<String>(TASK_CHANNEL_CAP);
    let (outcome_tx, outcome_rx) = bounded::<(String, ProcessOutcome)>(TASK_CHANNEL_CAP);

    let dispatch_handle = spawn_dispatcher(task_tx, tasks, Arc::clone(&cancel));
    let num_threads = WorkerLimits::current().effective(config.num_threads);
    let worker_handles = spawn_workers(
        task_rx,
        &outcome_tx,
        &config,
        num_threads,
        Arc::clone(&cancel),
    );
    // Dropping the last sender closes the channel so the drain loop exits.
    drop(outcome_tx);

    let mut summary = BatchSummary::default();
    while let Ok((name, outcome)) = outcome_rx.recv() {
        if let ProcessOutcome::Failed(reason) = &outcome {
            warn!("{name}: {reason}");
        }
        summary.record(&outcome);
        emit(&events, BatchEvent::FileDone { name, outcome });
    }

    let dispatched = dispatch_handle.join().unwrap_or(0);
    for h in worker_handles {
        let _ = h.join();
    }

    summary.canceled = cancel.load(Ordering::SeqCst);
    if summary.canceled {
        info!(
            "batch canceled after {} of {} dispatched task(s)",
            summary.total(),
            dispatched
        );
        emit(&events, BatchEvent::BatchCanceled { summary });
    } else {
        info!(
            "batch finished: {} committed, {} skipped, {} contended, {} failed",
            summary.committed, summary.skipped, summary.contended, summary.failed
        );
        emit(&events, BatchEvent::BatchFinished { summary });
    }
    summary
}

/// Feed task names into the channel, checking the cancel flag before each
/// dispatch. Returns how many were dispatched.
fn spawn_dispatcher(
    task_tx: Sender<String>,
    tasks: Vec<String>,
    cancel: Arc<AtomicBool>,
) -> JoinHandle<usize> {
    thread::spawn(move || {
        let mut dispatched = 0usize;
        for name in tasks {
            if cancel.load(Ordering::SeqCst) {
                break;
            }
            if task_tx.send(name).is_err() {
                break;
            }
            dispatched += 1;
        }
        dispatched
        // task_tx drops here; workers see the close and exit.
    })
}

/// Worker pool: each thread pulls names from task_rx, processes, and reports
/// on outcome_tx. A cancel observed before a task starts drops that task.
fn spawn_workers(
    task_rx: Receiver<String>,
    outcome_tx: &Sender<(String, ProcessOutcome)>,
    config: &RunConfig,
    num_threads: usize,
    cancel: Arc<AtomicBool>,
) -> Vec<JoinHandle<()>> {
    (0..num_threads)
        .map(|_| {
            let task_rx = task_rx.clone();
            let outcome_tx = outcome_tx.clone();
            let config = config.clone();
            let cancel = Arc::clone(&cancel);
            thread::spawn(move || {
                while let Ok(name) = task_rx.recv() {
                    if cancel.load(Ordering::SeqCst) {
                        break;
                    }
                    let outcome = process_file(&config, &name);
                    if outcome_tx.send((name, outcome)).is_err() {
                        break;
                    }
                }
            })
        })
        .collect()
}

fn emit(events: &Option<Sender<BatchEvent>>, event: BatchEvent) {
    if let Some(tx) = events {
        // The display layer may be gone; that is its business, not ours.
        let _ = tx.send(event);
    }
}
