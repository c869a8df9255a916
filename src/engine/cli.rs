//! CLI command handler: one batch by default; --repeat runs the periodic driver.

use anyhow::{Context, Result, bail};
use log::{info, warn};
use std::time::Duration;

use crate::batch::{PeriodicDriver, run_batch};
use crate::codec::parse_key_hex;
use crate::engine::arg_parser::{Cli, ConflictArg};
use crate::types::{ConflictPolicy, RunConfig};
use crate::utils::defaults_toml::load_defaults_toml;
use crate::utils::setup_logging;

/// Merge CLI flags over `.xorbatch.toml` defaults and build a validated config.
fn setup_config(cli: &Cli) -> Result<RunConfig> {
    // Logging first: a malformed defaults file warns through the logger, so
    // it must already be initialized when the file is read.
    setup_logging(cli.verbose);
    let file = load_defaults_toml(&cli.dir).unwrap_or_default();

    let Some(out) = cli.out.clone().or(file.out) else {
        bail!("no output directory: pass --out or set `out` in .xorbatch.toml");
    };
    let Some(key_str) = cli.key.clone().or(file.key) else {
        bail!("no key: pass --key or set `key` in .xorbatch.toml");
    };
    let key = parse_key_hex(&key_str).context("parse --key")?;

    let conflict = match cli.on_conflict {
        Some(arg) => arg.into(),
        None => match file.on_conflict.as_deref() {
            Some(s) => ConflictArg::parse_name(s)
                .map(ConflictPolicy::from)
                .ok_or_else(|| anyhow::anyhow!("unknown on_conflict value in defaults: {s:?}"))?,
            None => ConflictPolicy::default(),
        },
    };

    let config = RunConfig {
        input_dir: cli.dir.clone(),
        output_dir: out,
        mask: cli.mask.clone().or(file.mask).unwrap_or_default(),
        key,
        delete_source: cli.delete || file.delete.unwrap_or(false),
        conflict,
        repeat: cli
            .repeat
            .or(file.repeat)
            .map(Duration::from_secs),
        num_threads: cli.threads.or(file.threads),
    };
    config.validate()?;
    Ok(config)
}

/// Run one batch, or the periodic driver when a repeat interval is set.
/// Ctrl-C cancels the run either way.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let config = setup_config(cli)?;

    if config.repeat.is_some() {
        let driver = PeriodicDriver::start(config, None)?;
        let stopper = driver.stopper();
        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(1);
        ctrlc::set_handler(move || {
            stopper.stop();
            let _ = stop_tx.send(());
        })
        .context("install Ctrl-C handler")?;
        info!("running on timer; Ctrl-C to stop");
        let _ = stop_rx.recv();
        driver.stop()?;
        return Ok(());
    }

    let handle = run_batch(config, None)?;
    let canceler = handle.canceler();
    ctrlc::set_handler(move || canceler.cancel()).context("install Ctrl-C handler")?;
    let summary = handle.wait()?;
    if summary.failed > 0 {
        warn!("{} file(s) failed; see warnings above", summary.failed);
    }
    Ok(())
}
