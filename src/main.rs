//! Xorbatch CLI: batch-transform files with an 8-byte XOR keystream.

use anyhow::Result;
use clap::Parser;
use std::time::Instant;
use xorbatch::engine::arg_parser::Cli;
use xorbatch::engine::handle_run;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
