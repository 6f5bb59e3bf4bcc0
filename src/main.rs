//! batchpipe CLI: digest a directory tree on a fixed worker pool.

use anyhow::Result;
use batchpipe::engine::Cli;
use batchpipe::engine::handle_run;
use clap::Parser;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
