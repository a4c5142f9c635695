//! capsflow CLI: uppercase a large text file chunk by chunk.

use anyhow::Result;
use clap::Parser;
use capsflow::engine::Cli;
use capsflow::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
