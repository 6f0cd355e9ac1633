//! # Discount Function Runner
//!
//! `discount-function < input.json > output.json`

use anyhow::{Context, Result};
use tracing::info;

use discount_function::config::RunnerConfig;
use discount_function::{init_tracing, run};

fn main() -> Result<()> {
    let config = RunnerConfig::load().context("Failed to load runner configuration")?;
    init_tracing(&config.log_filter);

    info!(
        input = ?config.input_path,
        pretty = config.pretty,
        "Starting discount function"
    );

    run(&config).context("Discount function run failed")?;
    Ok(())
}
