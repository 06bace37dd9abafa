mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use relbin::logging::init_logging;
use relbin::Bootstrapper;
use std::process::ExitCode;

use crate::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let cfg = cli.installer_config();
    let bootstrapper = Bootstrapper::for_host(cfg)?;
    bootstrapper
        .run(cli.requested_version())
        .with_context(|| format!("installing {}", cli.repo))?;
    Ok(())
}
