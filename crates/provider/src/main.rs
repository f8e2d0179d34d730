//! `terraform-provider-pingone` command line.

// Command output goes to stdout; diagnostics and logs go to stderr.
#![allow(clippy::print_stderr)]

use std::io;

use clap::Parser;
use terraform_provider_pingone::cli::{self, Cli};
use terraform_provider_pingone::logging::init_tracing;

fn main() -> miette::Result<()> {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with TF_LOG_PROVIDER_PINGONE=debug for more information.");
    }));

    let cli = Cli::parse();
    init_tracing(&cli.tracing_config())?;
    cli::run(&cli, &mut io::stdout().lock())?;
    Ok(())
}
