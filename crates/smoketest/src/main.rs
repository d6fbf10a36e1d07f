//! smoketest: drive the winharness protocols through scripted scenarios.

use std::process;

use clap::Parser;

mod cases;
mod cli;
mod error;
mod results;
mod suite;

use cli::Cli;
use error::{Result, print_hints};
use suite::RunOpts;

fn main() {
    let cli = Cli::parse();
    // Quiet runs force warn+ without consulting the environment.
    let spec = if cli.quiet {
        "warn".to_string()
    } else {
        cli.log.spec()
    };
    logging::init(&spec);

    if let Err(e) = run(&cli) {
        eprintln!("smoketest: ERROR: {e}");
        print_hints(&e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let cfg = config::load(cli.config.as_deref())?;
    let opts = RunOpts {
        quiet: cli.quiet,
        fail_fast: !cli.no_fail_fast,
    };
    let outcomes = suite::run(cli.command.group(), &cfg, opts)?;
    if !cli.quiet {
        println!("smoketest: {} cases passed", outcomes.len());
    }
    Ok(())
}
