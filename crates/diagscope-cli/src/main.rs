//! Diagscope CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, info};

use diagscope_cli::{Args, error_adapter::render_report};

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting Diagscope");
    debug!(args:?; "Parsed arguments");

    let Err(err) = diagscope_cli::run(&args) else {
        info!("Completed successfully");
        return;
    };

    // Reported on stderr regardless of the log level.
    debug!(err:?; "Run failed");
    eprint!("{}", render_report(&err));
    process::exit(1);
}
