//! Anchorline session runner entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::LevelFilter;

use anchorline_app::Args;

fn main() {
    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", args.log_level);
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    log::info!("Starting Anchorline");
    log::debug!("Parsed arguments: {:?}", args);

    match anchorline_app::run(&args) {
        Ok(report) => print!("{report}"),
        Err(err) => {
            log::error!("{err}");
            process::exit(1);
        }
    }
}
