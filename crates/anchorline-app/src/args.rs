//! Command-line arguments for the session runner.

use clap::Parser;

/// Replay an Anchorline event script and report the resulting scene
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the JSON event script
    #[arg(required_unless_present = "shortcuts")]
    pub script: Option<String>,

    /// Path to an engine configuration file (JSON)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Print the keyboard shortcuts and exit
    #[arg(long)]
    pub shortcuts: bool,
}
