//! Anchorline Application
//!
//! Headless shell around the constraint engine: parses arguments, loads
//! configuration, replays event scripts and reports the resulting scene.

mod args;
mod error;
mod script;
mod session;
mod shortcuts;

pub use args::Args;
pub use error::AppError;
pub use script::{Script, Step};
pub use session::Session;
pub use shortcuts::{Shortcut, ShortcutRegistry};

use anchorline_core::EngineConfig;

/// Run the session described by `args` and return the scene report.
///
/// With `--shortcuts` the shortcut table is printed instead and the report
/// is empty.
pub fn run(args: &Args) -> Result<String, AppError> {
    if args.shortcuts {
        ShortcutRegistry::print_all();
        return Ok(String::new());
    }

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let Some(path) = &args.script else {
        return Ok(String::new());
    };
    log::info!("Replaying {}", path);

    let script = Script::load(path)?;
    let mut session = Session::new(config);
    session.run(&script)?;
    Ok(session.report())
}
