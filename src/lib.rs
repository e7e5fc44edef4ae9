//! `answersmith` - A CLI tool for generating Alpine Linux answer files
//!
//! This library renders the answers file consumed by the unattended Alpine
//! installer from a template, validates the configuration that feeds it, and
//! refuses to write the result into sensitive system locations.

pub mod cli;
pub mod config;
pub mod error;
pub mod operations;
pub mod system;
pub mod utils;

use anyhow::Result;
use cli::{Args, Command};
use std::io::{self, Write as _};
use system::RealSystem;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build timestamp injected at compile time through `ANSWERSMITH_BUILD_TIME`
pub const BUILD_TIME: &str = match option_env!("ANSWERSMITH_BUILD_TIME") {
    Some(time) => time,
    None => "unknown",
};

/// Commit hash injected at compile time through `ANSWERSMITH_COMMIT_HASH`
pub const COMMIT_HASH: &str = match option_env!("ANSWERSMITH_COMMIT_HASH") {
    Some(hash) => hash,
    None => "none",
};

/// Main entry point for the answersmith library
///
/// # Errors
///
/// Returns the error of the executed subcommand
pub fn run(args: &Args) -> Result<()> {
    let system = RealSystem::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &args.command {
        Command::Generate { config, output } => {
            cli::execute_generate(&system, config, output, &mut out)?;
        }
        Command::Validate { config } => cli::execute_validate(&system, config, &mut out)?,
        Command::Version => cli::execute_version(&mut out)?,
    }

    out.flush()?;
    Ok(())
}
