//! CLI command implementations

use crate::cli::ConfigArgs;
use crate::operations::generate::Generator;
use crate::system::System;
use crate::{BUILD_TIME, COMMIT_HASH, VERSION};
use anyhow::{Context as _, Result};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Execute the generate command
///
/// # Errors
///
/// Returns an error if the configuration cannot be built or generation fails
pub fn execute_generate(
    system: &dyn System,
    args: &ConfigArgs,
    output: &Path,
    out: &mut dyn Write,
) -> Result<()> {
    let config = args
        .resolve(system)
        .context("Failed to load configuration")?;

    let written = Generator::new(&config, output)
        .generate(system)
        .context("Failed to generate answers file")?;

    writeln!(out, "Successfully generated answers file: {}", written.display())?;
    Ok(())
}

/// Execute the validate command
///
/// # Errors
///
/// Returns an error if the configuration cannot be built or is invalid
pub fn execute_validate(system: &dyn System, args: &ConfigArgs, out: &mut dyn Write) -> Result<()> {
    let config = args
        .resolve(system)
        .context("Failed to load configuration")?;

    config
        .validate(system)
        .context("Configuration validation failed")?;

    info!("Validated configuration for host '{}'", config.hostname);
    writeln!(out, "Configuration validation passed!")?;
    Ok(())
}

/// Execute the version command
///
/// # Errors
///
/// Returns an error if the output cannot be written
pub fn execute_version(out: &mut dyn Write) -> Result<()> {
    writeln!(out, "answersmith version {VERSION}")?;
    writeln!(out, "Built at: {BUILD_TIME}")?;
    writeln!(out, "Commit: {COMMIT_HASH}")?;
    Ok(())
}
