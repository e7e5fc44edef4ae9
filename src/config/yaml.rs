//! YAML configuration loading and parsing

use crate::config::Configuration;
use crate::error::{AnswersError, Result};
use crate::system::System;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Load and parse a YAML configuration file
///
/// Keys that are absent keep their default values.
///
/// # Errors
///
/// Returns an error if:
/// - The file does not exist or cannot be read
/// - The YAML is malformed
/// - The document does not match the configuration schema
#[inline]
pub fn load_config(system: &dyn System, path: &str) -> Result<Configuration> {
    let path_obj = Path::new(path);

    if !system.exists(path_obj) {
        return Err(AnswersError::configuration(format!(
            "Configuration file not found: {path}"
        )));
    }

    let content = system
        .read_to_string(path_obj)
        .map_err(|source| AnswersError::io(format!("Failed to read configuration file {path}"), source))?;

    parse_config(&content).map_err(|err| match err {
        AnswersError::Configuration { message } => {
            AnswersError::configuration(format!("{path}: {message}"))
        }
        other => other,
    })
}

/// Parse configuration from YAML text
///
/// # Errors
///
/// Returns an error if the YAML is malformed or does not match the schema
#[inline]
pub fn parse_config(content: &str) -> Result<Configuration> {
    if content.trim().is_empty() {
        return Ok(Configuration::default());
    }

    let value: Value = serde_yaml::from_str(content)
        .map_err(|e| AnswersError::configuration(format!("Failed to parse YAML: {e}")))?;

    // An empty document means "all defaults"
    if value.is_null() {
        debug!("Configuration file is empty, using defaults");
        return Ok(Configuration::default());
    }

    crate::config::schema::validate_against_schema(&value)?;

    let mut config: Configuration = serde_json::from_value(value)
        .map_err(|e| AnswersError::configuration(format!("Invalid configuration: {e}")))?;

    // An empty key path means no key
    config.ssh_key = config.ssh_key.filter(|key| !key.as_os_str().is_empty());
    Ok(config)
}
