//! Configuration validation logic

use crate::config::Configuration;
use crate::error::{AnswersError, Result};
use crate::system::System;
use std::path::Path;
use tracing::debug;

/// Prefix every supported OpenSSH public key starts with
pub const SSH_KEY_PREFIX: &str = "ssh-";

/// Validate a complete configuration
///
/// Checks run in a fixed order and stop at the first failure: hostname, username,
/// password, disk device, then the SSH key file if one is set.
///
/// # Errors
///
/// Returns an error if:
/// - A required field is empty (`EmptyField`)
/// - The SSH key file cannot be read (`Io`)
/// - The SSH key content does not start with `ssh-` (`InvalidSshKeyFormat`)
#[inline]
pub fn validate_config(system: &dyn System, config: &Configuration) -> Result<()> {
    let required = [
        ("hostname", &config.hostname),
        ("username", &config.username),
        ("password", &config.password),
        ("disk device", &config.disk_device),
    ];

    for (field, value) in required {
        if value.is_empty() {
            return Err(AnswersError::EmptyField { field });
        }
    }

    if let Some(key_path) = config.ssh_key.as_deref() {
        validate_ssh_key(system, key_path)?;
    }

    debug!("Configuration for host '{}' is valid", config.hostname);
    Ok(())
}

/// Validate that a file holds an SSH public key
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read
/// - The content does not start with `ssh-`
#[inline]
pub fn validate_ssh_key(system: &dyn System, key_path: &Path) -> Result<()> {
    let key_data = system
        .read_to_string(key_path)
        .map_err(|source| AnswersError::io("failed to read SSH key file", source))?;

    if !key_data.starts_with(SSH_KEY_PREFIX) {
        return Err(AnswersError::InvalidSshKeyFormat {
            path: key_path.to_path_buf(),
        });
    }

    Ok(())
}
