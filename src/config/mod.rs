//! Configuration management module
//!
//! Holds the installation parameters, their defaults, the YAML configuration file
//! loader and the validation predicate.

pub mod schema;
pub mod validation;
pub mod yaml;

use crate::system::System;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Desired installer settings rendered into the answers file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Configuration {
    /// Hostname of the installed system
    pub hostname: String,

    /// Name of the main user account
    pub username: String,

    /// Plaintext password of the main user
    pub password: String,

    /// Timezone, e.g. `UTC` or `Europe/Berlin`
    pub timezone: String,

    /// Keyboard layout
    pub keymap: String,

    /// Network interface configured for DHCP
    pub network_iface: String,

    /// Disk device the system is installed to
    pub disk_device: String,

    /// Groups of the main user, rendered in this order
    pub groups: Vec<String>,

    /// Path to an SSH public key file
    pub ssh_key: Option<PathBuf>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            hostname: "alpinehost".to_owned(),
            username: "alpine".to_owned(),
            password: "changeme".to_owned(),
            timezone: "UTC".to_owned(),
            keymap: "us".to_owned(),
            network_iface: "eth0".to_owned(),
            disk_device: "/dev/mmcblk0".to_owned(),
            groups: vec!["audio".to_owned(), "video".to_owned(), "netdev".to_owned()],
            ssh_key: None,
        }
    }
}

impl Configuration {
    /// Load configuration from a YAML file, starting from the defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable, or not a valid configuration
    #[inline]
    pub fn load_from_file(system: &dyn System, path: &str) -> crate::error::Result<Self> {
        yaml::load_config(system, path)
    }

    /// Validate the required fields and the optional SSH key
    ///
    /// # Errors
    ///
    /// Returns the first failed check, see [`validation::validate_config`]
    #[inline]
    pub fn validate(&self, system: &dyn System) -> crate::error::Result<()> {
        validation::validate_config(system, self)
    }

    /// Names the template may reference
    #[must_use]
    pub const fn field_names() -> &'static [&'static str] {
        &[
            "hostname",
            "username",
            "password",
            "timezone",
            "keymap",
            "network_iface",
            "disk_device",
            "groups",
            "ssh_key",
        ]
    }
}

/// Field values supplied on the command line
///
/// Every field is optional; only the supplied ones replace the base configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub hostname: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timezone: Option<String>,
    pub keymap: Option<String>,
    pub network_iface: Option<String>,
    pub disk_device: Option<String>,
    pub groups: Option<Vec<String>>,
    pub ssh_key: Option<String>,
}

impl ConfigOverrides {
    /// Overwrite the supplied fields of `config`
    pub fn apply_to(self, config: &mut Configuration) {
        if let Some(hostname) = self.hostname {
            config.hostname = hostname;
        }
        if let Some(username) = self.username {
            config.username = username;
        }
        if let Some(password) = self.password {
            config.password = password;
        }
        if let Some(timezone) = self.timezone {
            config.timezone = timezone;
        }
        if let Some(keymap) = self.keymap {
            config.keymap = keymap;
        }
        if let Some(network_iface) = self.network_iface {
            config.network_iface = network_iface;
        }
        if let Some(disk_device) = self.disk_device {
            config.disk_device = disk_device;
        }
        if let Some(groups) = self.groups {
            config.groups = groups;
        }
        if let Some(ssh_key) = self.ssh_key {
            // An explicit empty path clears a key set in the config file
            config.ssh_key = (!ssh_key.is_empty()).then(|| PathBuf::from(ssh_key));
        }
    }
}
