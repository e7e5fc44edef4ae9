use crate::config::{ConfigOverrides, Configuration};
use crate::error::Result;
use crate::operations::generate::DEFAULT_OUTPUT;
use crate::system::System;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for answersmith
#[derive(Parser, Debug, Clone)]
#[command(name = "answersmith")]
#[command(about = "Alpine Linux answer file generator")]
#[command(
    long_about = "A CLI tool to generate Alpine Linux answer files for automated installation.\n\
                  It renders the answers file consumed by setup-alpine from a template and \
                  the values given on the command line or in a configuration file."
)]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate the answers file
    Generate {
        #[command(flatten)]
        config: ConfigArgs,

        /// Output file path
        #[arg(short, long, value_name = "PATH", default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
    },

    /// Validate the current configuration
    Validate {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Print version information
    Version,
}

/// Configuration values accepted by `generate` and `validate`
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// YAML configuration file with base values (flags take precedence)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// Hostname for the Alpine system
    #[arg(short = 'n', long)]
    pub hostname: Option<String>,

    /// Username for the main user
    #[arg(short, long)]
    pub username: Option<String>,

    /// Password for the main user
    #[arg(short, long, env = "ANSWERSMITH_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Timezone for the system
    #[arg(short, long)]
    pub timezone: Option<String>,

    /// Keyboard layout
    #[arg(short, long)]
    pub keymap: Option<String>,

    /// Network interface to configure
    #[arg(short, long, value_name = "IFACE")]
    pub interface: Option<String>,

    /// Disk device for installation
    #[arg(short, long, value_name = "DEVICE")]
    pub disk: Option<String>,

    /// User groups (comma-separated)
    #[arg(long, value_name = "GROUPS", value_delimiter = ',')]
    pub groups: Option<Vec<String>>,

    /// Path to SSH public key file
    #[arg(long, value_name = "PATH")]
    pub ssh_key: Option<String>,
}

impl ConfigArgs {
    /// Split off the per-field overrides
    #[must_use]
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            hostname: self.hostname.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            timezone: self.timezone.clone(),
            keymap: self.keymap.clone(),
            network_iface: self.interface.clone(),
            disk_device: self.disk.clone(),
            groups: self.groups.clone(),
            ssh_key: self.ssh_key.clone(),
        }
    }

    /// Build the configuration: defaults, then the config file, then flags
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be loaded
    pub fn resolve(&self, system: &dyn System) -> Result<Configuration> {
        let mut config = match self.config.as_deref() {
            Some(path) => Configuration::load_from_file(system, path)?,
            None => Configuration::default(),
        };
        self.overrides().apply_to(&mut config);
        Ok(config)
    }
}
