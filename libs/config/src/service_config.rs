//! Service Configuration Module
//!
//! Provides configuration loading for the push message service. Values are
//! layered: built-in defaults, then an optional TOML file, then
//! `EXTMSG_`-prefixed environment variables.
//!
//! ```toml
//! [reassembly]
//! completion = "coverage"      # byte_count | coverage
//! size_change = "reject"       # reject | reallocate
//!
//! [frame]
//! reserved_destination_prefix = "interfaces"
//!
//! [router]
//! service_name_base = "org.extmsg.ExternalAppMessage"
//! channel_capacity = 64
//!
//! [logging]
//! level = "debug"
//! json = false
//! ```

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use extmsg_codec::{ReassemblyPolicy, RESERVED_DESTINATION_PREFIX};
use extmsg_sink::RouterAddressing;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::service::{self, ENV_PREFIX, ENV_SEPARATOR};

/// Main service configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ServiceConfig {
    /// Chunk reassembly policy
    pub reassembly: ReassemblyPolicy,

    /// Frame parsing settings
    pub frame: FrameSettings,

    /// Router addressing and queueing
    pub router: RouterSettings,

    /// Logging settings
    pub logging: LoggingSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct FrameSettings {
    /// Destinations starting with this prefix are refused; empty disables the check
    pub reserved_destination_prefix: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RouterSettings {
    pub service_name_base: String,
    pub object_path: String,
    pub interface: String,
    pub method: String,
    pub channel_capacity: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            reserved_destination_prefix: RESERVED_DESTINATION_PREFIX.to_string(),
        }
    }
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            service_name_base: service::router::SERVICE_NAME_BASE.to_string(),
            object_path: service::router::OBJECT_PATH.to_string(),
            interface: service::router::INTERFACE.to_string(),
            method: service::router::METHOD.to_string(),
            channel_capacity: service::router::CHANNEL_CAPACITY,
        }
    }
}

impl RouterSettings {
    /// Addressing handed to the message router
    pub fn addressing(&self) -> RouterAddressing {
        RouterAddressing {
            service_name_base: self.service_name_base.clone(),
            object_path: self.object_path.clone(),
            interface: self.interface.clone(),
            method: self.method.clone(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: service::logging::LEVEL.to_string(),
            json: false,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from an optional file with `EXTMSG_` environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env_prefix(path, ENV_PREFIX)
    }

    /// Load configuration using a custom environment variable prefix
    pub fn load_with_env_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            info!("Loading config file: {:?}", path);
            builder = builder.add_source(File::from(path).required(true));
        }

        // Override with environment variables, e.g. EXTMSG_LOGGING__LEVEL
        builder = builder.add_source(
            Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .try_parsing(true),
        );

        let config: Self = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        debug!(?config, "Configuration loaded");
        Ok(config)
    }

    /// Parse configuration from a TOML string without environment overrides
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Render the configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    /// Check cross-field constraints the type system cannot express
    pub fn validate(&self) -> Result<()> {
        if self.router.channel_capacity == 0 {
            bail!("router.channel_capacity must be at least 1");
        }
        if self.router.service_name_base.is_empty() {
            bail!("router.service_name_base must not be empty");
        }
        let level = self.logging.level.to_lowercase();
        if !service::logging::LEVELS.contains(&level.as_str()) {
            bail!(
                "logging.level {:?} is not one of {:?}",
                self.logging.level,
                service::logging::LEVELS
            );
        }
        Ok(())
    }
}

/// Convenience function to load configuration, falling back to defaults
/// when the default config file does not exist
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig> {
    match path {
        Some(path) => ServiceConfig::load(Some(path)),
        None => {
            let default_path = Path::new(service::DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                ServiceConfig::load(Some(default_path))
            } else {
                debug!("No config file at {:?}; using defaults", default_path);
                ServiceConfig::load(None)
            }
        }
    }
}
