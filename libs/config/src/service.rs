//! Service configuration defaults
//!
//! Default values used when neither the config file nor the environment
//! sets a key.

/// Config file loaded by the service binary when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "config/push_message.toml";

/// Prefix for environment overrides, e.g. `EXTMSG_ROUTER__CHANNEL_CAPACITY=128`
pub const ENV_PREFIX: &str = "EXTMSG";

/// Separator between nested keys in environment overrides
pub const ENV_SEPARATOR: &str = "__";

/// Router defaults
pub mod router {
    pub const SERVICE_NAME_BASE: &str = "org.extmsg.ExternalAppMessage";
    pub const OBJECT_PATH: &str = "/org/extmsg/ExternalAppMessage";
    pub const INTERFACE: &str = "org.extmsg.ExternalAppMessage";
    pub const METHOD: &str = "pushMessage";

    /// Deliveries that may be queued ahead of the delivery task
    pub const CHANNEL_CAPACITY: usize = 64;
}

/// Logging defaults
pub mod logging {
    pub const LEVEL: &str = "info";

    /// Accepted values for `logging.level`
    pub const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
}
