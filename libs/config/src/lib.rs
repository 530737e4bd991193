//! # Push Message Service Configuration
//!
//! Layered configuration for the push message service: built-in defaults,
//! an optional TOML file and `EXTMSG_` environment overrides.
//!
//! ## Usage
//!
//! ```rust
//! use extmsg_config::ServiceConfig;
//!
//! let config = ServiceConfig::from_toml_str("[router]\nchannel_capacity = 16\n").unwrap();
//! assert_eq!(config.router.channel_capacity, 16);
//! assert_eq!(config.frame.reserved_destination_prefix, "interfaces");
//! ```

pub mod service;
pub mod service_config;

// Re-export commonly used types
pub use service_config::{
    load_config, FrameSettings, LoggingSettings, RouterSettings, ServiceConfig,
};
