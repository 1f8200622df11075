//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: config struct definitions and loading
//! - [`defaults`]: serde default value functions
//! - [`validation`]: startup validation collecting every problem at once

mod defaults;
mod types;
mod validation;

pub use types::{
    AdminConfig, BotConfig, Config, ConfigError, DecodeErrorPolicy, LogConfig, ProtocolConfig,
    ServerConfig, TriggersConfig,
};
pub use validation::{ValidationError, validate};
