//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use slircbot_proto::{LineCodec, NickExt};
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("server.host is required")]
    MissingHost,
    #[error("server.port must be non-zero")]
    InvalidPort,
    #[error("server.read_chunk must be non-zero")]
    InvalidReadChunk,
    #[error("server.max_line_len must be non-zero")]
    InvalidMaxLineLen,
    #[error("bot.nick is not a valid nickname of at most 16 characters: '{0}'")]
    InvalidNick(String),
    #[error("bot.channel must start with '#' or '&' and contain no spaces or commas: '{0}'")]
    InvalidChannel(String),
    #[error("admin.nick is required")]
    MissingAdmin,
    #[error("admin.exit_phrase must not be empty")]
    EmptyExitPhrase,
    #[error("protocol.encoding is not a known encoding label: '{0}'")]
    UnknownEncoding(String),
    #[error("triggers.relay_command must be a single non-empty word: '{0}'")]
    InvalidRelayCommand(String),
}

fn is_valid_channel(name: &str) -> bool {
    name.len() > 1
        && (name.starts_with('#') || name.starts_with('&'))
        && !name.contains([' ', ',', '\x07', '\r', '\n'])
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.host.trim().is_empty() {
        errors.push(ValidationError::MissingHost);
    }
    if config.server.port == 0 {
        errors.push(ValidationError::InvalidPort);
    }
    if config.server.read_chunk == 0 {
        errors.push(ValidationError::InvalidReadChunk);
    }
    if config.server.max_line_len == 0 {
        errors.push(ValidationError::InvalidMaxLineLen);
    }

    if !config.bot.nick.is_valid_nick() {
        errors.push(ValidationError::InvalidNick(config.bot.nick.clone()));
    }
    if !is_valid_channel(&config.bot.channel) {
        errors.push(ValidationError::InvalidChannel(config.bot.channel.clone()));
    }

    if config.admin.nick.trim().is_empty() {
        errors.push(ValidationError::MissingAdmin);
    }
    if config.admin.exit_phrase(&config.bot.nick).trim().is_empty() {
        errors.push(ValidationError::EmptyExitPhrase);
    }

    if LineCodec::new(&config.protocol.encoding).is_err() {
        errors.push(ValidationError::UnknownEncoding(
            config.protocol.encoding.clone(),
        ));
    }

    let relay = &config.triggers.relay_command;
    if config.triggers.relay && (relay.is_empty() || relay.contains(char::is_whitespace)) {
        errors.push(ValidationError::InvalidRelayCommand(relay.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
