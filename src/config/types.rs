//! Core configuration types and loading.

use serde::Deserialize;
use slircbot_proto::DecodePolicy;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use super::defaults::*;
use super::validation::{ValidationError, validate};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Where to connect.
    pub server: ServerConfig,
    /// Who the bot is and where it sits.
    pub bot: BotConfig,
    /// Who may shut the bot down, and how.
    pub admin: AdminConfig,
    /// Wire-level knobs.
    #[serde(default)]
    pub protocol: ProtocolConfig,
    /// Built-in trigger switches.
    #[serde(default)]
    pub triggers: TriggersConfig,
    /// Log output.
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Load, parse and validate a TOML config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        validate(&config).map_err(ConfigError::Invalid)?;
        Ok(config)
    }
}

/// Server connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server hostname (e.g., "irc.libera.chat").
    pub host: String,
    /// Server port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Give up on a silent peer after this many seconds. Unset blocks forever.
    #[serde(default)]
    pub read_timeout_secs: Option<u64>,
    /// Read buffer size in bytes.
    #[serde(default = "default_read_chunk")]
    pub read_chunk: usize,
    /// Longest inbound line accepted, terminator excluded.
    #[serde(default = "default_max_line_len")]
    pub max_line_len: usize,
}

impl ServerConfig {
    /// `host:port` for `TcpStream::connect`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_secs.map(Duration::from_secs)
    }
}

/// Bot identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Nickname; also the identifier the greeting trigger listens for.
    pub nick: String,
    /// Username (ident). Defaults to the nickname.
    #[serde(default)]
    pub username: Option<String>,
    /// Real name. Defaults to the nickname.
    #[serde(default)]
    pub realname: Option<String>,
    /// The single channel the bot joins.
    pub channel: String,
}

impl BotConfig {
    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.nick)
    }

    pub fn realname(&self) -> &str {
        self.realname.as_deref().unwrap_or(&self.nick)
    }
}

/// Admin exit configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// Admin nickname, compared case-insensitively.
    pub nick: String,
    /// Exact phrase that shuts the bot down. Defaults to `bye <bot nick>`.
    #[serde(default)]
    pub exit_phrase: Option<String>,
    /// Sent to the channel before quitting.
    #[serde(default = "default_farewell")]
    pub farewell: String,
}

impl AdminConfig {
    /// Resolved exit phrase for a bot called `bot_nick`.
    pub fn exit_phrase(&self, bot_nick: &str) -> String {
        self.exit_phrase
            .clone()
            .unwrap_or_else(|| format!("bye {}", bot_nick))
    }
}

/// What to do with lines that fail to decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeErrorPolicy {
    /// Log and drop the line.
    #[default]
    Drop,
    /// Replace bad sequences and keep the line.
    Lossy,
}

impl From<DecodeErrorPolicy> for DecodePolicy {
    fn from(policy: DecodeErrorPolicy) -> Self {
        match policy {
            DecodeErrorPolicy::Drop => DecodePolicy::Drop,
            DecodeErrorPolicy::Lossy => DecodePolicy::Lossy,
        }
    }
}

/// Protocol configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ProtocolConfig {
    /// Text encoding label for the wire.
    #[serde(default = "default_encoding")]
    pub encoding: String,
    #[serde(default)]
    pub on_decode_error: DecodeErrorPolicy,
    /// Fixed heartbeat answer.
    #[serde(default = "default_pong_reply")]
    pub pong_reply: String,
    /// Answer heartbeats with the server's own token instead of `pong_reply`.
    #[serde(default)]
    pub echo_ping_token: bool,
    /// Text that marks the end of the roster dump after joining.
    #[serde(default = "default_join_marker")]
    pub join_marker: String,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            encoding: default_encoding(),
            on_decode_error: DecodeErrorPolicy::default(),
            pong_reply: default_pong_reply(),
            echo_ping_token: false,
            join_marker: default_join_marker(),
        }
    }
}

/// Built-in trigger configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TriggersConfig {
    #[serde(default = "default_true")]
    pub greeting: bool,
    /// Word that must precede the bot's nick for a greeting.
    #[serde(default = "default_greeting_token")]
    pub greeting_token: String,
    #[serde(default = "default_true")]
    pub relay: bool,
    /// Command token of the relay trigger.
    #[serde(default = "default_relay_command")]
    pub relay_command: String,
    /// Reason sent with `QUIT`.
    #[serde(default)]
    pub quit_message: Option<String>,
}

impl Default for TriggersConfig {
    fn default() -> Self {
        Self {
            greeting: true,
            greeting_token: default_greeting_token(),
            relay: true,
            relay_command: default_relay_command(),
            quit_message: None,
        }
    }
}

/// Log output configuration. `RUST_LOG` overrides `level`.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
