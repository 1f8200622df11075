//! Default value functions for configuration.
//!
//! Separated into its own module for reuse by serde attributes and
//! `Default` impls.

// =============================================================================
// Server Defaults
// =============================================================================

pub fn default_port() -> u16 {
    6667
}

/// Upper bound on bytes pulled from the socket per read.
pub fn default_read_chunk() -> usize {
    2048
}

pub fn default_max_line_len() -> usize {
    slircbot_proto::MAX_LINE_LEN
}

// =============================================================================
// Admin Defaults
// =============================================================================

pub fn default_farewell() -> String {
    "oh...okay. :'(".to_string()
}

// =============================================================================
// Protocol Defaults
// =============================================================================

pub fn default_encoding() -> String {
    "utf-8".to_string()
}

pub fn default_pong_reply() -> String {
    "pingis".to_string()
}

pub fn default_join_marker() -> String {
    slircbot_proto::event::DEFAULT_JOIN_MARKER.to_string()
}

// =============================================================================
// Trigger Defaults
// =============================================================================

pub fn default_greeting_token() -> String {
    "Hi".to_string()
}

pub fn default_relay_command() -> String {
    ".tell".to_string()
}

// =============================================================================
// Logging Defaults
// =============================================================================

pub fn default_log_level() -> String {
    "info".to_string()
}

/// Returns `true` (for serde defaults).
pub fn default_true() -> bool {
    true
}
