//! Error types for the bot protocol library.
//!
//! [`ProtocolError`] covers framing and decoding problems raised by the line
//! codec. [`MessageParseError`] describes why a decoded line could not be
//! turned into a structured event; callers normally never see it because
//! [`crate::event::parse`] degrades every such failure to a raw event.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Extract the IRC command name from raw message bytes (for error reporting).
///
/// Works on bytes that failed to decode, so the command of an undecodable
/// line can still be named in a diagnostic.
///
/// ```ignore
/// assert_eq!(extract_command_hint(b"PRIVMSG #test hi"), Some("PRIVMSG".to_string()));
/// assert_eq!(extract_command_hint(b":server PRIVMSG #test hi"), Some("PRIVMSG".to_string()));
/// ```
pub(crate) fn extract_command_hint(raw_line: &[u8]) -> Option<String> {
    let mut pos = 0;

    // Skip tags and prefix, both terminated by a space
    for marker in [b'@', b':'] {
        if pos < raw_line.len() && raw_line[pos] == marker {
            while pos < raw_line.len() && raw_line[pos] != b' ' {
                pos += 1;
            }
            while pos < raw_line.len() && raw_line[pos] == b' ' {
                pos += 1;
            }
        }
    }

    let cmd_start = pos;
    while pos < raw_line.len() && raw_line[pos].is_ascii_alphanumeric() {
        pos += 1;
    }

    if pos > cmd_start {
        Some(String::from_utf8_lossy(&raw_line[cmd_start..pos]).to_ascii_uppercase())
    } else {
        None
    }
}

/// Top-level protocol errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A line could not be decoded with the configured text encoding.
    #[error("invalid {encoding} in message ({} bytes)", .raw_line.len())]
    InvalidEncoding {
        /// The raw line as bytes, terminator excluded.
        raw_line: Vec<u8>,
        /// Name of the encoding that rejected the bytes.
        encoding: &'static str,
        /// Command name recovered from the raw bytes, if any.
        command_hint: Option<String>,
    },

    /// Line exceeded the maximum allowed length.
    #[error("message too long: {actual} bytes (limit: {limit})")]
    MessageTooLong {
        /// Bytes seen before the line was abandoned.
        actual: usize,
        /// Maximum allowed length.
        limit: usize,
    },

    /// Encoding label not recognised.
    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),
}

/// Reasons a single line could not be parsed into a structured event.
///
/// Every variant is recoverable: the line is still delivered, as
/// [`crate::event::InboundEvent::Raw`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MessageParseError {
    /// Line was empty or whitespace only.
    #[error("empty message")]
    Empty,

    /// A prefix was present but no command followed it.
    #[error("missing command")]
    MissingCommand,

    /// An expected delimiter was absent.
    #[error("missing '{delimiter}' in {part}")]
    MissingDelimiter {
        /// The delimiter that was looked for.
        delimiter: char,
        /// Which part of the line was being split.
        part: &'static str,
    },

    /// A chat line had no target before its trailing text.
    #[error("missing target")]
    MissingTarget,

    /// Origin nickname longer than the protocol allows.
    #[error("nickname too long: {nick} (limit: {limit})")]
    NickTooLong {
        /// The offending nickname.
        nick: String,
        /// Maximum nickname length.
        limit: usize,
    },
}
