//! Unified error handling for slircbot.
//!
//! Only [`StreamError`] is fatal: it ends the read loop and releases the
//! connection. Encoding and parse problems are handled where they are
//! detected (codec and parser) and never reach this module.

use crate::session::SessionPhase;
use slircbot_proto::ProtocolError;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Stream Errors (fatal)
// ============================================================================

/// Failure of the underlying byte stream.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("stream I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("peer closed the connection")]
    Closed,

    #[error("no data from peer for {}s", .0.as_secs())]
    Timeout(Duration),
}

impl StreamError {
    /// Static label for log fields.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Closed => "closed",
            Self::Timeout(_) => "timeout",
        }
    }
}

impl From<ProtocolError> for StreamError {
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::Io(e) => Self::Io(e),
            // The codec reports everything else as frames; reaching here is a write-side encode failure
            other => Self::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, other)),
        }
    }
}

// ============================================================================
// Session Errors (API misuse)
// ============================================================================

/// A state-machine operation requested from the wrong phase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("cannot {action} while {from:?}")]
    InvalidTransition {
        from: SessionPhase,
        action: &'static str,
    },
}

// ============================================================================
// Run Errors
// ============================================================================

/// Why the read loop stopped early.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error(transparent)]
    Session(#[from] SessionError),
}
