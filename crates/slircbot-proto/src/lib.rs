//! # slircbot-proto
//!
//! Sans-IO protocol pieces for a small single-channel IRC bot: line
//! framing, inbound event parsing and outbound serialization.
//!
//! ## Quick Start
//!
//! ```rust
//! use slircbot_proto::{parse, InboundEvent, OutboundMessage};
//!
//! if let InboundEvent::Heartbeat { token } = parse("PING :abc123") {
//!     assert_eq!(token, "abc123");
//! }
//!
//! let reply = OutboundMessage::privmsg("#rust", "Hello, world!");
//! assert_eq!(reply.to_string(), "PRIVMSG #rust :Hello, world!");
//! ```
//!
//! With the default `tokio` feature, [`LineCodec`] plugs into
//! `tokio_util::codec::Framed` and yields one [`Frame`] per line.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod casemap;
pub mod error;
pub mod event;
#[cfg(feature = "tokio")]
pub mod line;
pub mod nick;
pub mod outbound;

pub use self::casemap::{irc_eq, irc_lower_char, irc_to_lower};
pub use self::error::{MessageParseError, ProtocolError};
pub use self::event::{parse, try_parse, ChatLine, EventParser, InboundEvent};
#[cfg(feature = "tokio")]
pub use self::line::{DecodePolicy, Frame, LineCodec, MAX_LINE_LEN};
pub use self::nick::{NickExt, MAX_NICK_LEN};
pub use self::outbound::{OutboundMessage, Verb};
