//! Inbound line parsing.
//!
//! Every decoded line becomes exactly one [`InboundEvent`]. Parsing never
//! fails from the caller's point of view: [`EventParser::parse`] turns any
//! malformed line into [`InboundEvent::Raw`], and [`EventParser::try_parse`]
//! exposes the reason for diagnostics.
//!
//! ```
//! use slircbot_proto::event::{parse, InboundEvent};
//!
//! match parse(":nick!user@host PRIVMSG #chan :hello world") {
//!     InboundEvent::ChatMessage(chat) => {
//!         assert_eq!(chat.origin_nick, "nick");
//!         assert_eq!(chat.target, "#chan");
//!         assert_eq!(chat.text, "hello world");
//!     }
//!     other => panic!("unexpected {:?}", other),
//! }
//! ```

use crate::error::MessageParseError;
use crate::nick::{NickExt, MAX_NICK_LEN};

/// Heartbeat challenge verb.
pub const HEARTBEAT_VERB: &str = "PING";
/// Chat message verb.
pub const CHAT_VERB: &str = "PRIVMSG";
/// Notice verb.
pub const NOTICE_VERB: &str = "NOTICE";
/// Text of the status line that ends a channel roster dump.
pub const DEFAULT_JOIN_MARKER: &str = "End of /NAMES list";

const RPL_WELCOME: &str = "001";
const RPL_ENDOFNAMES: &str = "366";

/// A chat or notice line with its origin split out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatLine {
    /// Nickname of the sender (text between `:` and `!`).
    pub origin_nick: String,
    /// Host part of the sender's `user@host` mask.
    pub origin_host: String,
    /// Channel or nickname the line was addressed to.
    pub target: String,
    /// Trailing text, unmodified.
    pub text: String,
}

/// Parsed representation of one inbound line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InboundEvent {
    /// Liveness challenge; must be answered in every phase but Closing.
    Heartbeat {
        /// Opaque challenge token.
        token: String,
    },
    /// `PRIVMSG` from a user.
    ChatMessage(ChatLine),
    /// `NOTICE` from a user.
    Notice(ChatLine),
    /// `RPL_WELCOME`: registration accepted.
    Welcome {
        /// Nickname the server registered us under.
        nick: String,
    },
    /// End of the roster dump that follows a join.
    JoinComplete {
        /// Channel the roster belonged to, when the line named one.
        channel: Option<String>,
    },
    /// `ERROR` line; the server is closing the link.
    ServerError {
        /// Reason given by the server.
        reason: String,
    },
    /// Anything not recognised, including malformed lines.
    Raw {
        /// The line as received.
        line: String,
    },
}

impl InboundEvent {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Heartbeat { .. } => "heartbeat",
            Self::ChatMessage(_) => "chat",
            Self::Notice(_) => "notice",
            Self::Welcome { .. } => "welcome",
            Self::JoinComplete { .. } => "join_complete",
            Self::ServerError { .. } => "server_error",
            Self::Raw { .. } => "raw",
        }
    }
}

/// Line parser with a configurable join-completion marker.
#[derive(Clone, Debug)]
pub struct EventParser {
    join_marker: String,
}

impl Default for EventParser {
    fn default() -> Self {
        Self::new(DEFAULT_JOIN_MARKER)
    }
}

impl EventParser {
    /// Create a parser that also treats any line containing `join_marker`
    /// as the end of a roster dump.
    pub fn new(join_marker: impl Into<String>) -> Self {
        Self {
            join_marker: join_marker.into(),
        }
    }

    /// Parse a line, degrading every failure to [`InboundEvent::Raw`].
    pub fn parse(&self, line: &str) -> InboundEvent {
        self.try_parse(line).unwrap_or_else(|_| InboundEvent::Raw {
            line: strip_terminator(line).to_string(),
        })
    }

    /// Parse a line, reporting why it could not be structured.
    pub fn try_parse(&self, line: &str) -> Result<InboundEvent, MessageParseError> {
        let line = strip_terminator(line);
        if line.trim().is_empty() {
            return Err(MessageParseError::Empty);
        }

        if let Some(token) = heartbeat_token(line) {
            return Ok(InboundEvent::Heartbeat {
                token: token.to_string(),
            });
        }

        let tokens = Tokens::split(line)?;
        let command = tokens.command;

        if command.eq_ignore_ascii_case(CHAT_VERB) {
            return parse_chat(&tokens).map(InboundEvent::ChatMessage);
        }
        if command.eq_ignore_ascii_case(NOTICE_VERB) {
            return parse_chat(&tokens).map(InboundEvent::Notice);
        }
        if command.eq_ignore_ascii_case(HEARTBEAT_VERB) {
            return Ok(InboundEvent::Heartbeat {
                token: trailing_or_first(tokens.params).to_string(),
            });
        }

        match command {
            RPL_WELCOME => Ok(InboundEvent::Welcome {
                nick: tokens
                    .params
                    .split_whitespace()
                    .next()
                    .unwrap_or_default()
                    .to_string(),
            }),
            RPL_ENDOFNAMES => Ok(InboundEvent::JoinComplete {
                channel: tokens
                    .params
                    .split_whitespace()
                    .nth(1)
                    .filter(|c| !c.starts_with(':'))
                    .map(str::to_string),
            }),
            _ if command.eq_ignore_ascii_case("ERROR") => Ok(InboundEvent::ServerError {
                reason: trailing_or_first(tokens.params).to_string(),
            }),
            _ if !self.join_marker.is_empty() && line.contains(self.join_marker.as_str()) => {
                Ok(InboundEvent::JoinComplete { channel: None })
            }
            _ => Ok(InboundEvent::Raw {
                line: line.to_string(),
            }),
        }
    }
}

/// Parse with the default join marker.
pub fn parse(line: &str) -> InboundEvent {
    EventParser::default().parse(line)
}

/// Fallible parse with the default join marker.
pub fn try_parse(line: &str) -> Result<InboundEvent, MessageParseError> {
    EventParser::default().try_parse(line)
}

fn strip_terminator(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}

/// Token of a line that begins with the heartbeat verb.
fn heartbeat_token(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(HEARTBEAT_VERB)?;
    if !(rest.is_empty() || rest.starts_with(' ')) {
        return None;
    }
    let rest = rest.trim_start();
    Some(rest.strip_prefix(':').unwrap_or(rest))
}

/// Text after the first `:`, or the first parameter when there is none.
fn trailing_or_first(params: &str) -> &str {
    match params.split_once(':') {
        Some((_, trailing)) => trailing,
        None => params.split_whitespace().next().unwrap_or_default(),
    }
}

/// A line split into its prefix, command and parameter text.
struct Tokens<'a> {
    prefix: Option<&'a str>,
    command: &'a str,
    params: &'a str,
}

impl<'a> Tokens<'a> {
    fn split(line: &'a str) -> Result<Self, MessageParseError> {
        let mut rest = line;

        // IRCv3 tags carry nothing the bot uses
        if rest.starts_with('@') {
            rest = rest
                .split_once(' ')
                .map(|(_, tail)| tail.trim_start())
                .ok_or(MessageParseError::MissingCommand)?;
        }

        let prefix = match rest.strip_prefix(':') {
            Some(body) => {
                let (prefix, tail) = body
                    .split_once(' ')
                    .ok_or(MessageParseError::MissingCommand)?;
                rest = tail.trim_start();
                Some(prefix)
            }
            None => None,
        };

        let (command, params) = rest.split_once(' ').unwrap_or((rest, ""));
        if command.is_empty() {
            return Err(MessageParseError::MissingCommand);
        }

        Ok(Self {
            prefix,
            command,
            params,
        })
    }
}

fn parse_chat(tokens: &Tokens<'_>) -> Result<ChatLine, MessageParseError> {
    let prefix = tokens.prefix.ok_or(MessageParseError::MissingDelimiter {
        delimiter: ':',
        part: "origin",
    })?;
    let (nick, mask) = prefix
        .split_once('!')
        .filter(|(nick, _)| !nick.is_empty())
        .ok_or(MessageParseError::MissingDelimiter {
            delimiter: '!',
            part: "origin",
        })?;
    if nick.nick_len() > MAX_NICK_LEN {
        return Err(MessageParseError::NickTooLong {
            nick: nick.to_string(),
            limit: MAX_NICK_LEN,
        });
    }
    let host = mask.split_once('@').map_or(mask, |(_, host)| host);

    let (middle, text) =
        tokens
            .params
            .split_once(':')
            .ok_or(MessageParseError::MissingDelimiter {
                delimiter: ':',
                part: "trailing text",
            })?;
    let target = middle
        .split_whitespace()
        .next()
        .ok_or(MessageParseError::MissingTarget)?;

    Ok(ChatLine {
        origin_nick: nick.to_string(),
        origin_host: host.to_string(),
        target: target.to_string(),
        text: text.to_string(),
    })
}
