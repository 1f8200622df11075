//! Outbound message construction and wire serialization.
//!
//! [`OutboundMessage`] is what triggers and the session produce; its
//! [`Display`](std::fmt::Display) impl is the wire form without the line
//! terminator (the codec appends CRLF).

use std::borrow::Cow;
use std::fmt;

/// Command verb of an outbound line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verb {
    /// `PRIVMSG <target> :<text>`
    Privmsg,
    /// `PONG :<token>`
    Pong,
    /// `NICK <nick>`
    Nick,
    /// `USER <user> 0 * :<realname>`
    User,
    /// `JOIN <channel>`
    Join,
    /// `QUIT [:<reason>]`
    Quit,
}

impl Verb {
    /// The verb as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Privmsg => "PRIVMSG",
            Self::Pong => "PONG",
            Self::Nick => "NICK",
            Self::User => "USER",
            Self::Join => "JOIN",
            Self::Quit => "QUIT",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message to be written to the server.
///
/// `target` and `text` are optional because registration, nick, join and
/// quit lines lack one or both segments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Command verb.
    pub verb: Verb,
    /// Middle parameter(s): recipient, nickname, channel, or user fields.
    pub target: Option<String>,
    /// Trailing text, written after `:`.
    pub text: Option<String>,
}

impl OutboundMessage {
    /// Chat message to a channel or nickname.
    pub fn privmsg(target: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            verb: Verb::Privmsg,
            target: Some(target.into()),
            text: Some(text.into()),
        }
    }

    /// Heartbeat answer.
    pub fn pong(token: impl Into<String>) -> Self {
        Self {
            verb: Verb::Pong,
            target: None,
            text: Some(token.into()),
        }
    }

    /// Nickname assignment.
    pub fn nick(nick: impl Into<String>) -> Self {
        Self {
            verb: Verb::Nick,
            target: Some(nick.into()),
            text: None,
        }
    }

    /// Identity registration: username, mode `0`, unused `*`, realname.
    pub fn user(username: &str, realname: impl Into<String>) -> Self {
        Self {
            verb: Verb::User,
            target: Some(format!("{} 0 *", username)),
            text: Some(realname.into()),
        }
    }

    /// Channel join request.
    pub fn join(channel: impl Into<String>) -> Self {
        Self {
            verb: Verb::Join,
            target: Some(channel.into()),
            text: None,
        }
    }

    /// Session end, with an optional reason.
    pub fn quit(reason: Option<String>) -> Self {
        Self {
            verb: Verb::Quit,
            target: None,
            text: reason,
        }
    }

    /// Whether this is the session-ending `QUIT`.
    pub fn is_quit(&self) -> bool {
        self.verb == Verb::Quit
    }
}

/// Cut a field at its first CR or LF so it can never start a second line.
pub fn sanitize(field: &str) -> Cow<'_, str> {
    match field.find(['\r', '\n']) {
        Some(pos) => Cow::Owned(field[..pos].to_string()),
        None => Cow::Borrowed(field),
    }
}

impl fmt::Display for OutboundMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb.as_str())?;
        if let Some(target) = &self.target {
            write!(f, " {}", sanitize(target))?;
        }
        match (&self.text, self.verb) {
            (Some(text), _) => write!(f, " :{}", sanitize(text)),
            // Bare `QUIT` is written with a trailing space
            (None, Verb::Quit) => f.write_str(" "),
            (None, _) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privmsg_wire() {
        let msg = OutboundMessage::privmsg("#chan", "hello world");
        assert_eq!(msg.to_string(), "PRIVMSG #chan :hello world");
    }

    #[test]
    fn test_registration_wire() {
        assert_eq!(OutboundMessage::nick("bot").to_string(), "NICK bot");
        assert_eq!(
            OutboundMessage::user("bot", "Bot Real").to_string(),
            "USER bot 0 * :Bot Real"
        );
        assert_eq!(OutboundMessage::join("#rust").to_string(), "JOIN #rust");
    }

    #[test]
    fn test_pong_wire() {
        assert_eq!(OutboundMessage::pong("pingis").to_string(), "PONG :pingis");
    }

    #[test]
    fn test_quit_wire() {
        assert_eq!(OutboundMessage::quit(None).to_string(), "QUIT ");
        assert_eq!(
            OutboundMessage::quit(Some("later".into())).to_string(),
            "QUIT :later"
        );
        assert!(OutboundMessage::quit(None).is_quit());
    }

    #[test]
    fn test_sanitize_blocks_injection() {
        let msg = OutboundMessage::privmsg("#c", "hi\r\nQUIT :owned");
        assert_eq!(msg.to_string(), "PRIVMSG #c :hi");

        let msg = OutboundMessage::privmsg("alice\nJOIN #x", "hi");
        assert_eq!(msg.to_string(), "PRIVMSG alice :hi");
    }

    #[test]
    fn test_every_verb_has_a_constructor() {
        let built = [
            OutboundMessage::privmsg("#c", "x"),
            OutboundMessage::pong("t"),
            OutboundMessage::nick("n"),
            OutboundMessage::user("u", "r"),
            OutboundMessage::join("#c"),
            OutboundMessage::quit(None),
        ];
        let wire: Vec<&str> = built.iter().map(|m| m.verb.as_str()).collect();
        assert_eq!(wire, ["PRIVMSG", "PONG", "NICK", "USER", "JOIN", "QUIT"]);
    }

    #[test]
    fn test_empty_text_keeps_colon() {
        assert_eq!(
            OutboundMessage::privmsg("#c", "").to_string(),
            "PRIVMSG #c :"
        );
    }
}
