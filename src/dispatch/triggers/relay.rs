use crate::dispatch::{Trigger, TriggerContext, TriggerOutcome};
use slircbot_proto::{ChatLine, OutboundMessage};
use tracing::debug;

/// Sent privately to the sender of a relay command that cannot be split.
pub const FORMAT_ERROR: &str = "Could not parse. The message should be in the format of ‘.tell [target] [message]’ to work properly.";

/// Forwards `<command> <target> <payload>` to `target`.
pub struct RelayTrigger {
    command: String,
}

impl RelayTrigger {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Split the text after the command token into `(target, payload)`.
    fn split<'a>(&self, text: &'a str) -> Option<(&'a str, &'a str)> {
        let rest = text.strip_prefix(self.command.as_str())?.trim_start();
        let (target, payload) = rest.split_once(char::is_whitespace)?;
        // Stricter than a plain split on the first whitespace: a target with
        // an empty or blank payload is malformed too, and leading payload
        // whitespace is dropped. Servers reject an empty PRIVMSG anyway.
        let payload = payload.trim_start();
        (!target.is_empty() && !payload.trim().is_empty()).then_some((target, payload))
    }
}

impl Trigger for RelayTrigger {
    fn name(&self) -> &'static str {
        "relay"
    }

    fn matches(&self, _ctx: &TriggerContext<'_>, chat: &ChatLine) -> bool {
        chat.text.split(char::is_whitespace).next() == Some(self.command.as_str())
    }

    fn fire(&self, _ctx: &TriggerContext<'_>, chat: &ChatLine) -> TriggerOutcome {
        match self.split(&chat.text) {
            Some((target, payload)) => {
                TriggerOutcome::reply(OutboundMessage::privmsg(target, payload))
            }
            None => {
                debug!(text = %chat.text, "malformed relay command");
                TriggerOutcome::reply(OutboundMessage::privmsg(&chat.origin_nick, FORMAT_ERROR))
            }
        }
    }
}
