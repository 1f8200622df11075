use crate::dispatch::{Trigger, TriggerContext, TriggerOutcome};
use slircbot_proto::{ChatLine, OutboundMessage, irc_eq};
use tracing::info;

/// Shuts the session down when the admin says the exit phrase.
///
/// The origin is compared with RFC 1459 case folding; the text must equal
/// the phrase exactly once trailing whitespace is removed.
pub struct AdminExitTrigger {
    admin: String,
    exit_phrase: String,
    farewell: String,
}

impl AdminExitTrigger {
    pub fn new(
        admin: impl Into<String>,
        exit_phrase: impl Into<String>,
        farewell: impl Into<String>,
    ) -> Self {
        Self {
            admin: admin.into(),
            exit_phrase: exit_phrase.into(),
            farewell: farewell.into(),
        }
    }
}

impl Trigger for AdminExitTrigger {
    fn name(&self) -> &'static str {
        "admin_exit"
    }

    fn matches(&self, _ctx: &TriggerContext<'_>, chat: &ChatLine) -> bool {
        irc_eq(&chat.origin_nick, &self.admin) && chat.text.trim_end() == self.exit_phrase
    }

    fn fire(&self, ctx: &TriggerContext<'_>, chat: &ChatLine) -> TriggerOutcome {
        info!(admin = %chat.origin_nick, "exit phrase received");
        TriggerOutcome::terminal(vec![OutboundMessage::privmsg(
            ctx.default_target,
            self.farewell.as_str(),
        )])
    }
}
