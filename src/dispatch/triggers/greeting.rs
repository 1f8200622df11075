use crate::dispatch::{Trigger, TriggerContext, TriggerOutcome};
use slircbot_proto::{ChatLine, OutboundMessage};

/// Answers `<token> <bot nick>` anywhere in a line with `Hello <origin>!`.
pub struct GreetingTrigger {
    token: String,
}

impl GreetingTrigger {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl Trigger for GreetingTrigger {
    fn name(&self) -> &'static str {
        "greeting"
    }

    fn matches(&self, ctx: &TriggerContext<'_>, chat: &ChatLine) -> bool {
        let needle = format!("{} {}", self.token, ctx.bot_nick);
        chat.text.contains(&needle)
    }

    fn fire(&self, ctx: &TriggerContext<'_>, chat: &ChatLine) -> TriggerOutcome {
        TriggerOutcome::reply(OutboundMessage::privmsg(
            ctx.default_target,
            format!("Hello {}!", chat.origin_nick),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::test_support::{CHANNEL, chat, ctx};

    #[test]
    fn greets_origin_in_channel() {
        let t = GreetingTrigger::new("Hi");
        let line = chat("alice", "well Hi BotNick, how goes");
        assert!(t.matches(&ctx(), &line));

        let out = t.fire(&ctx(), &line);
        assert_eq!(out.messages, [OutboundMessage::privmsg(CHANNEL, "Hello alice!")]);
        assert!(!out.terminal);
    }

    #[test]
    fn needs_token_before_nick() {
        let t = GreetingTrigger::new("Hi");
        assert!(!t.matches(&ctx(), &chat("alice", "BotNick Hi")));
        assert!(!t.matches(&ctx(), &chat("alice", "hi botnick")));
        assert!(!t.matches(&ctx(), &chat("alice", "Hi  BotNick")));
    }

    #[test]
    fn custom_token() {
        let t = GreetingTrigger::new("Howdy");
        assert!(t.matches(&ctx(), &chat("alice", "Howdy BotNick")));
        assert!(!t.matches(&ctx(), &chat("alice", "Hi BotNick")));
    }
}
