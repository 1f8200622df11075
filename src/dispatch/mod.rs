//! Command dispatch for the Active phase.
//!
//! A [`Trigger`] is a predicate plus a handler over one chat line. The
//! [`Dispatcher`] evaluates its triggers in registration order; several may
//! fire for the same line unless one of them is terminal, which stops
//! evaluation and asks the session to close.
//!
//! ## Built-in triggers
//!
//! - [`GreetingTrigger`]: `Hi <bot nick>` gets `Hello <origin>!`
//! - [`RelayTrigger`]: `.tell <target> <payload>` forwards the payload
//! - [`AdminExitTrigger`]: the admin's exit phrase ends the session
//!
//! Closures can be registered through [`FnTrigger`].

mod registry;
pub mod triggers;

pub use registry::{Dispatch, Dispatcher};
pub use triggers::{AdminExitTrigger, GreetingTrigger, RelayTrigger};

use slircbot_proto::{ChatLine, OutboundMessage};

/// What a trigger may read besides the chat line itself.
#[derive(Debug, Clone, Copy)]
pub struct TriggerContext<'a> {
    /// Our own nickname.
    pub bot_nick: &'a str,
    /// The joined channel; replies go here unless a trigger says otherwise.
    pub default_target: &'a str,
}

/// Messages produced by one trigger, and whether it ends the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerOutcome {
    pub messages: Vec<OutboundMessage>,
    pub terminal: bool,
}

impl TriggerOutcome {
    /// Nothing to send.
    pub fn none() -> Self {
        Self::default()
    }

    /// A single message, session continues.
    pub fn reply(message: OutboundMessage) -> Self {
        Self {
            messages: vec![message],
            terminal: false,
        }
    }

    /// Send `messages`, then close the session.
    pub fn terminal(messages: Vec<OutboundMessage>) -> Self {
        Self {
            messages,
            terminal: true,
        }
    }
}

/// A predicate over a chat line plus the handler that runs when it holds.
///
/// Handlers are synchronous: they only build messages, the read loop does
/// the writing.
pub trait Trigger: Send + Sync {
    /// Name used in logs and fire counters.
    fn name(&self) -> &'static str;

    /// Whether this trigger applies to `chat`.
    fn matches(&self, ctx: &TriggerContext<'_>, chat: &ChatLine) -> bool;

    /// Produce the response. Only called after `matches` returned true.
    fn fire(&self, ctx: &TriggerContext<'_>, chat: &ChatLine) -> TriggerOutcome;
}

/// Trigger built from a pair of closures.
///
/// ```
/// use slircbot::dispatch::{FnTrigger, TriggerOutcome};
/// use slircbot_proto::OutboundMessage;
///
/// let ping = FnTrigger::new(
///     "ping",
///     |_, chat| chat.text == "!ping",
///     |ctx, _| TriggerOutcome::reply(OutboundMessage::privmsg(ctx.default_target, "pong")),
/// );
/// # let _ = ping;
/// ```
pub struct FnTrigger<P, H> {
    name: &'static str,
    predicate: P,
    handler: H,
}

impl<P, H> FnTrigger<P, H>
where
    P: Fn(&TriggerContext<'_>, &ChatLine) -> bool + Send + Sync,
    H: Fn(&TriggerContext<'_>, &ChatLine) -> TriggerOutcome + Send + Sync,
{
    pub fn new(name: &'static str, predicate: P, handler: H) -> Self {
        Self {
            name,
            predicate,
            handler,
        }
    }
}

impl<P, H> Trigger for FnTrigger<P, H>
where
    P: Fn(&TriggerContext<'_>, &ChatLine) -> bool + Send + Sync,
    H: Fn(&TriggerContext<'_>, &ChatLine) -> TriggerOutcome + Send + Sync,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn matches(&self, ctx: &TriggerContext<'_>, chat: &ChatLine) -> bool {
        (self.predicate)(ctx, chat)
    }

    fn fire(&self, ctx: &TriggerContext<'_>, chat: &ChatLine) -> TriggerOutcome {
        (self.handler)(ctx, chat)
    }
}
