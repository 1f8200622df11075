//! Trigger registry and dispatch.
//!
//! The `Dispatcher` owns the ordered trigger list and per-trigger fire
//! counters.

use super::triggers::{AdminExitTrigger, GreetingTrigger, RelayTrigger};
use super::{Trigger, TriggerContext};
use crate::config::Config;
use crate::telemetry::{TriggerTimer, spans};
use slircbot_proto::{InboundEvent, MAX_NICK_LEN, NickExt, OutboundMessage};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Combined result of running every matching trigger for one event.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Dispatch {
    pub messages: Vec<OutboundMessage>,
    /// A terminal trigger fired; the session must close.
    pub terminate: bool,
}

struct Entry {
    trigger: Box<dyn Trigger>,
    fired: AtomicU64,
}

/// Ordered set of triggers.
#[derive(Default)]
pub struct Dispatcher {
    entries: Vec<Entry>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in triggers enabled by `config`, in the order greeting, relay,
    /// admin exit.
    pub fn from_config(config: &Config) -> Self {
        let mut dispatcher = Self::new();

        if config.triggers.greeting {
            dispatcher.register(GreetingTrigger::new(&config.triggers.greeting_token));
        }
        if config.triggers.relay {
            dispatcher.register(RelayTrigger::new(&config.triggers.relay_command));
        }
        // Always on: it is the only way to shut the bot down from chat
        dispatcher.register(AdminExitTrigger::new(
            &config.admin.nick,
            config.admin.exit_phrase(&config.bot.nick),
            &config.admin.farewell,
        ));

        dispatcher
    }

    /// Append a trigger. Evaluation follows registration order.
    pub fn register<T: Trigger + 'static>(&mut self, trigger: T) -> &mut Self {
        self.entries.push(Entry {
            trigger: Box::new(trigger),
            fired: AtomicU64::new(0),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Trigger names in evaluation order.
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.trigger.name()).collect()
    }

    /// Fire counts for triggers that fired at least once, busiest first.
    pub fn stats(&self) -> Vec<(&'static str, u64)> {
        let mut stats: Vec<_> = self
            .entries
            .iter()
            .map(|e| (e.trigger.name(), e.fired.load(Ordering::Relaxed)))
            .filter(|(_, count)| *count > 0)
            .collect();

        stats.sort_by(|a, b| b.1.cmp(&a.1));
        stats
    }

    /// Run every matching trigger against `event`.
    ///
    /// Only chat messages from a nick of at most 16 characters are
    /// eligible; everything else yields an empty [`Dispatch`].
    pub fn dispatch(&self, ctx: &TriggerContext<'_>, event: &InboundEvent) -> Dispatch {
        let mut result = Dispatch::default();

        let InboundEvent::ChatMessage(chat) = event else {
            return result;
        };
        if chat.origin_nick.nick_len() > MAX_NICK_LEN {
            debug!(origin = %chat.origin_nick, "origin nick too long, ignoring");
            return result;
        }

        for entry in &self.entries {
            let name = entry.trigger.name();
            if !entry.trigger.matches(ctx, chat) {
                continue;
            }

            let _span = spans::trigger(name, &chat.origin_nick).entered();
            let _timer = TriggerTimer::new(name);
            entry.fired.fetch_add(1, Ordering::Relaxed);

            let outcome = entry.trigger.fire(ctx, chat);
            debug!(
                messages = outcome.messages.len(),
                terminal = outcome.terminal,
                "trigger fired"
            );
            result.messages.extend(outcome.messages);

            if outcome.terminal {
                result.terminate = true;
                break;
            }
        }

        result
    }
}
