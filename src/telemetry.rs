//! Tracing helpers shared by the read loop and the dispatcher.

use std::time::Instant;
use tracing::trace;

/// Guard that logs how long a trigger took when dropped.
pub struct TriggerTimer {
    name: &'static str,
    start: Instant,
}

impl TriggerTimer {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
        }
    }
}

impl Drop for TriggerTimer {
    fn drop(&mut self) {
        let elapsed_us = self.start.elapsed().as_micros() as u64;
        trace!(trigger = self.name, elapsed_us, "trigger finished");
    }
}

/// Standardized span constructors for bot observability.
pub mod spans {
    use tracing::{Span, debug_span, info_span};

    /// Span for one server session; wraps the whole read loop.
    pub fn session(server: &str, nick: &str) -> Span {
        info_span!("session", server = %server, nick = %nick)
    }

    /// Span for a single trigger invocation.
    pub fn trigger(name: &str, origin: &str) -> Span {
        debug_span!("trigger", name = %name, origin = %origin)
    }
}
