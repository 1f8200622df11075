/// Connection phase. Exactly one per connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SessionPhase {
    /// Stream open, nothing sent yet.
    #[default]
    Connecting,
    /// `NICK`/`USER` sent, waiting for the welcome.
    Registering,
    /// `JOIN` sent, discarding everything until the roster ends.
    Joining,
    /// Chat is dispatched to triggers.
    Active,
    /// Terminal; the read loop exits.
    Closing,
}

impl SessionPhase {
    /// Whether triggers may see chat in this phase.
    pub fn dispatches(self) -> bool {
        self == Self::Active
    }

    /// Whether heartbeats are answered in this phase.
    pub fn answers_heartbeat(self) -> bool {
        self != Self::Closing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_active_dispatches() {
        for phase in [
            SessionPhase::Connecting,
            SessionPhase::Registering,
            SessionPhase::Joining,
            SessionPhase::Closing,
        ] {
            assert!(!phase.dispatches());
        }
        assert!(SessionPhase::Active.dispatches());
    }

    #[test]
    fn closing_ignores_heartbeat() {
        assert!(!SessionPhase::Closing.answers_heartbeat());
        assert!(SessionPhase::default().answers_heartbeat());
    }
}
