//! Sans-IO session state machine.
//!
//! The session consumes parsed [`InboundEvent`]s and produces
//! [`SessionAction`]s; it never touches the socket. The runner in
//! [`crate::network`] does the I/O.
//!
//! ```text
//! Connecting --start--> Registering --join--> Joining --JoinComplete--> Active
//!                                                                          |
//!        (ServerError, terminal trigger, quit) ------------------------> Closing
//! ```
//!
//! Heartbeats are answered in every phase except Closing. Chat is handed to
//! the [`Dispatcher`] only while Active, so the roster dump that follows a
//! join can never fire a trigger.

mod phase;

pub use phase::SessionPhase;

use crate::config::Config;
use crate::dispatch::{Dispatcher, TriggerContext};
use crate::error::SessionError;
use slircbot_proto::{InboundEvent, OutboundMessage, irc_eq};
use tracing::{debug, info, trace, warn};

/// Things the runner must do after feeding the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionAction {
    /// Write this message to the server.
    Send(OutboundMessage),
    /// The server accepted registration; the runner should join now.
    Registered,
}

/// How heartbeats are answered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PongReply {
    /// Always answer with this text.
    Fixed(String),
    /// Answer with the server's token.
    Echo,
}

/// Identity and policy the session needs, detached from the file format.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub nick: String,
    pub username: String,
    pub realname: String,
    pub pong: PongReply,
    pub quit_message: Option<String>,
}

impl From<&Config> for SessionConfig {
    fn from(config: &Config) -> Self {
        let pong = if config.protocol.echo_ping_token {
            PongReply::Echo
        } else {
            PongReply::Fixed(config.protocol.pong_reply.clone())
        };
        Self {
            nick: config.bot.nick.clone(),
            username: config.bot.username().to_string(),
            realname: config.bot.realname().to_string(),
            pong,
            quit_message: config.triggers.quit_message.clone(),
        }
    }
}

/// State machine for one connection.
pub struct Session {
    config: SessionConfig,
    dispatcher: Dispatcher,
    phase: SessionPhase,
    channel: Option<String>,
}

impl Session {
    pub fn new(config: SessionConfig, dispatcher: Dispatcher) -> Self {
        Self {
            config,
            dispatcher,
            phase: SessionPhase::Connecting,
            channel: None,
        }
    }

    /// Session configured from a loaded [`Config`] with its built-in triggers.
    pub fn from_config(config: &Config) -> Self {
        Self::new(SessionConfig::from(config), Dispatcher::from_config(config))
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_closed(&self) -> bool {
        self.phase == SessionPhase::Closing
    }

    pub fn nick(&self) -> &str {
        &self.config.nick
    }

    /// Channel requested by [`Session::join`], if any.
    pub fn channel(&self) -> Option<&str> {
        self.channel.as_deref()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Begin registration. Connecting -> Registering.
    pub fn start(&mut self) -> Result<Vec<SessionAction>, SessionError> {
        self.expect_phase(SessionPhase::Connecting, "start")?;
        self.transition(SessionPhase::Registering);

        Ok(vec![
            SessionAction::Send(OutboundMessage::nick(&self.config.nick)),
            SessionAction::Send(OutboundMessage::user(
                &self.config.username,
                &self.config.realname,
            )),
        ])
    }

    /// Request the channel. Registering -> Joining.
    pub fn join(&mut self, channel: &str) -> Result<Vec<SessionAction>, SessionError> {
        self.expect_phase(SessionPhase::Registering, "join")?;
        self.channel = Some(channel.to_string());
        self.transition(SessionPhase::Joining);

        Ok(vec![SessionAction::Send(OutboundMessage::join(channel))])
    }

    /// Leave on our own initiative. Any phase but Closing -> Closing.
    pub fn quit(&mut self, reason: Option<String>) -> Result<Vec<SessionAction>, SessionError> {
        if self.is_closed() {
            return Err(SessionError::InvalidTransition {
                from: self.phase,
                action: "quit",
            });
        }
        self.transition(SessionPhase::Closing);
        let reason = reason.or_else(|| self.config.quit_message.clone());
        Ok(vec![SessionAction::Send(OutboundMessage::quit(reason))])
    }

    /// Feed one parsed event.
    pub fn feed(&mut self, event: &InboundEvent) -> Vec<SessionAction> {
        if !self.phase.answers_heartbeat() {
            trace!(kind = event.kind(), "session closing, ignoring event");
            return vec![];
        }

        match event {
            InboundEvent::Heartbeat { token } => {
                vec![SessionAction::Send(OutboundMessage::pong(self.pong_for(token)))]
            }
            InboundEvent::ServerError { reason } => {
                warn!(reason = %reason, "server closed the link");
                self.transition(SessionPhase::Closing);
                vec![]
            }
            _ if self.phase.dispatches() => self.on_active(event),
            _ => match self.phase {
                SessionPhase::Registering => self.on_registering(event),
                SessionPhase::Joining => self.on_joining(event),
                _ => vec![],
            },
        }
    }

    fn on_registering(&mut self, event: &InboundEvent) -> Vec<SessionAction> {
        match event {
            InboundEvent::Welcome { nick } => {
                info!(nick = %nick, "registered");
                if !nick.is_empty() && !irc_eq(nick, &self.config.nick) {
                    warn!(requested = %self.config.nick, granted = %nick, "server assigned a different nick");
                    self.config.nick = nick.clone();
                }
                vec![SessionAction::Registered]
            }
            _ => vec![],
        }
    }

    fn on_joining(&mut self, event: &InboundEvent) -> Vec<SessionAction> {
        match event {
            InboundEvent::JoinComplete { channel } if self.completes_join(channel.as_deref()) => {
                info!(channel = ?self.channel, "join complete");
                self.transition(SessionPhase::Active);
            }
            other => debug!(kind = other.kind(), "discarding line before join completed"),
        }
        vec![]
    }

    fn on_active(&mut self, event: &InboundEvent) -> Vec<SessionAction> {
        let Some(channel) = self.channel.as_deref() else {
            return vec![];
        };
        let ctx = TriggerContext {
            bot_nick: &self.config.nick,
            default_target: channel,
        };
        let dispatch = self.dispatcher.dispatch(&ctx, event);

        let mut actions: Vec<_> = dispatch
            .messages
            .into_iter()
            .map(SessionAction::Send)
            .collect();

        if dispatch.terminate {
            self.transition(SessionPhase::Closing);
            actions.push(SessionAction::Send(OutboundMessage::quit(
                self.config.quit_message.clone(),
            )));
        }
        actions
    }

    /// A roster end without a channel (marker text) always counts.
    fn completes_join(&self, completed: Option<&str>) -> bool {
        match (completed, self.channel.as_deref()) {
            (None, _) => true,
            (Some(done), Some(ours)) => irc_eq(done, ours),
            (Some(_), None) => false,
        }
    }

    fn pong_for(&self, token: &str) -> String {
        match &self.config.pong {
            PongReply::Fixed(reply) => reply.clone(),
            PongReply::Echo => token.to_string(),
        }
    }

    fn expect_phase(&self, want: SessionPhase, action: &'static str) -> Result<(), SessionError> {
        if self.phase == want {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                from: self.phase,
                action,
            })
        }
    }

    fn transition(&mut self, to: SessionPhase) {
        debug!(from = ?self.phase, to = ?to, "session phase change");
        self.phase = to;
    }
}
