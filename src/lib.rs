//! slircbot - Straylight IRC Bot
//!
//! A single-channel IRC bot: registers, joins one channel, answers
//! heartbeats, greets people, relays `.tell` messages and leaves when its
//! admin says so.
//!
//! The wire protocol lives in `slircbot-proto`; this crate holds the
//! session state machine, the trigger dispatcher and the tokio read loop.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod network;
pub mod session;
pub mod telemetry;

pub use config::Config;
pub use dispatch::{Dispatcher, Trigger, TriggerContext, TriggerOutcome};
pub use error::{RunError, SessionError, StreamError};
pub use network::Connection;
pub use session::{Session, SessionAction, SessionPhase};
