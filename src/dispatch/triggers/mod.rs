//! Built-in triggers.

mod admin;
mod greeting;
mod relay;

pub use admin::AdminExitTrigger;
pub use greeting::GreetingTrigger;
pub use relay::{FORMAT_ERROR, RelayTrigger};
