//! Network module.
//!
//! Contains the [`Connection`] (framed stream to the server) and the read
//! loop that drives a [`Session`](crate::session::Session) over it.

mod connection;
mod event_loop;

pub use connection::Connection;
pub use event_loop::run;
