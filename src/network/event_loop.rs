//! The read loop.
//!
//! One task owns the connection and the session. The only suspension point
//! is the read; triggers run inline and their messages are written before
//! the next read, so phase changes and handler output stay ordered.

use super::Connection;
use crate::error::RunError;
use crate::session::{Session, SessionAction};
use crate::telemetry::spans;
use slircbot_proto::{EventParser, Frame, InboundEvent};
use std::collections::VecDeque;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{Instrument, debug, info, trace, warn};

/// Drive `session` over `conn` until the session reaches Closing.
///
/// Registers, joins `channel` once the server welcomes us, then dispatches
/// chat. Returns `Ok` on a clean close (exit phrase, server `ERROR`) and the
/// stream error otherwise.
pub async fn run<S>(
    conn: &mut Connection<S>,
    session: &mut Session,
    parser: &EventParser,
    channel: &str,
) -> Result<(), RunError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let span = spans::session(conn.peer(), session.nick());
    async move {
        let actions = session.start()?;
        perform(conn, session, channel, actions).await?;

        while !session.is_closed() {
            let line = match conn.next_frame().await? {
                Frame::Line(line) => line,
                Frame::Dropped(err) => {
                    warn!(error = %err, "dropped inbound line");
                    continue;
                }
            };
            trace!(line = %line, "<<");

            let event = parser.try_parse(&line).unwrap_or_else(|err| {
                debug!(error = %err, "unstructured line");
                InboundEvent::Raw { line }
            });

            let actions = session.feed(&event);
            perform(conn, session, channel, actions).await?;
        }

        info!(fired = ?session.dispatcher().stats(), "session closed");
        Ok::<(), RunError>(())
    }
    .instrument(span)
    .await
}

/// Carry out session actions in order, joining when registration completes.
async fn perform<S>(
    conn: &mut Connection<S>,
    session: &mut Session,
    channel: &str,
    actions: Vec<SessionAction>,
) -> Result<(), RunError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut queue = VecDeque::from(actions);
    while let Some(action) = queue.pop_front() {
        match action {
            SessionAction::Send(msg) => conn.send(&msg).await?,
            SessionAction::Registered => {
                info!(channel = %channel, "joining");
                queue.extend(session.join(channel)?);
            }
        }
    }
    Ok(())
}
