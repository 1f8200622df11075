//! Connection - exclusive owner of the server stream.
//!
//! ```text
//!   bytes ──▶ Framed<S, LineCodec> ──▶ Frame::Line / Frame::Dropped
//!   OutboundMessage ──▶ LineCodec (CRLF) ──▶ bytes
//! ```
//!
//! The framed read buffer is the line buffer: every complete line is drained
//! by the codec before more bytes are read, and a partial line waits for the
//! next chunk.

use crate::config::{ProtocolConfig, ServerConfig};
use crate::error::StreamError;
use futures_util::{SinkExt, StreamExt};
use slircbot_proto::{DecodePolicy, Frame, LineCodec, OutboundMessage, ProtocolError};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use tracing::{debug, info, trace, warn};

/// A framed connection to the server.
pub struct Connection<S> {
    framed: Framed<S, LineCodec>,
    peer: String,
    read_timeout: Option<Duration>,
}

impl Connection<TcpStream> {
    /// Open a TCP connection to the configured server.
    pub async fn connect(
        server: &ServerConfig,
        protocol: &ProtocolConfig,
    ) -> Result<Self, StreamError> {
        let addr = server.address();
        let stream = TcpStream::connect(&addr).await?;
        info!(server = %addr, "connected");

        if let Err(e) = Self::enable_keepalive(&stream) {
            warn!("failed to enable TCP keepalive: {}", e);
        }

        Ok(Self::with_config(stream, addr, server, protocol)?)
    }

    fn enable_keepalive(stream: &TcpStream) -> std::io::Result<()> {
        use socket2::{SockRef, TcpKeepalive};

        let sock = SockRef::from(stream);
        let keepalive = TcpKeepalive::new()
            .with_time(Duration::from_secs(120))
            .with_interval(Duration::from_secs(30));

        sock.set_tcp_keepalive(&keepalive)
    }
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wrap an already-open stream.
    pub fn new(
        stream: S,
        peer: impl Into<String>,
        codec: LineCodec,
        read_chunk: usize,
        read_timeout: Option<Duration>,
    ) -> Self {
        Self {
            framed: Framed::with_capacity(stream, codec, read_chunk),
            peer: peer.into(),
            read_timeout,
        }
    }

    /// Wrap a stream using the codec settings from config.
    pub fn with_config(
        stream: S,
        peer: impl Into<String>,
        server: &ServerConfig,
        protocol: &ProtocolConfig,
    ) -> Result<Self, ProtocolError> {
        let codec = LineCodec::with_max_len(&protocol.encoding, server.max_line_len)?
            .with_policy(DecodePolicy::from(protocol.on_decode_error));
        debug!(encoding = codec.encoding_name(), "line codec ready");

        Ok(Self::new(
            stream,
            peer,
            codec,
            server.read_chunk,
            server.read_timeout(),
        ))
    }

    /// Label of the remote end, for logs.
    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Wait for the next frame.
    ///
    /// Fails with [`StreamError::Closed`] once the peer has closed the stream,
    /// and with [`StreamError::Timeout`] when a read timeout is set and
    /// nothing arrives in time.
    pub async fn next_frame(&mut self) -> Result<Frame, StreamError> {
        let next = match self.read_timeout {
            Some(limit) => tokio::time::timeout(limit, self.framed.next())
                .await
                .map_err(|_| StreamError::Timeout(limit))?,
            None => self.framed.next().await,
        };

        match next {
            Some(frame) => Ok(frame?),
            None => Err(StreamError::Closed),
        }
    }

    /// Serialize and write one message, flushing it to the stream.
    pub async fn send(&mut self, msg: &OutboundMessage) -> Result<(), StreamError> {
        trace!(line = %msg, ">>");
        self.framed.send(msg).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn pair(read_timeout: Option<Duration>) -> (Connection<tokio::io::DuplexStream>, tokio::io::DuplexStream) {
        let (client, server) = tokio::io::duplex(4096);
        let codec = LineCodec::new("utf-8").unwrap();
        (Connection::new(client, "duplex", codec, 2048, read_timeout), server)
    }

    fn line(frame: Frame) -> String {
        match frame {
            Frame::Line(line) => line,
            Frame::Dropped(e) => panic!("unexpected dropped frame: {e}"),
        }
    }

    #[tokio::test]
    async fn reads_lines_split_across_writes() {
        let (mut conn, mut server) = pair(None);

        server.write_all(b"PING :ab").await.unwrap();
        server.write_all(b"c123\r\n:n!u@h PRIVMSG #c :hi\n").await.unwrap();

        assert_eq!(line(conn.next_frame().await.unwrap()), "PING :abc123");
        assert_eq!(line(conn.next_frame().await.unwrap()), ":n!u@h PRIVMSG #c :hi");
    }

    #[tokio::test]
    async fn send_writes_crlf() {
        let (mut conn, mut server) = pair(None);
        conn.send(&OutboundMessage::pong("pingis")).await.unwrap();

        let mut buf = [0u8; 14];
        server.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"PONG :pingis\r\n");
    }

    #[tokio::test]
    async fn peer_close_is_closed_error() {
        let (mut conn, server) = pair(None);
        drop(server);
        assert!(matches!(conn.next_frame().await, Err(StreamError::Closed)));
    }

    #[tokio::test]
    async fn silent_peer_times_out() {
        let (mut conn, _server) = pair(Some(Duration::from_millis(20)));
        assert!(matches!(conn.next_frame().await, Err(StreamError::Timeout(_))));
    }

    #[tokio::test]
    async fn undecodable_line_is_a_frame_not_an_error() {
        let (mut conn, mut server) = pair(None);
        server.write_all(b"PRIVMSG #c :\xff\xfe\r\nPING :x\r\n").await.unwrap();

        assert!(matches!(conn.next_frame().await, Ok(Frame::Dropped(_))));
        assert_eq!(line(conn.next_frame().await.unwrap()), "PING :x");
    }
}
