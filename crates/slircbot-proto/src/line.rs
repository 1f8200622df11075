//! Line-based codec for tokio.
//!
//! Splits an inbound byte stream into protocol lines and writes outbound
//! lines with a CRLF terminator. Partial data stays in the read buffer until
//! the rest of the line arrives, so the sequence of lines produced does not
//! depend on how the stream was chunked.

use std::borrow::Cow;

use bytes::{Buf, BytesMut};
use encoding::Encoding;
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{self, ProtocolError};
use crate::outbound::OutboundMessage;

/// Default maximum line length, terminator excluded.
pub const MAX_LINE_LEN: usize = 8191;

/// What to do with a line whose bytes are not valid in the configured encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DecodePolicy {
    /// Report the line as [`Frame::Dropped`] and move on.
    #[default]
    Drop,
    /// Substitute U+FFFD for malformed sequences and deliver the line.
    Lossy,
}

/// One item produced by [`LineCodec`].
///
/// Recoverable problems are items rather than decoder errors: a decoder
/// error ends a `Framed` stream, and a bad line must not end the session.
#[derive(Debug)]
pub enum Frame {
    /// A complete line, terminator stripped.
    Line(String),
    /// A line that was discarded (bad encoding or over-long).
    Dropped(ProtocolError),
}

/// Line-based codec that handles CR, LF and CRLF terminated lines.
pub struct LineCodec {
    encoding: &'static Encoding,
    policy: DecodePolicy,
    /// Index of next byte to check for a terminator
    next_index: usize,
    /// Maximum line length
    max_len: usize,
    /// Skipping the tail of an over-long line
    discarding: bool,
}

impl LineCodec {
    /// Create a new codec with the specified encoding.
    ///
    /// # Arguments
    /// * `label` - Encoding label (e.g., "utf-8", "latin1")
    pub fn new(label: &str) -> error::Result<Self> {
        let encoding = Encoding::for_label(label.as_bytes())
            .ok_or_else(|| ProtocolError::UnknownEncoding(label.to_string()))?;
        Ok(Self {
            encoding,
            policy: DecodePolicy::default(),
            next_index: 0,
            max_len: MAX_LINE_LEN,
            discarding: false,
        })
    }

    /// Create a new codec with custom max line length.
    pub fn with_max_len(label: &str, max_len: usize) -> error::Result<Self> {
        let mut codec = Self::new(label)?;
        codec.max_len = max_len;
        Ok(codec)
    }

    /// Set the policy applied to undecodable lines.
    #[must_use]
    pub fn with_policy(mut self, policy: DecodePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Name of the active encoding.
    pub fn encoding_name(&self) -> &'static str {
        self.encoding.name()
    }

    fn decode_line(&self, raw: &[u8]) -> Frame {
        match self.policy {
            DecodePolicy::Drop => {
                match self
                    .encoding
                    .decode_without_bom_handling_and_without_replacement(raw)
                {
                    Some(text) => Frame::Line(text.into_owned()),
                    None => Frame::Dropped(ProtocolError::InvalidEncoding {
                        raw_line: raw.to_vec(),
                        encoding: self.encoding.name(),
                        command_hint: error::extract_command_hint(raw),
                    }),
                }
            }
            DecodePolicy::Lossy => {
                let (text, _had_errors) = self.encoding.decode_without_bom_handling(raw);
                Frame::Line(text.into_owned())
            }
        }
    }
}

#[inline]
fn is_terminator(b: u8) -> bool {
    b == b'\n' || b == b'\r'
}

impl Decoder for LineCodec {
    type Item = Frame;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<Frame>> {
        loop {
            let Some(offset) = src[self.next_index..].iter().position(|b| is_terminator(*b))
            else {
                if self.discarding {
                    src.advance(src.len());
                    self.next_index = 0;
                    return Ok(None);
                }

                if src.len() > self.max_len {
                    let actual = src.len();
                    src.advance(actual);
                    self.next_index = 0;
                    self.discarding = true;
                    return Ok(Some(Frame::Dropped(ProtocolError::MessageTooLong {
                        actual,
                        limit: self.max_len,
                    })));
                }

                // No complete line yet - remember where we stopped
                self.next_index = src.len();
                return Ok(None);
            };

            let end = self.next_index + offset;
            let line = src.split_to(end + 1);
            self.next_index = 0;

            if self.discarding {
                self.discarding = false;
                continue;
            }

            let body = &line[..end];
            // Second half of CRLF, or a blank line
            if body.is_empty() {
                continue;
            }

            if body.len() > self.max_len {
                return Ok(Some(Frame::Dropped(ProtocolError::MessageTooLong {
                    actual: body.len(),
                    limit: self.max_len,
                })));
            }

            return Ok(Some(self.decode_line(body)));
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> error::Result<Option<Frame>> {
        match self.decode(src)? {
            Some(frame) => Ok(Some(frame)),
            None => {
                // An unterminated tail at EOF is not a line
                src.clear();
                self.next_index = 0;
                self.discarding = false;
                Ok(None)
            }
        }
    }
}

impl Encoder<String> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> error::Result<()> {
        let (bytes, _enc, _had_errors) = self.encoding.encode(&line);
        match bytes {
            Cow::Borrowed(b) => dst.extend_from_slice(b),
            Cow::Owned(v) => dst.extend_from_slice(&v),
        }
        if !line.ends_with('\n') {
            dst.extend_from_slice(b"\r\n");
        }
        Ok(())
    }
}

impl Encoder<&OutboundMessage> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, msg: &OutboundMessage, dst: &mut BytesMut) -> error::Result<()> {
        Encoder::<String>::encode(self, msg.to_string(), dst)
    }
}
