//! Fake IRC server.
//!
//! Accepts exactly one connection and lets the test script both sides of
//! the conversation line by line.

use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::TcpListener;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

/// A listener waiting for the bot.
pub struct FakeServer {
    listener: TcpListener,
}

/// The accepted bot connection, seen from the server side.
pub struct ServerSide {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
}

impl FakeServer {
    /// Bind on an ephemeral localhost port.
    pub async fn bind() -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        Ok(Self { listener })
    }

    pub fn port(&self) -> u16 {
        self.listener
            .local_addr()
            .map(|addr| addr.port())
            .unwrap_or_default()
    }

    /// Wait for the bot to connect.
    pub async fn accept(&self) -> anyhow::Result<ServerSide> {
        let (stream, _) = timeout(Duration::from_secs(5), self.listener.accept()).await??;
        let (read_half, write_half) = stream.into_split();
        Ok(ServerSide {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
        })
    }
}

impl ServerSide {
    /// Send one line to the bot, CRLF appended.
    pub async fn say(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\r\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Send raw bytes, terminator included by the caller.
    pub async fn say_raw(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        self.writer.write_all(bytes).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Next line from the bot with its terminator, or `None` on close.
    pub async fn recv_raw(&mut self) -> anyhow::Result<Option<String>> {
        let mut line = String::new();
        let n = timeout(Duration::from_secs(5), self.reader.read_line(&mut line)).await??;
        Ok((n > 0).then_some(line))
    }

    /// Next line from the bot, terminator stripped.
    pub async fn recv(&mut self) -> anyhow::Result<String> {
        match self.recv_raw().await? {
            Some(line) => Ok(line.trim_end_matches(['\r', '\n']).to_string()),
            None => anyhow::bail!("bot closed the connection"),
        }
    }

    /// Assert the next line from the bot.
    pub async fn expect(&mut self, want: &str) -> anyhow::Result<()> {
        let got = self.recv().await?;
        anyhow::ensure!(got == want, "expected {:?}, got {:?}", want, got);
        Ok(())
    }

    /// Play the server side of registration and join.
    pub async fn welcome_and_join(&mut self) -> anyhow::Result<()> {
        self.expect("NICK BotNick").await?;
        self.expect("USER BotNick 0 * :BotNick").await?;
        self.say(":irc.example.net 001 BotNick :Welcome to the test network BotNick")
            .await?;
        self.expect("JOIN ##bot-testing").await?;
        self.say(":BotNick!BotNick@127.0.0.1 JOIN ##bot-testing").await?;
        self.say(":irc.example.net 353 BotNick = ##bot-testing :BotNick OrderChaos alice")
            .await?;
        Ok(())
    }

    pub async fn end_of_names(&mut self) -> anyhow::Result<()> {
        self.say(":irc.example.net 366 BotNick ##bot-testing :End of /NAMES list.")
            .await
    }
}
