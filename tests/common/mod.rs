//! Integration test common infrastructure.
//!
//! Provides a scripted fake IRC server the bot can connect to over real TCP,
//! and a helper to build a bot config pointing at it.

pub mod server;

#[allow(unused_imports)]
pub use server::FakeServer;

use slircbot::Config;

/// Config for a bot that connects to `port` on localhost.
#[allow(dead_code)]
pub fn bot_config(port: u16, extra: &str) -> Config {
    let text = format!(
        r###"
        [server]
        host = "127.0.0.1"
        port = {port}
        read_timeout_secs = 5

        [bot]
        nick = "BotNick"
        channel = "##bot-testing"

        [admin]
        nick = "OrderChaos"

        {extra}
        "###
    );
    Config::from_toml_str(&text).expect("test config is valid")
}
