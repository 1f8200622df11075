//! slircbot - Straylight IRC Bot

use slircbot::config::{Config, LogConfig};
use slircbot::network::{self, Connection};
use slircbot::session::Session;
use slircbot_proto::EventParser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing(log: &LogConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            init_tracing(&LogConfig::default());
            error!(path = %config_path, error = %e, "Failed to load config");
            return Err(e.into());
        }
    };

    init_tracing(&config.log);

    info!(
        server = %config.server.address(),
        nick = %config.bot.nick,
        channel = %config.bot.channel,
        "Starting slircbot"
    );

    let mut conn = Connection::connect(&config.server, &config.protocol).await?;
    let mut session = Session::from_config(&config);
    let parser = EventParser::new(config.protocol.join_marker.as_str());

    network::run(&mut conn, &mut session, &parser, &config.bot.channel).await?;

    info!("Shutdown complete");
    Ok(())
}
