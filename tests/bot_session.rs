//! Integration tests: the bot against a scripted server over TCP.

mod common;

use common::{FakeServer, bot_config};
use slircbot::network::{self, Connection};
use slircbot::{RunError, Session, SessionPhase, StreamError};
use slircbot_proto::EventParser;
use tokio::task::JoinHandle;

async fn spawn_bot(
    server: &FakeServer,
    extra: &str,
) -> JoinHandle<(Result<(), RunError>, SessionPhase)> {
    let config = bot_config(server.port(), extra);
    tokio::spawn(async move {
        let mut conn = Connection::connect(&config.server, &config.protocol)
            .await
            .expect("connect to fake server");
        let mut session = Session::from_config(&config);
        let parser = EventParser::new(config.protocol.join_marker.as_str());
        let result = network::run(&mut conn, &mut session, &parser, &config.bot.channel).await;
        (result, session.phase())
    })
}

#[tokio::test]
async fn test_greet_relay_and_admin_exit() {
    let server = FakeServer::bind().await.expect("bind");
    let bot = spawn_bot(&server, "").await;
    let mut irc = server.accept().await.expect("bot connects");

    irc.welcome_and_join().await.unwrap();

    // Chat during the roster dump must not reach triggers
    irc.say(":alice!a@example.org PRIVMSG ##bot-testing :Hi BotNick")
        .await
        .unwrap();
    irc.end_of_names().await.unwrap();

    irc.say("PING :abc123").await.unwrap();
    irc.expect("PONG :pingis").await.unwrap();

    irc.say(":alice!a@example.org PRIVMSG ##bot-testing :Hi BotNick")
        .await
        .unwrap();
    irc.expect("PRIVMSG ##bot-testing :Hello alice!").await.unwrap();

    irc.say(":bob!b@example.org PRIVMSG ##bot-testing :.tell alice did you see this")
        .await
        .unwrap();
    irc.expect("PRIVMSG alice :did you see this").await.unwrap();

    irc.say(":orderchaos!oc@example.org PRIVMSG ##bot-testing :bye BotNick ")
        .await
        .unwrap();
    irc.expect("PRIVMSG ##bot-testing :oh...okay. :'(").await.unwrap();
    irc.expect("QUIT ").await.unwrap();

    let (result, phase) = bot.await.unwrap();
    assert!(result.is_ok(), "run failed: {:?}", result);
    assert_eq!(phase, SessionPhase::Closing);

    // Connection released after QUIT
    assert!(!matches!(irc.recv_raw().await, Ok(Some(_))));
}

#[tokio::test]
async fn test_wire_lines_end_in_crlf() {
    let server = FakeServer::bind().await.expect("bind");
    let _bot = spawn_bot(&server, "").await;
    let mut irc = server.accept().await.expect("bot connects");

    assert_eq!(irc.recv_raw().await.unwrap().as_deref(), Some("NICK BotNick\r\n"));
}

#[tokio::test]
async fn test_configured_pong_quit_and_marker() {
    let server = FakeServer::bind().await.expect("bind");
    let extra = r#"
        [protocol]
        pong_reply = "still alive"
        join_marker = "roster over"

        [triggers]
        quit_message = "see you"
    "#;
    let bot = spawn_bot(&server, extra).await;
    let mut irc = server.accept().await.expect("bot connects");

    irc.welcome_and_join().await.unwrap();
    irc.say(":odd.server 999 BotNick :roster over").await.unwrap();

    irc.say("PING :x").await.unwrap();
    irc.expect("PONG :still alive").await.unwrap();

    irc.say(":OrderChaos!oc@example.org PRIVMSG ##bot-testing :bye BotNick")
        .await
        .unwrap();
    irc.expect("PRIVMSG ##bot-testing :oh...okay. :'(").await.unwrap();
    irc.expect("QUIT :see you").await.unwrap();

    let (result, _) = bot.await.unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_invalid_bytes_are_dropped() {
    let server = FakeServer::bind().await.expect("bind");
    let bot = spawn_bot(&server, "").await;
    let mut irc = server.accept().await.expect("bot connects");

    irc.welcome_and_join().await.unwrap();
    irc.end_of_names().await.unwrap();

    irc.say_raw(b":alice!a@example.org PRIVMSG ##bot-testing :Hi BotNick \xff\r\n")
        .await
        .unwrap();
    irc.say("PING :next").await.unwrap();
    irc.expect("PONG :pingis").await.unwrap();

    irc.say("ERROR :Closing Link").await.unwrap();
    let (result, phase) = bot.await.unwrap();
    assert!(result.is_ok());
    assert_eq!(phase, SessionPhase::Closing);
}

#[tokio::test]
async fn test_server_hangup_is_stream_error() {
    let server = FakeServer::bind().await.expect("bind");
    let bot = spawn_bot(&server, "").await;
    let mut irc = server.accept().await.expect("bot connects");

    irc.welcome_and_join().await.unwrap();
    drop(irc);

    let (result, phase) = bot.await.unwrap();
    assert!(matches!(result, Err(RunError::Stream(StreamError::Closed))));
    assert_eq!(phase, SessionPhase::Joining);
}
