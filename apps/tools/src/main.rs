use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use futures::{Sink, SinkExt, Stream, StreamExt};
use shared::protocol::{ClientRequest, ServerEvent};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use url::Url;

mod render;

#[derive(Parser, Debug)]
#[command(about = "Play or watch a game on a running board server")]
struct Cli {
    #[arg(long, default_value = "ws://127.0.0.1:8081/ws")]
    server_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the board, then every update until interrupted.
    Watch,
    /// Submit a move such as `A-P1:F` or `B-H2:FL` and print the server's answer.
    Move { command: String },
    /// Reset the board for every connected player.
    NewGame,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let url = parse_server_url(&cli.server_url)?;
    let (ws, _) = connect_async(url.as_str())
        .await
        .with_context(|| format!("failed to connect websocket: {url}"))?;
    let (mut writer, mut reader) = ws.split();

    let init = next_event(&mut reader).await?;
    match cli.command {
        Command::Watch => {
            println!("{}", render::event(&init));
            loop {
                let event = next_event(&mut reader).await?;
                println!("{}", render::event(&event));
            }
        }
        Command::Move { command } => {
            send(&mut writer, &ClientRequest::Move { command: command.clone() }).await?;
            let event = next_reply(&mut reader, |event| answers_move(event, &command)).await?;
            println!("{}", render::event(&event));
            if let ServerEvent::Error(error) = event {
                bail!("move refused: {}", error.message);
            }
        }
        Command::NewGame => {
            send(&mut writer, &ClientRequest::NewGame).await?;
            let event = next_reply(&mut reader, answers_reset).await?;
            println!("{}", render::event(&event));
        }
    }

    Ok(())
}

/// Accepts `ws://` and `wss://` URLs as given; `http(s)://` URLs are
/// switched to the matching websocket scheme and default to the `/ws` path.
fn parse_server_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw).with_context(|| format!("invalid server url: {raw}"))?;
    let ws_scheme = match url.scheme() {
        "ws" | "wss" => return Ok(url),
        "http" => "ws",
        "https" => "wss",
        other => bail!("server url scheme must be ws, wss, http or https, got {other}"),
    };
    url.set_scheme(ws_scheme)
        .map_err(|_| anyhow!("cannot use {ws_scheme} for {raw}"))?;
    if url.path() == "/" {
        url.set_path("/ws");
    }
    Ok(url)
}

/// Other sessions' updates can arrive between a request and its answer, so
/// events that don't match are skipped.
async fn next_reply<S, E>(reader: &mut S, matches: impl Fn(&ServerEvent) -> bool) -> Result<ServerEvent>
where
    S: Stream<Item = Result<Message, E>> + Unpin,
    E: std::error::Error + Send + Sync + 'static,
{
    loop {
        let event = next_event(reader).await?;
        if matches(&event) {
            return Ok(event);
        }
    }
}

/// Errors only ever go to the requester; an update answers `command` when
/// its newest history entry is that move.
fn answers_move(event: &ServerEvent, command: &str) -> bool {
    match event {
        ServerEvent::Error(_) => true,
        ServerEvent::Update { move_history, .. } => {
            let Some((piece, direction)) = command.split_once(':') else {
                return false;
            };
            move_history
                .last()
                .is_some_and(|entry| *entry == format!("{piece} moved {direction}"))
        }
        ServerEvent::Init { .. } => false,
    }
}

fn answers_reset(event: &ServerEvent) -> bool {
    match event {
        ServerEvent::Error(_) => true,
        ServerEvent::Update { move_history, .. } => move_history.is_empty(),
        ServerEvent::Init { .. } => false,
    }
}

async fn send<S>(writer: &mut S, request: &ClientRequest) -> Result<()>
where
    S: Sink<Message> + Unpin,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    let text = serde_json::to_string(request)?;
    writer
        .send(Message::Text(text))
        .await
        .context("failed to send request")
}

async fn next_event<S, E>(reader: &mut S) -> Result<ServerEvent>
where
    S: Stream<Item = Result<Message, E>> + Unpin,
    E: std::error::Error + Send + Sync + 'static,
{
    while let Some(message) = reader.next().await {
        match message.context("websocket read failed")? {
            Message::Text(text) => {
                return serde_json::from_str(&text)
                    .with_context(|| format!("unexpected server message: {text}"));
            }
            Message::Close(_) => break,
            _ => continue,
        }
    }
    Err(anyhow!("server closed the connection"))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
