use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use engine::GameController;
use futures::{stream::SplitSink, SinkExt, StreamExt};
use shared::{
    error::ApiError,
    protocol::{ClientRequest, ServerEvent},
};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod app_state;
mod config;

use app_state::AppState;
use config::load_settings;

type WsSender = SplitSink<WebSocket, Message>;

/// Replies a session may have waiting before it is treated as stuck.
const REPLY_BUFFER: usize = 32;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let mut controller = GameController::new();
    if let Some(limit) = settings.history_limit {
        controller = controller.with_history_limit(limit);
    }
    let state = Arc::new(AppState::new(controller, settings.event_buffer));
    let app = build_router(state);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/state", get(current_state))
        .route("/ws", get(ws_handler))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn current_state(State(state): State<Arc<AppState>>) -> Json<ServerEvent> {
    Json(state.current().await)
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| ws_connection(state, socket))
}

async fn ws_connection(state: Arc<AppState>, socket: WebSocket) {
    let session_id = Uuid::new_v4();
    info!(%session_id, "session connected");

    let (mut sender, mut receiver) = socket.split();
    let (init, events_rx) = state.join().await;
    if send_event(&mut sender, &init).await.is_err() {
        info!(%session_id, "session closed before init");
        return;
    }

    let (reply_tx, reply_rx) = mpsc::channel(REPLY_BUFFER);
    let feed = SessionFeed {
        state: Arc::clone(&state),
        session_id,
        replies: reply_rx,
        broadcasts: BroadcastStream::new(events_rx),
    };
    let send_task = tokio::spawn(forward_events(feed, sender));

    while let Some(Ok(message)) = receiver.next().await {
        let text = match message {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };
        let reply = match serde_json::from_str::<ClientRequest>(&text) {
            Ok(request) => state.dispatch(request).await,
            Err(error) => {
                debug!(%session_id, %error, "undecodable client message");
                Some(ServerEvent::Error(ApiError::bad_request()))
            }
        };
        if let Some(reply) = reply {
            if !queue_reply(session_id, &reply_tx, reply) {
                break;
            }
        }
    }

    send_task.abort();
    info!(%session_id, "session disconnected");
}

/// Hands a reply to the session's writer. False means the session should
/// close: its writer is gone, or it has stopped reading and its reply queue
/// is full.
fn queue_reply(session_id: Uuid, replies: &mpsc::Sender<ServerEvent>, reply: ServerEvent) -> bool {
    match replies.try_send(reply) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            warn!(%session_id, "reply queue full; closing session");
            false
        }
        Err(TrySendError::Closed(_)) => false,
    }
}

/// Everything one session should be sent: its own replies and the shared
/// broadcasts.
struct SessionFeed {
    state: Arc<AppState>,
    session_id: Uuid,
    replies: mpsc::Receiver<ServerEvent>,
    broadcasts: BroadcastStream<ServerEvent>,
}

impl SessionFeed {
    /// The next event for the session, or `None` once both sources are done.
    ///
    /// A session that falls behind the broadcast buffer gets the current
    /// state and a new subscription instead of the stale backlog.
    async fn next(&mut self) -> Option<ServerEvent> {
        let item = tokio::select! {
            Some(reply) = self.replies.recv() => return Some(reply),
            Some(item) = self.broadcasts.next() => item,
            else => return None,
        };
        match item {
            Ok(event) => Some(event),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                warn!(session_id = %self.session_id, skipped, "session lagged behind broadcasts; resyncing");
                let (snapshot, events) = self.state.resync().await;
                self.broadcasts = BroadcastStream::new(events);
                Some(snapshot)
            }
        }
    }
}

/// Writes the session's events until its socket fails.
async fn forward_events(mut feed: SessionFeed, mut sender: WsSender) {
    while let Some(event) = feed.next().await {
        if send_event(&mut sender, &event).await.is_err() {
            break;
        }
    }
}

async fn send_event(sender: &mut WsSender, event: &ServerEvent) -> Result<(), axum::Error> {
    let text = match serde_json::to_string(event) {
        Ok(text) => text,
        Err(error) => {
            error!(%error, "failed to encode server event");
            return Ok(());
        }
    };
    sender.send(Message::Text(text)).await
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
