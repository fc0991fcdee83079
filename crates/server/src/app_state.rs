use engine::{Directive, GameController};
use shared::protocol::{ClientRequest, ServerEvent};
use tokio::sync::{broadcast, Mutex};

pub(crate) struct AppState {
    game: Mutex<GameController>,
    events: broadcast::Sender<ServerEvent>,
}

impl AppState {
    pub(crate) fn new(controller: GameController, event_buffer: usize) -> Self {
        let (events, _) = broadcast::channel(event_buffer);
        Self {
            game: Mutex::new(controller),
            events,
        }
    }

    /// Applies `request` and publishes any broadcast before releasing the
    /// game lock, so sessions see updates in the order they were made.
    /// Returns the event meant for the requester alone, if any.
    pub(crate) async fn dispatch(&self, request: ClientRequest) -> Option<ServerEvent> {
        let mut game = self.game.lock().await;
        match game.handle_request(request) {
            Directive::Broadcast(event) => {
                let _ = self.events.send(event);
                None
            }
            Directive::Reply(event) => Some(event),
        }
    }

    /// The `init` event for a new session and its broadcast subscription,
    /// taken together so no update falls between them.
    pub(crate) async fn join(&self) -> (ServerEvent, broadcast::Receiver<ServerEvent>) {
        let game = self.game.lock().await;
        let events = self.events.subscribe();
        (
            ServerEvent::init(&game.snapshot_for_new_connection()),
            events,
        )
    }

    /// A fresh `update` and a new subscription for a session that fell
    /// behind the broadcast buffer. Taken under the game lock like `join`.
    pub(crate) async fn resync(&self) -> (ServerEvent, broadcast::Receiver<ServerEvent>) {
        let game = self.game.lock().await;
        let events = self.events.subscribe();
        (ServerEvent::update(game.state()), events)
    }

    pub(crate) async fn current(&self) -> ServerEvent {
        ServerEvent::update(self.game.lock().await.state())
    }
}
