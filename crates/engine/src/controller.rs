use shared::{
    domain::{initial_layout, GameState},
    error::ApiError,
    protocol::{ClientRequest, ServerEvent},
};
use tracing::{debug, info};

use crate::resolver::{resolve_raw, Outcome};

/// Who should receive the event produced by a controller operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Every connected session.
    Broadcast(ServerEvent),
    /// Only the session that sent the request.
    Reply(ServerEvent),
}

/// Owner of the one live [`GameState`].
///
/// Methods take `&mut self`; callers sharing a controller across sessions
/// must hold a lock around each call.
#[derive(Debug, Clone, Default)]
pub struct GameController {
    state: GameState,
    history_limit: Option<usize>,
}

impl GameController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: GameState) -> Self {
        Self {
            state,
            history_limit: None,
        }
    }

    /// Keep at most `limit` history entries, dropping the oldest first.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot_for_new_connection(&self) -> GameState {
        self.state.clone()
    }

    pub fn handle_request(&mut self, request: ClientRequest) -> Directive {
        match request {
            ClientRequest::Move { command } => self.handle_move(&command),
            ClientRequest::NewGame => self.handle_reset(),
        }
    }

    pub fn handle_move(&mut self, raw: &str) -> Directive {
        match resolve_raw(&self.state, raw) {
            Outcome::Applied(mut next) => {
                if let Some(limit) = self.history_limit {
                    let excess = next.move_history.len().saturating_sub(limit);
                    next.move_history.drain(..excess);
                }
                self.state = next;
                info!(
                    command = raw,
                    next_player = %self.state.current_player,
                    "move applied"
                );
                if let Some(winner) = self.state.winner {
                    info!(%winner, "game won");
                }
                Directive::Broadcast(ServerEvent::update(&self.state))
            }
            Outcome::WrongTurn => {
                debug!(
                    command = raw,
                    current_player = %self.state.current_player,
                    "move out of turn"
                );
                Directive::Reply(ServerEvent::Error(ApiError::not_your_turn()))
            }
            Outcome::Invalid(reason) => {
                debug!(command = raw, %reason, "move rejected");
                Directive::Reply(ServerEvent::Error(ApiError::invalid_move()))
            }
        }
    }

    pub fn handle_reset(&mut self) -> Directive {
        self.state = initial_layout();
        info!("new game started");
        Directive::Broadcast(ServerEvent::update(&self.state))
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
