use serde::{Deserialize, Serialize};

use crate::{
    domain::{Board, GameState, Owner},
    error::ApiError,
};

/// Messages a connected client may send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientRequest {
    /// `command` is the wire form `"{Owner}-{Kind}{Index}:{Direction}"`.
    #[serde(rename = "move")]
    Move {
        #[serde(rename = "move")]
        command: String,
    },
    #[serde(rename = "newGame")]
    NewGame,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Sent once to a session when it connects.
    #[serde(rename_all = "camelCase")]
    Init {
        grid: Board,
        current_player: Owner,
        move_history: Vec<String>,
    },
    /// Broadcast to every session after an accepted move or a reset.
    #[serde(rename_all = "camelCase")]
    Update {
        grid: Board,
        current_player: Owner,
        move_history: Vec<String>,
        winner: Option<Owner>,
    },
    Error(ApiError),
}

impl ServerEvent {
    pub fn init(state: &GameState) -> Self {
        ServerEvent::Init {
            grid: state.grid.clone(),
            current_player: state.current_player,
            move_history: state.move_history.clone(),
        }
    }

    pub fn update(state: &GameState) -> Self {
        ServerEvent::Update {
            grid: state.grid.clone(),
            current_player: state.current_player,
            move_history: state.move_history.clone(),
            winner: state.winner,
        }
    }

    /// Rebuilds the game state carried by an `init` or `update` event.
    /// `init` has no winner field, so it is read off the grid.
    pub fn into_state(self) -> Option<GameState> {
        match self {
            ServerEvent::Init {
                grid,
                current_player,
                move_history,
            } => {
                let winner = grid.winner();
                Some(GameState {
                    grid,
                    current_player,
                    move_history,
                    winner,
                })
            }
            ServerEvent::Update {
                grid,
                current_player,
                move_history,
                winner,
            } => Some(GameState {
                grid,
                current_player,
                move_history,
                winner,
            }),
            ServerEvent::Error(_) => None,
        }
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
