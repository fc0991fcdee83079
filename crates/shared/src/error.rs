use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotYourTurn,
    InvalidMove,
    BadRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_your_turn() -> Self {
        Self::new(ErrorCode::NotYourTurn, "It's not your turn!")
    }

    pub fn invalid_move() -> Self {
        Self::new(ErrorCode::InvalidMove, "Invalid move")
    }

    pub fn bad_request() -> Self {
        Self::new(ErrorCode::BadRequest, "Unrecognized message")
    }
}

/// Failure to read a move command, piece id, direction or cell from its
/// wire form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("move command `{0}` has no `:` separator")]
    MissingSeparator(String),
    #[error("piece id `{0}` has no owner prefix")]
    MissingOwner(String),
    #[error("unknown owner `{0}`")]
    UnknownOwner(String),
    #[error("unknown piece `{0}`")]
    UnknownPiece(String),
    #[error("unknown direction `{0}`")]
    UnknownDirection(String),
}

/// A grid received over the wire that cannot be a board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("piece {0} appears more than once")]
    DuplicatePiece(String),
}
