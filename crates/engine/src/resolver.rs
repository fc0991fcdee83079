use std::{fmt, str::FromStr};

use shared::{
    domain::{Direction, GameState, Owner, PieceId, PieceKind},
    error::ParseError,
};
use thiserror::Error;

/// A parsed `"{Owner}-{Kind}{Index}:{Direction}"` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveCommand {
    pub piece: PieceId,
    pub direction: Direction,
}

impl MoveCommand {
    pub fn new(piece: PieceId, direction: Direction) -> Self {
        Self { piece, direction }
    }
}

impl fmt::Display for MoveCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.piece, self.direction)
    }
}

impl FromStr for MoveCommand {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (piece, direction) = s
            .split_once(':')
            .ok_or_else(|| ParseError::MissingSeparator(s.to_string()))?;
        Ok(Self {
            piece: piece.parse()?,
            direction: direction.parse()?,
        })
    }
}

/// Why a move was refused. All of these reach clients as the same
/// invalid-move error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("move command is malformed")]
    Malformed,
    #[error("piece is not on the board")]
    PieceNotFound,
    #[error("piece cannot move in that direction")]
    UnsupportedDirection,
    #[error("destination is off the board")]
    OutOfBounds,
    #[error("destination holds a friendly piece")]
    FriendlyOccupied,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    WrongTurn,
    Invalid(Rejection),
    Applied(GameState),
}

/// Row and column displacement of `kind` moving in `direction` for `owner`.
///
/// Row deltas follow the owner's facing, so "forward" is +row for A and
/// -row for B; diagonal jumps flip with it.
pub fn displacement(kind: PieceKind, direction: Direction, owner: Owner) -> Option<(isize, isize)> {
    let (forward, sideways) = match (kind, direction) {
        (PieceKind::Pawn | PieceKind::Hero1, Direction::Left) => (0, -1),
        (PieceKind::Pawn | PieceKind::Hero1, Direction::Right) => (0, 1),
        (PieceKind::Pawn | PieceKind::Hero1, Direction::Forward) => (1, 0),
        (PieceKind::Pawn | PieceKind::Hero1, Direction::Backward) => (-1, 0),
        (PieceKind::Hero2, Direction::ForwardLeft) => (1, -1),
        (PieceKind::Hero2, Direction::ForwardRight) => (1, 1),
        (PieceKind::Hero2, Direction::BackwardLeft) => (-1, -1),
        (PieceKind::Hero2, Direction::BackwardRight) => (-1, 1),
        _ => return None,
    };
    let reach = match kind {
        PieceKind::Pawn => 1,
        PieceKind::Hero1 | PieceKind::Hero2 => 2,
    };
    Some((forward * reach * owner.forward(), sideways * reach))
}

/// Decides `command` against `state` without touching it.
///
/// The turn is checked before anything on the board is looked at. A capture
/// simply overwrites the opponent's piece.
pub fn resolve(state: &GameState, command: &MoveCommand) -> Outcome {
    let piece = command.piece;
    let owner = piece.owner();
    if owner != state.current_player {
        return Outcome::WrongTurn;
    }

    let Some(origin) = state.grid.locate(piece) else {
        return Outcome::Invalid(Rejection::PieceNotFound);
    };
    let Some((drow, dcol)) = displacement(piece.kind(), command.direction, owner) else {
        return Outcome::Invalid(Rejection::UnsupportedDirection);
    };
    let Some(target) = state.grid.offset(origin, drow, dcol) else {
        return Outcome::Invalid(Rejection::OutOfBounds);
    };
    let occupant = state.grid.get(target).and_then(|cell| cell.piece());
    if occupant.is_some_and(|other| other.owner() == owner) {
        return Outcome::Invalid(Rejection::FriendlyOccupied);
    }

    let mut next = state.clone();
    next.grid.clear(origin);
    next.grid.set(target, piece);
    next.move_history
        .push(format!("{} moved {}", piece, command.direction));
    next.current_player = owner.opponent();
    next.winner = next.grid.winner();
    Outcome::Applied(next)
}

/// Parses a wire command and resolves it.
///
/// The owner prefix is read and checked against the turn before the rest of
/// the command, so an out-of-turn command is `WrongTurn` however the piece or
/// direction is written. Input with no readable owner is `Malformed`.
pub fn resolve_raw(state: &GameState, raw: &str) -> Outcome {
    let owner = raw
        .split_once('-')
        .and_then(|(owner, _)| owner.parse::<Owner>().ok());
    match owner {
        None => Outcome::Invalid(Rejection::Malformed),
        Some(owner) if owner != state.current_player => Outcome::WrongTurn,
        Some(_) => match raw.parse::<MoveCommand>() {
            Ok(command) => resolve(state, &command),
            Err(_) => Outcome::Invalid(Rejection::Malformed),
        },
    }
}

#[cfg(test)]
#[path = "tests/resolver_tests.rs"]
mod tests;
