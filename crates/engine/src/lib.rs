//! Move validation and game-state transitions.
//!
//! [`resolver`] is a pure function from a state and a move command to an
//! [`Outcome`]. [`controller`] owns the live state, applies outcomes and
//! tells the transport who should hear about them.

pub mod controller;
pub mod resolver;

pub use controller::{Directive, GameController};
pub use resolver::{resolve, resolve_raw, MoveCommand, Outcome, Rejection};
