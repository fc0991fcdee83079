//! Board model, wire protocol and error types shared by the engine, the
//! server and the command-line client.

pub mod domain;
pub mod error;
pub mod protocol;
