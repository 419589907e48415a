//! Roster Protocol - Wire protocol for daemon communication
//!
//! This crate provides the message types exchanged between the roster
//! CLI and the rosterd daemon: newline-delimited JSON over a Unix
//! socket, with a handshake-first versioned protocol.

pub mod message;
pub mod version;

pub use message::{ChangeKind, ClientMessage, EnrollmentChange, RequestType, ServerMessage};
pub use version::{ProtocolVersion, VersionError};
