//! Roster CLI - client library for the rosterd daemon
//!
//! Connects to the daemon over its Unix socket, performs the versioned
//! handshake, and exposes the three enrollment operations (list, signup,
//! unregister) plus a watch mode that follows enrollment events.

pub mod client;
pub mod error;
pub mod render;

pub use client::{ClientConfig, DaemonClient, DEFAULT_SOCKET_PATH};
pub use error::{CliError, Result};
pub use render::{render_activities, render_change};
