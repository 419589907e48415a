//! Error types for the roster CLI.
//!
//! All error types use `thiserror` and carry enough context for the
//! binary to print an actionable message.
//!
//! **Panic-Free Policy:** no `.unwrap()`, `.expect()`, `panic!()`,
//! `unreachable!()`, or `todo!()` in this module.

use std::io;
use thiserror::Error;

/// CLI application errors.
///
/// Connection errors suggest checking whether the daemon is running;
/// daemon errors carry the stable wire code so callers can distinguish
/// not-found from conflict without string matching.
#[derive(Error, Debug)]
pub enum CliError {
    /// Failed to reach the daemon socket.
    #[error("Failed to connect to daemon: {0}")]
    Connection(String),

    /// The daemon refused the handshake.
    #[error("Connection rejected by daemon (version {daemon_version}): {reason}")]
    Rejected {
        /// Rejection reason from the daemon
        reason: String,
        /// The daemon's protocol version
        daemon_version: String,
    },

    /// The daemon answered a request with an error.
    #[error("{message}")]
    Daemon {
        /// Error message from the daemon
        message: String,
        /// Stable error code ("not_found", "conflict", "invalid_params")
        code: Option<String>,
    },

    /// The daemon answered with a message the client didn't expect.
    #[error("Unexpected response from daemon: {0}")]
    UnexpectedResponse(String),

    /// The daemon closed the connection.
    #[error("Daemon closed the connection")]
    Disconnected,

    /// I/O error passthrough.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON parse error passthrough.
    #[error("Failed to parse message: {0}")]
    Parse(#[from] serde_json::Error),
}

impl CliError {
    /// Returns the daemon error code, if this is a daemon error.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Daemon { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

/// Convenience Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
