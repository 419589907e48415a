//! Daemon connection client for the roster CLI.
//!
//! Provides the `DaemonClient`, a one-shot request/response client for
//! the rosterd Unix socket: connect, handshake, issue the request, read
//! the reply. The `watch` mode keeps the connection open and follows
//! enrollment pushes until the daemon goes away.
//!
//! **Panic-Free Policy:** no `.unwrap()`, `.expect()`, `panic!()`,
//! `unreachable!()`, or `todo!()` in this module.

use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::UnixStream;
use tracing::{debug, info};

use roster_core::ActivityView;
use roster_protocol::{ClientMessage, EnrollmentChange, ServerMessage};

use crate::error::{CliError, Result};

/// Default daemon socket path (kept in sync with rosterd).
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/rosterd.sock";

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the daemon client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Path to the Unix socket where the daemon listens.
    pub socket_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from(DEFAULT_SOCKET_PATH),
        }
    }
}

// ============================================================================
// Connection
// ============================================================================

/// An established, handshake-complete connection to the daemon.
struct Connection {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl Connection {
    /// Sends one message to the daemon.
    async fn send(&mut self, msg: &ClientMessage) -> Result<()> {
        let json = serde_json::to_string(msg)?;
        self.writer.write_all(json.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Reads one message from the daemon.
    async fn read(&mut self) -> Result<ServerMessage> {
        let mut line = String::new();
        let bytes_read = self.reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            return Err(CliError::Disconnected);
        }
        Ok(serde_json::from_str(&line)?)
    }

    /// Sends a request and reads the single response.
    async fn request(&mut self, msg: &ClientMessage) -> Result<ServerMessage> {
        self.send(msg).await?;
        self.read().await
    }
}

// ============================================================================
// Daemon Client
// ============================================================================

/// Client for communicating with the rosterd daemon.
///
/// Each operation opens a connection, performs the handshake, issues the
/// request, and returns the decoded result. Daemon-side failures arrive
/// as `CliError::Daemon` carrying the stable wire code.
pub struct DaemonClient {
    /// Configuration for connection behavior.
    config: ClientConfig,
}

impl DaemonClient {
    /// Creates a new daemon client.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Creates a new daemon client with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ClientConfig::default())
    }

    /// Connects to the daemon and completes the handshake.
    async fn connect(&self) -> Result<Connection> {
        let path = &self.config.socket_path;

        if !path.exists() {
            return Err(CliError::Connection(format!(
                "socket {} not found (is rosterd running?)",
                path.display()
            )));
        }

        let stream = UnixStream::connect(path)
            .await
            .map_err(|e| CliError::Connection(format!("{}: {e}", path.display())))?;
        let (reader, writer) = stream.into_split();

        let mut conn = Connection {
            reader: BufReader::new(reader),
            writer,
        };

        match conn.request(&ClientMessage::connect(None)).await? {
            ServerMessage::Connected { client_id, .. } => {
                debug!(client_id = %client_id, "Connected to daemon");
                Ok(conn)
            }
            ServerMessage::Rejected {
                reason,
                protocol_version,
            } => Err(CliError::Rejected {
                reason,
                daemon_version: protocol_version.to_string(),
            }),
            other => Err(CliError::UnexpectedResponse(format!("{other:?}"))),
        }
    }

    /// Fetches the full activity listing.
    pub async fn list_activities(&self) -> Result<Vec<ActivityView>> {
        let mut conn = self.connect().await?;

        match conn.request(&ClientMessage::list_activities()).await? {
            ServerMessage::ActivityList { activities } => Ok(activities),
            ServerMessage::Error { message, code } => Err(CliError::Daemon { message, code }),
            other => Err(CliError::UnexpectedResponse(format!("{other:?}"))),
        }
    }

    /// Signs a participant up for an activity.
    ///
    /// Returns the daemon's confirmation message.
    pub async fn signup(&self, activity: &str, participant: &str) -> Result<String> {
        let mut conn = self.connect().await?;

        match conn
            .request(&ClientMessage::signup(activity, participant))
            .await?
        {
            ServerMessage::SignedUp { message, .. } => Ok(message),
            ServerMessage::Error { message, code } => Err(CliError::Daemon { message, code }),
            other => Err(CliError::UnexpectedResponse(format!("{other:?}"))),
        }
    }

    /// Removes a participant from an activity.
    ///
    /// Returns the daemon's confirmation message.
    pub async fn unregister(&self, activity: &str, participant: &str) -> Result<String> {
        let mut conn = self.connect().await?;

        match conn
            .request(&ClientMessage::unregister(activity, participant))
            .await?
        {
            ServerMessage::Unregistered { message, .. } => Ok(message),
            ServerMessage::Error { message, code } => Err(CliError::Daemon { message, code }),
            other => Err(CliError::UnexpectedResponse(format!("{other:?}"))),
        }
    }

    /// Pings the daemon and returns the echoed sequence number.
    pub async fn ping(&self, seq: u64) -> Result<u64> {
        let mut conn = self.connect().await?;

        match conn.request(&ClientMessage::ping(seq)).await? {
            ServerMessage::Pong { seq } => Ok(seq),
            ServerMessage::Error { message, code } => Err(CliError::Daemon { message, code }),
            other => Err(CliError::UnexpectedResponse(format!("{other:?}"))),
        }
    }

    /// Subscribes to enrollment changes and follows them.
    ///
    /// `on_listing` is called once with the initial snapshot the daemon
    /// sends on subscription; `on_change` is called for every subsequent
    /// push. Returns when the daemon closes the connection.
    pub async fn watch<L, C>(&self, on_listing: L, mut on_change: C) -> Result<()>
    where
        L: FnOnce(&[ActivityView]),
        C: FnMut(&EnrollmentChange),
    {
        let mut conn = self.connect().await?;
        conn.send(&ClientMessage::subscribe()).await?;

        match conn.read().await? {
            ServerMessage::ActivityList { activities } => on_listing(&activities),
            ServerMessage::Error { message, code } => {
                return Err(CliError::Daemon { message, code })
            }
            other => return Err(CliError::UnexpectedResponse(format!("{other:?}"))),
        }

        loop {
            match conn.read().await {
                Ok(ServerMessage::Enrollment { change }) => on_change(&change),
                Ok(other) => {
                    debug!(message = ?other, "Ignoring non-event message while watching");
                }
                Err(CliError::Disconnected) => {
                    info!("Daemon closed the connection, watch finished");
                    return Ok(());
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Returns the configured socket path.
    pub fn socket_path(&self) -> &std::path::Path {
        &self.config.socket_path
    }
}
