//! Connection handler for individual client connections.
//!
//! Each client connection gets its own `ConnectionHandler` that:
//! - Performs protocol version negotiation
//! - Parses incoming requests
//! - Routes operations to the enrollment handle
//! - Sends responses, carrying the stable error-code mapping
//!   (`not_found`, `conflict`, `invalid_params`) for every failure
//!
//! # Panic-Free Guarantees
//!
//! - No `.unwrap()`, `.expect()`, `panic!()`, `unreachable!()`, `todo!()`
//! - All fallible operations use `?`, pattern matching, or `unwrap_or`
//! - Connection errors are logged and result in graceful disconnect

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::{Mutex, RwLock};
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use roster_core::ParticipantId;
use roster_protocol::{ClientMessage, ProtocolVersion, RequestType, ServerMessage};

use crate::enrollment::{EnrollmentHandle, ServiceError};

/// Type alias for subscriber writer handle
pub type SubscriberWriter = Arc<Mutex<BufWriter<OwnedWriteHalf>>>;

/// Type alias for the subscribers map (client_id → writer)
pub type SubscribersMap = Arc<RwLock<HashMap<String, SubscriberWriter>>>;

/// Maximum number of concurrent event subscribers
pub(crate) const MAX_SUBSCRIBERS: usize = 16;

/// Maximum message size (64 KB; requests are two short strings)
const MAX_MESSAGE_SIZE: usize = 65_536;

/// Read timeout for idle connections (5 minutes)
const READ_TIMEOUT: Duration = Duration::from_secs(300);

/// Write timeout (10 seconds)
const WRITE_TIMEOUT: Duration = Duration::from_secs(10);

/// Unique identifier for this connection
type ClientId = String;

/// Connection handler for a single client.
///
/// Manages the lifecycle of a client connection:
/// - Protocol handshake
/// - Request processing loop
/// - Event subscription (for watch clients)
/// - Graceful shutdown
pub struct ConnectionHandler {
    /// Buffered reader for incoming requests
    reader: BufReader<OwnedReadHalf>,

    /// Buffered writer for outgoing messages (shared for event broadcast)
    writer: SubscriberWriter,

    /// Handle to the enrollment actor
    enrollment: EnrollmentHandle,

    /// Shared subscribers map for event broadcasting
    subscribers: SubscribersMap,

    /// Unique client identifier (assigned after handshake)
    client_id: Option<ClientId>,

    /// Counter for generating client IDs
    connection_number: u64,
}

impl ConnectionHandler {
    /// Creates a new connection handler.
    pub fn new(
        reader: OwnedReadHalf,
        writer: OwnedWriteHalf,
        enrollment: EnrollmentHandle,
        subscribers: SubscribersMap,
        connection_number: u64,
    ) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer: Arc::new(Mutex::new(BufWriter::new(writer))),
            enrollment,
            subscribers,
            client_id: None,
            connection_number,
        }
    }

    /// Runs the connection handler.
    ///
    /// Performs the handshake then enters the request processing loop.
    /// Returns the client_id (if assigned) when the connection closes so
    /// the server can evict any subscription.
    pub async fn run(mut self) -> Option<ClientId> {
        debug!(connection = self.connection_number, "New client connected");

        match self.handle_handshake().await {
            Ok(()) => {
                info!(client_id = ?self.client_id, "Client handshake completed");
            }
            Err(e) => {
                warn!(
                    connection = self.connection_number,
                    error = %e,
                    "Handshake failed"
                );
                return None;
            }
        }

        let client_id = self.client_id.clone();

        if let Err(e) = self.process_requests().await {
            debug!(client_id = ?self.client_id, error = %e, "Connection closed");
        }

        info!(client_id = ?self.client_id, "Client disconnected");
        client_id
    }

    /// Handles the initial protocol handshake.
    ///
    /// Expects a `Connect` request, validates the protocol version, and
    /// responds with `Connected` or `Rejected`.
    async fn handle_handshake(&mut self) -> Result<(), ConnectionError> {
        let msg = self.read_message().await?;

        let client_version = msg.protocol_version;
        if !client_version.is_compatible_with(&ProtocolVersion::CURRENT) {
            warn!(
                client_version = %client_version,
                server_version = %ProtocolVersion::CURRENT,
                "Protocol version mismatch"
            );

            self.send_message(ServerMessage::rejected(&format!(
                "Protocol version {} not compatible with server version {}",
                client_version,
                ProtocolVersion::CURRENT
            )))
            .await?;

            return Err(ConnectionError::VersionMismatch {
                client: client_version,
                server: ProtocolVersion::CURRENT,
            });
        }

        match msg.request {
            RequestType::Connect { client_id } => {
                let assigned_id =
                    client_id.unwrap_or_else(|| format!("client-{}", self.connection_number));

                self.client_id = Some(assigned_id.clone());

                self.send_message(ServerMessage::connected(assigned_id)).await?;
                Ok(())
            }
            other => {
                self.send_message(ServerMessage::error("Expected connect message for handshake"))
                    .await?;

                Err(ConnectionError::UnexpectedMessage(format!("{other:?}")))
            }
        }
    }

    /// Main request processing loop.
    ///
    /// Reads and processes requests until the connection closes or an
    /// unrecoverable error occurs.
    async fn process_requests(&mut self) -> Result<(), ConnectionError> {
        loop {
            let msg = match timeout(READ_TIMEOUT, self.read_message()).await {
                Ok(Ok(msg)) => msg,
                Ok(Err(ConnectionError::Eof)) => {
                    debug!(client_id = ?self.client_id, "Client sent EOF");
                    return Ok(());
                }
                Ok(Err(e)) => return Err(e),
                Err(_) => {
                    debug!(client_id = ?self.client_id, "Connection timed out");
                    return Err(ConnectionError::Timeout);
                }
            };

            if let Err(e) = self.handle_request(msg).await {
                if matches!(e, ConnectionError::Eof) {
                    return Ok(());
                }

                error!(client_id = ?self.client_id, error = %e, "Error handling request");

                // Send error response but continue processing
                let _ = self.send_message(ServerMessage::error(&e.to_string())).await;
            }
        }
    }

    /// Handles a single client request.
    async fn handle_request(&mut self, msg: ClientMessage) -> Result<(), ConnectionError> {
        match msg.request {
            RequestType::Connect { .. } => {
                self.send_message(ServerMessage::error("Already connected")).await?;
            }

            RequestType::ListActivities => {
                match self.enrollment.list_activities().await {
                    Ok(activities) => {
                        self.send_message(ServerMessage::activity_list(activities)).await?;
                    }
                    Err(err) => {
                        self.send_service_error(&err).await?;
                    }
                }
            }

            RequestType::Signup {
                activity,
                participant,
            } => {
                self.handle_signup(activity, participant).await?;
            }

            RequestType::Unregister {
                activity,
                participant,
            } => {
                self.handle_unregister(activity, participant).await?;
            }

            RequestType::Subscribe => {
                self.handle_subscribe().await?;
            }

            RequestType::Unsubscribe => {
                if let Some(ref client_id) = self.client_id {
                    let mut subs = self.subscribers.write().await;
                    subs.remove(client_id);
                }

                debug!(client_id = ?self.client_id, "Client unsubscribed from updates");
            }

            RequestType::Ping { seq } => {
                self.send_message(ServerMessage::pong(seq)).await?;
            }

            RequestType::Disconnect => {
                debug!(client_id = ?self.client_id, "Client requested disconnect");
                return Err(ConnectionError::Eof);
            }
        }

        Ok(())
    }

    /// Handles a signup request.
    ///
    /// Empty parameters are a transport-level rejection; the identity is
    /// otherwise passed through untouched (no trimming, no format check).
    async fn handle_signup(
        &mut self,
        activity: String,
        participant: String,
    ) -> Result<(), ConnectionError> {
        if activity.is_empty() || participant.is_empty() {
            self.send_message(ServerMessage::error_with_code(
                "activity and participant must be non-empty",
                "invalid_params",
            ))
            .await?;
            return Ok(());
        }

        match self
            .enrollment
            .signup(activity, ParticipantId::new(participant))
            .await
        {
            Ok(receipt) => {
                self.send_message(ServerMessage::signed_up(
                    receipt.activity.to_string(),
                    receipt.participant.to_string(),
                    receipt.message(),
                ))
                .await?;
            }
            Err(err) => {
                self.send_service_error(&err).await?;
            }
        }

        Ok(())
    }

    /// Handles an unregister request.
    async fn handle_unregister(
        &mut self,
        activity: String,
        participant: String,
    ) -> Result<(), ConnectionError> {
        if activity.is_empty() || participant.is_empty() {
            self.send_message(ServerMessage::error_with_code(
                "activity and participant must be non-empty",
                "invalid_params",
            ))
            .await?;
            return Ok(());
        }

        match self
            .enrollment
            .unregister(activity, ParticipantId::new(participant))
            .await
        {
            Ok(receipt) => {
                self.send_message(ServerMessage::unregistered(
                    receipt.activity.to_string(),
                    receipt.participant.to_string(),
                    receipt.message(),
                ))
                .await?;
            }
            Err(err) => {
                self.send_service_error(&err).await?;
            }
        }

        Ok(())
    }

    /// Handles a subscribe request.
    async fn handle_subscribe(&mut self) -> Result<(), ConnectionError> {
        let client_id = match &self.client_id {
            Some(id) => id.clone(),
            None => {
                self.send_message(ServerMessage::error("Must connect before subscribing"))
                    .await?;
                return Ok(());
            }
        };

        {
            let mut subs = self.subscribers.write().await;

            if subs.len() >= MAX_SUBSCRIBERS && !subs.contains_key(&client_id) {
                self.send_message(ServerMessage::error(&format!(
                    "Too many subscribers (max: {MAX_SUBSCRIBERS})"
                )))
                .await?;
                return Ok(());
            }

            subs.insert(client_id.clone(), Arc::clone(&self.writer));
        }

        debug!(client_id = %client_id, "Client subscribed to enrollment events");

        // Send the current listing as initial state
        match self.enrollment.list_activities().await {
            Ok(activities) => {
                self.send_message(ServerMessage::activity_list(activities)).await?;
            }
            Err(err) => {
                self.send_service_error(&err).await?;
            }
        }

        Ok(())
    }

    /// Sends a service failure as an error response with its wire code.
    async fn send_service_error(&self, err: &ServiceError) -> Result<(), ConnectionError> {
        self.send_message(ServerMessage::error_with_code(&err.to_string(), err.code()))
            .await
    }

    /// Reads a single message from the client.
    async fn read_message(&mut self) -> Result<ClientMessage, ConnectionError> {
        let mut line = String::new();

        let bytes_read = self
            .reader
            .read_line(&mut line)
            .await
            .map_err(|e| ConnectionError::Io(e.to_string()))?;

        if bytes_read == 0 {
            return Err(ConnectionError::Eof);
        }

        if line.len() > MAX_MESSAGE_SIZE {
            return Err(ConnectionError::MessageTooLarge {
                size: line.len(),
                max: MAX_MESSAGE_SIZE,
            });
        }

        let msg: ClientMessage =
            serde_json::from_str(&line).map_err(|e| ConnectionError::ParseError(e.to_string()))?;

        debug!(
            client_id = ?self.client_id,
            request = ?std::mem::discriminant(&msg.request),
            "Received request"
        );

        Ok(msg)
    }

    /// Sends a message to the client.
    async fn send_message(&self, msg: ServerMessage) -> Result<(), ConnectionError> {
        let json =
            serde_json::to_string(&msg).map_err(|e| ConnectionError::ParseError(e.to_string()))?;

        let mut writer = self.writer.lock().await;

        match timeout(WRITE_TIMEOUT, async {
            writer.write_all(json.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
            Ok::<(), std::io::Error>(())
        })
        .await
        {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(ConnectionError::Io(e.to_string())),
            Err(_) => Err(ConnectionError::WriteTimeout),
        }
    }

    /// Returns the client ID (if connected).
    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }
}

/// Errors that can occur during connection handling.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("Protocol version mismatch: client {client}, server {server}")]
    VersionMismatch {
        client: ProtocolVersion,
        server: ProtocolVersion,
    },

    #[error("Unexpected message: {0}")]
    UnexpectedMessage(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Connection closed")]
    Eof,

    #[error("Read timeout")]
    Timeout,

    #[error("Write timeout")]
    WriteTimeout,

    #[error("Message too large: {size} bytes (max: {max})")]
    MessageTooLarge { size: usize, max: usize },
}
