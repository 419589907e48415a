//! Protocol message types for daemon communication.

use crate::version::ProtocolVersion;
use chrono::{DateTime, Utc};
use roster_core::ActivityView;
use serde::{Deserialize, Serialize};

/// Request types that can be sent by clients to the daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequestType {
    /// Client handshake/connection request
    Connect {
        /// Client identifier (optional)
        #[serde(skip_serializing_if = "Option::is_none")]
        client_id: Option<String>,
    },

    /// Request the full activity listing
    ListActivities,

    /// Sign a participant up for an activity
    Signup {
        /// Target activity name (exact match)
        activity: String,
        /// Participant identity (opaque token, usually an email)
        participant: String,
    },

    /// Remove a participant from an activity
    Unregister {
        /// Target activity name (exact match)
        activity: String,
        /// Participant identity
        participant: String,
    },

    /// Subscribe to enrollment change events
    Subscribe,

    /// Unsubscribe from events
    Unsubscribe,

    /// Ping to check connection
    Ping {
        /// Sequence number for matching pong response
        seq: u64,
    },

    /// Client disconnecting gracefully
    Disconnect,
}

/// Messages sent from client to daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientMessage {
    /// Protocol version
    pub protocol_version: ProtocolVersion,

    /// Request payload
    #[serde(flatten)]
    pub request: RequestType,
}

impl ClientMessage {
    /// Creates a new client message with current protocol version.
    pub fn new(request: RequestType) -> Self {
        Self {
            protocol_version: ProtocolVersion::CURRENT,
            request,
        }
    }

    /// Creates a connect message.
    pub fn connect(client_id: Option<String>) -> Self {
        Self::new(RequestType::Connect { client_id })
    }

    /// Creates an activity listing request.
    pub fn list_activities() -> Self {
        Self::new(RequestType::ListActivities)
    }

    /// Creates a signup request.
    pub fn signup(activity: impl Into<String>, participant: impl Into<String>) -> Self {
        Self::new(RequestType::Signup {
            activity: activity.into(),
            participant: participant.into(),
        })
    }

    /// Creates an unregister request.
    pub fn unregister(activity: impl Into<String>, participant: impl Into<String>) -> Self {
        Self::new(RequestType::Unregister {
            activity: activity.into(),
            participant: participant.into(),
        })
    }

    /// Creates a subscribe message.
    pub fn subscribe() -> Self {
        Self::new(RequestType::Subscribe)
    }

    /// Creates a ping message.
    pub fn ping(seq: u64) -> Self {
        Self::new(RequestType::Ping { seq })
    }

    /// Creates a disconnect message.
    pub fn disconnect() -> Self {
        Self::new(RequestType::Disconnect)
    }
}

/// What kind of enrollment change occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// A participant joined an activity
    SignedUp,
    /// A participant left an activity
    Unregistered,
}

/// One enrollment change, as pushed to subscribed clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentChange {
    /// What happened
    pub kind: ChangeKind,
    /// Activity affected
    pub activity: String,
    /// Participant affected
    pub participant: String,
    /// When the daemon applied the change
    pub at: DateTime<Utc>,
}

/// Messages sent from daemon to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection accepted
    Connected {
        /// Daemon's protocol version
        protocol_version: ProtocolVersion,
        /// Assigned client ID
        client_id: String,
    },

    /// Connection rejected (version mismatch, etc.)
    Rejected {
        /// Reason for rejection
        reason: String,
        /// Daemon's protocol version (for client to upgrade)
        protocol_version: ProtocolVersion,
    },

    /// Full activity listing response, in catalog order
    ActivityList {
        /// Snapshot of every activity
        activities: Vec<ActivityView>,
    },

    /// Signup confirmation
    SignedUp {
        /// Activity joined
        activity: String,
        /// Participant that joined
        participant: String,
        /// Human-readable confirmation
        message: String,
    },

    /// Unregistration confirmation
    Unregistered {
        /// Activity left
        activity: String,
        /// Participant that left
        participant: String,
        /// Human-readable confirmation
        message: String,
    },

    /// Enrollment change pushed to subscribers
    Enrollment {
        /// The change that was applied
        change: EnrollmentChange,
    },

    /// Pong response to ping
    Pong {
        /// Sequence number from ping
        seq: u64,
    },

    /// Error response
    Error {
        /// Error message
        message: String,
        /// Stable error code ("not_found", "conflict", "invalid_params")
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<String>,
    },
}

impl ServerMessage {
    /// Creates a connected response.
    pub fn connected(client_id: String) -> Self {
        Self::Connected {
            protocol_version: ProtocolVersion::CURRENT,
            client_id,
        }
    }

    /// Creates a rejected response.
    pub fn rejected(reason: &str) -> Self {
        Self::Rejected {
            reason: reason.to_string(),
            protocol_version: ProtocolVersion::CURRENT,
        }
    }

    /// Creates an activity list response.
    pub fn activity_list(activities: Vec<ActivityView>) -> Self {
        Self::ActivityList { activities }
    }

    /// Creates a signup confirmation.
    pub fn signed_up(activity: String, participant: String, message: String) -> Self {
        Self::SignedUp {
            activity,
            participant,
            message,
        }
    }

    /// Creates an unregistration confirmation.
    pub fn unregistered(activity: String, participant: String, message: String) -> Self {
        Self::Unregistered {
            activity,
            participant,
            message,
        }
    }

    /// Creates an enrollment change push.
    pub fn enrollment(change: EnrollmentChange) -> Self {
        Self::Enrollment { change }
    }

    /// Creates a pong response.
    pub fn pong(seq: u64) -> Self {
        Self::Pong { seq }
    }

    /// Creates an error response.
    pub fn error(message: &str) -> Self {
        Self::Error {
            message: message.to_string(),
            code: None,
        }
    }

    /// Creates an error response with a stable code.
    pub fn error_with_code(message: &str, code: &str) -> Self {
        Self::Error {
            message: message.to_string(),
            code: Some(code.to_string()),
        }
    }
}
