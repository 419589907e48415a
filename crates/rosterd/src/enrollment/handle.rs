//! Client interface for interacting with the EnrollmentActor.
//!
//! The `EnrollmentHandle` is the operation surface the transport layer
//! calls into: a cheap-to-clone handle that sends commands to the actor
//! and awaits oneshot replies. Channel errors are mapped to
//! `ServiceError::ChannelClosed`.

use tokio::sync::{broadcast, mpsc, oneshot};

use roster_core::{ActivityView, ParticipantId, SignupReceipt, UnregisterReceipt};

use super::commands::{EnrollmentCommand, EnrollmentEvent, ServiceError};

// ============================================================================
// Enrollment Handle
// ============================================================================

/// Handle for interacting with the enrollment actor.
///
/// Clone freely; all clones talk to the same actor. Every method is a
/// command send plus a oneshot await, so each call observes the catalog
/// only between fully-applied operations.
#[derive(Clone)]
pub struct EnrollmentHandle {
    /// Command sender to the actor
    sender: mpsc::Sender<EnrollmentCommand>,

    /// Event broadcaster for subscribing to enrollment changes
    event_sender: broadcast::Sender<EnrollmentEvent>,
}

impl EnrollmentHandle {
    /// Creates a new enrollment handle.
    pub fn new(
        sender: mpsc::Sender<EnrollmentCommand>,
        event_sender: broadcast::Sender<EnrollmentEvent>,
    ) -> Self {
        Self {
            sender,
            event_sender,
        }
    }

    /// Takes a snapshot of every activity, in catalog order.
    ///
    /// # Errors
    ///
    /// - `ServiceError::ChannelClosed` if the actor has shut down
    pub async fn list_activities(&self) -> Result<Vec<ActivityView>, ServiceError> {
        let (tx, rx) = oneshot::channel();

        self.sender
            .send(EnrollmentCommand::ListActivities { respond_to: tx })
            .await
            .map_err(|_| ServiceError::ChannelClosed)?;

        rx.await.map_err(|_| ServiceError::ChannelClosed)
    }

    /// Signs a participant up for an activity.
    ///
    /// # Errors
    ///
    /// - `ServiceError::Enrollment` for domain failures (unknown activity,
    ///   already enrolled anywhere, activity full)
    /// - `ServiceError::ChannelClosed` if the actor has shut down
    pub async fn signup(
        &self,
        activity: String,
        participant: ParticipantId,
    ) -> Result<SignupReceipt, ServiceError> {
        let (tx, rx) = oneshot::channel();

        self.sender
            .send(EnrollmentCommand::Signup {
                activity,
                participant,
                respond_to: tx,
            })
            .await
            .map_err(|_| ServiceError::ChannelClosed)?;

        rx.await
            .map_err(|_| ServiceError::ChannelClosed)?
            .map_err(ServiceError::from)
    }

    /// Removes a participant from an activity.
    ///
    /// # Errors
    ///
    /// - `ServiceError::Enrollment` for domain failures (unknown activity,
    ///   not enrolled in it)
    /// - `ServiceError::ChannelClosed` if the actor has shut down
    pub async fn unregister(
        &self,
        activity: String,
        participant: ParticipantId,
    ) -> Result<UnregisterReceipt, ServiceError> {
        let (tx, rx) = oneshot::channel();

        self.sender
            .send(EnrollmentCommand::Unregister {
                activity,
                participant,
                respond_to: tx,
            })
            .await
            .map_err(|_| ServiceError::ChannelClosed)?;

        rx.await
            .map_err(|_| ServiceError::ChannelClosed)?
            .map_err(ServiceError::from)
    }

    /// Subscribes to enrollment change events.
    ///
    /// This is a synchronous operation - it doesn't communicate with the
    /// actor.
    pub fn subscribe(&self) -> broadcast::Receiver<EnrollmentEvent> {
        self.event_sender.subscribe()
    }

    /// Checks if the actor is still running.
    pub fn is_connected(&self) -> bool {
        !self.sender.is_closed()
    }
}
