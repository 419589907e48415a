//! Enrollment actor - owns the catalog and processes commands.
//!
//! The EnrollmentActor is the single owner of enrollment state in the
//! system. It receives commands via an mpsc channel and publishes events
//! via broadcast. Because it processes one command at a time, every
//! signup/unregister runs its full validate-and-apply sequence without
//! interleaving - the mutual-exclusion discipline the enrollment rules
//! require.
//!
//! # Panic-Free Guarantees
//!
//! - No `.unwrap()` or `.expect()` in production code
//! - All fallible operations return `Result` or `Option`
//! - Channel send failures are logged but don't panic

use chrono::Utc;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info};

use roster_core::{
    ActivityView, Catalog, EnrollmentError, ParticipantId, SignupReceipt, UnregisterReceipt,
};

use super::commands::{EnrollmentCommand, EnrollmentEvent};

// ============================================================================
// Enrollment Actor
// ============================================================================

/// The enrollment actor - owns the activity catalog.
///
/// # Ownership
///
/// The actor owns the `Catalog` outright. No other task holds a reference
/// to it; all reads and writes arrive as commands and are applied
/// sequentially in this task.
///
/// # Thread Safety
///
/// The actor runs in a single task. Concurrent callers interact only
/// through the command channel, so two in-flight signups can never both
/// pass the capacity or uniqueness checks.
pub struct EnrollmentActor {
    /// Command receiver
    receiver: mpsc::Receiver<EnrollmentCommand>,

    /// The catalog, seeded at startup and mutated only here
    catalog: Catalog,

    /// Event publisher for real-time updates to subscribed clients
    event_publisher: broadcast::Sender<EnrollmentEvent>,
}

impl EnrollmentActor {
    /// Creates a new enrollment actor.
    ///
    /// # Arguments
    ///
    /// * `receiver` - Channel for receiving commands
    /// * `catalog` - The seeded activity catalog to own
    /// * `event_publisher` - Broadcast channel for publishing events
    pub fn new(
        receiver: mpsc::Receiver<EnrollmentCommand>,
        catalog: Catalog,
        event_publisher: broadcast::Sender<EnrollmentEvent>,
    ) -> Self {
        Self {
            receiver,
            catalog,
            event_publisher,
        }
    }

    /// Runs the actor event loop.
    ///
    /// Processes commands until the channel closes (all senders dropped).
    /// This is the main entry point - call this in a spawned task.
    pub async fn run(mut self) {
        info!(activities = self.catalog.len(), "Enrollment actor starting");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd);
        }

        info!("Enrollment actor stopped");
    }

    /// Dispatches a command to the appropriate handler.
    fn handle_command(&mut self, cmd: EnrollmentCommand) {
        match cmd {
            EnrollmentCommand::ListActivities { respond_to } => {
                // Ignore send error - client may have dropped the receiver
                let _ = respond_to.send(self.handle_list_activities());
            }
            EnrollmentCommand::Signup {
                activity,
                participant,
                respond_to,
            } => {
                let result = self.handle_signup(&activity, participant);
                let _ = respond_to.send(result);
            }
            EnrollmentCommand::Unregister {
                activity,
                participant,
                respond_to,
            } => {
                let result = self.handle_unregister(&activity, &participant);
                let _ = respond_to.send(result);
            }
        }
    }

    // ========================================================================
    // Command Handlers
    // ========================================================================

    /// Handles the activity listing snapshot.
    fn handle_list_activities(&self) -> Vec<ActivityView> {
        self.catalog.snapshot()
    }

    /// Handles a signup request.
    ///
    /// The catalog performs the full precondition chain (activity exists,
    /// identity not enrolled anywhere, room left) and mutates only when
    /// all of it passes.
    fn handle_signup(
        &mut self,
        activity: &str,
        participant: ParticipantId,
    ) -> Result<SignupReceipt, EnrollmentError> {
        match self.catalog.signup(activity, participant) {
            Ok(receipt) => {
                info!(
                    activity = %receipt.activity,
                    participant = %receipt.participant,
                    "Participant signed up"
                );

                // Publish event (ignore if no subscribers)
                let _ = self.event_publisher.send(EnrollmentEvent::SignedUp {
                    activity: receipt.activity.clone(),
                    participant: receipt.participant.clone(),
                    at: Utc::now(),
                });

                Ok(receipt)
            }
            Err(err) => {
                debug!(
                    activity = activity,
                    error = %err,
                    "Signup rejected"
                );
                Err(err)
            }
        }
    }

    /// Handles an unregister request.
    fn handle_unregister(
        &mut self,
        activity: &str,
        participant: &ParticipantId,
    ) -> Result<UnregisterReceipt, EnrollmentError> {
        match self.catalog.unregister(activity, participant) {
            Ok(receipt) => {
                info!(
                    activity = %receipt.activity,
                    participant = %receipt.participant,
                    "Participant unregistered"
                );

                let _ = self.event_publisher.send(EnrollmentEvent::Unregistered {
                    activity: receipt.activity.clone(),
                    participant: receipt.participant.clone(),
                    at: Utc::now(),
                });

                Ok(receipt)
            }
            Err(err) => {
                debug!(
                    activity = activity,
                    participant = %participant,
                    error = %err,
                    "Unregister rejected"
                );
                Err(err)
            }
        }
    }

    // ========================================================================
    // Accessors (for testing)
    // ========================================================================

    /// Returns a reference to the owned catalog.
    #[cfg(test)]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::SeedActivity;
    use tokio::sync::oneshot;

    fn seed(name: &str, capacity: u32) -> SeedActivity {
        SeedActivity {
            name: name.to_string(),
            description: format!("{name} description"),
            schedule: "Fridays, 3:30 PM - 5:00 PM".to_string(),
            max_participants: capacity,
        }
    }

    fn create_actor(
        capacity: u32,
    ) -> (
        EnrollmentActor,
        broadcast::Receiver<EnrollmentEvent>,
    ) {
        let (_cmd_tx, cmd_rx) = mpsc::channel(16);
        let (event_tx, event_rx) = broadcast::channel(16);
        let catalog = Catalog::from_seed(vec![
            seed("Chess Club", capacity),
            seed("Programming Class", 20),
        ])
        .unwrap();
        let actor = EnrollmentActor::new(cmd_rx, catalog, event_tx);
        (actor, event_rx)
    }

    #[tokio::test]
    async fn test_signup_command() {
        let (mut actor, mut event_rx) = create_actor(12);

        let (tx, rx) = oneshot::channel();
        actor.handle_command(EnrollmentCommand::Signup {
            activity: "Chess Club".to_string(),
            participant: ParticipantId::new("test.user@example.com"),
            respond_to: tx,
        });

        let receipt = rx.await.unwrap().unwrap();
        assert_eq!(receipt.message(), "Signed up test.user@example.com for Chess Club");

        // Event published for the applied change.
        let event = event_rx.try_recv().unwrap();
        assert!(matches!(event, EnrollmentEvent::SignedUp { .. }));
    }

    #[tokio::test]
    async fn test_signup_unknown_activity() {
        let (mut actor, mut event_rx) = create_actor(12);

        let (tx, rx) = oneshot::channel();
        actor.handle_command(EnrollmentCommand::Signup {
            activity: "Nonexistent Club".to_string(),
            participant: ParticipantId::new("a@mergington.edu"),
            respond_to: tx,
        });

        let result = rx.await.unwrap();
        assert!(matches!(result, Err(EnrollmentError::UnknownActivity(_))));

        // No event for a rejected mutation.
        assert!(event_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_signup_enforces_global_uniqueness() {
        let (mut actor, _) = create_actor(12);

        let (tx, rx) = oneshot::channel();
        actor.handle_command(EnrollmentCommand::Signup {
            activity: "Chess Club".to_string(),
            participant: ParticipantId::new("dup@example.com"),
            respond_to: tx,
        });
        assert!(rx.await.unwrap().is_ok());

        // Same identity, different activity: rejected.
        let (tx, rx) = oneshot::channel();
        actor.handle_command(EnrollmentCommand::Signup {
            activity: "Programming Class".to_string(),
            participant: ParticipantId::new("dup@example.com"),
            respond_to: tx,
        });

        let err = rx.await.unwrap().unwrap_err();
        assert!(err.to_string().contains("already signed up"));
        assert!(actor.catalog().check_invariants());
    }

    #[tokio::test]
    async fn test_signup_capacity_exhaustion() {
        let (mut actor, _) = create_actor(1);

        let (tx, rx) = oneshot::channel();
        actor.handle_command(EnrollmentCommand::Signup {
            activity: "Chess Club".to_string(),
            participant: ParticipantId::new("first@mergington.edu"),
            respond_to: tx,
        });
        assert!(rx.await.unwrap().is_ok());

        let (tx, rx) = oneshot::channel();
        actor.handle_command(EnrollmentCommand::Signup {
            activity: "Chess Club".to_string(),
            participant: ParticipantId::new("second@mergington.edu"),
            respond_to: tx,
        });

        let result = rx.await.unwrap();
        assert!(matches!(result, Err(EnrollmentError::ActivityFull { .. })));
        assert_eq!(actor.catalog().activity("Chess Club").unwrap().enrolled(), 1);
    }

    #[tokio::test]
    async fn test_unregister_command() {
        let (mut actor, mut event_rx) = create_actor(12);

        let (tx, rx) = oneshot::channel();
        actor.handle_command(EnrollmentCommand::Signup {
            activity: "Chess Club".to_string(),
            participant: ParticipantId::new("test.user@example.com"),
            respond_to: tx,
        });
        assert!(rx.await.unwrap().is_ok());
        let _ = event_rx.try_recv();

        let (tx, rx) = oneshot::channel();
        actor.handle_command(EnrollmentCommand::Unregister {
            activity: "Chess Club".to_string(),
            participant: ParticipantId::new("test.user@example.com"),
            respond_to: tx,
        });

        let receipt = rx.await.unwrap().unwrap();
        assert_eq!(
            receipt.message(),
            "Unregistered test.user@example.com from Chess Club"
        );
        assert_eq!(actor.catalog().activity("Chess Club").unwrap().enrolled(), 0);

        let event = event_rx.try_recv().unwrap();
        assert!(matches!(event, EnrollmentEvent::Unregistered { .. }));
    }

    #[tokio::test]
    async fn test_unregister_non_member() {
        let (mut actor, _) = create_actor(12);

        let (tx, rx) = oneshot::channel();
        actor.handle_command(EnrollmentCommand::Unregister {
            activity: "Chess Club".to_string(),
            participant: ParticipantId::new("ghost@mergington.edu"),
            respond_to: tx,
        });

        let result = rx.await.unwrap();
        assert!(matches!(result, Err(EnrollmentError::NotEnrolled { .. })));
    }

    #[tokio::test]
    async fn test_list_activities_snapshot() {
        let (mut actor, _) = create_actor(12);

        let (tx, rx) = oneshot::channel();
        actor.handle_command(EnrollmentCommand::Signup {
            activity: "Chess Club".to_string(),
            participant: ParticipantId::new("a@mergington.edu"),
            respond_to: tx,
        });
        assert!(rx.await.unwrap().is_ok());

        let (tx, rx) = oneshot::channel();
        actor.handle_command(EnrollmentCommand::ListActivities { respond_to: tx });

        let snapshot = rx.await.unwrap();
        assert_eq!(snapshot.len(), 2);
        let chess = snapshot.iter().find(|v| v.name == "Chess Club").unwrap();
        assert_eq!(chess.participants, vec!["a@mergington.edu"]);
    }
}
