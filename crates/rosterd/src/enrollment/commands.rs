//! Enrollment actor commands, errors, and events.
//!
//! This module defines the message types for communicating with the
//! `EnrollmentActor`:
//! - `EnrollmentCommand`: commands sent to the actor
//! - `ServiceError`: errors surfaced to callers of the handle
//! - `EnrollmentEvent`: events published by the actor for subscribers
//!
//! All types are designed for async message passing and follow the
//! panic-free policy.

use chrono::{DateTime, Utc};
use roster_core::{
    ActivityName, ActivityView, EnrollmentError, ParticipantId, SignupReceipt, UnregisterReceipt,
};
use thiserror::Error;
use tokio::sync::oneshot;

// ============================================================================
// Enrollment Commands
// ============================================================================

/// Commands sent to the enrollment actor.
///
/// Each command carries a oneshot channel for its response. The actor
/// processes commands strictly one at a time, which is what makes the
/// check-then-act sequences of signup/unregister atomic.
#[derive(Debug)]
pub enum EnrollmentCommand {
    /// Take a snapshot of every activity, in catalog order.
    ///
    /// Never fails at the domain level; the response is the full listing.
    ListActivities {
        /// Channel to send the snapshot
        respond_to: oneshot::Sender<Vec<ActivityView>>,
    },

    /// Sign a participant up for an activity.
    ///
    /// # Errors
    /// - `EnrollmentError::UnknownActivity` if the activity doesn't exist
    /// - `EnrollmentError::AlreadyEnrolled` if the identity is enrolled anywhere
    /// - `EnrollmentError::ActivityFull` if the activity is at capacity
    Signup {
        /// Target activity name (exact match)
        activity: String,
        /// Identity joining
        participant: ParticipantId,
        /// Channel to send the result
        respond_to: oneshot::Sender<Result<SignupReceipt, EnrollmentError>>,
    },

    /// Remove a participant from an activity.
    ///
    /// # Errors
    /// - `EnrollmentError::UnknownActivity` if the activity doesn't exist
    /// - `EnrollmentError::NotEnrolled` if the identity is not on that roster
    Unregister {
        /// Target activity name (exact match)
        activity: String,
        /// Identity leaving
        participant: ParticipantId,
        /// Channel to send the result
        respond_to: oneshot::Sender<Result<UnregisterReceipt, EnrollmentError>>,
    },
}

// ============================================================================
// Service Errors
// ============================================================================

/// Errors surfaced by the enrollment handle.
///
/// Domain failures pass through untouched; the only addition is channel
/// closure, which means the actor has shut down.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    /// A domain-level enrollment failure.
    #[error(transparent)]
    Enrollment(#[from] EnrollmentError),

    /// The actor is gone; the daemon is shutting down.
    #[error("enrollment service unavailable")]
    ChannelClosed,
}

impl ServiceError {
    /// Returns the stable wire code for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Enrollment(err) => err.code(),
            Self::ChannelClosed => "unavailable",
        }
    }
}

// ============================================================================
// Enrollment Events
// ============================================================================

/// Events published by the actor after each applied mutation.
///
/// Broadcast to subscribed clients; purely observational. The actor never
/// waits on subscribers and a lagging receiver loses events rather than
/// slowing enrollment down.
#[derive(Debug, Clone)]
pub enum EnrollmentEvent {
    /// A participant joined an activity.
    SignedUp {
        /// Activity joined
        activity: ActivityName,
        /// Identity that joined
        participant: ParticipantId,
        /// When the actor applied the change
        at: DateTime<Utc>,
    },

    /// A participant left an activity.
    Unregistered {
        /// Activity left
        activity: ActivityName,
        /// Identity that left
        participant: ParticipantId,
        /// When the actor applied the change
        at: DateTime<Utc>,
    },
}
