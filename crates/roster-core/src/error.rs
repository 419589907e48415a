//! Enrollment error types following panic-free policy.

use crate::{ActivityName, ParticipantId};
use thiserror::Error;

/// Errors produced by enrollment operations.
///
/// Every variant is a deterministic function of catalog state and input;
/// there are no transient or retryable failures in the core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnrollmentError {
    /// The named activity does not exist in the catalog.
    #[error("activity not found: {0}")]
    UnknownActivity(ActivityName),

    /// The participant is already signed up for an activity (possibly a
    /// different one than the signup target).
    #[error("{participant} is already signed up for {activity}")]
    AlreadyEnrolled {
        participant: ParticipantId,
        activity: ActivityName,
    },

    /// The target activity has no remaining capacity.
    #[error("{activity} is full (capacity {capacity})")]
    ActivityFull {
        activity: ActivityName,
        capacity: u32,
    },

    /// The participant is not enrolled in the named activity.
    #[error("{participant} is not registered for {activity}")]
    NotEnrolled {
        participant: ParticipantId,
        activity: ActivityName,
    },
}

/// Coarse classification used by transport shells to pick a status class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced activity or enrollment does not exist.
    NotFound,
    /// The mutation would violate a capacity or uniqueness invariant.
    Conflict,
}

impl EnrollmentError {
    /// Returns the error class for status-code mapping.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownActivity(_) | Self::NotEnrolled { .. } => ErrorKind::NotFound,
            Self::AlreadyEnrolled { .. } | Self::ActivityFull { .. } => ErrorKind::Conflict,
        }
    }

    /// Returns the stable wire code for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
        }
    }
}

/// Result type for enrollment operations.
pub type EnrollmentResult<T> = Result<T, EnrollmentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let err = EnrollmentError::UnknownActivity(ActivityName::new("Nonexistent Club"));
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.code(), "not_found");

        let err = EnrollmentError::AlreadyEnrolled {
            participant: ParticipantId::new("a@mergington.edu"),
            activity: ActivityName::new("Chess Club"),
        };
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err.code(), "conflict");

        let err = EnrollmentError::ActivityFull {
            activity: ActivityName::new("Chess Club"),
            capacity: 12,
        };
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let err = EnrollmentError::NotEnrolled {
            participant: ParticipantId::new("a@mergington.edu"),
            activity: ActivityName::new("Chess Club"),
        };
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_already_enrolled_message() {
        let err = EnrollmentError::AlreadyEnrolled {
            participant: ParticipantId::new("dup@example.com"),
            activity: ActivityName::new("Chess Club"),
        };
        let msg = err.to_string();
        assert!(msg.contains("already signed up"));
        assert!(msg.contains("dup@example.com"));
        assert!(msg.contains("Chess Club"));
    }

    #[test]
    fn test_activity_full_message() {
        let err = EnrollmentError::ActivityFull {
            activity: ActivityName::new("Math Club"),
            capacity: 10,
        };
        assert_eq!(err.to_string(), "Math Club is full (capacity 10)");
    }
}
