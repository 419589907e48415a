//! Activity domain entities and value objects.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Type-Safe Identifiers
// ============================================================================

/// Unique name of an activity (e.g., "Chess Club").
///
/// The name doubles as the catalog lookup key. Matching is exact:
/// case- and whitespace-sensitive, no normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityName(String);

impl ActivityName {
    /// Creates a new ActivityName from a string.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the underlying string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActivityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ActivityName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ActivityName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for ActivityName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Opaque identity of an enrollee (in practice an email address).
///
/// The core treats this as a validated token and never inspects its
/// format; any email validation belongs to the transport boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the token is the empty string.
    ///
    /// Empty identities are rejected at the transport boundary; this
    /// accessor lets shells perform that check without unwrapping.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ParticipantId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for ParticipantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Domain Entity
// ============================================================================

/// An extracurricular activity with fixed metadata and a mutable roster.
///
/// Metadata (`name`, `description`, `schedule`, `max_participants`) never
/// changes after catalog initialization. Only `participants` is mutated,
/// and only through catalog signup/unregister operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    /// Unique activity name (catalog key)
    pub name: ActivityName,

    /// Free-text description
    pub description: String,

    /// Free-text meeting schedule
    pub schedule: String,

    /// Positive enrollment capacity
    pub max_participants: u32,

    /// Enrolled identities, unique, in signup order
    participants: Vec<ParticipantId>,
}

impl Activity {
    /// Creates an activity with an empty roster.
    pub fn new(
        name: impl Into<ActivityName>,
        description: impl Into<String>,
        schedule: impl Into<String>,
        max_participants: u32,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            schedule: schedule.into(),
            max_participants,
            participants: Vec::new(),
        }
    }

    /// Returns the enrolled identities in signup order.
    pub fn participants(&self) -> &[ParticipantId] {
        &self.participants
    }

    /// Returns the current enrollment count.
    #[must_use]
    pub fn enrolled(&self) -> u32 {
        self.participants.len() as u32
    }

    /// Returns true if the participant is enrolled in this activity.
    #[must_use]
    pub fn is_enrolled(&self, participant: &ParticipantId) -> bool {
        self.participants.contains(participant)
    }

    /// Returns true if at least one slot remains.
    #[must_use]
    pub fn has_capacity(&self) -> bool {
        self.enrolled() < self.max_participants
    }

    /// Returns the number of open slots.
    #[must_use]
    pub fn remaining_slots(&self) -> u32 {
        self.max_participants.saturating_sub(self.enrolled())
    }

    /// Appends a participant to the roster.
    ///
    /// Callers (the catalog) must have verified capacity and uniqueness;
    /// this method only performs the append.
    pub(crate) fn push_participant(&mut self, participant: ParticipantId) {
        self.participants.push(participant);
    }

    /// Removes a participant, preserving the order of the remainder.
    ///
    /// Returns false if the participant was not enrolled.
    pub(crate) fn remove_participant(&mut self, participant: &ParticipantId) -> bool {
        match self.participants.iter().position(|p| p == participant) {
            Some(pos) => {
                self.participants.remove(pos);
                true
            }
            None => false,
        }
    }
}

// ============================================================================
// Snapshot DTO
// ============================================================================

/// Read-only snapshot of one activity for listings and the wire.
///
/// Plain serializable data; field names match the public JSON contract
/// (`max_participants`, `participants`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityView {
    /// Activity name
    pub name: String,

    /// Free-text description
    pub description: String,

    /// Free-text meeting schedule
    pub schedule: String,

    /// Enrollment capacity
    pub max_participants: u32,

    /// Enrolled identities in signup order
    pub participants: Vec<String>,
}

impl ActivityView {
    /// Creates a view from a domain activity.
    pub fn from_activity(activity: &Activity) -> Self {
        Self {
            name: activity.name.as_str().to_string(),
            description: activity.description.clone(),
            schedule: activity.schedule.clone(),
            max_participants: activity.max_participants,
            participants: activity
                .participants
                .iter()
                .map(|p| p.as_str().to_string())
                .collect(),
        }
    }

    /// Returns the current enrollment count.
    #[must_use]
    pub fn enrolled(&self) -> usize {
        self.participants.len()
    }

    /// Returns true if the activity is at capacity.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.participants.len() as u32 >= self.max_participants
    }
}

impl From<&Activity> for ActivityView {
    fn from(activity: &Activity) -> Self {
        Self::from_activity(activity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chess_club() -> Activity {
        Activity::new(
            "Chess Club",
            "Learn strategies and compete in chess tournaments",
            "Fridays, 3:30 PM - 5:00 PM",
            12,
        )
    }

    #[test]
    fn test_activity_name_exact_match() {
        // No normalization: case and whitespace are significant.
        assert_ne!(ActivityName::new("Chess Club"), ActivityName::new("chess club"));
        assert_ne!(ActivityName::new("Chess Club"), ActivityName::new("Chess Club "));
    }

    #[test]
    fn test_new_activity_has_empty_roster() {
        let activity = chess_club();
        assert_eq!(activity.enrolled(), 0);
        assert!(activity.participants().is_empty());
        assert!(activity.has_capacity());
        assert_eq!(activity.remaining_slots(), 12);
    }

    #[test]
    fn test_roster_order_preserved() {
        let mut activity = chess_club();
        activity.push_participant(ParticipantId::new("a@mergington.edu"));
        activity.push_participant(ParticipantId::new("b@mergington.edu"));
        activity.push_participant(ParticipantId::new("c@mergington.edu"));

        assert!(activity.remove_participant(&ParticipantId::new("b@mergington.edu")));

        let remaining: Vec<&str> = activity.participants().iter().map(|p| p.as_str()).collect();
        assert_eq!(remaining, vec!["a@mergington.edu", "c@mergington.edu"]);
    }

    #[test]
    fn test_remove_unknown_participant() {
        let mut activity = chess_club();
        assert!(!activity.remove_participant(&ParticipantId::new("ghost@mergington.edu")));
    }

    #[test]
    fn test_capacity_accounting() {
        let mut activity = Activity::new("Math Club", "Math", "Tuesdays", 2);
        activity.push_participant(ParticipantId::new("a@mergington.edu"));
        assert!(activity.has_capacity());
        assert_eq!(activity.remaining_slots(), 1);

        activity.push_participant(ParticipantId::new("b@mergington.edu"));
        assert!(!activity.has_capacity());
        assert_eq!(activity.remaining_slots(), 0);
    }

    #[test]
    fn test_view_from_activity() {
        let mut activity = chess_club();
        activity.push_participant(ParticipantId::new("test.user@example.com"));

        let view = ActivityView::from_activity(&activity);
        assert_eq!(view.name, "Chess Club");
        assert_eq!(view.max_participants, 12);
        assert_eq!(view.participants, vec!["test.user@example.com"]);
        assert_eq!(view.enrolled(), 1);
        assert!(!view.is_full());
    }

    #[test]
    fn test_view_serialization_field_names() {
        let view = ActivityView::from_activity(&chess_club());
        let json = serde_json::to_string(&view).unwrap();
        assert!(json.contains("\"max_participants\":12"));
        assert!(json.contains("\"participants\":[]"));
        assert!(json.contains("\"schedule\""));
    }

    #[test]
    fn test_participant_id_is_opaque() {
        // Not an email, still a valid token as far as the core cares.
        let id = ParticipantId::new("not-an-email");
        assert_eq!(id.as_str(), "not-an-email");
        assert!(!id.is_empty());
        assert!(ParticipantId::new("").is_empty());
    }
}
