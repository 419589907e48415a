//! The activity catalog and its enrollment rules.
//!
//! The catalog is the single source of truth for who is enrolled where.
//! Its membership is fixed at construction; only the per-activity rosters
//! change afterwards, and only through [`Catalog::signup`] and
//! [`Catalog::unregister`].
//!
//! # Invariants
//!
//! After every operation:
//! 1. No activity holds more participants than its capacity.
//! 2. An identity is enrolled in at most one activity catalog-wide.
//! 3. No roster contains duplicate identities.
//! 4. Activity metadata is unchanged since construction.
//!
//! The catalog itself is not thread-safe; concurrent access is the
//! owner's concern (a single-writer actor in the daemon).

use std::collections::HashMap;

use crate::activity::{Activity, ActivityName, ActivityView, ParticipantId};
use crate::error::{EnrollmentError, EnrollmentResult};
use crate::seed::{SeedActivity, SeedError};

/// The fixed set of activities and their rosters.
///
/// Primary storage is a `Vec` in seed order (listings are deterministic);
/// a name → slot index provides O(1) lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    /// Activities in seed order (primary storage)
    activities: Vec<Activity>,

    /// Index for name → slot lookups
    index: HashMap<String, usize>,
}

/// Confirmation of a successful signup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupReceipt {
    /// Activity joined
    pub activity: ActivityName,
    /// Identity that joined
    pub participant: ParticipantId,
}

impl SignupReceipt {
    /// Renders the confirmation message shown to callers.
    #[must_use]
    pub fn message(&self) -> String {
        format!("Signed up {} for {}", self.participant, self.activity)
    }
}

/// Confirmation of a successful unregistration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnregisterReceipt {
    /// Activity left
    pub activity: ActivityName,
    /// Identity that left
    pub participant: ParticipantId,
}

impl UnregisterReceipt {
    /// Renders the confirmation message shown to callers.
    #[must_use]
    pub fn message(&self) -> String {
        format!("Unregistered {} from {}", self.participant, self.activity)
    }
}

impl Catalog {
    /// Builds a catalog from a seed, validating it.
    ///
    /// # Errors
    ///
    /// - `SeedError::EmptyName` if an entry has an empty name
    /// - `SeedError::DuplicateName` if two entries share a name
    /// - `SeedError::ZeroCapacity` if an entry has no capacity
    pub fn from_seed(seed: impl IntoIterator<Item = SeedActivity>) -> Result<Self, SeedError> {
        let mut activities = Vec::new();
        let mut index = HashMap::new();

        for (position, entry) in seed.into_iter().enumerate() {
            if entry.name.is_empty() {
                return Err(SeedError::EmptyName { position });
            }
            if entry.max_participants == 0 {
                return Err(SeedError::ZeroCapacity(entry.name));
            }
            if index.contains_key(&entry.name) {
                return Err(SeedError::DuplicateName(entry.name));
            }

            index.insert(entry.name.clone(), activities.len());
            activities.push(Activity::new(
                entry.name,
                entry.description,
                entry.schedule,
                entry.max_participants,
            ));
        }

        Ok(Self { activities, index })
    }

    /// Returns the number of activities in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.activities.len()
    }

    /// Returns true if the catalog holds no activities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Looks up an activity by exact name.
    pub fn activity(&self, name: &str) -> Option<&Activity> {
        self.index.get(name).and_then(|&slot| self.activities.get(slot))
    }

    /// Iterates activities in seed order.
    pub fn iter(&self) -> impl Iterator<Item = &Activity> {
        self.activities.iter()
    }

    /// Returns the activity a participant is currently enrolled in, if any.
    ///
    /// This is the global-uniqueness scan: the whole catalog is consulted,
    /// not just one activity.
    pub fn enrollment_of(&self, participant: &ParticipantId) -> Option<&ActivityName> {
        self.activities
            .iter()
            .find(|a| a.is_enrolled(participant))
            .map(|a| &a.name)
    }

    /// Takes a point-in-time snapshot of every activity, in seed order.
    pub fn snapshot(&self) -> Vec<ActivityView> {
        self.activities.iter().map(ActivityView::from_activity).collect()
    }

    /// Signs a participant up for an activity.
    ///
    /// Preconditions are checked in order, each with a distinct failure,
    /// and nothing is mutated unless all of them pass:
    /// 1. the activity exists,
    /// 2. the participant is not enrolled anywhere in the catalog,
    /// 3. the activity has capacity.
    ///
    /// # Errors
    ///
    /// - `EnrollmentError::UnknownActivity` if the name is not in the catalog
    /// - `EnrollmentError::AlreadyEnrolled` if the identity is enrolled in
    ///   any activity (including this one)
    /// - `EnrollmentError::ActivityFull` if the activity is at capacity
    pub fn signup(
        &mut self,
        name: &str,
        participant: ParticipantId,
    ) -> EnrollmentResult<SignupReceipt> {
        let slot = match self.index.get(name) {
            Some(&slot) => slot,
            None => return Err(EnrollmentError::UnknownActivity(ActivityName::new(name))),
        };

        if let Some(existing) = self.enrollment_of(&participant) {
            return Err(EnrollmentError::AlreadyEnrolled {
                participant,
                activity: existing.clone(),
            });
        }

        let activity = match self.activities.get_mut(slot) {
            Some(activity) => activity,
            // Index and storage are built together; a dangling slot would
            // mean the catalog was corrupted, so surface it as not-found.
            None => return Err(EnrollmentError::UnknownActivity(ActivityName::new(name))),
        };

        if !activity.has_capacity() {
            return Err(EnrollmentError::ActivityFull {
                activity: activity.name.clone(),
                capacity: activity.max_participants,
            });
        }

        let receipt = SignupReceipt {
            activity: activity.name.clone(),
            participant: participant.clone(),
        };
        activity.push_participant(participant);
        Ok(receipt)
    }

    /// Removes a participant from an activity.
    ///
    /// The enrollment check is scoped to the named activity: an identity
    /// enrolled elsewhere still fails with `NotEnrolled` here.
    ///
    /// # Errors
    ///
    /// - `EnrollmentError::UnknownActivity` if the name is not in the catalog
    /// - `EnrollmentError::NotEnrolled` if the identity is not on this
    ///   activity's roster
    pub fn unregister(
        &mut self,
        name: &str,
        participant: &ParticipantId,
    ) -> EnrollmentResult<UnregisterReceipt> {
        let slot = match self.index.get(name) {
            Some(&slot) => slot,
            None => return Err(EnrollmentError::UnknownActivity(ActivityName::new(name))),
        };

        let activity = match self.activities.get_mut(slot) {
            Some(activity) => activity,
            None => return Err(EnrollmentError::UnknownActivity(ActivityName::new(name))),
        };

        if !activity.remove_participant(participant) {
            return Err(EnrollmentError::NotEnrolled {
                participant: participant.clone(),
                activity: activity.name.clone(),
            });
        }

        Ok(UnregisterReceipt {
            activity: activity.name.clone(),
            participant: participant.clone(),
        })
    }

    /// Verifies invariants 1-3 over the whole catalog.
    ///
    /// Used by tests after mutation sequences; not called on the hot path.
    pub fn check_invariants(&self) -> bool {
        let mut seen: HashMap<&str, &str> = HashMap::new();

        for activity in &self.activities {
            if activity.enrolled() > activity.max_participants {
                return false;
            }
            for participant in activity.participants() {
                if seen.insert(participant.as_str(), activity.name.as_str()).is_some() {
                    // Duplicate within an activity or across activities.
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::default_seed;

    fn small_seed() -> Vec<SeedActivity> {
        vec![
            SeedActivity {
                name: "Chess Club".to_string(),
                description: "Learn strategies and compete in chess tournaments".to_string(),
                schedule: "Fridays, 3:30 PM - 5:00 PM".to_string(),
                max_participants: 2,
            },
            SeedActivity {
                name: "Programming Class".to_string(),
                description: "Learn programming fundamentals".to_string(),
                schedule: "Tuesdays, 3:30 PM - 4:30 PM".to_string(),
                max_participants: 3,
            },
        ]
    }

    fn catalog() -> Catalog {
        Catalog::from_seed(small_seed()).unwrap()
    }

    #[test]
    fn test_from_default_seed() {
        let catalog = Catalog::from_seed(default_seed()).unwrap();
        assert!(!catalog.is_empty());
        assert!(catalog.activity("Chess Club").is_some());
        assert!(catalog.activity("Programming Class").is_some());
    }

    #[test]
    fn test_seed_rejects_duplicate_name() {
        let mut seed = small_seed();
        seed.push(SeedActivity {
            name: "Chess Club".to_string(),
            description: "again".to_string(),
            schedule: "never".to_string(),
            max_participants: 5,
        });
        assert_eq!(
            Catalog::from_seed(seed),
            Err(SeedError::DuplicateName("Chess Club".to_string()))
        );
    }

    #[test]
    fn test_seed_rejects_zero_capacity() {
        let seed = vec![SeedActivity {
            name: "Empty Club".to_string(),
            description: "no room".to_string(),
            schedule: "never".to_string(),
            max_participants: 0,
        }];
        assert_eq!(
            Catalog::from_seed(seed),
            Err(SeedError::ZeroCapacity("Empty Club".to_string()))
        );
    }

    #[test]
    fn test_seed_rejects_empty_name() {
        let seed = vec![SeedActivity {
            name: String::new(),
            description: "anon".to_string(),
            schedule: "never".to_string(),
            max_participants: 5,
        }];
        assert_eq!(Catalog::from_seed(seed), Err(SeedError::EmptyName { position: 0 }));
    }

    #[test]
    fn test_signup_and_listing() {
        let mut catalog = catalog();

        let receipt = catalog
            .signup("Chess Club", ParticipantId::new("test.user@example.com"))
            .unwrap();
        assert_eq!(receipt.message(), "Signed up test.user@example.com for Chess Club");

        let snapshot = catalog.snapshot();
        let chess = snapshot.iter().find(|v| v.name == "Chess Club").unwrap();
        assert_eq!(chess.participants, vec!["test.user@example.com"]);
        assert!(catalog.check_invariants());
    }

    #[test]
    fn test_signup_unknown_activity() {
        let mut catalog = catalog();
        let before = catalog.snapshot();

        let err = catalog
            .signup("Nonexistent Club", ParticipantId::new("a@mergington.edu"))
            .unwrap_err();
        assert!(matches!(err, EnrollmentError::UnknownActivity(_)));

        // Catalog unchanged on failure.
        assert_eq!(catalog.snapshot(), before);
    }

    #[test]
    fn test_duplicate_signup_rejected() {
        let mut catalog = catalog();
        let email = ParticipantId::new("dup@example.com");

        catalog.signup("Chess Club", email.clone()).unwrap();
        let err = catalog.signup("Chess Club", email).unwrap_err();

        assert!(matches!(err, EnrollmentError::AlreadyEnrolled { .. }));
        assert!(err.to_string().contains("already signed up"));
        let chess = catalog.activity("Chess Club").unwrap();
        assert_eq!(chess.enrolled(), 1);
    }

    #[test]
    fn test_cross_activity_signup_rejected() {
        let mut catalog = catalog();
        let email = ParticipantId::new("dup@example.com");

        catalog.signup("Chess Club", email.clone()).unwrap();
        let err = catalog.signup("Programming Class", email.clone()).unwrap_err();

        match err {
            EnrollmentError::AlreadyEnrolled { activity, .. } => {
                // The error names where the identity already is.
                assert_eq!(activity.as_str(), "Chess Club");
            }
            other => panic!("expected AlreadyEnrolled, got {other:?}"),
        }

        // Still enrolled only in the first activity.
        assert_eq!(catalog.enrollment_of(&email).map(ActivityName::as_str), Some("Chess Club"));
        assert_eq!(catalog.activity("Programming Class").unwrap().enrolled(), 0);
        assert!(catalog.check_invariants());
    }

    #[test]
    fn test_capacity_enforced() {
        let mut catalog = catalog();

        catalog.signup("Chess Club", ParticipantId::new("a@mergington.edu")).unwrap();
        catalog.signup("Chess Club", ParticipantId::new("b@mergington.edu")).unwrap();

        let err = catalog
            .signup("Chess Club", ParticipantId::new("c@mergington.edu"))
            .unwrap_err();
        assert_eq!(
            err,
            EnrollmentError::ActivityFull {
                activity: ActivityName::new("Chess Club"),
                capacity: 2,
            }
        );

        let chess = catalog.activity("Chess Club").unwrap();
        assert_eq!(chess.enrolled(), chess.max_participants);
        assert!(catalog.check_invariants());
    }

    #[test]
    fn test_signup_unregister_round_trip() {
        let mut catalog = catalog();
        let before = catalog.snapshot();
        let email = ParticipantId::new("test.user@example.com");

        catalog.signup("Chess Club", email.clone()).unwrap();
        let receipt = catalog.unregister("Chess Club", &email).unwrap();
        assert_eq!(receipt.message(), "Unregistered test.user@example.com from Chess Club");

        // Back to the exact prior state, everywhere.
        assert_eq!(catalog.snapshot(), before);
        assert_eq!(catalog.enrollment_of(&email), None);
    }

    #[test]
    fn test_resignup_after_unregister_allowed() {
        let mut catalog = catalog();
        let email = ParticipantId::new("back@mergington.edu");

        catalog.signup("Chess Club", email.clone()).unwrap();
        catalog.unregister("Chess Club", &email).unwrap();
        assert!(catalog.signup("Chess Club", email.clone()).is_ok());
        assert_eq!(catalog.enrollment_of(&email).map(ActivityName::as_str), Some("Chess Club"));
    }

    #[test]
    fn test_unregister_unknown_activity() {
        let mut catalog = catalog();
        let err = catalog
            .unregister("Nonexistent Club", &ParticipantId::new("a@mergington.edu"))
            .unwrap_err();
        assert!(matches!(err, EnrollmentError::UnknownActivity(_)));
    }

    #[test]
    fn test_unregister_non_member() {
        let mut catalog = catalog();
        let before = catalog.snapshot();

        let err = catalog
            .unregister("Chess Club", &ParticipantId::new("ghost@mergington.edu"))
            .unwrap_err();
        assert!(matches!(err, EnrollmentError::NotEnrolled { .. }));
        assert_eq!(catalog.snapshot(), before);
    }

    #[test]
    fn test_unregister_scoped_to_named_activity() {
        let mut catalog = catalog();
        let email = ParticipantId::new("elsewhere@mergington.edu");

        catalog.signup("Chess Club", email.clone()).unwrap();

        // Enrolled, but not in Programming Class: scoped check fails.
        let err = catalog.unregister("Programming Class", &email).unwrap_err();
        assert!(matches!(err, EnrollmentError::NotEnrolled { .. }));

        // Unchanged: still enrolled in Chess Club.
        assert_eq!(catalog.enrollment_of(&email).map(ActivityName::as_str), Some("Chess Club"));
    }

    #[test]
    fn test_unregister_then_unregister_again_fails() {
        let mut catalog = catalog();
        let email = ParticipantId::new("once@mergington.edu");

        catalog.signup("Chess Club", email.clone()).unwrap();
        catalog.unregister("Chess Club", &email).unwrap();

        let err = catalog.unregister("Chess Club", &email).unwrap_err();
        assert!(matches!(err, EnrollmentError::NotEnrolled { .. }));
    }

    #[test]
    fn test_snapshot_order_matches_seed() {
        let catalog = Catalog::from_seed(default_seed()).unwrap();
        let names: Vec<String> = catalog.snapshot().into_iter().map(|v| v.name).collect();
        let seed_names: Vec<String> = default_seed().into_iter().map(|s| s.name).collect();
        assert_eq!(names, seed_names);
    }

    #[test]
    fn test_lookup_is_exact_match() {
        let catalog = catalog();
        assert!(catalog.activity("Chess Club").is_some());
        assert!(catalog.activity("chess club").is_none());
        assert!(catalog.activity("Chess Club ").is_none());
        assert!(catalog.activity("").is_none());
    }

    #[test]
    fn test_invariants_hold_under_mixed_operations() {
        let mut catalog = Catalog::from_seed(default_seed()).unwrap();

        for i in 0..8 {
            let email = ParticipantId::new(format!("student{i}@mergington.edu"));
            catalog.signup("Chess Club", email).unwrap();
        }
        catalog
            .unregister("Chess Club", &ParticipantId::new("student3@mergington.edu"))
            .unwrap();
        catalog
            .signup("Programming Class", ParticipantId::new("student3@mergington.edu"))
            .unwrap();

        assert!(catalog.check_invariants());
        assert_eq!(catalog.activity("Chess Club").unwrap().enrolled(), 7);
        assert_eq!(catalog.activity("Programming Class").unwrap().enrolled(), 1);
    }
}
