//! Seed definitions for the activity catalog.
//!
//! The catalog is populated exactly once at process start, either from
//! the built-in default seed or from a TOML file of `[[activity]]`
//! tables. Seed problems are startup errors, distinct from runtime
//! enrollment errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One activity entry in a seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedActivity {
    /// Unique activity name
    pub name: String,

    /// Free-text description
    pub description: String,

    /// Free-text meeting schedule
    pub schedule: String,

    /// Positive enrollment capacity
    pub max_participants: u32,
}

/// Root of a TOML seed file.
///
/// ```toml
/// [[activity]]
/// name = "Chess Club"
/// description = "Learn strategies and compete in chess tournaments"
/// schedule = "Fridays, 3:30 PM - 5:00 PM"
/// max_participants = 12
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedFile {
    /// The activities to seed the catalog with, in listing order.
    #[serde(default)]
    pub activity: Vec<SeedActivity>,
}

/// Errors detected while building a catalog from a seed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeedError {
    /// An activity entry has an empty name.
    #[error("seed entry {position} has an empty activity name")]
    EmptyName { position: usize },

    /// Two entries share the same name (exact match).
    #[error("duplicate activity in seed: {0}")]
    DuplicateName(String),

    /// An entry declares a capacity of zero.
    #[error("activity {0} has zero capacity")]
    ZeroCapacity(String),
}

/// Returns the built-in default catalog seed.
///
/// Mirrors the school's published activity roster. "Chess Club" and
/// "Programming Class" are load-bearing names for external clients and
/// must stay in any replacement seed.
pub fn default_seed() -> Vec<SeedActivity> {
    vec![
        SeedActivity {
            name: "Chess Club".to_string(),
            description: "Learn strategies and compete in chess tournaments".to_string(),
            schedule: "Fridays, 3:30 PM - 5:00 PM".to_string(),
            max_participants: 12,
        },
        SeedActivity {
            name: "Programming Class".to_string(),
            description: "Learn programming fundamentals and build software projects".to_string(),
            schedule: "Tuesdays and Thursdays, 3:30 PM - 4:30 PM".to_string(),
            max_participants: 20,
        },
        SeedActivity {
            name: "Gym Class".to_string(),
            description: "Physical education and sports activities".to_string(),
            schedule: "Mondays, Wednesdays, Fridays, 2:00 PM - 3:00 PM".to_string(),
            max_participants: 30,
        },
        SeedActivity {
            name: "Soccer Team".to_string(),
            description: "Join the school soccer team and compete in matches".to_string(),
            schedule: "Tuesdays and Thursdays, 4:00 PM - 5:30 PM".to_string(),
            max_participants: 22,
        },
        SeedActivity {
            name: "Basketball Team".to_string(),
            description: "Practice and play basketball with the school team".to_string(),
            schedule: "Wednesdays and Fridays, 3:30 PM - 5:00 PM".to_string(),
            max_participants: 15,
        },
        SeedActivity {
            name: "Art Club".to_string(),
            description: "Explore your creativity through painting and drawing".to_string(),
            schedule: "Thursdays, 3:30 PM - 5:00 PM".to_string(),
            max_participants: 15,
        },
        SeedActivity {
            name: "Drama Club".to_string(),
            description: "Act, direct, and produce plays and performances".to_string(),
            schedule: "Mondays and Wednesdays, 4:00 PM - 5:30 PM".to_string(),
            max_participants: 20,
        },
        SeedActivity {
            name: "Math Club".to_string(),
            description: "Solve challenging problems and prepare for math competitions".to_string(),
            schedule: "Tuesdays, 3:30 PM - 4:30 PM".to_string(),
            max_participants: 10,
        },
        SeedActivity {
            name: "Debate Team".to_string(),
            description: "Develop public speaking and argumentation skills".to_string(),
            schedule: "Fridays, 4:00 PM - 5:30 PM".to_string(),
            max_participants: 12,
        },
    ]
}
