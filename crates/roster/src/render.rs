//! Plain-text rendering of listings and events for stdout.

use roster_core::ActivityView;
use roster_protocol::{ChangeKind, EnrollmentChange};

/// Renders the full activity listing.
///
/// One block per activity, in catalog order:
///
/// ```text
/// Chess Club [1/12]
///   Learn strategies and compete in chess tournaments
///   Schedule: Fridays, 3:30 PM - 5:00 PM
///   Participants:
///     - test.user@example.com
/// ```
pub fn render_activities(activities: &[ActivityView]) -> String {
    if activities.is_empty() {
        return "No activities in the catalog.\n".to_string();
    }

    let mut out = String::new();
    for activity in activities {
        out.push_str(&format!(
            "{} [{}/{}]\n",
            activity.name,
            activity.enrolled(),
            activity.max_participants
        ));
        out.push_str(&format!("  {}\n", activity.description));
        out.push_str(&format!("  Schedule: {}\n", activity.schedule));

        if activity.participants.is_empty() {
            out.push_str("  Participants: none yet\n");
        } else {
            out.push_str("  Participants:\n");
            for participant in &activity.participants {
                out.push_str(&format!("    - {participant}\n"));
            }
        }
        out.push('\n');
    }
    out
}

/// Renders one enrollment change as a single watch line.
pub fn render_change(change: &EnrollmentChange) -> String {
    let verb = match change.kind {
        ChangeKind::SignedUp => "signed up for",
        ChangeKind::Unregistered => "left",
    };
    format!(
        "{} {} {} {}",
        change.at.format("%H:%M:%S"),
        change.participant,
        verb,
        change.activity
    )
}
