//! Enrollment registry using the Actor pattern.
//!
//! The enrollment actor is the single writer for all catalog state. It
//! receives commands via a tokio mpsc channel and is the canonical source
//! of truth for who is enrolled where.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐     ┌──────────────────┐
//! │ConnectionHandler│────▶│ EnrollmentActor  │────▶│ Broadcast Channel│
//! └─────────────────┘     └──────────────────┘     └──────────────────┘
//!         │                        │                        │
//!         │  EnrollmentCommand     │  owns Catalog          │ EnrollmentEvent
//!         │  (mpsc channel)        │  (seed order +         │ (subscribed
//!         ▼                        ▼   name index)          ▼  clients)
//!    list / signup /          sequential                 watch output
//!    unregister               check-then-act
//! ```
//!
//! Sequential command processing is what makes each operation's
//! check-then-act sequence atomic; see the actor docs.

use tokio::sync::{broadcast, mpsc};

use roster_core::Catalog;

mod actor;
mod commands;
mod handle;

pub use actor::EnrollmentActor;
pub use commands::{EnrollmentCommand, EnrollmentEvent, ServiceError};
pub use handle::EnrollmentHandle;

/// Channel buffer sizes
const COMMAND_BUFFER: usize = 100;
const EVENT_BUFFER: usize = 100;

/// Spawn the enrollment actor and return a handle for interaction.
///
/// This function:
/// 1. Creates the command and event channels
/// 2. Spawns the EnrollmentActor on a tokio task, giving it the catalog
/// 3. Returns an EnrollmentHandle for transport use
///
/// # Example
///
/// ```no_run
/// use roster_core::{default_seed, Catalog};
/// use rosterd::enrollment::spawn_enrollment;
///
/// #[tokio::main]
/// async fn main() {
///     let catalog = match Catalog::from_seed(default_seed()) {
///         Ok(catalog) => catalog,
///         Err(_) => return,
///     };
///     let handle = spawn_enrollment(catalog);
///
///     let activities = handle.list_activities().await;
/// }
/// ```
pub fn spawn_enrollment(catalog: Catalog) -> EnrollmentHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_BUFFER);
    let (event_tx, _) = broadcast::channel(EVENT_BUFFER);

    let actor = EnrollmentActor::new(cmd_rx, catalog, event_tx.clone());
    tokio::spawn(actor.run());

    EnrollmentHandle::new(cmd_tx, event_tx)
}
