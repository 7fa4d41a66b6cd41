//! Playlist change propagation for Amuzz
//!
//! Several UI surfaces (player, search results, playlist modal) show the
//! same playlists. Each surface owns a [`PlaylistCountReconciler`]; they
//! share one [`EventBus`] and tell each other about mutations with
//! [`PlaylistEvent`]s.

mod bus;
mod error;
mod event;
mod reconciler;

// Public exports
pub use bus::{EventBus, SubscriptionId};
pub use error::{ReconcileError, Result};
pub use event::{PlaylistAction, PlaylistEvent, UNKNOWN_SOURCE};
pub use reconciler::{LoadOutcome, PlaylistCountReconciler};
