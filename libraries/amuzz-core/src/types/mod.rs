//! Domain types shared across the workspace

mod ids;
mod playlist;
mod track;

pub use ids::{AuthToken, PlaylistId, TrackId};
pub use playlist::PlaylistSummary;
pub use track::Track;
