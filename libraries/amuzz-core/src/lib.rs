//! Amuzz Core
//!
//! Platform-agnostic domain types, the backend gateway contract and its
//! error type, shared by the player, the playlist reconciler and the HTTP
//! client.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `PlaylistSummary`, `TrackId`, `PlaylistId`
//! - **Gateway Trait**: `PlaylistGateway`, the request/response contract with the backend
//! - **Error Handling**: `GatewayError` and its `Result` alias
//!
//! # Example
//!
//! ```rust
//! use amuzz_core::types::{PlaylistSummary, Track};
//!
//! let track = Track::new("42", "Sunrise", "Nadia", "https://cdn.example.com/42.mp3");
//! assert_eq!(track.id.as_str(), "42");
//!
//! let playlist = PlaylistSummary::new("7", "Morning");
//! assert_eq!(playlist.song_count, 0);
//! assert!(!playlist.has_real_count);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{GatewayError, Result};
pub use traits::PlaylistGateway;
pub use types::{AuthToken, PlaylistId, PlaylistSummary, Track, TrackId};
