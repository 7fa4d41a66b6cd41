//! Amuzz Backend Client
//!
//! HTTP implementation of [`amuzz_core::PlaylistGateway`] for the Amuzz
//! REST backend.
//!
//! # Endpoints
//!
//! - `GET /api/playlists`
//! - `POST /api/playlists`
//! - `DELETE /api/playlists/{id}`
//! - `GET /api/playlists/{id}/songs` (falls back to `GET /api/playlists/{id}` on 404)
//! - `POST /api/playlists/{id}/songs`
//! - `DELETE /api/playlists/{id}/songs/{songId}`
//! - `GET /api/music/mood/{mood}` (public)
//!
//! # Example
//!
//! ```ignore
//! use amuzz_client::{AmuzzClient, ClientConfig};
//! use amuzz_core::{AuthToken, PlaylistGateway};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AmuzzClient::new(ClientConfig::new("https://api.amuzz.app"))?;
//!
//!     let tracks = client.fetch_mood_tracks("happy").await?;
//!     println!("{} suggestions", tracks.len());
//!
//!     let token = AuthToken::new(std::env::var("AMUZZ_TOKEN")?);
//!     let playlists = client.fetch_playlists(&token).await?;
//!     println!("{} playlists", playlists.len());
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod payload;

// Re-export main types
pub use client::AmuzzClient;
pub use config::{ClientConfig, DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT};
pub use payload::SongPayload;
