//! Amuzz CLI Library
//!
//! Terminal front end over the Amuzz player core: lists playlists with
//! reconciled song counts, edits playlists and steps the player through a
//! mood queue.
//!
//! This library exposes the commands for testing purposes.

pub mod commands;
pub mod config;
pub mod error;
pub mod output;

// Re-export commonly used types for convenience
pub use commands::{App, QueueOptions};
pub use config::{CliConfig, DEFAULT_CONFIG_FILE};
pub use error::{CliError, Result};
pub use output::LoggingOutput;
