//! Amuzz - command-line front end for the Amuzz player core
use amuzz_cli::{App, CliConfig, QueueOptions};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "amuzz")]
#[command(about = "Amuzz playlists and player from the terminal", long_about = None)]
struct Cli {
    /// Configuration file path (default: ./amuzz.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL
    #[arg(long, global = true, env = "AMUZZ_BACKEND_URL")]
    backend_url: Option<String>,

    /// Bearer token for playlist commands
    #[arg(long, global = true, env = "AMUZZ_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List playlists with their song counts
    Playlists,
    /// List the suggestions for a mood
    Mood {
        /// Mood name, e.g. "happy"
        mood: String,
    },
    /// Create an empty playlist
    CreatePlaylist {
        /// Playlist name
        name: String,
    },
    /// Add a mood suggestion to a playlist
    AddSong {
        /// Playlist id
        playlist: String,
        /// Mood to pick the song from
        #[arg(short, long)]
        mood: String,
        /// Position in the mood suggestions
        #[arg(short, long, default_value_t = 0)]
        index: usize,
    },
    /// Remove a song from a playlist
    RemoveSong {
        /// Playlist id
        playlist: String,
        /// Song id
        song: String,
    },
    /// Delete a playlist
    DeletePlaylist {
        /// Playlist id
        playlist: String,
    },
    /// Open the player on a mood queue and step through it
    Queue {
        /// Mood name
        mood: String,
        /// Number of tracks to play (default: whole queue)
        #[arg(short, long)]
        steps: Option<usize>,
        /// Walk the queue backwards
        #[arg(short, long)]
        reverse: bool,
        /// Print player events as JSON lines
        #[arg(long)]
        events: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "amuzz_cli=info,amuzz_playlists=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = CliConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.backend_url {
        config.backend.url = url;
    }
    if let Some(token) = cli.token {
        config.auth.token = token;
    }

    let app = App::new(config)?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Playlists => app.list_playlists(&mut out).await?,
        Commands::Mood { mood } => app.mood_tracks(&mood, &mut out).await?,
        Commands::CreatePlaylist { name } => app.create_playlist(&name, &mut out).await?,
        Commands::AddSong {
            playlist,
            mood,
            index,
        } => app.add_song(&playlist, &mood, index, &mut out).await?,
        Commands::RemoveSong { playlist, song } => {
            app.remove_song(&playlist, &song, &mut out).await?;
        }
        Commands::DeletePlaylist { playlist } => app.delete_playlist(&playlist, &mut out).await?,
        Commands::Queue {
            mood,
            steps,
            reverse,
            events,
        } => {
            let options = QueueOptions {
                steps,
                reverse,
                show_events: events,
            };
            app.play_queue(&mood, options, &mut out).await?;
        }
    }

    Ok(())
}
