//! Command implementations
//!
//! Each command writes its human-readable result to `out`; logs go through
//! `tracing` so they can be filtered separately.

use crate::config::CliConfig;
use crate::error::{CliError, Result};
use crate::output::LoggingOutput;
use amuzz_client::AmuzzClient;
use amuzz_core::{PlaylistGateway, PlaylistId, PlaylistSummary, Track, TrackId};
use amuzz_playback::{PlayerController, PlayerEvent};
use amuzz_playlists::{EventBus, LoadOutcome, PlaylistCountReconciler};
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info};

/// Options for [`App::play_queue`]
#[derive(Debug, Clone, Copy, Default)]
pub struct QueueOptions {
    /// Tracks to play (default: the whole queue)
    pub steps: Option<usize>,
    /// Walk with `previous_track` instead of `next_track`
    pub reverse: bool,
    /// Print every player event as a JSON line
    pub show_events: bool,
}

/// Shared context for every command
pub struct App {
    config: CliConfig,
    client: Arc<AmuzzClient>,
}

impl App {
    pub fn new(config: CliConfig) -> Result<Self> {
        config.validate()?;
        let client = AmuzzClient::new(config.client_config())?;
        Ok(Self {
            config,
            client: Arc::new(client),
        })
    }

    pub fn config(&self) -> &CliConfig {
        &self.config
    }

    /// Build a reconciler on a private bus and load the current counts
    async fn reconciler(&self) -> Result<Arc<PlaylistCountReconciler>> {
        let gateway: Arc<dyn PlaylistGateway> = self.client.clone();
        let reconciler = PlaylistCountReconciler::new(
            self.config.player.source.clone(),
            gateway,
            self.config.token()?,
            EventBus::new(),
        );

        if let LoadOutcome::Applied {
            playlists,
            fallback_counts,
        } = reconciler.load_all().await?
        {
            debug!(playlists, fallback_counts, "Playlists loaded");
        }
        Ok(reconciler)
    }

    // ===== Playlists =====

    /// `playlists`: every playlist with its reconciled song count
    pub async fn list_playlists(&self, out: &mut impl Write) -> Result<()> {
        let reconciler = self.reconciler().await?;
        let playlists = reconciler.playlists();
        reconciler.detach();

        if playlists.is_empty() {
            writeln!(out, "No playlists")?;
            return Ok(());
        }

        for playlist in &playlists {
            write_playlist(out, playlist)?;
        }
        Ok(())
    }

    /// `create-playlist <name>`
    pub async fn create_playlist(&self, name: &str, out: &mut impl Write) -> Result<()> {
        let reconciler = self.reconciler().await?;
        let created = reconciler.create_playlist(name).await;
        reconciler.detach();

        let created = created?;
        writeln!(out, "Created playlist {} ({})", created.name, created.id)?;
        Ok(())
    }

    /// `add-song <playlist> --mood <mood> [--index n]`
    ///
    /// Picks a track from the mood suggestions and adds it to the playlist.
    pub async fn add_song(
        &self,
        playlist_id: &str,
        mood: &str,
        index: usize,
        out: &mut impl Write,
    ) -> Result<()> {
        let tracks = self.client.fetch_mood_tracks(mood).await?;
        let track = tracks.get(index).ok_or_else(|| {
            CliError::NotFound(format!(
                "no track #{} among {} \"{}\" suggestions",
                index,
                tracks.len(),
                mood
            ))
        })?;

        let playlist_id = PlaylistId::from(playlist_id);
        let reconciler = self.reconciler().await?;
        let result = reconciler.add_song(&playlist_id, track).await;
        let count = reconciler.song_count(&playlist_id);
        reconciler.detach();
        result?;

        writeln!(
            out,
            "Added \"{}\" by {} to {}{}",
            track.name,
            track.artist,
            playlist_id,
            count_suffix(count)
        )?;
        Ok(())
    }

    /// `remove-song <playlist> <song>`
    pub async fn remove_song(
        &self,
        playlist_id: &str,
        song_id: &str,
        out: &mut impl Write,
    ) -> Result<()> {
        let playlist_id = PlaylistId::from(playlist_id);
        let reconciler = self.reconciler().await?;
        let result = reconciler
            .remove_song(&playlist_id, &TrackId::from(song_id))
            .await;
        let count = reconciler.song_count(&playlist_id);
        reconciler.detach();
        result?;

        writeln!(
            out,
            "Removed {} from {}{}",
            song_id,
            playlist_id,
            count_suffix(count)
        )?;
        Ok(())
    }

    /// `delete-playlist <playlist>`
    pub async fn delete_playlist(&self, playlist_id: &str, out: &mut impl Write) -> Result<()> {
        let playlist_id = PlaylistId::from(playlist_id);
        let reconciler = self.reconciler().await?;
        let result = reconciler.delete_playlist(&playlist_id).await;
        let remaining = reconciler.len();
        reconciler.detach();
        result?;

        writeln!(
            out,
            "Deleted playlist {} ({} remaining)",
            playlist_id, remaining
        )?;
        Ok(())
    }

    // ===== Mood =====

    /// `mood <mood>`: suggestions for a mood, no token needed
    pub async fn mood_tracks(&self, mood: &str, out: &mut impl Write) -> Result<()> {
        let tracks = self.client.fetch_mood_tracks(mood).await?;
        if tracks.is_empty() {
            writeln!(out, "No tracks for \"{}\"", mood)?;
            return Ok(());
        }

        for (index, track) in tracks.iter().enumerate() {
            write_track(out, index, track)?;
        }
        Ok(())
    }

    /// `queue <mood>`: open the player on the mood suggestions and step
    /// through the queue
    ///
    /// Navigation wraps at both ends. Runs the real controller against
    /// [`LoggingOutput`], confirming each start the way a browser audio
    /// element would.
    pub async fn play_queue(
        &self,
        mood: &str,
        options: QueueOptions,
        out: &mut impl Write,
    ) -> Result<()> {
        let tracks = self.client.fetch_mood_tracks(mood).await?;
        let Some(first) = tracks.first().cloned() else {
            return Err(CliError::NotFound(format!("no tracks for \"{}\"", mood)));
        };
        let plays = options.steps.unwrap_or(tracks.len()).max(1);

        let mut player = PlayerController::new(
            self.config.player_config(),
            Box::new(LoggingOutput::new()),
        );
        player.open_player(first, tracks);
        info!(mood, queue = player.queue().len(), plays, "Queue opened");

        for step in 0..plays {
            if step > 0 && options.reverse {
                player.previous_track();
            } else if step > 0 {
                player.next_track();
            }
            confirm_playback(&mut player);

            if let (Some(index), Some(track)) = (player.current_index(), player.current_track()) {
                let marker = if player.is_playing() { ">" } else { "!" };
                writeln!(out, "{} [{}] {} - {}", marker, index, track.name, track.artist)?;
            }
            if let Some(error) = player.last_error() {
                writeln!(out, "  error: {}", error)?;
            }
            write_events(out, &mut player, options.show_events)?;
        }

        player.close_player();
        write_events(out, &mut player, options.show_events)?;
        Ok(())
    }
}

/// Report the start confirmation a media element sends after a bind
///
/// Nothing is decoded here, so no metadata arrives and the duration stays
/// unknown; the track's duration hint is only used for listings.
fn confirm_playback(player: &mut PlayerController) {
    if let Some(load_id) = player.active_load() {
        player.on_play_started(load_id);
    }
}

fn write_events(
    out: &mut impl Write,
    player: &mut PlayerController,
    show_events: bool,
) -> Result<()> {
    let events: Vec<PlayerEvent> = player.drain_events();
    if !show_events {
        return Ok(());
    }
    for event in &events {
        let line = serde_json::to_string(event).map_err(std::io::Error::from)?;
        writeln!(out, "  {}", line)?;
    }
    Ok(())
}

fn write_playlist(out: &mut impl Write, playlist: &PlaylistSummary) -> std::io::Result<()> {
    let kind = if playlist.has_real_count {
        "REAL"
    } else {
        "FALLBACK"
    };
    writeln!(
        out,
        "{}\t{}\t{} songs\t{}",
        playlist.id, playlist.name, playlist.song_count, kind
    )
}

fn write_track(out: &mut impl Write, index: usize, track: &Track) -> std::io::Result<()> {
    match track.duration_seconds {
        Some(seconds) if seconds.is_finite() && seconds >= 0.0 => {
            let total = seconds.round() as u64;
            writeln!(
                out,
                "[{}] {} - {} ({}:{:02})",
                index,
                track.name,
                track.artist,
                total / 60,
                total % 60
            )
        }
        _ => writeln!(out, "[{}] {} - {}", index, track.name, track.artist),
    }
}

fn count_suffix(count: Option<u32>) -> String {
    match count {
        Some(1) => " (1 song)".to_string(),
        Some(n) => format!(" ({} songs)", n),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_suffix_pluralizes() {
        assert_eq!(count_suffix(Some(1)), " (1 song)");
        assert_eq!(count_suffix(Some(0)), " (0 songs)");
        assert_eq!(count_suffix(None), "");
    }

    #[test]
    fn playlist_line_marks_fallback() {
        let mut playlist = PlaylistSummary::new("7", "Morning");
        playlist.set_fallback_count();

        let mut out = Vec::new();
        write_playlist(&mut out, &playlist).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "7\tMorning\t0 songs\tFALLBACK\n");
    }

    #[test]
    fn track_line_formats_duration() {
        let track = Track::new("1", "Sunrise", "Nadia", "https://cdn.example.com/1.mp3")
            .with_duration(185.4);

        let mut out = Vec::new();
        write_track(&mut out, 0, &track).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[0] Sunrise - Nadia (3:05)\n");
    }
}
