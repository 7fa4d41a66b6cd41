//! Playlist song-count reconciliation
//!
//! Keeps a local, best-effort projection of the user's playlists and their
//! song counts. Counts are adjusted incrementally from bus events and only
//! become authoritative again on a full or per-playlist reload. Two surfaces
//! mutating the same playlist concurrently can drift until the next reload.

use crate::{
    bus::{EventBus, SubscriptionId},
    error::{ReconcileError, Result},
    event::{source_or_unknown, PlaylistAction, PlaylistEvent},
};
use amuzz_core::{AuthToken, PlaylistGateway, PlaylistId, PlaylistSummary, Track, TrackId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Pending refresh requests per reconciler
const REFRESH_QUEUE_CAPACITY: usize = 100;

/// Outcome of [`PlaylistCountReconciler::load_all`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The projection was replaced
    Applied {
        playlists: usize,
        fallback_counts: usize,
    },
    /// A newer load was applied, or the reconciler was detached, while this
    /// one was in flight; its results were thrown away
    Discarded,
}

/// Work for the background refresh task
#[derive(Debug, Clone, PartialEq, Eq)]
enum RefreshRequest {
    All,
    Playlist(PlaylistId),
}

#[derive(Debug, Default)]
struct Projection {
    playlists: HashMap<PlaylistId, PlaylistSummary>,
    /// Listing order, for display
    order: Vec<PlaylistId>,
}

impl Projection {
    fn replace(&mut self, playlists: Vec<PlaylistSummary>) {
        self.playlists.clear();
        self.order.clear();
        for playlist in playlists {
            if self.playlists.contains_key(&playlist.id) {
                continue;
            }
            self.order.push(playlist.id.clone());
            self.playlists.insert(playlist.id.clone(), playlist);
        }
    }

    fn insert_if_absent(&mut self, playlist: PlaylistSummary) -> bool {
        if self.playlists.contains_key(&playlist.id) {
            return false;
        }
        self.order.push(playlist.id.clone());
        self.playlists.insert(playlist.id.clone(), playlist);
        true
    }

    fn remove(&mut self, id: &PlaylistId) -> Option<PlaylistSummary> {
        self.order.retain(|o| o != id);
        self.playlists.remove(id)
    }

    fn ordered(&self) -> Vec<PlaylistSummary> {
        self.order
            .iter()
            .filter_map(|id| self.playlists.get(id).cloned())
            .collect()
    }
}

/// Shared playlist projection for one UI surface
///
/// One instance per surface (`source`). Construct with [`new`](Self::new),
/// which subscribes it to the bus and starts its refresh worker; call
/// [`detach`](Self::detach) when the surface goes away.
pub struct PlaylistCountReconciler {
    source: String,
    gateway: Arc<dyn PlaylistGateway>,
    token: AuthToken,
    bus: EventBus,
    projection: Mutex<Projection>,
    /// Ticket handed to each `load_all`
    load_epoch: AtomicU64,
    /// Ticket of the newest load that replaced the projection
    applied_epoch: AtomicU64,
    detached: AtomicBool,
    subscription: Mutex<Option<SubscriptionId>>,
    refresh_tx: Mutex<Option<mpsc::Sender<RefreshRequest>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl PlaylistCountReconciler {
    /// Create a reconciler for `source` and subscribe it to `bus`
    pub fn new(
        source: impl Into<String>,
        gateway: Arc<dyn PlaylistGateway>,
        token: AuthToken,
        bus: EventBus,
    ) -> Arc<Self> {
        let reconciler = Arc::new(Self {
            source: source_or_unknown(source),
            gateway,
            token,
            bus: bus.clone(),
            projection: Mutex::new(Projection::default()),
            load_epoch: AtomicU64::new(0),
            applied_epoch: AtomicU64::new(0),
            detached: AtomicBool::new(false),
            subscription: Mutex::new(None),
            refresh_tx: Mutex::new(None),
            worker: Mutex::new(None),
        });

        let weak: Weak<Self> = Arc::downgrade(&reconciler);
        let id = bus.subscribe(move |event| {
            if let Some(this) = weak.upgrade() {
                this.on_bus_event(event);
            }
        });
        *lock(&reconciler.subscription) = Some(id);
        reconciler.start_refresh_worker();

        debug!(source = %reconciler.source, "Reconciler attached");
        reconciler
    }

    /// Source tag this reconciler publishes under
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    // ===== Authoritative loads =====

    /// Reload every playlist and recount its songs
    ///
    /// The listing call must succeed; a per-playlist song fetch that fails
    /// leaves that playlist at a fallback count of 0 with `has_real_count`
    /// unset. If the listing already embeds a playlist's songs they are
    /// counted directly.
    ///
    /// Overlapping loads may finish in any order; a load is discarded only
    /// when a newer one has already been applied. A newer load that fails
    /// does not supersede anything.
    pub async fn load_all(&self) -> Result<LoadOutcome> {
        self.ensure_attached()?;
        let epoch = self.load_epoch.fetch_add(1, Ordering::SeqCst) + 1;

        let mut playlists = self.gateway.fetch_playlists(&self.token).await?;
        let mut fallback_counts = 0;

        for playlist in &mut playlists {
            if let Some(songs) = playlist.songs.take() {
                playlist.set_real_count(songs.len());
                continue;
            }

            match self
                .gateway
                .fetch_playlist_songs(&playlist.id, &self.token)
                .await
            {
                Ok(songs) => playlist.set_real_count(songs.len()),
                Err(e) => {
                    warn!(playlist_id = %playlist.id, error = %e, "Song count unavailable, using fallback");
                    playlist.set_fallback_count();
                    fallback_counts += 1;
                }
            }
        }

        let count = playlists.len();
        {
            let mut projection = lock(&self.projection);
            if self.is_detached() || self.applied_epoch.load(Ordering::SeqCst) > epoch {
                debug!(source = %self.source, epoch, "Discarding superseded load");
                return Ok(LoadOutcome::Discarded);
            }
            self.applied_epoch.store(epoch, Ordering::SeqCst);
            projection.replace(playlists);
        }

        info!(
            source = %self.source,
            playlists = count,
            fallback_counts,
            "Playlists loaded"
        );
        Ok(LoadOutcome::Applied {
            playlists: count,
            fallback_counts,
        })
    }

    /// Recount one playlist from the server
    ///
    /// On failure the local count is left as it was.
    pub async fn refresh_playlist(&self, playlist_id: &PlaylistId) -> Result<u32> {
        self.ensure_attached()?;
        let known = lock(&self.projection).playlists.contains_key(playlist_id);
        if !known {
            return Err(ReconcileError::UnknownPlaylist(playlist_id.to_string()));
        }

        let songs = self
            .gateway
            .fetch_playlist_songs(playlist_id, &self.token)
            .await?;

        self.ensure_attached()?;
        let mut projection = lock(&self.projection);
        let playlist = projection
            .playlists
            .get_mut(playlist_id)
            .ok_or_else(|| ReconcileError::UnknownPlaylist(playlist_id.to_string()))?;
        playlist.set_real_count(songs.len());

        debug!(%playlist_id, count = playlist.song_count, "Playlist recounted");
        Ok(playlist.song_count)
    }

    // ===== Event handling =====

    /// Apply an event to the local projection without contacting the server
    ///
    /// `playlist_updated` and `refresh` are queued for the refresh worker.
    pub fn apply_local(&self, event: &PlaylistEvent) {
        match event.action {
            PlaylistAction::SongAdded => self.adjust_count(event, |count| count.saturating_add(1)),
            PlaylistAction::SongRemoved => {
                self.adjust_count(event, |count| count.saturating_sub(1));
            }
            PlaylistAction::PlaylistCreated => {
                let Some(mut playlist) = event.playlist.clone() else {
                    warn!(source = %event.source, "playlist_created without playlist, ignoring");
                    return;
                };
                playlist.songs = None;
                let id = playlist.id.clone();
                if lock(&self.projection).insert_if_absent(playlist) {
                    debug!(playlist_id = %id, "Playlist added locally");
                } else {
                    debug!(playlist_id = %id, "Duplicate playlist_created ignored");
                }
            }
            PlaylistAction::PlaylistUpdated => match event.target() {
                Some(id) => self.queue_refresh(RefreshRequest::Playlist(id.clone())),
                None => self.queue_refresh(RefreshRequest::All),
            },
            PlaylistAction::Refresh => self.queue_refresh(RefreshRequest::All),
        }
    }

    /// Tag `event` with this reconciler's source, publish it and apply it
    pub fn publish(&self, event: PlaylistEvent) {
        let event = event.with_source(self.source.clone());
        self.bus.publish(&event);
        self.apply_local(&event);
    }

    /// Bus subscriber callback; own events were already applied by `publish`
    pub fn on_bus_event(&self, event: &PlaylistEvent) {
        if event.source == self.source {
            return;
        }
        if self.is_detached() {
            return;
        }
        self.apply_local(event);
    }

    // ===== Mutations =====
    //
    // Local state changes only after the server confirmed the mutation.

    /// Add `track` to a playlist, then announce `song_added`
    pub async fn add_song(&self, playlist_id: &PlaylistId, track: &Track) -> Result<()> {
        self.gateway
            .add_song_to_playlist(playlist_id, track, &self.token)
            .await?;
        info!(%playlist_id, track_id = %track.catalogue_id(), "Song added to playlist");
        self.publish(PlaylistEvent::song_added(playlist_id.clone(), self.source.as_str()));
        Ok(())
    }

    /// Remove a song from a playlist, then announce `song_removed`
    pub async fn remove_song(&self, playlist_id: &PlaylistId, song_id: &TrackId) -> Result<()> {
        self.gateway
            .delete_song(playlist_id, song_id, &self.token)
            .await?;
        info!(%playlist_id, %song_id, "Song removed from playlist");
        self.publish(PlaylistEvent::song_removed(playlist_id.clone(), self.source.as_str()));
        Ok(())
    }

    /// Create a playlist, then announce `playlist_created`
    pub async fn create_playlist(&self, name: &str) -> Result<PlaylistSummary> {
        let created = self.gateway.create_playlist(&self.token, name).await?;
        info!(playlist_id = %created.id, name = %created.name, "Playlist created");
        self.publish(PlaylistEvent::playlist_created(created.clone(), self.source.as_str()));
        Ok(created)
    }

    /// Delete a playlist, drop it locally and ask every surface to reload
    pub async fn delete_playlist(&self, playlist_id: &PlaylistId) -> Result<()> {
        self.gateway
            .delete_playlist(playlist_id, &self.token)
            .await?;
        lock(&self.projection).remove(playlist_id);
        info!(%playlist_id, "Playlist deleted");
        self.publish(PlaylistEvent::refresh(self.source.as_str()));
        Ok(())
    }

    // ===== Background refresh =====

    /// Start the task that serves queued `refresh` / `playlist_updated` work
    ///
    /// Called by [`new`](Self::new); call it again if the reconciler was built
    /// outside a tokio runtime. Returns `false` when a worker is already
    /// running, when there is no runtime, or after [`detach`](Self::detach).
    /// Until a worker runs, refresh requests are dropped, not queued. The
    /// task ends when the reconciler is detached or dropped.
    pub fn start_refresh_worker(self: &Arc<Self>) -> bool {
        let mut worker = lock(&self.worker);
        if self.is_detached() {
            return false;
        }
        if worker.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return false;
        }
        let Ok(runtime) = Handle::try_current() else {
            debug!(source = %self.source, "No runtime, refresh worker not started");
            return false;
        };

        let (tx, mut rx) = mpsc::channel(REFRESH_QUEUE_CAPACITY);
        *lock(&self.refresh_tx) = Some(tx);

        let weak = Arc::downgrade(self);
        let source = self.source.clone();
        *worker = Some(runtime.spawn(async move {
            debug!(%source, "Refresh worker started");
            while let Some(first) = rx.recv().await {
                let mut batch = vec![first];
                while let Ok(next) = rx.try_recv() {
                    batch.push(next);
                }

                let Some(this) = weak.upgrade() else { break };
                if this.is_detached() {
                    break;
                }
                this.serve(batch).await;
            }
            debug!(%source, "Refresh worker stopped");
        }));
        true
    }

    /// Whether refresh requests are currently being served
    pub fn has_refresh_worker(&self) -> bool {
        lock(&self.worker)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
            && lock(&self.refresh_tx).is_some()
    }

    async fn serve(&self, batch: Vec<RefreshRequest>) {
        if batch.contains(&RefreshRequest::All) {
            if let Err(e) = self.load_all().await {
                warn!(source = %self.source, error = %e, "Refresh failed");
            }
            return;
        }

        let mut seen: Vec<PlaylistId> = Vec::new();
        for request in batch {
            let RefreshRequest::Playlist(id) = request else {
                continue;
            };
            if seen.contains(&id) {
                continue;
            }
            if let Err(e) = self.refresh_playlist(&id).await {
                warn!(playlist_id = %id, error = %e, "Recount failed");
            }
            seen.push(id);
        }
    }

    // ===== Lifecycle =====

    /// Stop listening to the bus and discard in-flight loads
    ///
    /// Idempotent.
    pub fn detach(&self) {
        if self.detached.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(id) = lock(&self.subscription).take() {
            self.bus.unsubscribe(id);
        }
        let _worker = lock(&self.worker);
        lock(&self.refresh_tx).take();
        debug!(source = %self.source, "Reconciler detached");
    }

    pub fn is_detached(&self) -> bool {
        self.detached.load(Ordering::SeqCst)
    }

    // ===== Queries =====

    /// Playlists in listing order
    pub fn playlists(&self) -> Vec<PlaylistSummary> {
        lock(&self.projection).ordered()
    }

    pub fn get(&self, playlist_id: &PlaylistId) -> Option<PlaylistSummary> {
        lock(&self.projection).playlists.get(playlist_id).cloned()
    }

    pub fn song_count(&self, playlist_id: &PlaylistId) -> Option<u32> {
        lock(&self.projection)
            .playlists
            .get(playlist_id)
            .map(|p| p.song_count)
    }

    pub fn len(&self) -> usize {
        lock(&self.projection).playlists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ===== Internals =====

    fn adjust_count(&self, event: &PlaylistEvent, f: impl FnOnce(u32) -> u32) {
        let Some(id) = event.target() else {
            warn!(action = ?event.action, "Count event without playlist id, ignoring");
            return;
        };

        let mut projection = lock(&self.projection);
        match projection.playlists.get_mut(id) {
            Some(playlist) => {
                playlist.song_count = f(playlist.song_count);
                debug!(playlist_id = %id, count = playlist.song_count, action = ?event.action, "Count adjusted");
            }
            None => debug!(playlist_id = %id, "Event for unknown playlist ignored"),
        }
    }

    fn queue_refresh(&self, request: RefreshRequest) {
        let sent = match lock(&self.refresh_tx).as_ref() {
            Some(tx) => tx.try_send(request.clone()),
            None => {
                debug!(source = %self.source, ?request, "Refresh dropped, no worker");
                return;
            }
        };
        match sent {
            Ok(()) => debug!(source = %self.source, ?request, "Refresh queued"),
            Err(TrySendError::Full(_)) => {
                warn!(source = %self.source, ?request, "Refresh queue full, dropping request");
            }
            Err(TrySendError::Closed(_)) => {
                debug!(source = %self.source, ?request, "Refresh dropped, worker gone");
            }
        }
    }

    fn ensure_attached(&self) -> Result<()> {
        if self.is_detached() {
            Err(ReconcileError::Detached)
        } else {
            Ok(())
        }
    }
}

impl Drop for PlaylistCountReconciler {
    fn drop(&mut self) {
        if let Some(id) = lock(&self.subscription).take() {
            self.bus.unsubscribe(id);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
