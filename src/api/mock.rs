use super::ImportBackend;
use crate::errors::ClientError;
use crate::models::{
    ExtractedPlaylist, ExtractionRequest, ImportRequest, PlexConfig, Song, TaskHandle, TaskStatus,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tracing::info;

/// A simple scripted backend used in tests and when no real server is
/// reachable. It logs operations, counts calls and replays a fixed sequence
/// of status snapshots (the last one repeats once the script runs out).
pub struct MockBackend {
    songs: Vec<Song>,
    statuses: Mutex<Vec<TaskStatus>>,
    next_status: AtomicUsize,
    pub extract_calls: AtomicUsize,
    pub start_calls: AtomicUsize,
    pub status_calls: AtomicUsize,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            songs: Vec::new(),
            statuses: Mutex::new(Vec::new()),
            next_status: AtomicUsize::new(0),
            extract_calls: AtomicUsize::new(0),
            start_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_songs(mut self, songs: Vec<Song>) -> Self {
        self.songs = songs;
        self
    }

    pub fn with_statuses(self, statuses: Vec<TaskStatus>) -> Self {
        *self.statuses.lock().unwrap() = statuses;
        self
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImportBackend for MockBackend {
    async fn extract_playlist(
        &self,
        request: &ExtractionRequest,
    ) -> Result<ExtractedPlaylist, ClientError> {
        self.extract_calls.fetch_add(1, Ordering::SeqCst);
        info!("MockBackend: extract {} {}", request.source, request.url_or_id);
        Ok(ExtractedPlaylist {
            playlist_title: "mock playlist".into(),
            songs: self.songs.clone(),
        })
    }

    async fn start_import(&self, request: &ImportRequest) -> Result<TaskHandle, ClientError> {
        let n = self.start_calls.fetch_add(1, Ordering::SeqCst) + 1;
        info!(
            "MockBackend: start import of {} into '{}' ({})",
            request.playlist_url, request.plex_playlist_name, request.import_mode
        );
        Ok(TaskHandle(format!("mock-task-{}", n)))
    }

    async fn import_status(&self, handle: &TaskHandle) -> Result<TaskStatus, ClientError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let statuses = self.statuses.lock().unwrap();
        if statuses.is_empty() {
            return Err(ClientError::Request {
                status: 404,
                message: format!("no scripted status for task {}", handle),
            });
        }
        let idx = self
            .next_status
            .fetch_add(1, Ordering::SeqCst)
            .min(statuses.len() - 1);
        Ok(statuses[idx].clone())
    }

    async fn plex_config(&self) -> Result<PlexConfig, ClientError> {
        Ok(PlexConfig {
            plex_url: Some("http://mock-plex:32400".into()),
            plex_token: Some("mock-token".into()),
            plex_playlist_name: Some("Plexlist".into()),
            plex_import_mode: Some("create_new".into()),
        })
    }

    async fn save_plex_config(&self, config: &PlexConfig) -> Result<(), ClientError> {
        info!("MockBackend: save plex config {:?}", config);
        Ok(())
    }
}
