pub mod http;
pub mod mock;

use crate::errors::ClientError;
use crate::models::{
    ExtractedPlaylist, ExtractionRequest, ImportRequest, PlexConfig, TaskHandle, TaskStatus,
};

/// Backend trait: the minimal HTTP surface the client consumes.
/// Implementations: http::HttpBackend and mock::MockBackend.
#[async_trait::async_trait]
pub trait ImportBackend: Send + Sync {
    /// One synchronous extraction exchange. Ok with an empty song list and
    /// an error are distinct outcomes.
    async fn extract_playlist(
        &self,
        request: &ExtractionRequest,
    ) -> Result<ExtractedPlaylist, ClientError>;

    /// Kick off an import job; returns the opaque task handle on success.
    async fn start_import(&self, request: &ImportRequest) -> Result<TaskHandle, ClientError>;

    /// Fetch the current status snapshot for a running job.
    async fn import_status(&self, handle: &TaskHandle) -> Result<TaskStatus, ClientError>;

    /// Read the Plex settings stored on the server.
    async fn plex_config(&self) -> Result<PlexConfig, ClientError>;

    /// Save (possibly partial) Plex settings on the server.
    async fn save_plex_config(&self, config: &PlexConfig) -> Result<(), ClientError>;
}
