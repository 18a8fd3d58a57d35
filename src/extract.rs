use crate::api::ImportBackend;
use crate::errors::ClientError;
use crate::models::{ExtractedPlaylist, ExtractionRequest, Source};
use std::sync::Arc;
use tracing::info;

/// Extraction client: one request-response exchange per call, no retries.
/// An empty song list is a successful outcome, distinct from any error;
/// callers use that distinction to decide whether to show results at all.
pub struct ExtractionClient {
    backend: Arc<dyn ImportBackend>,
}

impl ExtractionClient {
    pub fn new(backend: Arc<dyn ImportBackend>) -> Self {
        Self { backend }
    }

    /// Extraction is read-only on the server, so re-issuing the same call
    /// after a failure is safe; this client just never does it on its own.
    pub async fn extract(
        &self,
        source: Source,
        url_or_id: &str,
    ) -> Result<ExtractedPlaylist, ClientError> {
        let request = ExtractionRequest {
            source,
            url_or_id: url_or_id.trim().to_string(),
        };
        let playlist = self.backend.extract_playlist(&request).await?;
        info!(
            "extracted {} songs from {} playlist '{}'",
            playlist.songs.len(),
            source,
            playlist.playlist_title
        );
        Ok(playlist)
    }
}
