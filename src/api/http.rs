use super::ImportBackend;
use crate::errors::{self, ClientError};
use crate::models::{
    ExtractedPlaylist, ExtractionRequest, ImportRequest, PlexConfig, TaskHandle, TaskStatus,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// reqwest-backed backend client. One instance per API base; all endpoints
/// are joined onto `api_base` (e.g. "http://127.0.0.1:8000/api/v1").
pub struct HttpBackend {
    client: Client,
    api_base: String,
}

impl HttpBackend {
    pub fn new(api_base: &str, request_timeout: Duration) -> Result<Self, ClientError> {
        // Fail fast on an unusable base URL instead of on the first request.
        Url::parse(api_base)
            .map_err(|e| ClientError::Validation(format!("invalid api_base '{}': {}", api_base, e)))?;
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(ClientError::Transport)?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    /// Turn a non-success response body into a RequestError, funneling any
    /// JSON `detail` payload through the shared normalization.
    fn request_error(status: StatusCode, body: &str) -> ClientError {
        let message = match serde_json::from_str::<Value>(body) {
            Ok(v) => errors::message_from_error_body(&v),
            Err(_) => {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    errors::UNKNOWN_ERROR.to_string()
                } else {
                    trimmed.to_string()
                }
            }
        };
        ClientError::Request {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl ImportBackend for HttpBackend {
    async fn extract_playlist(
        &self,
        request: &ExtractionRequest,
    ) -> Result<ExtractedPlaylist, ClientError> {
        let url = self.endpoint("/playlist/extract");
        debug!("extracting {} playlist {}", request.source, request.url_or_id);
        let resp = self.client.post(&url).json(request).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            warn!("extract failed: HTTP {}", status);
            return Err(Self::request_error(status, &body));
        }
        serde_json::from_str(&body).map_err(|e| ClientError::Parse(e.to_string()))
    }

    async fn start_import(&self, request: &ImportRequest) -> Result<TaskHandle, ClientError> {
        let url = self.endpoint("/import");
        let resp = self.client.post(&url).json(request).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            warn!("import start failed: HTTP {}", status);
            return Err(Self::request_error(status, &body));
        }
        let v: Value =
            serde_json::from_str(&body).map_err(|e| ClientError::Parse(e.to_string()))?;
        let task_id = v
            .get("task_id")
            .and_then(|t| t.as_str())
            .ok_or_else(|| ClientError::Parse("import response has no task_id".into()))?;
        debug!("import task started: {}", task_id);
        Ok(TaskHandle(task_id.to_string()))
    }

    async fn import_status(&self, handle: &TaskHandle) -> Result<TaskStatus, ClientError> {
        let url = self.endpoint(&format!(
            "/import/status/{}",
            urlencoding::encode(handle.as_str())
        ));
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            // Status endpoint failures are plain HTTP failures; the body is
            // not guaranteed to be a structured detail payload.
            return Err(Self::request_error(status, &body));
        }
        serde_json::from_str(&body).map_err(|e| ClientError::Parse(e.to_string()))
    }

    async fn plex_config(&self) -> Result<PlexConfig, ClientError> {
        let url = self.endpoint("/config/plex");
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(Self::request_error(status, &body));
        }
        serde_json::from_str(&body).map_err(|e| ClientError::Parse(e.to_string()))
    }

    async fn save_plex_config(&self, config: &PlexConfig) -> Result<(), ClientError> {
        let url = self.endpoint("/config/plex");
        let resp = self.client.post(&url).json(config).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await?;
            return Err(Self::request_error(status, &body));
        }
        Ok(())
    }
}
