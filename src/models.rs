use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::errors::ClientError;

/// Supported third-party playlist platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Netease,
    Qq,
}

impl FromStr for Source {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "netease" => Ok(Source::Netease),
            "qq" => Ok(Source::Qq),
            other => Err(ClientError::Validation(format!(
                "unsupported playlist source '{}': expected 'netease' or 'qq'",
                other
            ))),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Netease => write!(f, "netease"),
            Source::Qq => write!(f, "qq"),
        }
    }
}

/// Body of POST /playlist/extract. Built once per user action and discarded.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionRequest {
    pub source: Source,
    pub url_or_id: String,
}

/// One track from the source playlist. Unknown fields the server attaches
/// (album, duration, ...) are carried through rather than dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub title: String,
    pub artist: String,
    #[serde(flatten, default)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Successful body of POST /playlist/extract. Song order is the source
/// playlist order; the list may be empty.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractedPlaylist {
    #[serde(default)]
    pub playlist_title: String,
    pub songs: Vec<Song>,
}

/// The two import modes the backend recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportMode {
    CreateNew,
    UpdateExisting,
}

impl ImportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportMode::CreateNew => "create_new",
            ImportMode::UpdateExisting => "update_existing",
        }
    }
}

impl FromStr for ImportMode {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "create_new" => Ok(ImportMode::CreateNew),
            "update_existing" => Ok(ImportMode::UpdateExisting),
            other => Err(ClientError::Validation(format!(
                "invalid import mode '{}': expected 'create_new' or 'update_existing'",
                other
            ))),
        }
    }
}

impl fmt::Display for ImportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw form values for starting an import, as collected from the user.
/// The import mode is still a free string here; `validate` turns the form
/// into an `ImportRequest` or rejects it before anything hits the network.
#[derive(Debug, Clone)]
pub struct ImportForm {
    pub playlist_url: String,
    pub plex_url: String,
    pub plex_token: String,
    pub plex_playlist_name: String,
    pub import_mode: String,
}

impl ImportForm {
    pub fn validate(self) -> Result<ImportRequest, ClientError> {
        let import_mode = self.import_mode.parse::<ImportMode>()?;
        Ok(ImportRequest {
            playlist_url: self.playlist_url,
            plex_url: self.plex_url,
            plex_token: self.plex_token,
            plex_playlist_name: self.plex_playlist_name,
            import_mode,
        })
    }
}

/// Validated body of POST /import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportRequest {
    pub playlist_url: String,
    pub plex_url: String,
    pub plex_token: String,
    pub plex_playlist_name: String,
    pub import_mode: ImportMode,
}

/// Opaque server-side job identifier. Owned by one polling session; a new
/// import always gets a fresh handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskHandle(pub String);

impl TaskHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Coarse job phase as reported by the status endpoint.
///
/// The server emits more in-progress labels than we care to distinguish
/// ("processing", "matching", ...); anything that is not pending, completed
/// or failed counts as running. "error" is an alternate failure label some
/// server versions emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl<'de> Deserialize<'de> for JobStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(match s.as_str() {
            "pending" => JobStatus::Pending,
            "completed" => JobStatus::Completed,
            "failed" | "error" => JobStatus::Failed,
            _ => JobStatus::Running,
        })
    }
}

/// One polled snapshot of GET /import/status/{task_id}. Not persisted; each
/// poll overwrites the previous one. A body without a `status` field fails
/// deserialization and is reported as a parse error by the poller.
///
/// Older server versions report the processed count under `progress`.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskStatus {
    pub status: JobStatus,
    #[serde(default, alias = "progress")]
    pub processed: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
}

impl TaskStatus {
    /// Completion percentage, when the snapshot carries usable counts.
    /// total == 0 yields None (indeterminate), never a division by zero.
    pub fn percent(&self) -> Option<u8> {
        match (self.processed, self.total) {
            (Some(processed), Some(total)) if total > 0 => {
                let pct = (processed as f64 / total as f64 * 100.0).round();
                Some(pct.min(100.0) as u8)
            }
            _ => None,
        }
    }

    pub fn counts(&self) -> Option<(u64, u64)> {
        match (self.processed, self.total) {
            (Some(p), Some(t)) => Some((p, t)),
            _ => None,
        }
    }
}

/// Plex connection settings stored server-side (GET/POST /config/plex).
/// All fields optional so a POST can be a partial update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlexConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plex_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plex_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plex_playlist_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plex_import_mode: Option<String>,
}
