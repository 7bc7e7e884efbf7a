//! Analysis request adapter: turns a chosen scan into one backend request
//! and the backend's reply into an [`AnalysisResult`].

pub mod api;
mod multipart;
pub mod result;
pub mod wire;

use std::path::{Path, PathBuf};

pub use api::{BackendEndpoint, HttpAnalysisBackend};
pub use result::AnalysisResult;

/// Fallback content type for files without a recognized extension.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Failures reported by the adapter. The trial flow treats every variant as
/// the same recoverable failure.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("HTTP error: {0}")]
    Transport(String),
    #[error("Server returned HTTP {code}: {body}")]
    Status { code: u16, body: String },
    #[error("Invalid JSON response: {0}")]
    Json(String),
    #[error("Response is missing required field `{0}`")]
    MissingField(&'static str),
    #[error("Invalid `{field}` in response: {detail}")]
    InvalidField { field: &'static str, detail: String },
}

/// File contents ready to be sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ScanUpload {
    /// Read the whole file into memory.
    pub fn read(
        path: &Path,
        file_name: &str,
        content_type: Option<&str>,
    ) -> Result<Self, AnalysisError> {
        let bytes = std::fs::read(path).map_err(|source| AnalysisError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            file_name: file_name.to_string(),
            content_type: content_type.unwrap_or(OCTET_STREAM).to_string(),
            bytes,
        })
    }
}

/// The inference service as seen by the trial flow.
///
/// Calls block; the controller runs them on worker threads.
pub trait AnalysisBackend: Send + Sync {
    /// Submit one scan and map the reply.
    fn predict(&self, upload: &ScanUpload) -> Result<AnalysisResult, AnalysisError>;

    /// Fetch the rendered segmentation image for a server-relative path.
    fn fetch_segmentation_image(&self, path: &str) -> Result<Vec<u8>, AnalysisError>;
}
