//! HTTP client for the inference backend.

use url::Url;

use crate::http_client;

use super::result::AnalysisResult;
use super::wire::parse_predict_response;
use super::{AnalysisBackend, AnalysisError, ScanUpload, multipart};

/// Path of the prediction endpoint, relative to the base URL.
pub const PREDICT_PATH: &str = "predict/";

const MAX_PREDICT_RESPONSE_BYTES: usize = 1024 * 1024;
const MAX_IMAGE_BYTES: usize = 32 * 1024 * 1024;
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Reasons a configured backend URL is rejected.
#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    #[error("Invalid backend URL {url:?}: {source}")]
    Parse {
        url: String,
        source: url::ParseError,
    },
    #[error("Backend URL {url:?} must use http or https, not {scheme}")]
    Scheme { url: String, scheme: String },
}

/// Validated backend base URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendEndpoint {
    base: Url,
}

impl BackendEndpoint {
    /// Parse a base URL; a trailing `/` is implied.
    pub fn parse(raw: &str) -> Result<Self, EndpointError> {
        let trimmed = raw.trim();
        let with_slash = if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{trimmed}/")
        };
        let base = Url::parse(&with_slash).map_err(|source| EndpointError::Parse {
            url: raw.to_string(),
            source,
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(EndpointError::Scheme {
                url: raw.to_string(),
                scheme: base.scheme().to_string(),
            });
        }
        Ok(Self { base })
    }

    /// Base URL with its trailing slash.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Full URL of the prediction endpoint.
    pub fn predict_url(&self) -> Result<Url, AnalysisError> {
        self.base
            .join(PREDICT_PATH)
            .map_err(|err| AnalysisError::Transport(format!("Invalid predict URL: {err}")))
    }

    /// Resolve a server-relative asset path such as `/r1.png`.
    ///
    /// Absolute paths resolve against the origin, matching how the backend
    /// publishes its rendered images.
    pub fn resolve_asset(&self, path: &str) -> Result<Url, AnalysisError> {
        self.base.join(path.trim()).map_err(|err| AnalysisError::InvalidField {
            field: "segmentation_image_url",
            detail: format!("{path:?} does not resolve against {}: {err}", self.base),
        })
    }
}

/// [`AnalysisBackend`] that talks to the real inference service over HTTP.
#[derive(Clone, Debug)]
pub struct HttpAnalysisBackend {
    endpoint: BackendEndpoint,
}

impl HttpAnalysisBackend {
    pub fn new(endpoint: BackendEndpoint) -> Self {
        Self { endpoint }
    }

    /// Download an image from the backend.
    pub fn fetch_image(&self, url: &Url) -> Result<Vec<u8>, AnalysisError> {
        tracing::debug!("Fetching segmentation image from {url}");
        let response = match http_client::agent().get(url.as_str()).call() {
            Ok(response) => response,
            Err(err) => return Err(map_request_error(err)),
        };
        http_client::read_response_bytes(response, MAX_IMAGE_BYTES)
            .map_err(|err| AnalysisError::Transport(err.to_string()))
    }
}

impl AnalysisBackend for HttpAnalysisBackend {
    fn predict(&self, upload: &ScanUpload) -> Result<AnalysisResult, AnalysisError> {
        let url = self.endpoint.predict_url()?;
        let body = multipart::single_file(upload);
        tracing::info!(
            "Submitting {} ({} bytes) to {url}",
            upload.file_name,
            upload.bytes.len()
        );
        let response = match http_client::agent()
            .post(url.as_str())
            .set("Accept", "application/json")
            .set("Content-Type", &body.content_type)
            .send_bytes(&body.bytes)
        {
            Ok(response) => response,
            Err(err) => return Err(map_request_error(err)),
        };
        let bytes = http_client::read_response_bytes(response, MAX_PREDICT_RESPONSE_BYTES)
            .map_err(|err| AnalysisError::Transport(err.to_string()))?;
        let prediction = parse_predict_response(&bytes)?;
        Ok(AnalysisResult::from_prediction(prediction))
    }

    fn fetch_segmentation_image(&self, path: &str) -> Result<Vec<u8>, AnalysisError> {
        let url = self.endpoint.resolve_asset(path)?;
        self.fetch_image(&url)
    }
}

fn map_request_error(err: ureq::Error) -> AnalysisError {
    match err {
        ureq::Error::Status(code, response) => {
            let body = http_client::read_response_bytes(response, MAX_PREDICT_RESPONSE_BYTES)
                .map(|bytes| String::from_utf8_lossy(&bytes).trim().to_string())
                .unwrap_or_else(|err| err.to_string());
            AnalysisError::Status {
                code,
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            }
        }
        ureq::Error::Transport(err) => AnalysisError::Transport(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_appends_trailing_slash() {
        let endpoint = BackendEndpoint::parse("http://127.0.0.1:8000").unwrap();
        assert_eq!(endpoint.base().as_str(), "http://127.0.0.1:8000/");
        assert_eq!(
            endpoint.predict_url().unwrap().as_str(),
            "http://127.0.0.1:8000/predict/"
        );
    }

    #[test]
    fn predict_url_keeps_path_prefix() {
        let endpoint = BackendEndpoint::parse("https://lab.example.org/inference").unwrap();
        assert_eq!(
            endpoint.predict_url().unwrap().as_str(),
            "https://lab.example.org/inference/predict/"
        );
    }

    #[test]
    fn absolute_asset_paths_resolve_against_origin() {
        let endpoint = BackendEndpoint::parse("https://lab.example.org/inference/").unwrap();
        assert_eq!(
            endpoint.resolve_asset("/r1.png").unwrap().as_str(),
            "https://lab.example.org/r1.png"
        );
    }

    #[test]
    fn rejects_garbage_and_non_http_urls() {
        assert!(matches!(
            BackendEndpoint::parse("not a url"),
            Err(EndpointError::Parse { .. })
        ));
        assert!(matches!(
            BackendEndpoint::parse("file:///tmp/backend"),
            Err(EndpointError::Scheme { .. })
        ));
    }
}
