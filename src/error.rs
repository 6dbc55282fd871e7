use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("Failed to parse URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to fetch content: {0}")]
    FetchError(String),

    #[error("Request timeout: {0}")]
    Timeout(String),

    #[error("Connection failed: {0}")]
    ConnectionError(String),

    #[error("Server responded with status {status}: {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Response body exceeds the {limit} byte limit")]
    BodyTooLarge { limit: usize },

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Failed to parse document: {0}")]
    ParseError(String),
}

impl PreviewError {
    pub fn log(&self) {
        match self {
            PreviewError::InvalidUrl(e) => {
                warn!(error = %e, "URL parsing failed");
            }
            PreviewError::FetchError(e) => {
                error!(error = %e, "Content fetch failed");
            }
            PreviewError::Timeout(e) => {
                warn!(error = %e, "Request timed out");
            }
            PreviewError::ConnectionError(e) => {
                warn!(error = %e, "Connection failed");
            }
            PreviewError::HttpStatus { status, url } => {
                warn!(status = *status, url = %url, "Non-success HTTP status");
            }
            PreviewError::BodyTooLarge { limit } => {
                warn!(limit = *limit, "Response body exceeded size limit");
            }
            PreviewError::ClientBuild(e) => {
                error!(error = %e, "HTTP client construction failed");
            }
            PreviewError::ParseError(e) => {
                error!(error = %e, "Document parsing failed");
            }
        }
    }
}

impl From<reqwest::Error> for PreviewError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            PreviewError::Timeout(e.to_string())
        } else if e.is_connect() {
            PreviewError::ConnectionError(e.to_string())
        } else if let Some(status) = e.status() {
            PreviewError::HttpStatus {
                status: status.as_u16(),
                url: e.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else if e.is_builder() {
            PreviewError::ClientBuild(e.to_string())
        } else {
            PreviewError::FetchError(e.to_string())
        }
    }
}
