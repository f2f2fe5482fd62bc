use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrServiceError {
    #[error("File not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to read file {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to download image: HTTP {status}")]
    DownloadStatus { status: u16 },

    #[error("Failed to download image: {0}")]
    Download(#[source] reqwest::Error),

    #[error("Failed to download image: invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to create HTTP client: {0}")]
    HttpClient(String),

    #[error("Failed to initialize recognition engine: {0}")]
    EngineInit(String),

    #[error("Recognition failed: {0}")]
    Recognition(String),

    #[error("Failed to terminate recognition engine: {0}")]
    EngineTerminate(String),
}

impl OcrServiceError {
    /// True for every failure raised while fetching a remote image.
    pub fn is_download(&self) -> bool {
        matches!(
            self,
            OcrServiceError::DownloadStatus { .. }
                | OcrServiceError::Download(_)
                | OcrServiceError::InvalidUrl { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, OcrServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_status_message_matches_wire_format() {
        let err = OcrServiceError::DownloadStatus { status: 500 };
        assert_eq!(err.to_string(), "Failed to download image: HTTP 500");
        assert!(err.is_download());
    }

    #[test]
    fn test_file_not_found_names_path() {
        let err = OcrServiceError::FileNotFound {
            path: PathBuf::from("/tmp/missing.png"),
        };
        assert_eq!(err.to_string(), "File not found: /tmp/missing.png");
        assert!(!err.is_download());
    }

    #[test]
    fn test_invalid_url_is_a_download_failure() {
        let source = url::Url::parse("http://").unwrap_err();
        let err = OcrServiceError::InvalidUrl {
            url: "http://".to_string(),
            source,
        };
        assert!(err.is_download());
        assert!(err.to_string().starts_with("Failed to download image:"));
    }
}
