use std::io::{ErrorKind, Write};
use std::path::Path;
use std::time::Duration;

use reqwest::{redirect, Client, StatusCode};
use tracing::debug;
use url::Url;

use crate::config::FetchConfig;
use crate::error::{OcrServiceError, Result};
use crate::source::ImageSource;

/// Raw image payload handed from the acquirer to the recognition session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBytes(Vec<u8>);

impl ImageBytes {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for ImageBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

pub struct ByteAcquirer {
    client: Client,
}

impl ByteAcquirer {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| OcrServiceError::HttpClient(e.to_string()))?;

        Ok(Self { client })
    }

    /// Load the full image into memory. A one-line notice goes to `notices`
    /// before a network fetch starts; local reads are silent.
    pub async fn acquire<W: Write>(
        &self,
        source: &ImageSource,
        notices: &mut W,
    ) -> Result<ImageBytes> {
        match source {
            ImageSource::Url(url) => {
                if let Err(e) = writeln!(notices, "Downloading image from URL...") {
                    debug!(error = %e, "Failed to write download notice");
                }
                self.fetch(url).await
            }
            ImageSource::File(path) => self.read_file(path).await,
        }
    }

    /// Single GET. Anything other than 200 is a failure; redirects are not followed.
    pub async fn fetch(&self, url: &str) -> Result<ImageBytes> {
        let parsed = Url::parse(url).map_err(|source| OcrServiceError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(OcrServiceError::Download)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(OcrServiceError::DownloadStatus {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(OcrServiceError::Download)?;

        debug!(url = %url, bytes = body.len(), "Downloaded image");
        Ok(ImageBytes::from(body.to_vec()))
    }

    pub async fn read_file(&self, path: &Path) -> Result<ImageBytes> {
        match tokio::fs::try_exists(path).await {
            Ok(true) => {}
            Ok(false) => {
                return Err(OcrServiceError::FileNotFound {
                    path: path.to_path_buf(),
                })
            }
            Err(source) => {
                return Err(OcrServiceError::FileRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }

        let bytes = tokio::fs::read(path).await.map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                OcrServiceError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                OcrServiceError::FileRead {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        debug!(path = %path.display(), bytes = bytes.len(), "Read image file");
        Ok(ImageBytes::from(bytes))
    }
}
