use std::fmt;
use std::path::{Path, PathBuf};

/// Where the image comes from. Classification is a case-sensitive prefix check
/// on the raw argument; nothing is validated here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Url(String),
    File(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Url,
    File,
}

const URL_PREFIXES: &[&str] = &["http://", "https://"];

impl ImageSource {
    pub fn resolve(raw: &str) -> Self {
        if URL_PREFIXES.iter().any(|prefix| raw.starts_with(prefix)) {
            ImageSource::Url(raw.to_string())
        } else {
            ImageSource::File(PathBuf::from(raw))
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            ImageSource::Url(_) => SourceKind::Url,
            ImageSource::File(_) => SourceKind::File,
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            ImageSource::File(path) => Some(path),
            ImageSource::Url(_) => None,
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Url(url) => f.write_str(url),
            ImageSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}
