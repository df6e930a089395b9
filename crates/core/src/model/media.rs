use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

//
// ─── ERRORS (domain validation) ────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MediaValidationError {
    #[error("Media URI cannot be empty.")]
    EmptyMediaUri,

    #[error("Media URL is not valid: {0}")]
    InvalidUrl(String),
}

//
// ─── MEDIA URI ─────────────────────────────────────────────────────────────────
//

/// Location of a lesson's video resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaUri {
    FilePath(PathBuf),
    Url(Url),
}

impl MediaUri {
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, MediaValidationError> {
        let p = path.into();
        if p.as_os_str().is_empty() {
            return Err(MediaValidationError::EmptyMediaUri);
        }
        Ok(MediaUri::FilePath(p))
    }

    pub fn from_url(url: impl AsRef<str>) -> Result<Self, MediaValidationError> {
        let s = url.as_ref().trim();
        if s.is_empty() {
            return Err(MediaValidationError::EmptyMediaUri);
        }
        let u = Url::parse(s).map_err(|_| MediaValidationError::InvalidUrl(s.to_owned()))?;
        Ok(MediaUri::Url(u))
    }

    /// Accepts either an `http(s)` URL or a relative/absolute file path.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, MediaValidationError> {
        let s = raw.as_ref().trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            Self::from_url(s)
        } else {
            Self::from_file(s)
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            MediaUri::FilePath(p) => Some(p.as_path()),
            MediaUri::Url(_) => None,
        }
    }

    pub fn as_url(&self) -> Option<&Url> {
        match self {
            MediaUri::Url(u) => Some(u),
            MediaUri::FilePath(_) => None,
        }
    }
}

impl fmt::Display for MediaUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaUri::FilePath(p) => write!(f, "{}", p.display()),
            MediaUri::Url(u) => write!(f, "{u}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_detects_urls() {
        let uri = MediaUri::parse("https://example.com/intro.mp4").unwrap();
        assert_eq!(uri.as_url().unwrap().host_str(), Some("example.com"));
        assert!(uri.as_path().is_none());
    }

    #[test]
    fn parse_falls_back_to_file_path() {
        let uri = MediaUri::parse("sample-video.mp4").unwrap();
        assert_eq!(uri.as_path(), Some(Path::new("sample-video.mp4")));
    }

    #[test]
    fn empty_uri_is_rejected() {
        assert_eq!(
            MediaUri::parse("   ").unwrap_err(),
            MediaValidationError::EmptyMediaUri
        );
    }

    #[test]
    fn malformed_url_is_rejected() {
        let err = MediaUri::parse("https://").unwrap_err();
        assert!(matches!(err, MediaValidationError::InvalidUrl(_)));
    }
}
