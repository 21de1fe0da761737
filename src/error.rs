use std::path::PathBuf;

use thiserror::Error;

/// Network or HTTP failure while retrieving a page.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("reading body of {url} failed: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("no mocked response for {url}")]
    Unmocked { url: String },
}

impl FetchError {
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout { url: url.to_string() }
        } else {
            FetchError::Transport { url: url.to_string(), source: err }
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Timeout { .. } | FetchError::Transport { .. } => true,
            FetchError::Status { status, .. } => *status == 429 || (500..600).contains(status),
            FetchError::Body { .. } | FetchError::Unmocked { .. } => false,
        }
    }
}

/// Checkpoint or export write/read failure. Always fatal to the run.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("encoding checkpoint failed: {source}")]
    Encode {
        #[source]
        source: serde_json::Error,
    },
    #[error("checkpoint {path} is not valid: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl PersistenceError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PersistenceError::Io { path: path.into(), source }
    }
}

/// A field the extractor could not locate. Recorded, never raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionGap {
    Title,
    Date,
    Content,
}

impl ExtractionGap {
    pub fn name(&self) -> &'static str {
        match self {
            ExtractionGap::Title => "title",
            ExtractionGap::Date => "date",
            ExtractionGap::Content => "content",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_display_includes_code() {
        let err = FetchError::Status { url: "https://blog.example/page/2/".into(), status: 404 };
        assert_eq!(format!("{err}"), "https://blog.example/page/2/ returned HTTP 404");
        assert_eq!(err.status(), Some(404));
        assert!(!err.is_retryable());
    }

    #[test]
    fn rate_limit_and_server_errors_are_retryable() {
        for status in [429u16, 500, 502, 503] {
            let err = FetchError::Status { url: "u".into(), status };
            assert!(err.is_retryable(), "{status} should retry");
        }
        assert!(FetchError::Timeout { url: "u".into() }.is_retryable());
        assert!(!FetchError::Unmocked { url: "u".into() }.is_retryable());
    }
}
