/// Error types shared across the application
///
/// Every failure that reaches the fitting orchestrator is converted into a
/// user-facing notification, so the errors here carry readable messages
/// rather than deep cause chains.
use std::fmt;

use thiserror::Error;

/// Remote operation that produced a `ServiceError`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Match,
    RemoveBackground,
    ListCatalog,
    FetchDressImage,
    Health,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Match => "match",
            Operation::RemoveBackground => "remove-background",
            Operation::ListCatalog => "list-catalog",
            Operation::FetchDressImage => "fetch-dress-image",
            Operation::Health => "health",
        };
        f.write_str(name)
    }
}

/// Any failure of a remote call.
///
/// Transport failures and backend-reported failures (`success: false`)
/// are deliberately collapsed into this one type; callers only need the
/// message.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{operation} failed: {message}")]
pub struct ServiceError {
    pub operation: Operation,
    pub message: String,
}

impl ServiceError {
    pub fn new(operation: Operation, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }

    /// Network-level failure (connect, timeout, non-2xx, unreadable body)
    pub fn transport(operation: Operation, err: reqwest::Error) -> Self {
        Self::new(operation, err.to_string())
    }
}

/// Unmet prerequisite for a manual match. `Display` is the message shown
/// to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("전신사진을 업로드해주세요")]
    MissingFullBody,
    #[error("드레스 이미지를 업로드해주세요")]
    MissingDress,
    #[error("배경지우기 버튼을 클릭해주세요")]
    BackgroundNotRemoved,
}

/// Drag payload that did not come from the catalog
#[derive(Debug, Error)]
#[error("malformed drag payload: {0}")]
pub struct PayloadError(#[from] pub serde_json::Error);

/// Failure turning an asset into a displayable preview
#[derive(Debug, Clone, Error)]
pub enum PreviewError {
    #[error("failed to decode image: {0}")]
    Decode(String),
    #[error("failed to encode preview: {0}")]
    Encode(String),
    #[error("preview task failed: {0}")]
    Join(String),
}

/// Malformed `data:` URL
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataUrlError {
    #[error("not a data URL")]
    MissingPrefix,
    #[error("data URL is not base64 encoded")]
    NotBase64,
    #[error("invalid base64 payload: {0}")]
    Payload(String),
}

/// Config file could not be used
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("{0}")]
    Invalid(String),
}
