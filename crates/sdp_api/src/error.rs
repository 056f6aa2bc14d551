//! Error model used by ServiceDesk Plus API client operations.

use std::io;

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SdpError>;

/// Represents the failure modes of a ServiceDesk Plus API call: HTTP errors with status and message, authentication failures, timeouts, network issues, undecodable payloads and other unexpected errors.
#[derive(Debug, Error)]
pub enum SdpError {
    #[error("http {status}: {message}")]
    Http {
        status: StatusCode,
        code: Option<String>,
        message: String,
    },
    #[error("authentication error: {message}")]
    Authentication {
        status: Option<StatusCode>,
        message: String,
    },
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("unexpected error: {0}")]
    Other(String),
}

impl SdpError {
    /// Constructs an HTTP error variant with optional API-specific status code.
    pub fn http(status: StatusCode, code: Option<String>, message: impl Into<String>) -> Self {
        SdpError::Http {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn authentication(status: Option<StatusCode>, message: impl Into<String>) -> Self {
        SdpError::Authentication {
            status,
            message: message.into(),
        }
    }

    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            SdpError::Http { status, .. } => Some(*status),
            SdpError::Authentication { status, .. } => *status,
            _ => None,
        }
    }

    /// Short label used in skip reports: the numeric status when one exists,
    /// otherwise the error category.
    pub fn status_label(&self) -> String {
        if let Some(status) = self.status() {
            return status.as_u16().to_string();
        }
        match self {
            SdpError::Timeout(_) => "timeout".to_string(),
            SdpError::Network(_) => "network error".to_string(),
            SdpError::Serialization(_) => "invalid response body".to_string(),
            SdpError::Io(_) => "io error".to_string(),
            _ => "error".to_string(),
        }
    }
}

impl From<reqwest::Error> for SdpError {
    /// Converts reqwest errors into semantic SdpError variants.
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SdpError::Timeout(err.to_string())
        } else if err.is_status() {
            let status = err.status().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            SdpError::Http {
                status,
                code: None,
                message: err.to_string(),
            }
        } else if err.is_connect() {
            SdpError::Network(err.to_string())
        } else if err.is_decode() {
            SdpError::Serialization(err.to_string())
        } else {
            SdpError::Other(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SdpError {
    /// Converts serde_json decode/encode failures into serialization errors.
    fn from(err: serde_json::Error) -> Self {
        SdpError::Serialization(err.to_string())
    }
}
