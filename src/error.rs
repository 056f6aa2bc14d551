//! Fatal error model for an extract run.

use std::io;

use sdp_api::SdpError;
use thiserror::Error;

/// Problems with the input table. Raised before any network call.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("input must contain a 'task_id' or 'TaskID' column (found: {})", .found.join(", "))]
    MissingTaskColumn { found: Vec<String> },
    #[error("line {line}: column '{column}' holds non-integer identifier '{value}'")]
    InvalidIdentifier {
        line: u64,
        column: String,
        value: String,
    },
    #[error("unreadable input table: {0}")]
    Unreadable(#[from] csv::Error),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("api error: {0}")]
    Api(#[from] SdpError),
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ExportError>;
