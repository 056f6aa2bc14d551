//! Typed ServiceDesk Plus v3 client used by the worklog extract.

pub mod auth;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod models;

pub use client::{FetchedWorklogs, SdpClient};
pub use config::{AuthScheme, SdpConfig};
pub use endpoint::{resolve_endpoints, Endpoint};
pub use error::{Result, SdpError};
pub use models::{value_text, FieldShape, RawWorklog, WorklogList};
