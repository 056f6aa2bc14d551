//! Access token resolution, done once before any worklog request.

use log::info;
use sdp_api::auth::refresh_access_token;

use crate::error::{ExportError, Result};

/// Credential inputs gathered from flags and the environment.
#[derive(Debug, Clone, Default)]
pub struct CredentialSource {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl CredentialSource {
    /// An explicit access token wins; otherwise the refresh-token grant is
    /// exchanged against `accounts_url`.
    pub async fn resolve(&self, accounts_url: &str) -> Result<String> {
        if let Some(token) = non_empty(&self.access_token) {
            return Ok(token.to_string());
        }

        match (
            non_empty(&self.refresh_token),
            non_empty(&self.client_id),
            non_empty(&self.client_secret),
        ) {
            (Some(refresh_token), Some(client_id), Some(client_secret)) => {
                info!("Requesting access token from {}", accounts_url);
                let token =
                    refresh_access_token(accounts_url, refresh_token, client_id, client_secret)
                        .await?;
                Ok(token)
            }
            (Some(_), _, _) => Err(ExportError::Config(
                "refresh token given without client id and client secret".to_string(),
            )),
            _ => Err(ExportError::Config(
                "no access token: pass --token / SDP_ACCESS_TOKEN or a refresh token with client credentials"
                    .to_string(),
            )),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
