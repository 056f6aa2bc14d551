//! Zoho OAuth refresh-token exchange for ServiceDesk Plus Cloud.

use reqwest::Client;
use serde::Deserialize;

use crate::error::{Result, SdpError};

pub const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.zoho.com";

#[derive(Debug, Deserialize, Clone)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub api_domain: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Trades a long-lived refresh token for a fresh access token.
///
/// Zoho answers a rejected grant with `200 OK` and an `error` field, so a
/// success status alone is not enough.
pub async fn refresh_access_token(
    accounts_url: &str,
    refresh_token: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<String> {
    let url = format!("{}/oauth/v2/token", accounts_url.trim_end_matches('/'));
    let client = Client::new();
    let response = client
        .post(url)
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", client_id),
            ("client_secret", client_secret),
        ])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SdpError::authentication(Some(status), body));
    }

    let token = response.json::<TokenResponse>().await?;
    if let Some(error) = token.error {
        return Err(SdpError::authentication(None, error));
    }
    token
        .access_token
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| SdpError::authentication(None, "token response carried no access_token"))
}
