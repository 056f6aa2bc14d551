use crate::config::SdpConfig;
use crate::endpoint::Endpoint;
use crate::error::{Result, SdpError};
use crate::models::{RawWorklog, WorklogList};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client as HttpClient, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

#[derive(Clone)]
pub struct SdpClient {
    http: HttpClient,
    config: SdpConfig,
}

/// Worklogs returned by the first endpoint that answered `200 OK`.
#[derive(Debug, Clone)]
pub struct FetchedWorklogs {
    pub endpoint: Endpoint,
    pub worklogs: Vec<RawWorklog>,
}

impl SdpClient {
    pub fn new(config: SdpConfig) -> Result<Self> {
        let http = build_http_client(&config)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &SdpConfig {
        &self.config
    }

    pub async fn get<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.url_for(path);
        debug!(%url, "GET");
        let response = self.http.get(url).send().await?;
        Self::parse_json(response).await
    }

    /// Worklogs behind a single endpoint.
    pub async fn get_worklogs(&self, endpoint: &Endpoint) -> Result<Vec<RawWorklog>> {
        let list: WorklogList = self.get(&endpoint.path()).await?;
        Ok(list.worklogs)
    }

    /// Tries `endpoints` in order and stops at the first success. When every
    /// attempt fails, the error of the last attempt is returned.
    pub async fn fetch_worklogs(&self, endpoints: &[Endpoint]) -> Result<FetchedWorklogs> {
        let mut last_error = None;
        for endpoint in endpoints {
            match self.get_worklogs(endpoint).await {
                Ok(worklogs) => {
                    debug!(%endpoint, count = worklogs.len(), "worklogs fetched");
                    return Ok(FetchedWorklogs {
                        endpoint: endpoint.clone(),
                        worklogs,
                    });
                }
                Err(err) => {
                    debug!(%endpoint, status = %err.status_label(), "worklog attempt failed");
                    last_error = Some(err);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| SdpError::Other("no endpoints to try".to_string())))
    }

    fn url_for(&self, path: &str) -> String {
        let mut base = self.config.api_root();
        let trimmed = path.trim_start_matches('/');
        base.push_str(trimmed);
        base
    }

    async fn parse_json<T>(response: Response) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if status == StatusCode::OK {
            let body = response.bytes().await?;
            serde_json::from_slice::<T>(&body).map_err(SdpError::from)
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            Err(SdpError::authentication(
                Some(status),
                format!("Access denied ({}) - {}", status, body),
            ))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(build_http_error(status, &body))
        }
    }
}

fn build_http_client(config: &SdpConfig) -> Result<HttpClient> {
    let mut headers = HeaderMap::new();

    let mut auth_value = header_value(config.authorization())?;
    auth_value.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth_value);
    headers.insert(ACCEPT, header_value(config.accept.clone())?);
    headers.insert(USER_AGENT, header_value(config.user_agent.clone())?);

    let mut builder = HttpClient::builder().default_headers(headers);
    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(connect_timeout) = config.connect_timeout {
        builder = builder.connect_timeout(connect_timeout);
    }
    builder
        .build()
        .map_err(|err| SdpError::Other(err.to_string()))
}

fn header_value(value: String) -> Result<HeaderValue> {
    HeaderValue::from_str(&value).map_err(|err| SdpError::Other(err.to_string()))
}

fn build_http_error(status: StatusCode, body: &str) -> SdpError {
    let code = extract_status_code(body);
    SdpError::http(status, code, body.to_string())
}

/// SDP error bodies look like
/// `{"response_status": {"status_code": 4000, "status": "failed", ...}}`.
fn extract_status_code(body: &str) -> Option<String> {
    let value = serde_json::from_str::<Value>(body).ok()?;
    let status = value.get("response_status")?;
    let status = match status {
        Value::Array(items) => items.first()?,
        other => other,
    };
    match status.get("status_code")? {
        Value::Number(number) => Some(number.to_string()),
        Value::String(text) => Some(text.clone()),
        _ => None,
    }
}
