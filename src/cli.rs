use std::path::PathBuf;

use clap::Parser;

use crate::config::{AuthSchemeSetting, Settings};
use crate::credentials::CredentialSource;

/// Command-line interface of the `sdp-worklogs` binary.
#[derive(Debug, Parser)]
#[command(
    name = "sdp-worklogs",
    version,
    about = "Export ServiceDesk Plus task worklogs to a flat CSV file"
)]
pub struct Cli {
    /// Input CSV with a task_id/TaskID column and optional request_id/RequestID column
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output CSV path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// ServiceDesk Plus host, e.g. https://servicedesk.example.com
    #[arg(long, env = "SDP_BASE_URL")]
    pub base_url: Option<String>,

    /// API path below the host
    #[arg(long)]
    pub api_path: Option<String>,

    /// OAuth access token
    #[arg(long, env = "SDP_ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Authorization header scheme
    #[arg(long, value_enum)]
    pub auth_scheme: Option<AuthSchemeSetting>,

    /// Refresh token used when no access token is given
    #[arg(long, env = "SDP_REFRESH_TOKEN", hide_env_values = true)]
    pub refresh_token: Option<String>,

    #[arg(long, env = "SDP_CLIENT_ID")]
    pub client_id: Option<String>,

    #[arg(long, env = "SDP_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Number of tasks fetched in parallel
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: Option<u16>,

    /// Per-request timeout in seconds (no timeout by default)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Settings file (defaults to the platform config directory)
    #[arg(long, env = "SDP_WORKLOGS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the tasks and endpoints that would be queried, then exit
    #[arg(long)]
    pub dry_run: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Overlays command-line values on top of the file settings.
    pub fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(input) = &self.input {
            settings.input_path = input.clone();
        }
        if let Some(output) = &self.output {
            settings.output_path = output.clone();
        }
        if let Some(base_url) = &self.base_url {
            settings.base_url = base_url.clone();
        }
        if let Some(api_path) = &self.api_path {
            settings.api_path = api_path.clone();
        }
        if let Some(scheme) = self.auth_scheme {
            settings.auth_scheme = scheme;
        }
        if let Some(concurrency) = self.concurrency {
            settings.concurrency = usize::from(concurrency);
        }
        if let Some(timeout) = self.timeout_secs {
            settings.timeout_secs = Some(timeout);
        }
        settings
    }

    pub fn credentials(&self) -> CredentialSource {
        CredentialSource {
            access_token: self.token.clone(),
            refresh_token: self.refresh_token.clone(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
        }
    }
}
