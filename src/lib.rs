//! ServiceDesk Plus task worklog extract.
//!
//! Reads task ids from a CSV file, fetches each task's worklogs (falling back
//! to the request-scoped route when the task-only route is rejected),
//! flattens them and writes a single CSV file.

use std::path::PathBuf;
use std::time::Duration;

use log::info;
use sdp_api::{SdpClient, SdpConfig};

pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod export;
pub mod extract;
pub mod normalize;
pub mod pipeline;
pub mod row;

pub use cli::Cli;
pub use config::{Settings, SettingsManager};
pub use error::{ExportError, Result, SchemaError};
pub use extract::TaskIndex;
pub use normalize::{normalize_worklog, TimeSpent};
pub use pipeline::{collect_worklogs, Extract, SkippedTask};
pub use row::NormalizedRow;

/// Outcome of a completed run.
#[derive(Debug)]
pub struct RunReport {
    pub tasks: usize,
    pub rows_written: usize,
    pub skipped: Vec<SkippedTask>,
    pub output_path: PathBuf,
}

/// Installs the process logger. `RUST_LOG` overrides the default level.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .try_init();
}

pub fn load_settings(cli: &Cli) -> Settings {
    let stored = match &cli.config {
        Some(path) => SettingsManager::with_path(path.clone()).load(),
        None => SettingsManager::new()
            .map(|manager| manager.load())
            .unwrap_or_default(),
    };
    cli.apply(stored)
}

/// Builds the immutable client configuration shared by every request.
pub fn client_config(settings: &Settings, token: String) -> SdpConfig {
    let mut config = SdpConfig::new(token)
        .with_base_url(settings.base_url.clone())
        .with_api_path(settings.api_path.clone())
        .with_accept(settings.accept.clone())
        .with_auth_scheme(settings.auth_scheme.into());
    if let Some(secs) = settings.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    if let Some(secs) = settings.connect_timeout_secs {
        config = config.with_connect_timeout(Duration::from_secs(secs));
    }
    config
}

/// Runs one full extract: input table, fetch, normalize, write.
///
/// Only schema, credential and output errors abort the run; task failures
/// are reported in [`RunReport::skipped`].
pub async fn run(cli: Cli) -> Result<RunReport> {
    let settings = load_settings(&cli);
    let index = TaskIndex::from_path(&settings.input_path)?;
    info!(
        "Loaded {} tasks from {}",
        index.len(),
        settings.input_path.display()
    );

    if cli.dry_run {
        for task in index.tasks() {
            let routes: Vec<String> = index
                .endpoints_for(task)
                .iter()
                .map(ToString::to_string)
                .collect();
            println!("{}\t{}", task, routes.join(" -> "));
        }
        return Ok(RunReport {
            tasks: index.len(),
            rows_written: 0,
            skipped: Vec::new(),
            output_path: settings.output_path,
        });
    }

    let token = cli.credentials().resolve(&settings.accounts_url).await?;
    let client = SdpClient::new(client_config(&settings, token))?;

    let extract = collect_worklogs(&client, &index, settings.concurrency).await;
    let rows_written = export::write_csv(&settings.output_path, &extract.rows)?;
    println!(
        "Saved {} worklogs -> {}",
        rows_written,
        settings.output_path.display()
    );

    Ok(RunReport {
        tasks: index.len(),
        rows_written,
        skipped: extract.skipped,
        output_path: settings.output_path,
    })
}
