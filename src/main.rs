use clap::Parser;
use log::info;
use sdp_worklogs_lib::Cli;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    sdp_worklogs_lib::init_logging(cli.verbose);

    match sdp_worklogs_lib::run(cli).await {
        Ok(report) => {
            if !report.skipped.is_empty() {
                info!(
                    "{} of {} tasks skipped",
                    report.skipped.len(),
                    report.tasks
                );
            }
        }
        Err(error) => {
            eprintln!("sdp-worklogs error: {error}");
            std::process::exit(1);
        }
    }
}
