use std::io;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use shiori_api::AniListClient;
use shiori_cli::app::{self, AppError};
use shiori_cli::cli::Cli;
use shiori_cli::prompt::Prompter;
use shiori_core::config::AppConfig;
use shiori_core::render::{CoverDownloader, DocumentRenderer};
use shiori_core::ShioriError;
use tracing_subscriber::EnvFilter;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match execute(&cli).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: &Cli) -> Result<app::Outcome, AppError> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    cli.apply(&mut config);

    let http = reqwest::Client::builder()
        .user_agent(concat!("shiori/", env!("CARGO_PKG_VERSION")))
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(|e| ShioriError::Config(format!("HTTP client: {e}")))?;

    let client = AniListClient::with_http_client(http.clone(), config.client_config()?);
    let root = config.output_root();
    tracing::debug!(root = %root.display(), variant = %config.render.variant, "Vault");
    let renderer = DocumentRenderer::new(
        root,
        config.render_options(),
        CoverDownloader::new(http),
    );

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());
    app::run(&client, &renderer, &mut prompter).await
}
