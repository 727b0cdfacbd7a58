use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use eyre::Result;
use log::{info, warn};

use ytlearn::config::Config;
use ytlearn::llm::OpenAiClient;
use ytlearn::pipeline::Pipeline;
use ytlearn::store::TranscriptStore;
use ytlearn::youtube::InnerTubeCaptions;

mod cli;

use cli::Cli;

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytlearn.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytlearn")
        .join("logs")
}

fn load_config(cli: &Cli) -> Config {
    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    // A broken config file falls back to defaults
    let mut config = loaded.unwrap_or_else(|e| {
        warn!("Ignoring config file: {e}");
        Config::default()
    });

    if cli.host.is_some() {
        config.host = cli.host.clone();
    }
    if cli.port.is_some() {
        config.port = cli.port;
    }
    if cli.model.is_some() {
        config.model = cli.model.clone();
    }
    if cli.transcripts_dir.is_some() {
        config.transcripts_dir = cli.transcripts_dir.clone();
    }
    config
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;
    let cli = Cli::parse();

    // A missing .env is fine; the key may come from the real environment
    if let Ok(path) = dotenvy::dotenv() {
        info!("Loaded environment from {}", path.display());
    }

    let config = load_config(&cli);
    let api_key = ytlearn::config::api_key()?;

    let generator = OpenAiClient::new(config.api_base(), &api_key, config.model(), config.request_timeout())?;
    let captions = InnerTubeCaptions::new(reqwest::Client::builder().timeout(config.request_timeout()).build()?);
    let store = TranscriptStore::new(config.transcripts_dir());

    if cli.verbose {
        eprintln!(
            "Model: {}\nAPI base: {}\nTranscripts: {}\nLogs: {}",
            generator.model(),
            config.api_base(),
            store.dir().display(),
            log_dir().join("ytlearn.log").display(),
        );
    }

    let addr = format!("{}:{}", config.host(), config.port());
    eprintln!("ytlearn {} listening on http://{addr}", env!("CARGO_PKG_VERSION"));

    let pipeline = Pipeline::new(Arc::new(captions), Arc::new(generator), store);
    ytlearn::server::serve(pipeline, &addr).await
}
