mod cache;
mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod export;
mod infra;
mod prompt;
mod services;
mod workflow;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::cmd::classify::{self as classify_cmd, ClassifyArgs, ParseArgs};
use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::config::{AppConfig, LlmProvider};
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::llm::OpenAiClient;
use crate::services::LanguageModelService;

#[derive(Parser)]
#[command(
    name = "triage",
    author,
    version,
    about = "Classify customer support tickets with a language model"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a ticket by asking the configured language model.
    Classify(ClassifyArgs),
    /// Parse a raw model reply without calling the model.
    Parse(ParseArgs),
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Config(args) => config_cmd::run(args.command),
        Commands::Parse(args) => classify_cmd::run_parse(args),
        Commands::Classify(args) => run_classify(args).await,
    }
}

async fn run_classify(args: ClassifyArgs) -> AppResult<()> {
    let config = AppConfig::load()?;

    if config.openai_api_key.is_none() {
        warn!("OpenAI API key not configured; classification requests will fail.");
    }

    let language_model: Arc<dyn LanguageModelService> = match &config.llm_provider {
        LlmProvider::OpenAi => Arc::new(openai_client(&config)),
    };

    let context = AppContext::new(config, language_model);
    classify_cmd::run(&context, args).await
}

fn openai_client(config: &AppConfig) -> OpenAiClient {
    OpenAiClient::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
        config.model.clone(),
        config.request_timeout,
        config.max_retries,
    )
}
