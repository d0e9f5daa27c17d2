//! services/client/src/bin/learning_path.rs

use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use client_lib::{
    adapters::{HttpLearningPathAdapter, MockLearningPathAdapter},
    config::Config,
    error::ClientError,
    ui::{theme, Shell, Theme},
};
use learning_path_core::{AdvancePolicy, FlowController, FlowOptions, LearningPathApi};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "learning-path")]
#[command(about = "Upload a resume, chat about your goals, get a learning bundle and take a quiz", long_about = None)]
struct Cli {
    /// Use canned demo data instead of calling the backend
    #[arg(long)]
    mock: bool,
    /// Base URL of the learning path backend
    #[arg(long)]
    api_base_url: Option<String>,
    /// Whether a finished chat moves on by itself or waits for /continue
    #[arg(long)]
    advance: Option<AdvancePolicy>,
    /// Artificial delay for mock responses, in milliseconds
    #[arg(long, default_value_t = 800)]
    mock_latency_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let cli = Cli::parse();
    let config = Config::from_env(|key| match key {
        "USE_MOCK_DATA" if cli.mock => Some("true".to_string()),
        "API_BASE_URL" => cli.api_base_url.clone(),
        "CHAT_ADVANCE" => cli.advance.map(|advance| advance.to_string()),
        _ => None,
    })?;

    // Logs go to stderr so they never interleave with the views on stdout.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!("Configuration loaded. Starting learning path client...");

    // --- 2. Pick the Backend Adapter (once, for the whole session) ---
    let api: Arc<dyn LearningPathApi> = if config.use_mock_data {
        info!("Using mock data");
        Arc::new(
            MockLearningPathAdapter::new()
                .with_latency(Duration::from_millis(cli.mock_latency_ms)),
        )
    } else {
        info!("Using backend at {}", config.api_base_url);
        Arc::new(HttpLearningPathAdapter::new(
            config.api_base_url.clone(),
            config.request_timeout,
        )?)
    };

    // --- 3. Build the Session ---
    let controller = FlowController::new(
        api,
        FlowOptions {
            advance: config.advance,
            demo_user_id: config.demo_user_id.clone(),
        },
    );

    let theme = theme::register(if std::io::stdout().is_terminal() {
        Theme::ansi()
    } else {
        Theme::plain()
    });

    // --- 4. Run the Interactive Shell ---
    let shell = Shell::new(
        controller,
        theme,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    );
    shell.run().await?;
    info!("Session ended.");

    Ok(())
}
