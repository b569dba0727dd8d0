use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use quizzer_tui::app::App;
use quizzer_tui::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "quizzer", version, about = "A terminal-based trivia quiz")]
struct Cli {
    /// Path to config file (default: ~/.config/quizzer/config.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Trivia API base URL (overrides config)
    #[arg(long)]
    api_url: Option<String>,

    /// Number of questions per quiz (overrides config)
    #[arg(short = 'n', long)]
    questions: Option<u8>,

    /// Theme name: dark or light (overrides config)
    #[arg(short, long)]
    theme: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };

    // Logging goes to a file: stdout belongs to the TUI.
    let log_dir = std::path::PathBuf::from("./logs");
    std::fs::create_dir_all(&log_dir)?;
    let log_file = std::fs::File::create(log_dir.join("quizzer.log"))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "quizzer={0},quizzer_tui={0},quizzer_core={0}",
            config.general.log_level
        ))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    info!("quizzer starting");

    // CLI overrides
    if let Some(api_url) = cli.api_url {
        config.general.api_url = api_url;
    }
    if let Some(questions) = cli.questions {
        config.general.question_count = questions;
    }
    if let Some(theme) = cli.theme {
        config.general.theme = theme;
    }

    let mut app = App::new(config)?;
    app.run().await?;

    info!("quizzer exiting");
    Ok(())
}
