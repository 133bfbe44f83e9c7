//! PageVoice - voice and text commands for web pages
//!
//! Entry point for the PageVoice CLI and native-messaging host.

mod cli;
mod host;
mod page;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pagevoice_config::{Config, ConfigLoader, ConfigValidator, LoggingConfig};
use pagevoice_core::{discover, CommandEngine, TextTranscriber, VoiceController};
use pagevoice_protocols::{ControlKind, PageDom};

use cli::{Cli, Commands, DEFAULT_CONFIG_PATH};
use host::MessageHost;

/// Initialize tracing with console and file output.
///
/// The console layer writes to stderr; stdout carries native-messaging
/// frames.
fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = PathBuf::from(ConfigLoader::expand_path(&logging.log_dir));
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("pagevoice")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The guard flushes the file writer on drop, so it lives for the whole
    // process.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(true),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Load, override and validate the configuration.
fn load_config(path: &Path, snapshot: Option<PathBuf>) -> Result<Config, Box<dyn std::error::Error>> {
    let is_default_path = path == Path::new(DEFAULT_CONFIG_PATH);
    let mut config = ConfigLoader::load_or_default(path, is_default_path)?;
    if let Some(snapshot) = snapshot {
        config.page.backend = pagevoice_config::PageBackend::Snapshot;
        config.page.snapshot_path = Some(snapshot);
    }
    Ok(config)
}

fn build_engine(config: &Config) -> CommandEngine {
    let engine = CommandEngine::new().with_min_confidence(config.engine.min_command_confidence);
    match config.engine.max_candidates {
        Some(max) => engine.with_max_candidates(max),
        None => engine,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config, cli.snapshot)?;

    init_tracing(&config.logging)?;

    let warnings = ConfigValidator::validate(&config)?.into_result()?;
    for warning in &warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }

    let page = page::open(&config.page).await?;
    info!("Page backend ready: {:?}", config.page.backend);

    match cli.command {
        Commands::Run { text, confidence } => run_command(page, &config, text, confidence).await,
        Commands::Discover { kind } => discover_controls(page.as_ref(), kind.into()).await,
        Commands::Serve => serve(page, &config).await,
    }
}

/// Run a single command and print its result.
async fn run_command(
    page: Arc<dyn PageDom>,
    config: &Config,
    text: String,
    confidence: f32,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = VoiceController::new(
        Arc::new(TextTranscriber::new(text.clone(), confidence)),
        build_engine(config),
        page,
    )
    .with_timeout(config.session.timeout());

    controller.press();
    let state = controller.release().await;
    info!("Session finished in {}", state);

    match controller.acknowledge() {
        Some(result) => println!("{}", serde_json::to_string_pretty(&result)?),
        None => println!("{}", serde_json::json!({ "success": false, "message": "Nothing captured" })),
    }
    Ok(())
}

async fn discover_controls(
    page: &dyn PageDom,
    kind: ControlKind,
) -> Result<(), Box<dyn std::error::Error>> {
    let controls = discover(page, kind).await;
    page.release_handles().await?;
    if controls.is_empty() {
        println!("No {} found", kind);
        return Ok(());
    }
    for control in &controls {
        let direction = control
            .direction()
            .map(|d| format!(" [{}]", d))
            .unwrap_or_default();
        println!(
            "{:.2}  {}{}  via {}",
            control.rank_score(),
            control.describe(),
            direction,
            control.selector_used()
        );
    }
    Ok(())
}

/// Serve native-messaging requests until the extension disconnects.
async fn serve(page: Arc<dyn PageDom>, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let controller = VoiceController::new(
        Arc::new(TextTranscriber::new("", 1.0)),
        build_engine(config),
        page,
    )
    .with_timeout(config.session.timeout());

    let mut host = MessageHost::new(controller);
    let mut stdin = tokio::io::stdin();
    let mut stdout = tokio::io::stdout();
    if let Err(e) = host.serve(&mut stdin, &mut stdout).await {
        error!("Native messaging host stopped: {}", e);
    }
    Ok(())
}
