use std::path::PathBuf;
use std::process::ExitCode;

use tracing::info;

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};

use sova_stt::{SovaConfig, SovaSTT, SpeechProvider, SpeechResultState, read_chunks};

/// Sova STT - speech recognition against a self-hosted Sova ASR server
#[derive(Parser, Debug)]
#[command(name = "sova-stt")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Recognition server base URL (overrides config file and SOVA_STT_SERVER)
    #[arg(long = "server", value_name = "URL")]
    server: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Transcribe an audio file (raw 16 kHz 16-bit mono PCM or WAV)
    Transcribe {
        /// Audio file to send
        #[arg(value_name = "AUDIO")]
        file: PathBuf,
    },

    /// Print provider capabilities as JSON
    Info,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load .env file if it exists (must be done before config loading)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Initialize crypto provider for TLS connections
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("Failed to install default crypto provider"))?;

    let cli = Cli::parse();

    let config = SovaConfig::resolve(cli.server.as_deref(), cli.config.as_deref())
        .map_err(|e| anyhow!("Failed to load configuration: {e}"))?;
    info!(server = %config.server, "Configuration loaded");

    let stt = SovaSTT::with_config(config.provider_config()?)?;

    match cli.command {
        Commands::Info => {
            println!("{}", serde_json::to_string_pretty(&stt.capabilities())?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Transcribe { file } => {
            let audio = tokio::fs::File::open(&file)
                .await
                .with_context(|| format!("Failed to open {}", file.display()))?;

            let chunks = read_chunks(audio)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;

            let result = stt.transcribe(futures::stream::iter(chunks)).await;
            println!("{}", serde_json::to_string_pretty(&result)?);

            Ok(match result.state {
                SpeechResultState::Success => ExitCode::SUCCESS,
                SpeechResultState::Error => ExitCode::FAILURE,
            })
        }
    }
}
