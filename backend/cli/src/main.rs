mod config;
mod sinks;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use teloxide::Bot;
use tracing::info;

use claimsnap_bot::{
    ConversationHandler, InMemoryUserDirectory, TelegramChannel, TelegramTransport,
};
use claimsnap_intake::IntakeOrchestrator;
use claimsnap_ocr::{OcrClient, ReceiptReader};
use claimsnap_resilience::CircuitBreaker;
use claimsnap_storage::{FsBlobStore, InMemoryReceiptStore};

use config::Config;
use sinks::{AdminNotifier, JsonlSubmissionSink};

#[derive(Parser)]
#[command(name = "claimsnap")]
#[command(about = "ClaimSnap receipt reimbursement bot")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Telegram bot
    Serve,
    /// Run field extraction over a recognized-text dump and print the result
    Extract {
        /// Path to a plain-text file of OCR output
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => run_bot(config).await?,
        Commands::Extract { path } => {
            let text = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let fields = claimsnap_extraction::extract(&text);
            println!("{}", serde_json::to_string_pretty(&fields)?);
        }
    }

    Ok(())
}

async fn run_bot(config: Config) -> Result<()> {
    let Some(ocr_api_key) = config.ocr_api_key.clone() else {
        bail!("OCR_API_KEY is not set");
    };
    let Some(bot_token) = config.telegram_bot_token.clone() else {
        bail!("TELEGRAM_BOT_TOKEN is not set");
    };

    info!(
        blob_dir = %config.blob_dir,
        users = %config.users_path,
        admin_chats = config.admin_chat_ids.len(),
        "Starting ClaimSnap"
    );

    tokio::fs::create_dir_all(&config.blob_dir)
        .await
        .with_context(|| format!("Failed to create blob directory {}", config.blob_dir))?;

    let blobs = Arc::new(FsBlobStore::new(&config.blob_dir));
    let receipts = Arc::new(InMemoryReceiptStore::new());
    let reader = ReceiptReader::new(
        blobs.clone(),
        Arc::new(OcrClient::new(ocr_api_key)),
        Arc::new(CircuitBreaker::new("ocr")),
    );
    let intake = Arc::new(IntakeOrchestrator::new(blobs, receipts, reader));

    let users =
        Arc::new(InMemoryUserDirectory::from_json_file(config.users_path.as_ref()).await?);

    let bot = Bot::new(bot_token);
    let transport = Arc::new(TelegramTransport::new(bot.clone()));
    let submissions = Arc::new(JsonlSubmissionSink::new(
        PathBuf::from(&config.blob_dir).join("submissions.jsonl"),
    ));
    let notifier = Arc::new(AdminNotifier::new(
        transport.clone(),
        config.admin_chat_ids.clone(),
    ));

    let handler = Arc::new(ConversationHandler::new(
        intake, users, submissions, notifier, transport,
    ));

    TelegramChannel::new(bot, handler).run().await;
    Ok(())
}
