use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::prelude::*;

mod config;
mod conversation;
mod handlers;
mod integrations;
mod reports;
mod store;

use crate::config::BotConfig;
use crate::conversation::ExpenseFlow;
use crate::handlers::BotContext;
use crate::integrations::telegram::TelegramClient;
use crate::integrations::vision::{DisabledOcr, GoogleVisionOcr, OcrEngine};
use crate::store::ExpenseStore;
use extractors::ReceiptTextParser;
use shared_types::{Clock, SystemClock};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long)]
    config_path: Option<String>,
    #[arg(long)]
    log_file_path: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_tracing(args.log_file_path.as_deref());

    let config = BotConfig::load(args.config_path.as_deref())?;

    let Some(token) = config.telegram_token.clone() else {
        tracing::error!("TELEGRAM_TOKEN is not set; refusing to start");
        anyhow::bail!("missing Telegram token");
    };

    let ocr: Arc<dyn OcrEngine> = match config.vision_credentials() {
        Some(credentials) => Arc::new(GoogleVisionOcr::new(credentials, config.ocr.clone())?),
        None => {
            tracing::error!(
                "OCR credentials missing or invalid; receipt recognition is disabled"
            );
            Arc::new(DisabledOcr)
        }
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store = Arc::new(ExpenseStore::new());
    let ctx = Arc::new(BotContext {
        telegram: TelegramClient::new(&token)?,
        ocr,
        parser: ReceiptTextParser::with_clock(clock.clone()),
        flow: ExpenseFlow::new(store.clone(), clock.clone()),
        store,
        clock,
    });

    tracing::info!("frais bot started");
    run_polling(ctx, config.poll.timeout_secs).await
}

fn init_tracing(log_file_path: Option<&str>) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_path) = log_file_path {
        let log_path = std::path::Path::new(log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("frais-bot.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

/// Long-polls the transport and spawns one task per update, so a slow OCR
/// call in one conversation never blocks the others.
async fn run_polling(ctx: Arc<BotContext>, poll_timeout_secs: u64) -> anyhow::Result<()> {
    let mut offset = 0i64;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Ctrl+C received, shutting down...");
                return Ok(());
            }
            result = ctx.telegram.get_updates(offset, poll_timeout_secs) => match result {
                Ok(updates) => {
                    for update in updates {
                        offset = offset.max(update.update_id + 1);
                        let ctx = ctx.clone();
                        tokio::spawn(async move {
                            handlers::handle_update(ctx, update).await;
                        });
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to fetch updates: {e:#}");
                    tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                }
            }
        }
    }
}
