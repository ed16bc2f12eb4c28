use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod api;
mod commands;
mod config;
mod error;
mod models;
mod scheduler;
mod services;
mod telegram;

use api::cnn::CnnClient;
use config::Config;
use telegram::TelegramClient;

/// Everything a pipeline invocation needs, built once at startup and
/// shared immutably between the command listener and the scheduler.
pub struct AppContext {
    pub config: Config,
    pub cnn: CnnClient,
    pub telegram: TelegramClient,
}

impl AppContext {
    pub fn new(config: Config) -> Self {
        let telegram = TelegramClient::new(config.telegram_token.clone());
        Self {
            config,
            cnn: CnnClient::new(),
            telegram,
        }
    }
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("feargreed_bot=info".parse().unwrap())
                .add_directive("reqwest=warn".parse().unwrap()),
        )
        .with_target(true)
        .init();

    info!("📈 Starting Fear & Greed bot...");

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Startup configuration error: {}", e);
            std::process::exit(1);
        }
    };
    info!("Scheduled updates will be sent to chat id {}", config.chat_id);

    let ctx = Arc::new(AppContext::new(config));

    // Daily 08:00 / 08:01 deliveries run independently of the listener
    scheduler::spawn_daily_jobs(ctx.clone());

    info!("Listening for commands via long polling...");
    commands::run_polling_loop(ctx).await;
}
