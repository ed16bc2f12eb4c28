pub mod components;
pub mod feargreed;
pub mod start;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error};

use crate::telegram::Update;
use crate::AppContext;

/// Pause before re-polling after a failed `getUpdates` call.
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Recognized bot commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    FearGreed,
    Components,
    Unknown,
}

impl Command {
    /// Parse a message text into a command.
    ///
    /// The command word may carry an `@botname` suffix (Telegram appends
    /// it in group chats). Anything unrecognized maps to `Unknown` and is
    /// ignored by the dispatcher.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if !text.starts_with('/') {
            return Command::Unknown;
        }

        let word = text[1..].split_whitespace().next().unwrap_or("");
        let word = word.split('@').next().unwrap_or("");

        match word.to_lowercase().as_str() {
            "start" => Command::Start,
            "feargreed" => Command::FearGreed,
            "components" => Command::Components,
            _ => Command::Unknown,
        }
    }
}

/// Dispatch one inbound update. Replies always target the invoking chat.
pub async fn handle_update(ctx: &AppContext, update: Update) {
    let Some(message) = update.message else {
        return;
    };
    let Some(text) = message.text else {
        return;
    };
    let chat_id = message.chat.id;

    let command = Command::parse(&text);
    debug!(chat_id, ?command, "Inbound message");

    let result = match command {
        Command::Start => start::execute(ctx, chat_id).await,
        Command::FearGreed => feargreed::execute(ctx, chat_id).await,
        Command::Components => components::execute(ctx, chat_id).await,
        Command::Unknown => return,
    };

    if let Err(e) = result {
        // The pipelines already tried to notify the chat; reaching here
        // means even that notice could not be delivered.
        error!(chat_id, "Failed to reply to command {:?}: {}", text, e);
    }
}

/// Long-poll loop for inbound commands. Never returns; a failed poll is
/// logged and retried after a short pause so the listener outlives any
/// single failure.
pub async fn run_polling_loop(ctx: Arc<AppContext>) {
    let mut offset: i64 = 0;

    loop {
        match ctx.telegram.get_updates(offset).await {
            Ok(updates) => {
                for update in updates {
                    offset = offset.max(update.update_id + 1);
                    handle_update(&ctx, update).await;
                }
            }
            Err(e) => {
                error!("Polling for updates failed: {}", e);
                tokio::time::sleep(POLL_RETRY_DELAY).await;
            }
        }
    }
}
