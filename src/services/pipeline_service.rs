//! The two fetch -> render -> dispatch pipelines.
//!
//! Both the command handler and the scheduler go through these functions;
//! the destination chat is decided solely by the caller, so command
//! replies and scheduled deliveries can never cross.

use tracing::{error, info};

use super::chart_service::{self, DEFAULT_WINDOW_DAYS};
use crate::error::BotError;
use crate::AppContext;

/// Fetch the index, chart its trend and deliver the photo to `chat_id`.
///
/// A recoverable failure (upstream, parse, render) is reported to the
/// same chat as a plain text notice; the returned error then only
/// reflects whether that notice itself could be delivered.
pub async fn run_feargreed(ctx: &AppContext, chat_id: i64) -> Result<(), BotError> {
    match build_feargreed_photo(ctx).await {
        Ok((png, caption)) => {
            info!(chat_id, "Delivering Fear & Greed chart");
            ctx.telegram.send_photo(chat_id, png, &caption).await
        }
        Err(e) => {
            error!(chat_id, "Fear & Greed pipeline failed: {}", e);
            ctx.telegram
                .send_text(chat_id, &format!("Sorry, the Fear & Greed update failed: {}", e))
                .await
        }
    }
}

/// Fetch all component series, chart them and deliver the photo to `chat_id`.
pub async fn run_components(ctx: &AppContext, chat_id: i64) -> Result<(), BotError> {
    match build_components_photo(ctx).await {
        Ok((png, caption)) => {
            info!(chat_id, "Delivering component charts");
            ctx.telegram.send_photo(chat_id, png, &caption).await
        }
        Err(e) => {
            error!(chat_id, "Components pipeline failed: {}", e);
            ctx.telegram
                .send_text(chat_id, &format!("Sorry, the components update failed: {}", e))
                .await
        }
    }
}

async fn build_feargreed_photo(ctx: &AppContext) -> Result<(Vec<u8>, String), BotError> {
    let snapshot = ctx.cnn.fetch_index().await?;
    let png = chart_service::render_trend(&snapshot.history, &snapshot.current, DEFAULT_WINDOW_DAYS)?;
    let caption = format!(
        "CNN Fear & Greed Index\nScore: {:.2}\nSentiment: {}",
        snapshot.current.score,
        snapshot.current.rating_label()
    );
    Ok((png, caption))
}

async fn build_components_photo(ctx: &AppContext) -> Result<(Vec<u8>, String), BotError> {
    let series_set = ctx.cnn.fetch_components().await?;
    let png = chart_service::render_components(&series_set)?;
    let caption = format!(
        "Fear & Greed component indicators ({} series, last {} days)",
        series_set.len(),
        DEFAULT_WINDOW_DAYS
    );
    Ok((png, caption))
}
