use crate::error::BotError;
use crate::services::pipeline_service;
use crate::AppContext;

/// `/feargreed`: index trend chart, delivered to the invoking chat.
pub async fn execute(ctx: &AppContext, chat_id: i64) -> Result<(), BotError> {
    pipeline_service::run_feargreed(ctx, chat_id).await
}
