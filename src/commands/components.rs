use crate::error::BotError;
use crate::services::pipeline_service;
use crate::AppContext;

/// `/components`: sub-indicator chart grid, delivered to the invoking chat.
pub async fn execute(ctx: &AppContext, chat_id: i64) -> Result<(), BotError> {
    pipeline_service::run_components(ctx, chat_id).await
}
