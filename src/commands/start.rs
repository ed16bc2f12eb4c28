use crate::error::BotError;
use crate::AppContext;

const USAGE: &str = "Hi! I am the Fear & Greed Index bot.\n\
Use /feargreed for the latest index and its trend chart.\n\
Use /components for charts of the component indicators.";

pub async fn execute(ctx: &AppContext, chat_id: i64) -> Result<(), BotError> {
    ctx.telegram.send_text(chat_id, USAGE).await
}
