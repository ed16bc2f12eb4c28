use crate::error::BotError;

/// Immutable process configuration, built once from the environment at
/// startup and shared by reference with every pipeline invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bot token issued by @BotFather
    pub telegram_token: String,
    /// Chat that receives the scheduled daily updates
    pub chat_id: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, BotError> {
        let telegram_token = std::env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| BotError::ConfigMissing("TELEGRAM_BOT_TOKEN is not set".to_string()))?;

        let chat_id_raw = std::env::var("TELEGRAM_CHAT_ID")
            .map_err(|_| BotError::ConfigMissing("TELEGRAM_CHAT_ID is not set".to_string()))?;

        let chat_id = chat_id_raw.trim().parse::<i64>().map_err(|_| {
            BotError::ConfigMissing(format!(
                "TELEGRAM_CHAT_ID must be a numeric chat id, got '{}'",
                chat_id_raw
            ))
        })?;

        Ok(Self {
            telegram_token,
            chat_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var based construction is exercised end to end in main; here we
    // only pin the validation error class.
    #[test]
    fn test_missing_token_is_config_error() {
        std::env::remove_var("TELEGRAM_BOT_TOKEN");
        let result = Config::from_env();
        assert!(matches!(result, Err(BotError::ConfigMissing(_))));
    }
}
