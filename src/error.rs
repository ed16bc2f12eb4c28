use thiserror::Error;

/// Failure classes for the bot.
///
/// `ConfigMissing` is only produced during startup and is fatal. Everything
/// else is scoped to a single pipeline invocation: the caller logs it (and
/// notifies the chat where possible) and the process keeps running.
#[derive(Debug, Error)]
pub enum BotError {
    /// Required configuration absent or invalid at startup
    #[error("missing configuration: {0}")]
    ConfigMissing(String),
    /// Upstream HTTP call failed or timed out
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),
    /// Upstream responded but the JSON did not match the expected shape
    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),
    /// Chart could not be rendered from the given series
    #[error("chart rendering failed: {0}")]
    Render(String),
    /// The messaging platform rejected an outbound send
    #[error("message delivery failed: {0}")]
    Delivery(String),
}
