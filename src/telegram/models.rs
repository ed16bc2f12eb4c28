use serde::Deserialize;

/// Envelope returned by `getUpdates`.
#[derive(Debug, Deserialize)]
pub struct UpdatesResponse {
    pub ok: bool,
    #[serde(default)]
    pub result: Vec<Update>,
}

/// One inbound update.
#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<IncomingMessage>,
}

/// Message payload of an update.
#[derive(Debug, Deserialize)]
pub struct IncomingMessage {
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// Generic method-call envelope (`sendMessage`, `sendPhoto`).
#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    pub ok: bool,
    pub description: Option<String>,
}
