use serde::{Deserialize, Serialize};
use tower_sessions::Session;

const FLASH_KEY: &str = "_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Danger,
}

impl FlashLevel {
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Danger => "danger",
        }
    }
}

/// One-shot status line: survives exactly one redirect, shown once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub message: String,
}

impl FlashMessage {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Danger,
            message: message.into(),
        }
    }
}

/// Queue a message for the next rendered page. Session failures only cost
/// the notification, so they are logged and swallowed.
pub async fn push(session: &Session, message: FlashMessage) {
    let mut messages: Vec<FlashMessage> = session
        .get(FLASH_KEY)
        .await
        .ok()
        .flatten()
        .unwrap_or_default();
    messages.push(message);

    if let Err(err) = session.insert(FLASH_KEY, &messages).await {
        tracing::warn!("Failed to store flash message: {err}");
    }
}

/// Drain all pending messages, leaving the session clean.
pub async fn take(session: &Session) -> Vec<FlashMessage> {
    session
        .remove::<Vec<FlashMessage>>(FLASH_KEY)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}
