pub mod fetch;
pub mod gmail;
pub mod provider;

use chrono::{DateTime, Utc};

/// Normalized, immutable representation of one retrieved message.
#[derive(Debug, Clone)]
pub struct MessageSummary {
    /// Opaque provider-assigned id.
    pub id: String,
    pub from: String,
    pub subject: String,
    pub date: DateTime<Utc>,
    pub body: String,
}

impl MessageSummary {
    pub fn date_line(&self) -> String {
        self.date.format("%Y-%m-%d %H:%M").to_string()
    }
}
