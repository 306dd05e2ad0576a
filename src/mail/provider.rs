use thiserror::Error;

pub type MessageId = String;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider returned HTTP {status}: {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Clone)]
pub struct Header {
    pub name: String,
    pub value: String,
}

/// One node of a MIME part tree. `data`, when present, is the base64url
/// payload as the provider sent it; decoding happens at extraction time.
#[derive(Debug, Clone, Default)]
pub struct MimePart {
    pub mime_type: String,
    pub data: Option<String>,
    pub parts: Vec<MimePart>,
}

#[derive(Debug, Clone)]
pub struct RawMessage {
    pub id: MessageId,
    pub headers: Vec<Header>,
    pub payload: MimePart,
}

impl RawMessage {
    /// Exact-name, case-sensitive header lookup (first occurrence wins).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name == name)
            .map(|h| h.value.as_str())
    }
}

/// Listing and retrieval against the mail provider. Implementations are
/// handed to the fetch task behind `Arc<dyn MailProvider>`.
pub trait MailProvider: Send + Sync {
    fn list_recent(&self, page_size: u32) -> Result<Vec<MessageId>, ProviderError>;
    fn get(&self, id: &str) -> Result<RawMessage, ProviderError>;
}
