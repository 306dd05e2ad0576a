use reqwest::blocking::Client;
use serde::Deserialize;

use crate::mail::provider::{Header, MailProvider, MessageId, MimePart, ProviderError, RawMessage};

const API_BASE: &str = "https://gmail.googleapis.com/gmail/v1/users/me";

/// Gmail REST v1 client over a bearer token obtained at startup.
pub struct GmailClient {
    http: Client,
    access_token: String,
}

impl GmailClient {
    pub fn new(access_token: String) -> Self {
        Self {
            http: Client::new(),
            access_token,
        }
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, ProviderError> {
        let resp = self.http.get(url).bearer_auth(&self.access_token).send()?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(resp.json()?)
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    // Gmail omits the field entirely for an empty mailbox.
    #[serde(default)]
    messages: Vec<MessageRef>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    id: String,
    payload: PartDto,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct PartDto {
    #[serde(default)]
    mime_type: String,
    #[serde(default)]
    headers: Vec<HeaderDto>,
    body: Option<BodyDto>,
    #[serde(default)]
    parts: Vec<PartDto>,
}

#[derive(Debug, Deserialize)]
struct HeaderDto {
    name: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct BodyDto {
    data: Option<String>,
}

fn into_part(dto: PartDto) -> MimePart {
    MimePart {
        mime_type: dto.mime_type,
        data: dto.body.and_then(|b| b.data).filter(|d| !d.is_empty()),
        parts: dto.parts.into_iter().map(into_part).collect(),
    }
}

impl MailProvider for GmailClient {
    fn list_recent(&self, page_size: u32) -> Result<Vec<MessageId>, ProviderError> {
        let url = format!("{API_BASE}/messages?maxResults={page_size}");
        let list: ListResponse = self.get_json(&url)?;
        Ok(list.messages.into_iter().map(|m| m.id).collect())
    }

    fn get(&self, id: &str) -> Result<RawMessage, ProviderError> {
        let url = format!("{API_BASE}/messages/{id}?format=full");
        let msg: MessageResponse = self.get_json(&url)?;

        // Message headers live on the root part.
        let mut payload = msg.payload;
        let headers = std::mem::take(&mut payload.headers)
            .into_iter()
            .map(|h| Header {
                name: h.name,
                value: h.value,
            })
            .collect();

        Ok(RawMessage {
            id: msg.id,
            headers,
            payload: into_part(payload),
        })
    }
}
