use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use base64::{Engine as _, engine::general_purpose};
use chrono::{DateTime, Utc};
use log::{debug, warn};

use crate::mail::MessageSummary;
use crate::mail::provider::{MailProvider, MimePart, ProviderError, RawMessage};
use crate::tui::event::AppEvent;

/// How many of the most recent messages one fetch retrieves.
pub const PAGE_SIZE: u32 = 20;

/// Parts nested deeper than this are treated as undecodable.
const MAX_MIME_DEPTH: usize = 16;

const NO_SUBJECT: &str = "(no subject)";

/// `Date` header variants: double-digit day first, then space-padded
/// single-digit day. First match wins.
const DATE_FORMATS: [&str; 2] = ["%a, %d %b %Y %H:%M:%S %z", "%a, %e %b %Y %H:%M:%S %z"];

/// Runs one fetch on its own thread. The outcome is delivered over `tx`
/// exactly once, as either `FetchOk` or `FetchErr`; there is no cancellation.
pub fn spawn_fetch(provider: Arc<dyn MailProvider>, tx: Sender<AppEvent>) {
    thread::spawn(move || {
        let outcome = match fetch_inbox(provider.as_ref()) {
            Ok(messages) => AppEvent::FetchOk(messages),
            Err(e) => AppEvent::FetchErr(e.to_string()),
        };
        // The loop may already have exited; the result is simply dropped then.
        let _ = tx.send(outcome);
    });
}

/// Lists the most recent page, then retrieves each message in full. A message
/// that fails to retrieve is dropped from the result; only a failed listing
/// call fails the fetch as a whole.
pub fn fetch_inbox(provider: &dyn MailProvider) -> Result<Vec<MessageSummary>, ProviderError> {
    let ids = provider.list_recent(PAGE_SIZE)?;
    debug!("listing returned {} message ids", ids.len());

    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        match provider.get(&id) {
            Ok(raw) => out.push(normalize(raw)),
            Err(e) => warn!("skipping message {id}: {e}"),
        }
    }
    Ok(out)
}

fn normalize(raw: RawMessage) -> MessageSummary {
    let from = raw.header("From").unwrap_or_default().to_string();
    let subject = match raw.header("Subject") {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => NO_SUBJECT.to_string(),
    };
    let date = raw
        .header("Date")
        .map(parse_date)
        .unwrap_or(DateTime::UNIX_EPOCH);
    let body = extract_body(&raw.payload, 0);

    MessageSummary {
        id: raw.id,
        from,
        subject,
        date,
        body,
    }
}

/// An unparseable header yields the epoch, never an error.
fn parse_date(value: &str) -> DateTime<Utc> {
    for fmt in DATE_FORMATS {
        if let Ok(d) = DateTime::parse_from_str(value.trim(), fmt) {
            return d.with_timezone(&Utc);
        }
    }
    DateTime::UNIX_EPOCH
}

/// Depth-first, left-biased, plain-text-preferring walk over the part tree:
/// inline data at the current node wins, then the first decodable
/// `text/plain` child, then recursion into the first child. A node that
/// fails to decode falls through to the next step rather than erroring.
fn extract_body(part: &MimePart, depth: usize) -> String {
    if depth > MAX_MIME_DEPTH {
        return String::new();
    }

    if let Some(data) = &part.data
        && let Some(text) = decode_part_data(data)
    {
        return text;
    }

    for child in &part.parts {
        if child.mime_type == "text/plain"
            && let Some(data) = &child.data
            && let Some(text) = decode_part_data(data)
        {
            return text;
        }
    }

    if let Some(first) = part.parts.first() {
        return extract_body(first, depth + 1);
    }

    String::new()
}

/// Gmail emits URL-safe base64, padded or not depending on the part.
fn decode_part_data(data: &str) -> Option<String> {
    let bytes = general_purpose::URL_SAFE
        .decode(data)
        .or_else(|_| general_purpose::URL_SAFE_NO_PAD.decode(data))
        .ok()?;
    String::from_utf8(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;

    use crate::mail::provider::Header;

    fn b64(s: &str) -> String {
        general_purpose::URL_SAFE.encode(s)
    }

    fn inline(mime_type: &str, text: &str) -> MimePart {
        MimePart {
            mime_type: mime_type.to_string(),
            data: Some(b64(text)),
            parts: vec![],
        }
    }

    fn container(mime_type: &str, parts: Vec<MimePart>) -> MimePart {
        MimePart {
            mime_type: mime_type.to_string(),
            data: None,
            parts,
        }
    }

    fn raw(headers: Vec<(&str, &str)>, payload: MimePart) -> RawMessage {
        RawMessage {
            id: "m1".to_string(),
            headers: headers
                .into_iter()
                .map(|(name, value)| Header {
                    name: name.to_string(),
                    value: value.to_string(),
                })
                .collect(),
            payload,
        }
    }

    #[test]
    fn prefers_plain_text_child_over_earlier_html() {
        let payload = container(
            "multipart/alternative",
            vec![inline("text/html", "<p>hi</p>"), inline("text/plain", "hi")],
        );
        assert_eq!(extract_body(&payload, 0), "hi");
    }

    #[test]
    fn inline_root_data_wins_without_inspecting_parts() {
        let mut payload = inline("text/plain", "hello");
        payload.parts = vec![inline("text/plain", "ignored")];
        assert_eq!(extract_body(&payload, 0), "hello");
    }

    #[test]
    fn recurses_into_single_nested_part() {
        let payload = container(
            "multipart/mixed",
            vec![container(
                "multipart/alternative",
                vec![inline("text/plain", "nested")],
            )],
        );
        assert_eq!(extract_body(&payload, 0), "nested");
    }

    #[test]
    fn no_content_yields_empty_body() {
        let payload = container("multipart/mixed", vec![]);
        assert_eq!(extract_body(&payload, 0), "");
    }

    #[test]
    fn undecodable_inline_data_falls_through_to_children() {
        let mut root = container("multipart/mixed", vec![inline("text/plain", "fallback")]);
        root.data = Some("!!not-base64!!".to_string());
        assert_eq!(extract_body(&root, 0), "fallback");
    }

    #[test]
    fn recursion_stops_at_depth_cap() {
        let mut part = inline("text/plain", "too deep");
        for _ in 0..(MAX_MIME_DEPTH + 4) {
            part = container("multipart/mixed", vec![part]);
        }
        assert_eq!(extract_body(&part, 0), "");
    }

    #[test]
    fn both_day_paddings_parse_to_the_same_instant() {
        let single = parse_date("Mon, 2 Jan 2006 15:04:05 -0700");
        let double = parse_date("Mon, 02 Jan 2006 15:04:05 -0700");
        assert_eq!(single, double);
        assert_ne!(single, DateTime::UNIX_EPOCH);
    }

    #[test]
    fn unparseable_date_defaults_to_epoch() {
        assert_eq!(parse_date("yesterday-ish"), DateTime::UNIX_EPOCH);
    }

    #[test]
    fn missing_subject_gets_placeholder() {
        let msg = normalize(raw(
            vec![("From", "a@example.com")],
            inline("text/plain", "body"),
        ));
        assert_eq!(msg.subject, NO_SUBJECT);
        assert_eq!(msg.from, "a@example.com");
        assert_eq!(msg.body, "body");
        assert_eq!(msg.date, DateTime::UNIX_EPOCH);
    }

    #[test]
    fn header_lookup_is_case_sensitive() {
        let msg = normalize(raw(
            vec![("subject", "lowercase"), ("Subject", "Exact")],
            inline("text/plain", "body"),
        ));
        assert_eq!(msg.subject, "Exact");
    }

    struct StubProvider {
        fail_listing: bool,
        ids: Vec<String>,
        broken: Vec<String>,
    }

    impl MailProvider for StubProvider {
        fn list_recent(&self, _page_size: u32) -> Result<Vec<String>, ProviderError> {
            if self.fail_listing {
                return Err(ProviderError::Api {
                    status: 500,
                    message: "listing down".to_string(),
                });
            }
            Ok(self.ids.clone())
        }

        fn get(&self, id: &str) -> Result<RawMessage, ProviderError> {
            if self.broken.iter().any(|b| b == id) {
                return Err(ProviderError::Api {
                    status: 404,
                    message: "gone".to_string(),
                });
            }
            Ok(raw(
                vec![("From", "a@example.com"), ("Subject", id)],
                inline("text/plain", "body"),
            ))
        }
    }

    #[test]
    fn per_message_failures_are_dropped() {
        let provider = StubProvider {
            fail_listing: false,
            ids: vec!["a".into(), "b".into(), "c".into()],
            broken: vec!["b".into()],
        };
        let got = fetch_inbox(&provider).unwrap();
        let subjects: Vec<_> = got.iter().map(|m| m.subject.as_str()).collect();
        assert_eq!(subjects, vec!["a", "c"]);
    }

    #[test]
    fn listing_failure_fails_the_whole_fetch() {
        let provider = StubProvider {
            fail_listing: true,
            ids: vec![],
            broken: vec![],
        };
        assert!(fetch_inbox(&provider).is_err());
    }
}
