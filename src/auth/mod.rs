pub mod oauth;
pub mod token_cache;

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use log::{info, warn};

use crate::config::Config;

const GMAIL_SCOPE: &str = "https://www.googleapis.com/auth/gmail.readonly";
const DEFAULT_REDIRECT: &str = "http://127.0.0.1:8080/callback";

/// Produces a usable access token, trying in order:
/// 1) cached access token that has not expired,
/// 2) refresh-token exchange,
/// 3) interactive browser consent (PKCE).
///
/// Any failure here is a startup failure; the caller exits before the UI.
pub fn obtain_access_token(cfg: &Config) -> Result<String> {
    let redirect = cfg
        .redirect_uri
        .clone()
        .unwrap_or_else(|| DEFAULT_REDIRECT.to_string());
    let secret = cfg.client_secret.as_deref();

    let cached = token_cache::load()?.unwrap_or_default();
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as i64;

    if let (Some(at), Some(exp)) = (&cached.access_token, cached.expires_at_epoch)
        && now < exp
    {
        info!("using cached access token (expires in {}s)", exp - now);
        return Ok(at.clone());
    }

    let tokens = if let Some(rt) = &cached.refresh_token {
        match oauth::refresh_access_token(&cfg.client_id, secret, rt) {
            Ok(t) => t,
            Err(e) => {
                warn!("token refresh failed ({e}); falling back to interactive auth");
                oauth::perform_pkce_flow(&cfg.client_id, secret, &redirect, GMAIL_SCOPE)?
            }
        }
    } else {
        info!("no cached credentials; starting interactive auth flow");
        oauth::perform_pkce_flow(&cfg.client_id, secret, &redirect, GMAIL_SCOPE)?
    };

    // Persist what we got. A refresh exchange may not return a new refresh
    // token; keep the old one in that case.
    let refresh_token = tokens.refresh_token.clone().or(cached.refresh_token);
    let expires_at_epoch = tokens.expires_in.map(|s| now + s as i64);
    if let Err(e) = token_cache::save(&token_cache::TokenCache {
        access_token: Some(tokens.access_token.clone()),
        refresh_token,
        expires_at_epoch,
    }) {
        warn!("could not persist token cache: {e}");
    }

    Ok(tokens.access_token)
}
