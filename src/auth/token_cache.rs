use std::fs;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::config::tokens_path;

/// Token material stored in ~/.config/inbox-tui/tokens.json
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TokenCache {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_at_epoch: Option<i64>, // epoch seconds
}

pub fn save(cache: &TokenCache) -> Result<()> {
    let p = tokens_path()?;
    let s = serde_json::to_string_pretty(cache)?;
    fs::write(&p, s)?;
    Ok(())
}

/// Load the cache file if present.
pub fn load() -> Result<Option<TokenCache>> {
    let p = tokens_path()?;
    if !p.exists() {
        return Ok(None);
    }
    let s = fs::read_to_string(&p)?;
    let cache: TokenCache = serde_json::from_str(&s)?;
    Ok(Some(cache))
}
