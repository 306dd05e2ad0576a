mod auth;
mod config;
mod mail;
mod tui;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use crate::mail::gmail::GmailClient;
use crate::tui::keymap::KeyMap;

/// Terminal Gmail inbox browser. Takes no runtime flags; it occupies the
/// whole terminal until the quit key is pressed.
#[derive(Parser)]
#[command(name = "inbox-tui", version, about = "Browse a Gmail inbox from the terminal")]
struct Cli {}

fn main() -> Result<()> {
    env_logger::init();
    let _cli = Cli::parse();

    // Anything that fails before the loop starts is fatal: the process exits
    // non-zero without ever touching the terminal.
    let cfg = config::load_config().context("configuration error")?;
    let keys = KeyMap::from_config(cfg.keys.as_ref()).context("invalid [keys] section")?;

    let access_token =
        auth::obtain_access_token(&cfg).context("could not obtain an access token")?;
    let provider = Arc::new(GmailClient::new(access_token));

    tui::run(provider, keys)
}
