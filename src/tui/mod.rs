pub mod event;
pub mod keymap;
pub mod state;
pub mod theme;
pub mod ui;
pub mod update;

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self as term_event, Event};
use log::info;
use ratatui::DefaultTerminal;

use crate::mail::fetch;
use crate::mail::provider::MailProvider;
use crate::tui::event::{AppEvent, Command};
use crate::tui::keymap::KeyMap;
use crate::tui::state::Session;
use crate::tui::theme::Theme;

/// Drives the spinner animation and keeps the loop from parking forever
/// while a fetch is outstanding.
const TICK: Duration = Duration::from_millis(100);

pub fn run(provider: Arc<dyn MailProvider>, keys: KeyMap) -> Result<()> {
    let terminal = ratatui::init();
    let result = event_loop(terminal, provider, keys);
    ratatui::restore();
    result
}

/// The only place that mutates the session: one event in, one reduced state
/// out, then the requested commands run.
fn event_loop(
    mut terminal: DefaultTerminal,
    provider: Arc<dyn MailProvider>,
    keys: KeyMap,
) -> Result<()> {
    let (tx, rx) = mpsc::channel::<AppEvent>();
    let theme = Theme::default();

    let size = terminal.size()?;
    let mut session = Session::new(size.width, size.height);

    // Initial population; the session starts in Loading.
    fetch::spawn_fetch(provider.clone(), tx.clone());

    loop {
        terminal.draw(|f| ui::render(f, &session, &theme))?;

        let event = next_event(&rx)?;
        for command in update::update(&mut session, &keys, event) {
            match command {
                Command::StartFetch => fetch::spawn_fetch(provider.clone(), tx.clone()),
                Command::Quit => {
                    info!("quit requested");
                    return Ok(());
                }
            }
        }
    }
}

/// Terminal input first, then a completed fetch if one arrived, then a tick.
fn next_event(rx: &Receiver<AppEvent>) -> Result<AppEvent> {
    if term_event::poll(TICK)? {
        return Ok(match term_event::read()? {
            Event::Key(key) => AppEvent::Key(key),
            Event::Resize(width, height) => AppEvent::Resize(width, height),
            _ => AppEvent::Tick,
        });
    }
    if let Ok(done) = rx.try_recv() {
        return Ok(done);
    }
    Ok(AppEvent::Tick)
}
