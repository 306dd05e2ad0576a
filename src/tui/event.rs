use crossterm::event::KeyEvent;

use crate::mail::MessageSummary;

/// Everything the loop can observe, as one closed union so the reducer's
/// match stays exhaustive when a variant is added.
#[derive(Debug)]
pub enum AppEvent {
    Tick,
    Key(KeyEvent),
    Resize(u16, u16),
    FetchOk(Vec<MessageSummary>),
    FetchErr(String),
}

/// Follow-up work a transition requests. Executed by the loop, never inside
/// the reducer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    StartFetch,
    Quit,
}
