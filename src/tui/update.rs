use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::tui::event::{AppEvent, Command};
use crate::tui::keymap::{self, KeyMap};
use crate::tui::state::{DetailView, Mode, Session};

/// The single transition point: every observed event funnels through here,
/// and all follow-up work comes back as commands for the loop to execute.
pub fn update(session: &mut Session, keys: &KeyMap, event: AppEvent) -> Vec<Command> {
    match event {
        AppEvent::Tick => {
            if matches!(session.mode, Mode::Loading) {
                session.spinner_frame = session.spinner_frame.wrapping_add(1);
            }
            Vec::new()
        }
        AppEvent::Resize(width, height) => {
            session.width = width;
            session.height = height;
            let (vw, vh) = session.viewport_size();
            if let Mode::Reading(detail) = &mut session.mode {
                detail.resize(vw, vh);
            }
            Vec::new()
        }
        AppEvent::FetchOk(messages) => {
            session.list.replace(messages);
            session.mode = Mode::Browsing;
            Vec::new()
        }
        AppEvent::FetchErr(cause) => {
            session.mode = Mode::Failed(cause);
            Vec::new()
        }
        AppEvent::Key(key) => {
            if key.kind != KeyEventKind::Press {
                return Vec::new();
            }
            dispatch_key(session, keys, key)
        }
    }
}

fn dispatch_key(session: &mut Session, keys: &KeyMap, key: KeyEvent) -> Vec<Command> {
    // Typing into the filter captures everything, including the quit chars.
    let in_filter_entry =
        matches!(session.mode, Mode::Browsing) && session.list.is_filtering();
    if !in_filter_entry && keymap::matches(&keys.quit, &key) {
        return vec![Command::Quit];
    }

    match session.mode {
        // A fetch is outstanding exactly while Loading; no refresh (or any
        // other binding) is consulted here, so at most one task is in flight.
        Mode::Loading => Vec::new(),
        Mode::Failed(_) => failed_key(session, keys, key),
        Mode::Browsing => browsing_key(session, keys, key),
        Mode::Reading(_) => reading_key(session, keys, key),
    }
}

fn failed_key(session: &mut Session, keys: &KeyMap, key: KeyEvent) -> Vec<Command> {
    if keymap::matches(&keys.refresh, &key) {
        session.mode = Mode::Loading;
        return vec![Command::StartFetch];
    }
    Vec::new()
}

fn browsing_key(session: &mut Session, keys: &KeyMap, key: KeyEvent) -> Vec<Command> {
    if session.list.is_filtering() {
        return filter_entry_key(session, key);
    }

    if keymap::matches(&keys.up, &key) {
        session.list.move_selection(-1);
    } else if keymap::matches(&keys.down, &key) {
        session.list.move_selection(1);
    } else if keymap::matches(&keys.page_up, &key) {
        session.list.move_selection(-i32::from(session.list_rows()));
    } else if keymap::matches(&keys.page_down, &key) {
        session.list.move_selection(i32::from(session.list_rows()));
    } else if keymap::matches(&keys.select, &key) {
        if let Some(message) = session.list.selected_message() {
            let body = message.body.clone();
            let (vw, vh) = session.viewport_size();
            session.mode = Mode::Reading(DetailView::new(body, vw, vh));
        }
    } else if keymap::matches(&keys.refresh, &key) {
        session.mode = Mode::Loading;
        return vec![Command::StartFetch];
    } else if keymap::matches(&keys.filter, &key) {
        session.list.begin_filter();
    } else if keymap::matches(&keys.help, &key) {
        session.show_help = !session.show_help;
    }
    Vec::new()
}

fn filter_entry_key(session: &mut Session, key: KeyEvent) -> Vec<Command> {
    match key.code {
        KeyCode::Esc => session.list.clear_filter(),
        KeyCode::Enter => session.list.commit_filter(),
        KeyCode::Backspace => session.list.pop_filter_char(),
        KeyCode::Char(c) => session.list.push_filter_char(c),
        _ => {}
    }
    Vec::new()
}

fn reading_key(session: &mut Session, keys: &KeyMap, key: KeyEvent) -> Vec<Command> {
    if keymap::matches(&keys.back, &key) {
        // The list (and its selection) was never touched while reading.
        session.mode = Mode::Browsing;
        return Vec::new();
    }
    if keymap::matches(&keys.help, &key) {
        session.show_help = !session.show_help;
        return Vec::new();
    }

    let Mode::Reading(detail) = &mut session.mode else {
        return Vec::new();
    };
    if keymap::matches(&keys.up, &key) {
        detail.scroll_by(-1);
    } else if keymap::matches(&keys.down, &key) {
        detail.scroll_by(1);
    } else if keymap::matches(&keys.page_up, &key) {
        let delta = detail.half_page();
        detail.scroll_by(-delta);
    } else if keymap::matches(&keys.page_down, &key) {
        let delta = detail.half_page();
        detail.scroll_by(delta);
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use crossterm::event::KeyModifiers;

    use crate::mail::MessageSummary;

    fn session() -> Session {
        Session::new(80, 24)
    }

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn msg(id: &str, subject: &str, body: &str) -> MessageSummary {
        MessageSummary {
            id: id.to_string(),
            from: "a@example.com".to_string(),
            subject: subject.to_string(),
            date: DateTime::UNIX_EPOCH,
            body: body.to_string(),
        }
    }

    #[test]
    fn empty_fetch_lands_in_browsing_with_an_empty_list() {
        let mut s = session();
        let keys = KeyMap::default();
        let cmds = update(&mut s, &keys, AppEvent::FetchOk(vec![]));
        assert!(cmds.is_empty());
        assert!(matches!(s.mode, Mode::Browsing));
        assert!(s.list.visible().is_empty());
        assert_eq!(s.list.selected_index(), None);
    }

    #[test]
    fn fetch_error_lands_in_failed_and_refresh_restarts_once() {
        let mut s = session();
        let keys = KeyMap::default();
        update(&mut s, &keys, AppEvent::FetchErr("listing down".to_string()));
        assert!(matches!(s.mode, Mode::Failed(_)));

        let cmds = update(&mut s, &keys, key(KeyCode::Char('r')));
        assert_eq!(cmds, vec![Command::StartFetch]);
        assert!(matches!(s.mode, Mode::Loading));
    }

    #[test]
    fn refresh_is_ignored_while_a_fetch_is_outstanding() {
        let mut s = session();
        let keys = KeyMap::default();
        assert!(matches!(s.mode, Mode::Loading));
        let cmds = update(&mut s, &keys, key(KeyCode::Char('r')));
        assert!(cmds.is_empty());
        assert!(matches!(s.mode, Mode::Loading));
    }

    #[test]
    fn select_opens_reading_at_the_top_and_back_preserves_selection() {
        let mut s = session();
        let keys = KeyMap::default();
        update(
            &mut s,
            &keys,
            AppEvent::FetchOk(vec![
                msg("1", "first", "body one"),
                msg("2", "second", "body two"),
            ]),
        );
        update(&mut s, &keys, key(KeyCode::Down));
        assert_eq!(s.list.selected_index(), Some(1));

        update(&mut s, &keys, key(KeyCode::Enter));
        match &s.mode {
            Mode::Reading(detail) => {
                assert_eq!(detail.scroll_offset, 0);
                assert_eq!(detail.content, "body two");
            }
            other => panic!("expected Reading, got {other:?}"),
        }

        update(&mut s, &keys, key(KeyCode::Esc));
        assert!(matches!(s.mode, Mode::Browsing));
        assert_eq!(s.list.selected_index(), Some(1));
    }

    #[test]
    fn select_on_an_empty_list_is_a_no_op() {
        let mut s = session();
        let keys = KeyMap::default();
        update(&mut s, &keys, AppEvent::FetchOk(vec![]));
        update(&mut s, &keys, key(KeyCode::Enter));
        assert!(matches!(s.mode, Mode::Browsing));
    }

    #[test]
    fn resize_while_reading_reclamps_the_scroll_offset() {
        let mut s = session();
        let keys = KeyMap::default();
        let body = (0..60).map(|i| format!("line {i}")).collect::<Vec<_>>();
        update(
            &mut s,
            &keys,
            AppEvent::FetchOk(vec![msg("1", "long", &body.join("\n"))]),
        );
        update(&mut s, &keys, key(KeyCode::Enter));
        update(&mut s, &keys, key(KeyCode::PageDown));
        update(&mut s, &keys, key(KeyCode::PageDown));

        update(&mut s, &keys, AppEvent::Resize(80, 80));
        match &s.mode {
            Mode::Reading(detail) => {
                assert!(detail.scroll_offset <= detail.max_offset());
                assert_eq!(detail.scroll_offset, 0); // everything fits now
            }
            other => panic!("expected Reading, got {other:?}"),
        }
    }

    #[test]
    fn refresh_from_browsing_requests_exactly_one_fetch() {
        let mut s = session();
        let keys = KeyMap::default();
        update(&mut s, &keys, AppEvent::FetchOk(vec![msg("1", "a", "b")]));
        let cmds = update(&mut s, &keys, key(KeyCode::Char('r')));
        assert_eq!(cmds, vec![Command::StartFetch]);
        assert!(matches!(s.mode, Mode::Loading));
    }

    #[test]
    fn unrecognized_keys_are_no_ops() {
        let mut s = session();
        let keys = KeyMap::default();
        update(&mut s, &keys, AppEvent::FetchOk(vec![msg("1", "a", "b")]));
        let cmds = update(&mut s, &keys, key(KeyCode::F(5)));
        assert!(cmds.is_empty());
        assert!(matches!(s.mode, Mode::Browsing));
    }

    #[test]
    fn quit_works_from_every_mode_including_loading() {
        let keys = KeyMap::default();

        let mut loading = session();
        assert_eq!(
            update(&mut loading, &keys, key(KeyCode::Char('Q'))),
            vec![Command::Quit]
        );

        let mut failed = session();
        update(&mut failed, &keys, AppEvent::FetchErr("x".to_string()));
        assert_eq!(
            update(&mut failed, &keys, key(KeyCode::Char('Q'))),
            vec![Command::Quit]
        );

        let mut reading = session();
        update(&mut reading, &keys, AppEvent::FetchOk(vec![msg("1", "a", "b")]));
        update(&mut reading, &keys, key(KeyCode::Enter));
        assert_eq!(
            update(&mut reading, &keys, key(KeyCode::Char('Q'))),
            vec![Command::Quit]
        );
    }

    #[test]
    fn filter_entry_captures_text_until_committed() {
        let mut s = session();
        let keys = KeyMap::default();
        update(
            &mut s,
            &keys,
            AppEvent::FetchOk(vec![msg("1", "query", "b"), msg("2", "other", "b")]),
        );

        update(&mut s, &keys, key(KeyCode::Char('/')));
        assert!(s.list.is_filtering());

        // typed characters are filter text here, never bindings
        let cmds = update(&mut s, &keys, key(KeyCode::Char('q')));
        assert!(cmds.is_empty());
        assert_eq!(s.list.filter_text(), "q");
        assert_eq!(s.list.visible().len(), 1);

        update(&mut s, &keys, key(KeyCode::Enter));
        assert!(!s.list.is_filtering());
        assert_eq!(s.list.filter_text(), "q");

        // Esc from committed-filter state goes back (list mode keeps it);
        // clearing happens during entry.
        update(&mut s, &keys, key(KeyCode::Char('/')));
        update(&mut s, &keys, key(KeyCode::Esc));
        assert_eq!(s.list.filter_text(), "");
        assert_eq!(s.list.visible().len(), 2);
    }

    #[test]
    fn tick_advances_the_spinner_only_while_loading() {
        let mut s = session();
        let keys = KeyMap::default();
        update(&mut s, &keys, AppEvent::Tick);
        assert_eq!(s.spinner_frame, 1);

        update(&mut s, &keys, AppEvent::FetchOk(vec![]));
        update(&mut s, &keys, AppEvent::Tick);
        assert_eq!(s.spinner_frame, 1);
    }
}
