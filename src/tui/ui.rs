use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::tui::state::{DetailView, Mode, Session};
use crate::tui::theme::Theme;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Pure projection of the session onto one frame. Owns no state; selection
/// comes in through the session, styles through the theme.
pub fn render(f: &mut Frame, session: &Session, theme: &Theme) {
    match &session.mode {
        Mode::Loading => render_loading(f, session, theme),
        Mode::Failed(cause) => render_failed(f, cause, theme),
        Mode::Browsing => render_list(f, session, theme),
        Mode::Reading(detail) => render_detail(f, session, detail, theme),
    }
}

fn render_loading(f: &mut Frame, session: &Session, theme: &Theme) {
    let frame = SPINNER_FRAMES[session.spinner_frame % SPINNER_FRAMES.len()];
    let text = Text::from(vec![
        Line::default(),
        Line::from(vec![
            Span::raw("   "),
            Span::styled(frame, theme.spinner),
            Span::raw(" Loading messages..."),
        ]),
    ]);
    f.render_widget(Paragraph::new(text), f.area());
}

fn render_failed(f: &mut Frame, cause: &str, theme: &Theme) {
    let text = Text::from(vec![
        Line::default(),
        Line::styled(format!("  Error: {cause}"), theme.error),
        Line::default(),
        Line::styled("  r: retry • Q: quit", theme.help),
    ]);
    f.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), f.area());
}

fn render_list(f: &mut Frame, session: &Session, theme: &Theme) {
    let [list_area, filter_area, footer_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(2),
    ])
    .areas(f.area());

    let visible = session.list.visible();

    let items: Vec<ListItem> = visible
        .iter()
        .map(|m| {
            let subject = Line::styled(m.subject.clone(), theme.title);
            let info = Line::styled(
                format!("From: {} | {}", m.from, m.date_line()),
                theme.info,
            );
            ListItem::new(Text::from(vec![subject, info]))
        })
        .collect();

    let title = if visible.is_empty() {
        " Inbox (empty) ".to_string()
    } else {
        format!(" Inbox ({} messages) ", visible.len())
    };

    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_symbol("➜ ")
        .highlight_style(theme.selected);

    let mut list_state = ListState::default();
    list_state.select(session.list.selected_index());
    f.render_stateful_widget(list, list_area, &mut list_state);

    render_filter_line(f, session, theme, filter_area);
    render_footer(f, session, theme, footer_area);
}

fn render_filter_line(f: &mut Frame, session: &Session, theme: &Theme, area: Rect) {
    if !session.list.is_filtering() && session.list.filter_text().is_empty() {
        return;
    }
    let cursor = if session.list.is_filtering() { "▏" } else { "" };
    let line = Line::from(vec![
        Span::styled(" filter: ", theme.help),
        Span::raw(format!("/{}{}", session.list.filter_text(), cursor)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_footer(f: &mut Frame, session: &Session, theme: &Theme, area: Rect) {
    let hint = if session.list.is_filtering() {
        " type to filter • enter: keep • esc: clear"
    } else if session.show_help {
        " ↑/k up • ↓/j down • pgup/pgdn page • enter: read • /: filter • r: refresh • ?: help • Q: quit"
    } else {
        " ?: help • Q: quit"
    };
    f.render_widget(Paragraph::new(Line::styled(hint, theme.help)), area);
}

fn render_detail(f: &mut Frame, session: &Session, detail: &DetailView, theme: &Theme) {
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(5),
        Constraint::Min(0),
        Constraint::Length(2),
    ])
    .areas(f.area());

    let (subject, from, date) = match session.list.selected_message() {
        Some(m) => (m.subject.clone(), m.from.clone(), m.date_line()),
        None => (String::new(), String::new(), String::new()),
    };

    let separator = "─".repeat(f.area().width as usize);
    let header = Text::from(vec![
        Line::styled(format!("  {subject}"), theme.title),
        Line::styled(format!("  From: {from}"), theme.info),
        Line::styled(format!("  Date: {date}"), theme.info),
        Line::styled(separator, theme.separator),
    ]);
    f.render_widget(Paragraph::new(header), header_area);

    let [body_area] = Layout::horizontal([Constraint::Min(0)])
        .horizontal_margin(2)
        .areas(body_area);
    let body = Paragraph::new(detail.content.as_str())
        .wrap(Wrap { trim: false })
        .scroll((detail.scroll_offset, 0));
    f.render_widget(body, body_area);

    let hint = if session.show_help {
        " ↑/k, ↓/j: scroll • pgup/pgdn: half page • esc: back • ?: help • Q: quit"
    } else {
        " ↑/↓: scroll • esc: back • ?: help"
    };
    f.render_widget(Paragraph::new(Line::styled(hint, theme.help)), footer_area);
}
