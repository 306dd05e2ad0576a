use ratatui::style::{Color, Modifier, Style};

/// Explicit style bundle handed to the renderer; there is no process-wide
/// mutable style state.
#[derive(Debug, Clone)]
pub struct Theme {
    pub title: Style,
    pub info: Style,
    pub help: Style,
    pub error: Style,
    pub selected: Style,
    pub spinner: Style,
    pub separator: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            title: Style::default()
                .fg(Color::Rgb(0xff, 0x75, 0xb7))
                .add_modifier(Modifier::BOLD),
            info: Style::default().fg(Color::Rgb(0x9b, 0x9b, 0x9b)),
            help: Style::default().fg(Color::DarkGray),
            error: Style::default().fg(Color::Red),
            selected: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            spinner: Style::default().fg(Color::Magenta),
            separator: Style::default().fg(Color::DarkGray),
        }
    }
}
