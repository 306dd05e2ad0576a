use std::collections::HashMap;

use anyhow::{Result, anyhow, bail};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// One chord a binding matches exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chord {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl Chord {
    const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            mods: KeyModifiers::NONE,
        }
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        // Character chords ignore SHIFT so `?` and `Q` match as typed.
        let mods = if matches!(self.code, KeyCode::Char(_)) {
            key.modifiers.difference(KeyModifiers::SHIFT)
        } else {
            key.modifiers
        };
        self.code == key.code && self.mods == mods
    }
}

/// Binding table consulted by the dispatcher. Rebinding means editing this
/// table (or the `[keys]` config section), never the dispatch logic.
#[derive(Debug, Clone)]
pub struct KeyMap {
    pub up: Vec<Chord>,
    pub down: Vec<Chord>,
    pub select: Vec<Chord>,
    pub back: Vec<Chord>,
    pub quit: Vec<Chord>,
    pub help: Vec<Chord>,
    pub refresh: Vec<Chord>,
    pub filter: Vec<Chord>,
    pub page_up: Vec<Chord>,
    pub page_down: Vec<Chord>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            up: vec![Chord::plain(KeyCode::Up), Chord::plain(KeyCode::Char('k'))],
            down: vec![Chord::plain(KeyCode::Down), Chord::plain(KeyCode::Char('j'))],
            select: vec![Chord::plain(KeyCode::Enter)],
            back: vec![Chord::plain(KeyCode::Esc)],
            quit: vec![
                Chord::plain(KeyCode::Char('Q')),
                Chord {
                    code: KeyCode::Char('c'),
                    mods: KeyModifiers::CONTROL,
                },
            ],
            help: vec![Chord::plain(KeyCode::Char('?'))],
            refresh: vec![Chord::plain(KeyCode::Char('r'))],
            filter: vec![Chord::plain(KeyCode::Char('/'))],
            page_up: vec![Chord::plain(KeyCode::PageUp)],
            page_down: vec![Chord::plain(KeyCode::PageDown)],
        }
    }
}

impl KeyMap {
    /// Defaults overridden by the config `[keys]` table, keyed by action name.
    pub fn from_config(overrides: Option<&HashMap<String, Vec<String>>>) -> Result<Self> {
        let mut map = Self::default();
        let Some(overrides) = overrides else {
            return Ok(map);
        };

        for (action, names) in overrides {
            let chords = names
                .iter()
                .map(|n| parse_key(n))
                .collect::<Result<Vec<_>>>()?;
            if chords.is_empty() {
                bail!("key action '{action}' has no bindings");
            }
            let slot = match action.as_str() {
                "up" => &mut map.up,
                "down" => &mut map.down,
                "select" => &mut map.select,
                "back" => &mut map.back,
                "quit" => &mut map.quit,
                "help" => &mut map.help,
                "refresh" => &mut map.refresh,
                "filter" => &mut map.filter,
                "page_up" => &mut map.page_up,
                "page_down" => &mut map.page_down,
                other => bail!("unknown key action '{other}' in [keys]"),
            };
            *slot = chords;
        }
        Ok(map)
    }
}

pub fn matches(bindings: &[Chord], key: &KeyEvent) -> bool {
    bindings.iter().any(|c| c.matches(key))
}

/// Parses names like "up", "enter", "pgdown", "ctrl+c", "?" into a chord.
pub fn parse_key(name: &str) -> Result<Chord> {
    let mut mods = KeyModifiers::NONE;
    let mut rest = name;
    loop {
        if let Some(r) = rest.strip_prefix("ctrl+") {
            mods |= KeyModifiers::CONTROL;
            rest = r;
        } else if let Some(r) = rest.strip_prefix("alt+") {
            mods |= KeyModifiers::ALT;
            rest = r;
        } else {
            break;
        }
    }

    let code = match rest {
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "enter" => KeyCode::Enter,
        "esc" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "space" => KeyCode::Char(' '),
        "backspace" => KeyCode::Backspace,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pgup" | "pageup" => KeyCode::PageUp,
        "pgdown" | "pagedown" => KeyCode::PageDown,
        s if s.chars().count() == 1 => KeyCode::Char(s.chars().next().unwrap()),
        other => return Err(anyhow!("unrecognized key name '{other}'")),
    };

    Ok(Chord { code, mods })
}
