use crate::mail::MessageSummary;

/// Exactly one mode is active; the detail viewport exists only while
/// reading, so the illegal mode/detail combinations are unrepresentable.
#[derive(Debug)]
pub enum Mode {
    Loading,
    Browsing,
    Reading(DetailView),
    Failed(String),
}

/// The single owning state object for the running interface. Created once at
/// startup (in `Loading`) and mutated only by the reducer.
#[derive(Debug)]
pub struct Session {
    pub mode: Mode,
    pub list: MessageList,
    pub width: u16,
    pub height: u16,
    pub show_help: bool,
    pub spinner_frame: usize,
}

impl Session {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            mode: Mode::Loading,
            list: MessageList::default(),
            width,
            height,
            show_help: false,
            spinner_frame: 0,
        }
    }

    /// Viewport carved out for a message body: reader chrome is the header
    /// block plus footer (7 rows) and 2 columns of margin per side.
    pub fn viewport_size(&self) -> (u16, u16) {
        (self.width.saturating_sub(4), self.height.saturating_sub(7))
    }

    /// Rows available to the message list.
    pub fn list_rows(&self) -> u16 {
        self.height.saturating_sub(6).max(1)
    }
}

/// Ordered message sequence (provider order preserved) plus a live filter
/// and a selection into the *visible* subsequence.
#[derive(Debug, Default)]
pub struct MessageList {
    items: Vec<MessageSummary>,
    filter: String,
    filtering: bool,
    selected: Option<usize>,
}

impl MessageList {
    /// Wholesale replacement on a successful fetch; never element-by-element.
    pub fn replace(&mut self, items: Vec<MessageSummary>) {
        self.items = items;
        self.filter.clear();
        self.filtering = false;
        self.selected = if self.items.is_empty() { None } else { Some(0) };
    }

    /// The filtered projection. Case-insensitive substring over the subject
    /// only; underlying order is never mutated.
    pub fn visible(&self) -> Vec<&MessageSummary> {
        if self.filter.is_empty() {
            return self.items.iter().collect();
        }
        let needle = self.filter.to_lowercase();
        self.items
            .iter()
            .filter(|m| m.subject.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_message(&self) -> Option<&MessageSummary> {
        let idx = self.selected?;
        self.visible().into_iter().nth(idx)
    }

    pub fn move_selection(&mut self, delta: i32) {
        let len = self.visible().len();
        if len == 0 {
            self.selected = None;
            return;
        }
        let cur = self.selected.unwrap_or(0) as i32;
        self.selected = Some((cur + delta).clamp(0, len as i32 - 1) as usize);
    }

    pub fn is_filtering(&self) -> bool {
        self.filtering
    }

    pub fn filter_text(&self) -> &str {
        &self.filter
    }

    pub fn begin_filter(&mut self) {
        self.filtering = true;
    }

    /// Keep the filter text, leave incremental entry.
    pub fn commit_filter(&mut self) {
        self.filtering = false;
        self.clamp_selection();
    }

    pub fn clear_filter(&mut self) {
        self.filtering = false;
        self.filter.clear();
        self.clamp_selection();
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.filter.push(c);
        self.clamp_selection();
    }

    pub fn pop_filter_char(&mut self) {
        self.filter.pop();
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        self.selected = if len == 0 {
            None
        } else {
            Some(self.selected.unwrap_or(0).min(len - 1))
        };
    }
}

/// Pure scrolling state over a fixed text buffer.
#[derive(Debug)]
pub struct DetailView {
    pub content: String,
    pub scroll_offset: u16,
    pub viewport_width: u16,
    pub viewport_height: u16,
}

impl DetailView {
    pub fn new(content: String, viewport_width: u16, viewport_height: u16) -> Self {
        Self {
            content,
            scroll_offset: 0,
            viewport_width,
            viewport_height,
        }
    }

    /// Display lines after soft-wrapping at the viewport width.
    pub fn content_lines(&self) -> u16 {
        let width = self.viewport_width.max(1) as usize;
        let mut total = 0usize;
        for line in self.content.lines() {
            total += line.chars().count().div_ceil(width).max(1);
        }
        total.min(u16::MAX as usize) as u16
    }

    pub fn max_offset(&self) -> u16 {
        self.content_lines().saturating_sub(self.viewport_height)
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let next = (i32::from(self.scroll_offset) + delta).max(0) as u16;
        self.scroll_offset = next.min(self.max_offset());
    }

    pub fn half_page(&self) -> i32 {
        i32::from((self.viewport_height / 2).max(1))
    }

    pub fn resize(&mut self, viewport_width: u16, viewport_height: u16) {
        self.viewport_width = viewport_width;
        self.viewport_height = viewport_height;
        self.scroll_offset = self.scroll_offset.min(self.max_offset());
    }
}
