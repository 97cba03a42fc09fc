//! Single-line input bar.
//!
//! Always visible at the bottom of the screen for text entry. Submission
//! history is reachable with Up/Down.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::theme::Theme;

/// Placeholder shown in the empty input bar.
pub fn input_placeholder(pending: bool) -> &'static str {
    if pending {
        "Waiting for the agent's reply..."
    } else {
        "Type a message and press Enter..."
    }
}

/// Input bar widget.
pub struct InputBar<'a> {
    input: &'a TextInputState,
    theme: &'a Theme,
    pending: bool,
}

impl<'a> InputBar<'a> {
    /// Create a new input bar widget.
    pub fn new(input: &'a TextInputState, theme: &'a Theme) -> Self {
        Self {
            input,
            theme,
            pending: false,
        }
    }

    /// Set whether a reply is outstanding (affects the placeholder).
    #[must_use]
    pub fn pending(mut self, pending: bool) -> Self {
        self.pending = pending;
        self
    }
}

impl Widget for InputBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border_focused))
            .style(Style::default().bg(self.theme.base));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 1 || inner.width < 1 {
            return;
        }

        let prompt = Span::styled("> ", Style::default().fg(self.theme.primary));

        let line = if self.input.is_empty() {
            Line::from(vec![
                prompt,
                Span::styled("_", Style::default().fg(self.theme.text)),
                Span::styled(
                    input_placeholder(self.pending),
                    Style::default().fg(self.theme.muted),
                ),
            ])
        } else {
            // Cursor rendered inline: '|' mid-text, '_' at the end.
            let (before, after) = self.input.split_at_cursor();
            let mut spans = vec![
                prompt,
                Span::styled(before.to_string(), Style::default().fg(self.theme.text)),
            ];
            if after.is_empty() {
                spans.push(Span::styled("_", Style::default().fg(self.theme.text)));
            } else {
                spans.push(Span::styled("|", Style::default().fg(self.theme.primary)));
                spans.push(Span::styled(
                    after.to_string(),
                    Style::default().fg(self.theme.text),
                ));
            }
            Line::from(spans)
        };

        Paragraph::new(vec![line]).render(inner, buf);
    }
}

/// State for the input bar, managing content, cursor, and history.
#[derive(Debug, Clone, Default)]
pub struct TextInputState {
    /// The text content.
    content: String,
    /// Cursor position as a character index.
    cursor: usize,
    /// Past submissions for Up/Down navigation.
    history: Vec<String>,
    /// Current history index (None = editing a fresh line).
    history_index: Option<usize>,
    /// Saved in-progress input while navigating history.
    saved_input: String,
}

impl TextInputState {
    /// Create a new empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Check if the content is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Content split at the cursor, for rendering.
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.content.split_at(self.byte_index(self.cursor))
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_index)
            .map_or(self.content.len(), |(i, _)| i)
    }

    fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    /// Insert a character at the cursor position. Newlines are ignored;
    /// the input is single-line and Enter submits.
    pub fn insert(&mut self, ch: char) {
        if ch == '\n' || ch == '\r' {
            return;
        }
        let at = self.byte_index(self.cursor);
        self.content.insert(at, ch);
        self.cursor += 1;
    }

    /// Insert a string at the cursor position.
    pub fn insert_str(&mut self, s: &str) {
        let at = self.byte_index(self.cursor);
        self.content.insert_str(at, s);
        self.cursor += s.chars().count();
    }

    /// Delete the character before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.content.remove(at);
        }
    }

    /// Delete the character at the cursor (delete).
    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let at = self.byte_index(self.cursor);
            self.content.remove(at);
        }
    }

    /// Move cursor left.
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move cursor right.
    pub fn move_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    /// Move cursor to start.
    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    /// Move cursor to end.
    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Clear the content.
    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Take the content, clearing the state and recording it in history.
    pub fn submit(&mut self) -> String {
        let content = std::mem::take(&mut self.content);
        self.cursor = 0;
        if !content.trim().is_empty() {
            self.history.push(content.clone());
        }
        self.history_index = None;
        self.saved_input.clear();
        content
    }

    /// Navigate to the previous (older) history entry.
    pub fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }

        let next_index = match self.history_index {
            None => {
                self.saved_input = self.content.clone();
                0
            }
            Some(i) if i + 1 < self.history.len() => i + 1,
            Some(i) => i,
        };

        self.history_index = Some(next_index);
        self.content = self.history[self.history.len() - 1 - next_index].clone();
        self.cursor = self.char_count();
    }

    /// Navigate to the next (newer) history entry, or back to the saved line.
    pub fn history_next(&mut self) {
        match self.history_index {
            None => {}
            Some(0) => {
                self.history_index = None;
                self.content = std::mem::take(&mut self.saved_input);
                self.cursor = self.char_count();
            }
            Some(i) => {
                self.history_index = Some(i - 1);
                self.content = self.history[self.history.len() - i].clone();
                self.cursor = self.char_count();
            }
        }
    }
}
