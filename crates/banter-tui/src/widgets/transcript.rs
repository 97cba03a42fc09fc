//! Scrollable message transcript.
//!
//! Renders the conversation history, wrapped to the pane width, with an
//! animated typing indicator while a reply is outstanding. Follow mode
//! keeps the newest entry in view; scrolling up disables it.

use banter_core::{Conversation, Message, Sender};
use chrono::Local;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, StatefulWidget, Widget},
};

use crate::theme::Theme;

/// Lines scrolled per page/mouse step.
pub const SCROLL_STEP: usize = 3;

/// Scroll state for the transcript pane.
#[derive(Debug, Clone)]
pub struct TranscriptState {
    /// Index of the first visible line.
    pub scroll_offset: usize,
    /// Whether to pin the view to the newest entry.
    pub follow: bool,
}

impl TranscriptState {
    /// Create a state pinned to the bottom.
    pub fn new() -> Self {
        Self {
            scroll_offset: 0,
            follow: true,
        }
    }

    /// Scroll up, leaving follow mode.
    pub fn scroll_up(&mut self, amount: usize) {
        self.follow = false;
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    /// Scroll down. Rendering clamps the offset to the content length.
    pub fn scroll_down(&mut self, amount: usize) {
        self.scroll_offset += amount;
    }

    /// Re-enable follow mode, jumping to the newest entry.
    pub fn jump_to_bottom(&mut self) {
        self.follow = true;
    }
}

impl Default for TranscriptState {
    fn default() -> Self {
        Self::new()
    }
}

/// Transcript pane widget.
pub struct TranscriptWidget<'a> {
    conversation: &'a Conversation,
    theme: &'a Theme,
    pending: bool,
    tick: usize,
}

impl<'a> TranscriptWidget<'a> {
    /// Create a new transcript widget.
    pub fn new(conversation: &'a Conversation, theme: &'a Theme) -> Self {
        Self {
            conversation,
            theme,
            pending: false,
            tick: 0,
        }
    }

    /// Set whether a reply is outstanding (renders the typing indicator).
    #[must_use]
    pub fn pending(mut self, pending: bool) -> Self {
        self.pending = pending;
        self
    }

    /// Set the animation tick.
    #[must_use]
    pub fn tick(mut self, tick: usize) -> Self {
        self.tick = tick;
        self
    }

    fn sender_label(sender: Sender) -> &'static str {
        match sender {
            Sender::User => "You",
            Sender::Bot => "Agent",
        }
    }

    fn sender_color(&self, sender: Sender) -> ratatui::style::Color {
        match sender {
            Sender::User => self.theme.user,
            Sender::Bot => self.theme.agent,
        }
    }

    /// Header line: local time plus sender label.
    fn header_line(&self, message: &Message) -> Line<'static> {
        let time = message
            .timestamp
            .with_timezone(&Local)
            .format("%H:%M")
            .to_string();
        Line::from(vec![
            Span::styled(time, Style::default().fg(self.theme.muted)),
            Span::raw("  "),
            Span::styled(
                Self::sender_label(message.sender),
                Style::default()
                    .fg(self.sender_color(message.sender))
                    .add_modifier(Modifier::BOLD),
            ),
        ])
    }

    /// Animated typing indicator, shown after all real messages.
    fn typing_line(&self) -> Line<'static> {
        let dots = ".".repeat(self.tick % 3 + 1);
        Line::from(Span::styled(
            format!("Agent is typing{dots}"),
            Style::default()
                .fg(self.theme.muted)
                .add_modifier(Modifier::ITALIC),
        ))
    }

    /// Build all display lines for the given content width.
    fn build_lines(&self, width: usize) -> Vec<Line<'static>> {
        let wrap_width = width.max(1);
        let mut lines = Vec::new();

        for message in self.conversation.messages() {
            lines.push(self.header_line(message));
            for segment in textwrap::wrap(&message.text, wrap_width) {
                lines.push(Line::from(Span::styled(
                    segment.into_owned(),
                    Style::default().fg(self.theme.text),
                )));
            }
            lines.push(Line::default());
        }

        if self.pending {
            lines.push(self.typing_line());
        }

        lines
    }
}

impl StatefulWidget for TranscriptWidget<'_> {
    type State = TranscriptState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut TranscriptState) {
        let block = Block::default()
            .title(" Conversation ")
            .title_style(Style::default().fg(self.theme.text))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border))
            .style(Style::default().bg(self.theme.base));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 1 || inner.width < 1 {
            return;
        }

        let lines = self.build_lines(inner.width as usize);
        let max_offset = lines.len().saturating_sub(inner.height as usize);

        // Follow pins the view to the bottom; otherwise clamp to content.
        if state.follow {
            state.scroll_offset = max_offset;
        } else {
            state.scroll_offset = state.scroll_offset.min(max_offset);
        }

        #[allow(clippy::cast_possible_truncation)]
        let offset = state.scroll_offset.min(u16::MAX as usize) as u16;
        Paragraph::new(lines)
            .scroll((offset, 0))
            .render(inner, buf);
    }
}
