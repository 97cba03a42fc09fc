//! Application state and update logic for the banter TUI.

use banter_core::{reply_or_fallback, Conversation, TransportError, TurnToken, TurnTracker};
use tracing::debug;

use crate::event::Action;
use crate::widgets::input_bar::TextInputState;
use crate::widgets::transcript::{TranscriptState, SCROLL_STEP};

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Whether the app should quit.
    pub should_quit: bool,

    /// The message transcript, seeded with the greeting.
    pub conversation: Conversation,

    /// Text input state for the input bar.
    pub input: TextInputState,

    /// Scroll state for the transcript pane.
    pub transcript: TranscriptState,

    /// Per-turn pending flag and generation tokens.
    tracker: TurnTracker,

    /// Tick counter for animations.
    tick: usize,
}

impl App {
    /// Create a new app instance.
    pub fn new() -> Self {
        Self {
            should_quit: false,
            conversation: Conversation::default(),
            input: TextInputState::new(),
            transcript: TranscriptState::new(),
            tracker: TurnTracker::new(),
            tick: 0,
        }
    }

    /// True while a reply is outstanding.
    pub fn is_pending(&self) -> bool {
        self.tracker.is_pending()
    }

    /// Animation tick counter.
    pub fn tick_count(&self) -> usize {
        self.tick
    }

    /// Increment the tick counter.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Handle a non-text action.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::ScrollUp => self.transcript.scroll_up(SCROLL_STEP),
            Action::ScrollDown => self.transcript.scroll_down(SCROLL_STEP),
            Action::ScrollToBottom => self.transcript.jump_to_bottom(),
            Action::None => {}
        }
    }

    /// Submit the current input as a chat turn.
    ///
    /// Empty or whitespace-only input is a silent no-op, as is submitting
    /// while a turn is outstanding (the tracker, not the UI, enforces
    /// single-flight). On success the user message is appended and the
    /// caller receives the turn token plus the text to send.
    pub fn submit(&mut self) -> Option<(TurnToken, String)> {
        let text = self.input.content().trim().to_string();
        if text.is_empty() {
            return None;
        }

        let token = self.tracker.begin()?;
        self.input.submit();
        self.conversation.push_user(text.clone());
        self.transcript.jump_to_bottom();
        Some((token, text))
    }

    /// Apply a finished turn.
    ///
    /// Appends exactly one bot message (the reply, or the fixed error
    /// fallback) and clears the pending flag, but only if `token` still
    /// belongs to the outstanding turn. Stale completions change nothing.
    pub fn complete_turn(&mut self, token: TurnToken, result: Result<String, TransportError>) {
        if !self.tracker.finish(token) {
            debug!(
                generation = token.generation(),
                "dropping stale turn completion"
            );
            return;
        }

        self.conversation.push_bot(reply_or_fallback(result));
        self.transcript.jump_to_bottom();
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use banter_core::{Sender, DEFAULT_GREETING, EMPTY_REPLY_FALLBACK, ERROR_FALLBACK};

    #[test]
    fn test_new_app_shows_one_greeting() {
        let app = App::new();
        assert_eq!(app.conversation.len(), 1);

        let greeting = app.conversation.last().unwrap();
        assert_eq!(greeting.sender, Sender::Bot);
        assert_eq!(greeting.text, DEFAULT_GREETING);
        assert!(!app.is_pending());
    }

    #[test]
    fn test_submit_appends_user_message_and_sets_pending() {
        let mut app = App::new();
        app.input.insert_str("add milk");

        let (_, text) = app.submit().unwrap();
        assert_eq!(text, "add milk");
        assert!(app.is_pending());
        assert!(app.input.is_empty());

        let last = app.conversation.last().unwrap();
        assert_eq!(last.sender, Sender::User);
        assert_eq!(last.text, "add milk");
    }

    #[test]
    fn test_submit_trims_surrounding_whitespace() {
        let mut app = App::new();
        app.input.insert_str("  add milk  ");

        let (_, text) = app.submit().unwrap();
        assert_eq!(text, "add milk");
        assert_eq!(app.conversation.last().unwrap().text, "add milk");
    }

    #[test]
    fn test_whitespace_submission_is_a_no_op() {
        let mut app = App::new();
        app.input.insert_str("   ");

        assert!(app.submit().is_none());
        assert_eq!(app.conversation.len(), 1); // Greeting only
        assert!(!app.is_pending());
    }

    #[test]
    fn test_submit_while_pending_is_a_no_op() {
        let mut app = App::new();
        app.input.insert_str("first");
        app.submit().unwrap();

        app.input.insert_str("second");
        assert!(app.submit().is_none());
        // The draft stays in the input for after the turn resolves.
        assert_eq!(app.input.content(), "second");
        assert_eq!(app.conversation.len(), 2);
    }

    #[test]
    fn test_successful_turn_appends_reply_and_clears_pending() {
        let mut app = App::new();
        app.input.insert_str("add milk");
        let (token, _) = app.submit().unwrap();

        app.complete_turn(token, Ok("Task added".to_string()));

        assert!(!app.is_pending());
        let last = app.conversation.last().unwrap();
        assert_eq!(last.sender, Sender::Bot);
        assert_eq!(last.text, "Task added");
    }

    #[test]
    fn test_empty_reply_fallback_counts_as_success() {
        let mut app = App::new();
        app.input.insert_str("hello");
        let (token, _) = app.submit().unwrap();

        app.complete_turn(token, Ok(EMPTY_REPLY_FALLBACK.to_string()));
        assert_eq!(app.conversation.last().unwrap().text, EMPTY_REPLY_FALLBACK);
    }

    #[test]
    fn test_failed_turn_appends_error_fallback() {
        let mut app = App::new();
        app.input.insert_str("hello");
        let (token, _) = app.submit().unwrap();

        app.complete_turn(token, Err(TransportError::Interrupted));

        assert!(!app.is_pending());
        let last = app.conversation.last().unwrap();
        assert_eq!(last.sender, Sender::Bot);
        assert_eq!(last.text, ERROR_FALLBACK);
    }

    #[test]
    fn test_stale_completion_is_dropped() {
        let mut app = App::new();
        app.input.insert_str("first");
        let (first, _) = app.submit().unwrap();
        app.complete_turn(first, Ok("done".to_string()));

        app.input.insert_str("second");
        let (second, _) = app.submit().unwrap();

        // A late result from the already-finished first turn must not touch
        // the transcript or the pending flag.
        let before = app.conversation.len();
        app.complete_turn(first, Ok("late".to_string()));
        assert_eq!(app.conversation.len(), before);
        assert!(app.is_pending());

        app.complete_turn(second, Ok("on time".to_string()));
        assert!(!app.is_pending());
        assert_eq!(app.conversation.last().unwrap().text, "on time");
    }

    #[test]
    fn test_pending_spans_exactly_one_turn() {
        let mut app = App::new();
        assert!(!app.is_pending());

        app.input.insert_str("hello");
        let (token, _) = app.submit().unwrap();
        assert!(app.is_pending());

        app.complete_turn(token, Err(TransportError::Interrupted));
        assert!(!app.is_pending());

        // Exactly one bot message was appended for the turn.
        let bots = app
            .conversation
            .messages()
            .iter()
            .filter(|m| m.sender == Sender::Bot)
            .count();
        assert_eq!(bots, 2); // Greeting + the error reply
    }

    #[test]
    fn test_message_ids_stay_unique_across_rapid_turns() {
        let mut app = App::new();
        for i in 0..25 {
            app.input.insert_str(&format!("turn {i}"));
            let (token, _) = app.submit().unwrap();
            app.complete_turn(token, Ok(format!("reply {i}")));
        }

        let mut ids: Vec<_> = app.conversation.messages().iter().map(|m| m.id).collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_scroll_actions() {
        let mut app = App::new();
        app.transcript.scroll_offset = 10;

        app.handle_action(Action::ScrollUp);
        assert!(!app.transcript.follow);
        assert_eq!(app.transcript.scroll_offset, 10 - SCROLL_STEP);

        app.handle_action(Action::ScrollToBottom);
        assert!(app.transcript.follow);
    }

    #[test]
    fn test_quit_action() {
        let mut app = App::new();
        app.handle_action(Action::Quit);
        assert!(app.should_quit);
    }
}
