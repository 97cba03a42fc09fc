//! Widgets for the banter TUI.

pub mod input_bar;
pub mod transcript;

pub use input_bar::{input_placeholder, InputBar, TextInputState};
pub use transcript::{TranscriptState, TranscriptWidget, SCROLL_STEP};
