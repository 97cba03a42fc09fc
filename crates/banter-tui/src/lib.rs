//! banter-tui: Terminal UI for the banter chat client
//!
//! This crate provides the TUI layer for banter:
//! - The scrolling transcript with follow mode and a typing indicator
//! - The input bar with submission history
//! - The event loop wiring key input to chat turns

mod app;
mod event;
mod theme;
mod widgets;

pub use app::App;
pub use event::{key_to_action, Action, Event, EventHandler};
pub use theme::Theme;
pub use widgets::{InputBar, TextInputState, TranscriptState, TranscriptWidget};

pub use banter_core;

use banter_core::{AgentClient, TransportError, TurnToken};
use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyModifiers, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::layout::{Constraint, Layout};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use std::io::{self, stdout};
use tokio::task::JoinHandle;

/// Height of the input bar, including its border.
const INPUT_HEIGHT: u16 = 3;

/// One in-flight chat turn: the token that must still be current when the
/// result is applied, plus the task running the request.
type InFlightTurn = (TurnToken, JoinHandle<Result<String, TransportError>>);

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the TUI application against the agent server at `server_url`.
///
/// Sets up the terminal, runs the event loop, and restores the terminal on
/// exit.
pub async fn run_tui(server_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    // Setup terminal with RAII guard for cleanup
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let client = AgentClient::new(server_url);
    let mut app = App::new();

    // Create event handler (4 Hz tick rate = 250ms, drives the typing dots)
    let mut events = EventHandler::new(250);

    let result = run_loop(&mut terminal, &mut app, &client, &mut events).await;

    // Restore cursor before guard drops
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    client: &AgentClient,
    events: &mut EventHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    let theme = Theme::default();

    // At most one turn is in flight; the tracker enforces this on submit.
    let mut in_flight: Option<InFlightTurn> = None;

    loop {
        terminal.draw(|frame| draw(frame, app, &theme))?;

        // Apply a finished turn before taking more input.
        if in_flight.as_ref().is_some_and(|(_, handle)| handle.is_finished()) {
            if let Some((token, handle)) = in_flight.take() {
                let result = handle
                    .await
                    .unwrap_or_else(|_| Err(TransportError::Interrupted));
                app.complete_turn(token, result);
            }
        }

        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) => match key_to_action(key) {
                    Action::None => {
                        if let Some((token, text)) = handle_input_key(app, key) {
                            let client = client.clone();
                            let handle =
                                tokio::spawn(async move { client.send(&text).await });
                            in_flight = Some((token, handle));
                        }
                    }
                    action => app.handle_action(action),
                },
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollUp => app.handle_action(Action::ScrollUp),
                    MouseEventKind::ScrollDown => app.handle_action(Action::ScrollDown),
                    _ => {}
                },
                Event::Tick => app.tick(),
                Event::Resize(_, _) => {
                    // Terminal will handle resize automatically
                }
            }
        }

        if app.should_quit {
            // A torn-down call still resolves its turn through the error path.
            if let Some((token, handle)) = in_flight.take() {
                handle.abort();
                app.complete_turn(token, Err(TransportError::Interrupted));
            }
            break;
        }
    }

    Ok(())
}

/// Render the transcript above the input bar.
fn draw(frame: &mut Frame<'_>, app: &mut App, theme: &Theme) {
    let [transcript_area, input_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(INPUT_HEIGHT)])
            .areas(frame.area());

    let transcript = TranscriptWidget::new(&app.conversation, theme)
        .pending(app.is_pending())
        .tick(app.tick_count());
    frame.render_stateful_widget(transcript, transcript_area, &mut app.transcript);

    let input_bar = InputBar::new(&app.input, theme).pending(app.is_pending());
    frame.render_widget(input_bar, input_area);
}

/// Route a key to the input bar.
///
/// Returns the token and text for a newly started turn when Enter submits a
/// non-empty line (and no turn is already outstanding).
fn handle_input_key(
    app: &mut App,
    key: crossterm::event::KeyEvent,
) -> Option<(TurnToken, String)> {
    // Leave other Ctrl combinations to the action mapping.
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }

    match key.code {
        KeyCode::Enter => return app.submit(),
        KeyCode::Char(c) => app.input.insert(c),
        KeyCode::Backspace => app.input.backspace(),
        KeyCode::Delete => app.input.delete(),
        KeyCode::Left => app.input.move_left(),
        KeyCode::Right => app.input.move_right(),
        KeyCode::Home => app.input.move_home(),
        KeyCode::End => app.input.move_end(),
        KeyCode::Up => app.input.history_prev(),
        KeyCode::Down => app.input.history_next(),
        _ => {}
    }

    None
}
