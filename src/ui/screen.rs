use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;

use lapring::{clock::Clock, entry::InputMode};

use crate::{App, AppState};

/// A UI Screen boundary: responsible for rendering and optional key handling
pub trait Screen<C: Clock> {
    fn render(&self, app: &App<C>, f: &mut Frame) {
        f.render_widget(app, f.area());
    }
    /// Optional per-screen key handling. Returns true if the key was handled.
    fn on_key(&mut self, _key: KeyEvent, _app: &mut App<C>) -> bool {
        false
    }
}

/// Duration entry: preset buttons or typed minutes
pub struct SetupScreen;

impl<C: Clock> Screen<C> for SetupScreen {
    fn on_key(&mut self, key: KeyEvent, app: &mut App<C>) -> bool {
        let entry = &mut app.entry;
        match key.code {
            KeyCode::Tab => entry.toggle_mode(),
            KeyCode::Enter => {
                if let Some(ms) = entry.submit() {
                    app.launch(ms);
                }
            }
            KeyCode::Left | KeyCode::Up => entry.select_prev(),
            KeyCode::Right | KeyCode::Down => entry.select_next(),
            KeyCode::Backspace => entry.pop_char(),
            KeyCode::Char(c) => match entry.mode {
                InputMode::Buttons => {
                    if entry.select_hotkey(c) {
                        if let Some(ms) = entry.submit() {
                            app.launch(ms);
                        }
                    } else {
                        return false;
                    }
                }
                InputMode::Typed => entry.push_char(c),
            },
            _ => return false,
        }
        true
    }
}

/// The running ring
pub struct RingScreen;

impl<C: Clock> Screen<C> for RingScreen {
    fn on_key(&mut self, key: KeyEvent, app: &mut App<C>) -> bool {
        match key.code {
            KeyCode::Char(' ') | KeyCode::Char('p') => app.ring.toggle_pause(),
            KeyCode::Char('r') => app.reset(),
            _ => return false,
        }
        true
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen<C: Clock>(state: &AppState) -> Box<dyn Screen<C>> {
    match state {
        AppState::Setup => Box::new(SetupScreen),
        AppState::Ring => Box::new(RingScreen),
    }
}
