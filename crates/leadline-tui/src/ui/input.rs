//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! form edits and application state changes.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AppState, FormFocus};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    match app.state {
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?')) {
                app.state = AppState::Normal;
            }
            false
        }
        AppState::ConfirmingQuit => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                true
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
                false
            }
            _ => false,
        },
        AppState::Quitting => true,
        AppState::Normal => {
            handle_form_input(app, key);
            false
        }
    }
}

fn handle_form_input(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('u') => app.clear_focused_field(),
            KeyCode::Char('n') => app.new_lead(),
            KeyCode::Char('s') => app.submit(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::F(1) => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Down | KeyCode::Tab => {
            app.focus = app.focus.next();
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.focus = app.focus.prev();
        }
        KeyCode::Enter => match app.focus {
            FormFocus::Submit => app.submit(),
            _ => app.focus = app.focus.next(),
        },
        KeyCode::Backspace => {
            app.backspace();
        }
        KeyCode::Char('?') if app.focus == FormFocus::Submit => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Char(c) => {
            app.type_char(c);
        }
        _ => {}
    }
}
