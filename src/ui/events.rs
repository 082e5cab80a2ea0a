use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// What a key press means to the menus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuInput {
    Up,
    Down,
    Enter,
    Back,
    Backspace,
    Char(char),
    Quit,
}

/// Wait up to `timeout` for a key press. Non-key events come back as `None`.
pub fn poll_input(timeout: Duration) -> Result<Option<MenuInput>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }

    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(key_to_input(key)),
        _ => Ok(None),
    }
}

pub fn key_to_input(key: KeyEvent) -> Option<MenuInput> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(MenuInput::Quit);
    }

    match key.code {
        KeyCode::Up => Some(MenuInput::Up),
        KeyCode::Down => Some(MenuInput::Down),
        KeyCode::Enter => Some(MenuInput::Enter),
        KeyCode::Esc => Some(MenuInput::Back),
        KeyCode::Backspace => Some(MenuInput::Backspace),
        KeyCode::Char(c) => Some(MenuInput::Char(c)),
        _ => None,
    }
}
