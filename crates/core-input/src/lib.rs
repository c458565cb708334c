//! Logical key events and the crossterm translation layer.
//!
//! The editor core consumes already-decoded [`Key`] values; everything
//! terminal-specific (escape sequences, modifiers, event kinds) stays on this
//! side of the boundary. [`KeySource`] is the blocking supplier the event
//! loop waits on; tests drive the same loop with [`ScriptedKeys`].

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, read};
use std::collections::VecDeque;
use tracing::trace;

/// One decoded logical input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    /// Control-modified letter, lowercased (`Ctrl('q')`).
    Ctrl(char),
    Enter,
    Esc,
    Backspace,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    /// Window geometry change: (columns, rows).
    Resize(u16, u16),
}

/// Map a terminal event to a logical key.
///
/// Returns `None` for events the editor ignores: key releases, mouse and
/// focus events, and key codes with no editor meaning.
pub fn map_event(event: &Event) -> Option<Key> {
    match event {
        Event::Key(key_event) => map_key_event(key_event),
        Event::Resize(cols, rows) => Some(Key::Resize(*cols, *rows)),
        _ => None,
    }
}

fn map_key_event(event: &KeyEvent) -> Option<Key> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    let key = match event.code {
        KeyCode::Char(c) if event.modifiers.contains(KeyModifiers::CONTROL) => {
            Key::Ctrl(c.to_ascii_lowercase())
        }
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        _ => return None,
    };
    Some(key)
}

/// Blocking supplier of logical keys.
pub trait KeySource {
    /// Block until the next mappable event arrives.
    fn next_key(&mut self) -> Result<Key>;
}

/// The real terminal source: blocks on crossterm and discards unmappable
/// events.
#[derive(Default)]
pub struct TerminalKeys;

impl KeySource for TerminalKeys {
    fn next_key(&mut self) -> Result<Key> {
        loop {
            let event = read()?;
            if let Some(key) = map_event(&event) {
                trace!(target: "input", ?key, "key");
                return Ok(key);
            }
        }
    }
}

/// Scripted source for driving the event loop in tests.
pub struct ScriptedKeys {
    keys: VecDeque<Key>,
}

impl ScriptedKeys {
    pub fn new(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.keys.is_empty()
    }
}

impl KeySource for ScriptedKeys {
    fn next_key(&mut self) -> Result<Key> {
        self.keys
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("scripted key source exhausted"))
    }
}
