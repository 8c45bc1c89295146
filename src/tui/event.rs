use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};

/// Terminal input, reduced to what the screens care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Escape,
    /// Ctrl+C. Raw mode swallows SIGINT, so the interrupt arrives as a key.
    Interrupt,
    Resize,
    Other,
}

/// Block until the next terminal event.
pub fn read_key() -> io::Result<Key> {
    let event = event::read()?;
    let key = map_event(event);
    if !matches!(key, Key::Other) {
        log::debug!("Key event: {:?}", key);
    }
    Ok(key)
}

pub fn map_event(event: Event) -> Key {
    match event {
        // Release/repeat events are reported on some platforms; only presses count
        Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
            match (key_event.modifiers, key_event.code) {
                (KeyModifiers::CONTROL, KeyCode::Char('c')) => Key::Interrupt,
                (_, KeyCode::Char(c)) => Key::Char(c),
                (_, KeyCode::Enter) => Key::Enter,
                (_, KeyCode::Backspace) => Key::Backspace,
                (_, KeyCode::Esc) => Key::Escape,
                _ => Key::Other,
            }
        }
        Event::Resize(_, _) => Key::Resize,
        _ => Key::Other,
    }
}
