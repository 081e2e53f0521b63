//! Keyboard-driven label input
//!
//! Maps raw-mode key presses to labeling events: `e` Empty, `g` Golden
//! Cookie, `f` Effect, `q` or Ctrl-C quit. Everything else is reported as
//! unrecognized and ignored by the capture loop.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;

use cookie_vision_core::{InputEvent, Label, LabelInputSource, Result};

/// Raw-mode guard: enabled on construction, restored on drop
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> std::io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Blocking keyboard source for the capture loop
pub struct KeyboardSource {
    _raw: RawModeGuard,
}

impl KeyboardSource {
    /// Put the terminal in raw mode and start reading keys
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            _raw: RawModeGuard::enable()?,
        })
    }
}

impl LabelInputSource for KeyboardSource {
    fn next_event(&mut self) -> Result<InputEvent> {
        loop {
            match event::read()? {
                Event::Key(key) => {
                    // Ignore key release events on Windows
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    return Ok(map_key(&key));
                }
                _ => return Ok(InputEvent::Unrecognized),
            }
        }
    }
}

/// Translate one key press into a labeling event
fn map_key(key: &KeyEvent) -> InputEvent {
    if is_quit(key) {
        return InputEvent::Quit;
    }
    match key.code {
        KeyCode::Char(c) if c.eq_ignore_ascii_case(&'e') => InputEvent::Label(Label::Empty),
        KeyCode::Char(c) if c.eq_ignore_ascii_case(&'g') => InputEvent::Label(Label::GoldenCookie),
        KeyCode::Char(c) if c.eq_ignore_ascii_case(&'f') => InputEvent::Label(Label::Effect),
        _ => InputEvent::Unrecognized,
    }
}

/// Check if a key event is a quit command
fn is_quit(key: &KeyEvent) -> bool {
    matches!(
        key,
        KeyEvent {
            code: KeyCode::Char('q' | 'Q'),
            modifiers: KeyModifiers::NONE | KeyModifiers::SHIFT,
            ..
        } | KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            ..
        }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_label_bindings() {
        assert_eq!(
            map_key(&press(KeyCode::Char('e'), KeyModifiers::NONE)),
            InputEvent::Label(Label::Empty)
        );
        assert_eq!(
            map_key(&press(KeyCode::Char('G'), KeyModifiers::SHIFT)),
            InputEvent::Label(Label::GoldenCookie)
        );
        assert_eq!(
            map_key(&press(KeyCode::Char('f'), KeyModifiers::NONE)),
            InputEvent::Label(Label::Effect)
        );
    }

    #[test]
    fn test_quit_bindings() {
        assert_eq!(
            map_key(&press(KeyCode::Char('q'), KeyModifiers::NONE)),
            InputEvent::Quit
        );
        assert_eq!(
            map_key(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            InputEvent::Quit
        );
    }

    #[test]
    fn test_other_keys_unrecognized() {
        assert_eq!(
            map_key(&press(KeyCode::Char('x'), KeyModifiers::NONE)),
            InputEvent::Unrecognized
        );
        assert_eq!(
            map_key(&press(KeyCode::Enter, KeyModifiers::NONE)),
            InputEvent::Unrecognized
        );
    }
}
