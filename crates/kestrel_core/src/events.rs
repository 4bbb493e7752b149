//! Input events consumed by the interaction core
//!
//! Platform layers translate their native key events into [`KeyEvent`]s.
//! Pointer input is handled by the controller directly through coordinates.

/// Keys the select widgets react to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    ArrowDown,
    ArrowUp,
    Home,
    End,
    PageUp,
    PageDown,
    Enter,
    Space,
    Escape,
    Tab,
    Backspace,
    /// A printable character
    Char(char),
}

impl KeyCode {
    /// Parse a key from its conventional name (`"ArrowDown"`, `"down"`, `"esc"`, ...)
    ///
    /// A single character parses as [`KeyCode::Char`].
    pub fn from_name(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Some(if c == ' ' {
                KeyCode::Space
            } else {
                KeyCode::Char(c)
            });
        }

        let key = match name.to_ascii_lowercase().as_str() {
            "arrowdown" | "down" => KeyCode::ArrowDown,
            "arrowup" | "up" => KeyCode::ArrowUp,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "enter" | "return" => KeyCode::Enter,
            "space" => KeyCode::Space,
            "escape" | "esc" => KeyCode::Escape,
            "tab" => KeyCode::Tab,
            "backspace" => KeyCode::Backspace,
            _ => return None,
        };
        Some(key)
    }
}

/// Modifier keys held during an event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// No modifiers held
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Ctrl, Alt or Meta is held (shortcut chords, not text input)
    pub fn has_command(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// A key press delivered to a controller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: KeyCode,
    pub modifiers: Modifiers,
    /// Milliseconds on a monotonic clock, used for typeahead timing
    pub timestamp_ms: u64,
}

impl KeyEvent {
    pub fn new(key: KeyCode) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
            timestamp_ms: 0,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn at(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }
}

impl From<KeyCode> for KeyEvent {
    fn from(key: KeyCode) -> Self {
        KeyEvent::new(key)
    }
}

/// Whether an event was consumed
///
/// Hosts use this to decide whether to stop propagation / prevent the
/// platform's default action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventOutcome {
    Handled,
    Ignored,
}

impl EventOutcome {
    pub fn is_handled(&self) -> bool {
        matches!(self, EventOutcome::Handled)
    }
}
