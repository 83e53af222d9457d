//! Terminal-agnostic keyboard input.

use std::{fmt, str::FromStr};

/// Keyboard input abstraction.
///
/// Decouples the engine from terminal libraries (crossterm, termion, etc.)
/// enabling deterministic simulation testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Printable character.
    Char(char),
    /// Enter/Return key (commits a prompt).
    Enter,
    /// Backspace key (delete last character).
    Backspace,
    /// Delete key.
    Delete,
    /// Tab key.
    Tab,
    /// Escape key.
    Esc,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Up arrow key.
    Up,
    /// Down arrow key.
    Down,
    /// Home key.
    Home,
    /// End key.
    End,
}

/// Modifier keys held during a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Control held.
    pub ctrl: bool,
    /// Alt/Option held.
    pub alt: bool,
    /// Shift held.
    pub shift: bool,
}

impl Modifiers {
    /// No modifiers.
    pub const NONE: Self = Self { ctrl: false, alt: false, shift: false };
    /// Control only.
    pub const CTRL: Self = Self { ctrl: true, alt: false, shift: false };

    /// Whether a chord modifier (ctrl or alt) is held.
    pub fn is_chord(self) -> bool {
        self.ctrl || self.alt
    }
}

/// A single key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Key pressed.
    pub key: KeyInput,
    /// Modifiers held.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Key press without modifiers.
    pub const fn plain(key: KeyInput) -> Self {
        Self { key, modifiers: Modifiers::NONE }
    }

    /// Printable character without modifiers.
    pub const fn char(c: char) -> Self {
        Self::plain(KeyInput::Char(c))
    }

    /// Control chord, e.g. `KeyEvent::ctrl('c')`.
    pub const fn ctrl(c: char) -> Self {
        Self { key: KeyInput::Char(c), modifiers: Modifiers::CTRL }
    }
}

impl From<KeyInput> for KeyEvent {
    fn from(key: KeyInput) -> Self {
        Self::plain(key)
    }
}

/// A key combination the interrupt listener is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyCombo {
    key: KeyInput,
    ctrl: bool,
    alt: bool,
}

impl KeyCombo {
    /// Control + character.
    pub const fn ctrl(c: char) -> Self {
        Self { key: KeyInput::Char(c), ctrl: true, alt: false }
    }

    /// Whether `event` triggers this combination.
    ///
    /// Characters compare case-insensitively and shift is ignored, so
    /// Ctrl+Shift+C still counts as Ctrl+C.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        if event.modifiers.ctrl != self.ctrl || event.modifiers.alt != self.alt {
            return false;
        }
        match (self.key, event.key) {
            (KeyInput::Char(want), KeyInput::Char(got)) => want.eq_ignore_ascii_case(&got),
            (want, got) => want == got,
        }
    }
}

impl Default for KeyCombo {
    fn default() -> Self {
        Self::ctrl('c')
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("ctrl+")?;
        }
        if self.alt {
            f.write_str("alt+")?;
        }
        match self.key {
            KeyInput::Char(c) => write!(f, "{c}"),
            KeyInput::Esc => f.write_str("esc"),
            KeyInput::Tab => f.write_str("tab"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Error parsing a [`KeyCombo`] from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid key combination: {0}")]
pub struct ParseComboError(String);

impl FromStr for KeyCombo {
    type Err = ParseComboError;

    /// Parse forms like `ctrl+c`, `alt+x`, `ctrl+alt+q` or `esc`.
    ///
    /// Any key other than `esc` needs `ctrl` or `alt`, otherwise typing that
    /// key at a prompt would stop the running application.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut ctrl = false;
        let mut alt = false;
        let mut key = None;

        for part in s.split('+').map(str::trim) {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => ctrl = true,
                "alt" | "option" => alt = true,
                "esc" | "escape" => key = Some(KeyInput::Esc),
                "tab" => key = Some(KeyInput::Tab),
                other => {
                    let mut chars = other.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => key = Some(KeyInput::Char(c)),
                        _ => return Err(ParseComboError(s.to_string())),
                    }
                },
            }
        }

        match key {
            Some(KeyInput::Esc) => Ok(Self { key: KeyInput::Esc, ctrl, alt }),
            Some(key) if ctrl || alt => Ok(Self { key, ctrl, alt }),
            _ => Err(ParseComboError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_c_matches_either_case() {
        let combo = KeyCombo::ctrl('c');
        assert!(combo.matches(&KeyEvent::ctrl('c')));
        assert!(combo.matches(&KeyEvent::ctrl('C')));
        assert!(!combo.matches(&KeyEvent::char('c')));
        assert!(!combo.matches(&KeyEvent::ctrl('x')));
    }

    #[test]
    fn parse_combo() {
        assert_eq!("ctrl+c".parse::<KeyCombo>(), Ok(KeyCombo::ctrl('c')));
        assert_eq!("Ctrl+X".parse::<KeyCombo>(), Ok(KeyCombo::ctrl('x')));
        assert!("ctrl+".parse::<KeyCombo>().is_err());
        assert!("ctrl+abc".parse::<KeyCombo>().is_err());
        assert_eq!(
            "esc".parse::<KeyCombo>(),
            Ok(KeyCombo { key: KeyInput::Esc, ctrl: false, alt: false })
        );
    }

    #[test]
    fn bare_keys_are_rejected() {
        assert!("q".parse::<KeyCombo>().is_err());
        assert!("tab".parse::<KeyCombo>().is_err());
        assert!("1".parse::<KeyCombo>().is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        let combo: KeyCombo = "alt+q".parse().unwrap();
        assert_eq!(combo.to_string(), "alt+q");
    }
}
