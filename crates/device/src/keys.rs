use std::fmt;

/// Physical key identifiers understood by every [`crate::InputDevice`].
///
/// Printable keys of the main block are carried as [`Key::Char`] with the
/// unshifted character of a US ANSI layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    AltLeft,
    AltRight,
    CtrlLeft,
    CtrlRight,
    ShiftLeft,
    ShiftRight,
    Backspace,
    CapsLock,
    Delete,
    Down,
    Char(char),
    Insert,
    Left,
    /// Keypad digit 0-9.
    Numpad(u8),
    End,
    Enter,
    Escape,
    NumLock,
    PageDown,
    PageUp,
    Right,
    Space,
    Tab,
    Up,
    Home,
}

impl Key {
    /// Canonical lower-case name, e.g. `ctrlleft`, `a`, `num7`.
    #[must_use]
    pub fn name(self) -> String {
        match self {
            Key::Char(c) => c.to_string(),
            Key::Numpad(n) => format!("num{n}"),
            named => named.fixed_name().to_owned(),
        }
    }

    fn fixed_name(self) -> &'static str {
        match self {
            Key::AltLeft => "altleft",
            Key::AltRight => "altright",
            Key::CtrlLeft => "ctrlleft",
            Key::CtrlRight => "ctrlright",
            Key::ShiftLeft => "shiftleft",
            Key::ShiftRight => "shiftright",
            Key::Backspace => "backspace",
            Key::CapsLock => "capslock",
            Key::Delete => "delete",
            Key::Down => "down",
            Key::Insert => "insert",
            Key::Left => "left",
            Key::End => "end",
            Key::Enter => "enter",
            Key::Escape => "esc",
            Key::NumLock => "numlock",
            Key::PageDown => "pagedown",
            Key::PageUp => "pageup",
            Key::Right => "right",
            Key::Space => "space",
            Key::Tab => "tab",
            Key::Up => "up",
            Key::Home => "home",
            Key::Char(_) | Key::Numpad(_) => "",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::Key;

    #[test]
    fn names_are_canonical() {
        assert_eq!(Key::CtrlLeft.name(), "ctrlleft");
        assert_eq!(Key::Char('a').name(), "a");
        assert_eq!(Key::Char('\\').name(), "\\");
        assert_eq!(Key::Numpad(7).name(), "num7");
        assert_eq!(Key::Escape.to_string(), "esc");
    }
}
