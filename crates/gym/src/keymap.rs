use device::Key;

pub const KEY_COUNT: usize = 80;

/// Mask index to physical key. The order is part of the action contract and
/// never changes.
#[rustfmt::skip]
const KEYS: [Key; KEY_COUNT] = [
    Key::AltLeft, Key::AltRight, Key::CtrlLeft, Key::CtrlRight,
    Key::ShiftLeft, Key::ShiftRight, Key::Backspace, Key::CapsLock,
    Key::Delete, Key::Down,
    Key::Char('\''), Key::Char(','), Key::Char('-'), Key::Char('.'), Key::Char('/'),
    Key::Char('0'), Key::Char('1'), Key::Char('2'), Key::Char('3'), Key::Char('4'),
    Key::Char('5'), Key::Char('6'), Key::Char('7'), Key::Char('8'), Key::Char('9'),
    Key::Char(';'), Key::Char('='), Key::Char('['), Key::Char('\\'), Key::Char(']'),
    Key::Char('`'),
    Key::Char('a'), Key::Char('b'), Key::Char('c'), Key::Char('d'), Key::Char('e'),
    Key::Char('f'), Key::Char('g'), Key::Char('h'), Key::Char('i'), Key::Char('j'),
    Key::Char('k'), Key::Char('l'), Key::Char('m'), Key::Char('n'), Key::Char('o'),
    Key::Char('p'), Key::Char('q'), Key::Char('r'), Key::Char('s'), Key::Char('t'),
    Key::Char('u'), Key::Char('v'), Key::Char('w'), Key::Char('x'), Key::Char('y'),
    Key::Char('z'),
    Key::Insert, Key::Left,
    Key::Numpad(0), Key::Numpad(1), Key::Numpad(2), Key::Numpad(3), Key::Numpad(4),
    Key::Numpad(5), Key::Numpad(6), Key::Numpad(7), Key::Numpad(8), Key::Numpad(9),
    Key::End, Key::Enter, Key::Escape, Key::NumLock, Key::PageDown, Key::PageUp,
    Key::Right, Key::Space, Key::Tab, Key::Up, Key::Home,
];

/// The fixed keymap table.
#[derive(Debug, Clone, Copy, Default)]
pub struct Keymap;

impl Keymap {
    #[must_use]
    pub fn get(self, index: usize) -> Option<Key> {
        KEYS.get(index).copied()
    }

    #[must_use]
    pub fn index_of(self, key: Key) -> Option<usize> {
        KEYS.iter().position(|k| *k == key)
    }

    #[must_use]
    pub fn len(self) -> usize {
        KEY_COUNT
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        false
    }

    pub fn iter(self) -> impl Iterator<Item = Key> {
        KEYS.into_iter()
    }
}
