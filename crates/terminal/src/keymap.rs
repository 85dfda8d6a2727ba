//! Toolkit-independent key events.
//!
//! The view layer converts its native key events into [`KeyEvent`] so the
//! dispatcher can match shortcuts without knowing about the windowing toolkit.

use std::ops::BitOr;

/// Held modifier keys as a bit set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModifierMask(u8);

impl ModifierMask {
    pub const NONE: Self = Self(0);
    pub const CONTROL: Self = Self(0b0000_0001);
    pub const SHIFT: Self = Self(0b0000_0010);
    pub const ALT: Self = Self(0b0000_0100);
    pub const SUPER: Self = Self(0b0000_1000);
    pub const CAPS_LOCK: Self = Self(0b0001_0000);
    pub const NUM_LOCK: Self = Self(0b0010_0000);

    const ACCELERATORS: u8 = Self::CONTROL.0 | Self::SHIFT.0 | Self::ALT.0 | Self::SUPER.0;

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Only the modifiers that take part in shortcuts. Lock keys are dropped.
    pub const fn accelerator(self) -> Self {
        Self(self.0 & Self::ACCELERATORS)
    }
}

impl BitOr for ModifierMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// A key symbol, already resolved through the keyboard layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// A printable character as produced with the held modifiers
    /// (Shift+`=` arrives as `'+'`).
    Character(char),
    Tab,
    Enter,
    /// `F1`..`F24`.
    Function(u8),
    /// Anything else, by toolkit name (`"escape"`, `"pageup"`, ...).
    Named(String),
}

impl Key {
    /// Lower-cased form used for shortcut and table matching.
    pub fn to_lower(&self) -> Key {
        match self {
            Key::Character(c) => {
                let mut lower = c.to_lowercase();
                match (lower.next(), lower.next()) {
                    (Some(single), None) => Key::Character(single),
                    _ => Key::Character(*c),
                }
            }
            other => other.clone(),
        }
    }

    /// Code point reported in `CSI 27;<mod>;<code>~` sequences.
    pub fn code_point(&self) -> Option<u32> {
        match self {
            Key::Character(c) => Some(u32::from(*c)),
            Key::Tab => Some(9),
            Key::Enter => Some(13),
            Key::Function(_) | Key::Named(_) => None,
        }
    }
}

/// One key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: ModifierMask,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: ModifierMask) -> Self {
        Self { key, modifiers }
    }

    /// Shortcut for a character key.
    pub fn character(c: char, modifiers: ModifierMask) -> Self {
        Self::new(Key::Character(c), modifiers)
    }
}
