//! GPUI keystrokes to toolkit-neutral key events.
//!
//! Printable keys are reported as the character the keystroke produces, so
//! Ctrl+Shift+= arrives as `+`. GPUI does not always fill `key_char` while
//! Control is held; a US layout shift map covers that case.

use gpui::Keystroke;
use terminal::{Key, KeyEvent, ModifierMask};

pub fn key_event(keystroke: &Keystroke) -> KeyEvent {
    KeyEvent::new(key(keystroke), modifiers(&keystroke.modifiers))
}

pub fn modifiers(modifiers: &gpui::Modifiers) -> ModifierMask {
    let mut mask = ModifierMask::NONE;
    if modifiers.control {
        mask = mask | ModifierMask::CONTROL;
    }
    if modifiers.shift {
        mask = mask | ModifierMask::SHIFT;
    }
    if modifiers.alt {
        mask = mask | ModifierMask::ALT;
    }
    if modifiers.platform {
        mask = mask | ModifierMask::SUPER;
    }
    mask
}

fn key(keystroke: &Keystroke) -> Key {
    let name = keystroke.key.as_str();
    match name {
        "tab" => return Key::Tab,
        "enter" => return Key::Enter,
        "space" => return Key::Character(' '),
        _ => {}
    }
    if let Some(number) = name.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
        return Key::Function(number);
    }

    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Key::Character(produced_char(c, keystroke)),
        _ => Key::Named(name.to_string()),
    }
}

fn produced_char(base: char, keystroke: &Keystroke) -> char {
    if !keystroke.modifiers.shift {
        return base;
    }
    if let Some(produced) = keystroke.key_char.as_deref().and_then(single_printable) {
        return produced;
    }
    shifted(base)
}

fn single_printable(text: &str) -> Option<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_control() => Some(c),
        _ => None,
    }
}

fn shifted(c: char) -> char {
    match c {
        '`' => '~',
        '1' => '!',
        '2' => '@',
        '3' => '#',
        '4' => '$',
        '5' => '%',
        '6' => '^',
        '7' => '&',
        '8' => '*',
        '9' => '(',
        '0' => ')',
        '-' => '_',
        '=' => '+',
        '[' => '{',
        ']' => '}',
        '\\' => '|',
        ';' => ':',
        '\'' => '"',
        ',' => '<',
        '.' => '>',
        '/' => '?',
        c => c.to_ascii_uppercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn keystroke(key: &str, key_char: Option<&str>, control: bool, shift: bool) -> Keystroke {
        Keystroke {
            modifiers: gpui::Modifiers {
                control,
                shift,
                ..Default::default()
            },
            key: key.into(),
            key_char: key_char.map(Into::into),
        }
    }

    #[test_case("=", None, Key::Character('+') ; "shift map plus")]
    #[test_case("-", None, Key::Character('_') ; "shift map underscore")]
    #[test_case("c", None, Key::Character('C') ; "shift map letter")]
    #[test_case(",", Some("<"), Key::Character('<') ; "reported char wins")]
    #[test_case("=", Some("\u{1d}"), Key::Character('+') ; "control char ignored")]
    fn ctrl_shift_characters(name: &str, key_char: Option<&str>, expected: Key) {
        let event = key_event(&keystroke(name, key_char, true, true));
        assert_eq!(event.key, expected);
        assert_eq!(event.modifiers, ModifierMask::CONTROL | ModifierMask::SHIFT);
    }

    #[test]
    fn unshifted_keys_keep_base_char() {
        let event = key_event(&keystroke("=", Some("="), true, false));
        assert_eq!(event.key, Key::Character('='));
        assert_eq!(event.modifiers, ModifierMask::CONTROL);
    }

    #[test_case("f11", Key::Function(11) ; "function key")]
    #[test_case("tab", Key::Tab ; "tab")]
    #[test_case("enter", Key::Enter ; "enter")]
    #[test_case("space", Key::Character(' ') ; "space")]
    #[test_case("escape", Key::Named("escape".into()) ; "named")]
    #[test_case("f", Key::Character('f') ; "bare f is a letter")]
    fn named_keys(name: &str, expected: Key) {
        assert_eq!(key_event(&keystroke(name, None, false, false)).key, expected);
    }

    #[test]
    fn platform_maps_to_super() {
        let mods = gpui::Modifiers {
            platform: true,
            alt: true,
            ..Default::default()
        };
        assert_eq!(modifiers(&mods), ModifierMask::SUPER | ModifierMask::ALT);
    }
}
