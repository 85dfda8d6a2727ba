//! Bytes sent to the child for keys and mouse events.

use gpui::Keystroke;
use std::fmt::Write as _;
use termwiz::input::{KeyCode, KeyCodeEncodeModes, KeyboardEncoding, Modifiers as TermwizMods};

/// Encode a key press for the PTY. `None` for keys with no encoding.
pub fn encode_key(keystroke: &Keystroke, application_cursor: bool) -> Option<String> {
    let key = keystroke.key.as_str();
    let mods = &keystroke.modifiers;
    let plain = !mods.control && !mods.alt;

    match key {
        "tab" if plain && mods.shift => return Some("\x1b[Z".into()),
        "tab" if plain => return Some("\t".into()),
        "enter" if plain => return Some("\r".into()),
        "escape" if plain => return Some("\x1b".into()),
        "backspace" if plain => return Some("\x7f".into()),
        _ => {}
    }

    if plain {
        if let Some(text) = keystroke.key_char.as_deref().filter(|t| !t.is_empty()) {
            return Some(text.to_string());
        }
    }

    let code = key_code(key)?;
    let modes = KeyCodeEncodeModes {
        encoding: KeyboardEncoding::Xterm,
        application_cursor_keys: application_cursor,
        newline_mode: false,
        modify_other_keys: None,
    };
    code.encode(termwiz_mods(mods), modes, true)
        .ok()
        .filter(|seq| !seq.is_empty())
}

fn termwiz_mods(mods: &gpui::Modifiers) -> TermwizMods {
    let mut out = TermwizMods::NONE;
    if mods.shift {
        out |= TermwizMods::SHIFT;
    }
    if mods.alt {
        out |= TermwizMods::ALT;
    }
    if mods.control {
        out |= TermwizMods::CTRL;
    }
    out
}

fn key_code(key: &str) -> Option<KeyCode> {
    let code = match key {
        "up" => KeyCode::UpArrow,
        "down" => KeyCode::DownArrow,
        "left" => KeyCode::LeftArrow,
        "right" => KeyCode::RightArrow,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "insert" => KeyCode::Insert,
        "delete" => KeyCode::Delete,
        "tab" => KeyCode::Tab,
        "enter" => KeyCode::Enter,
        "escape" => KeyCode::Escape,
        "backspace" => KeyCode::Backspace,
        "space" => KeyCode::Char(' '),
        other => {
            if let Some(n) = other.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                KeyCode::Function(n)
            } else {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return None,
                }
            }
        }
    };
    Some(code)
}

/// xterm mouse report. Buttons: 0-2 press, 32+ drag, 35 motion, 64/65 wheel.
pub fn encode_mouse(button: u8, col: usize, row: usize, sgr: bool, release: bool) -> String {
    let mut out = String::with_capacity(16);
    if sgr {
        let terminator = if release { 'm' } else { 'M' };
        let _ = write!(out, "\x1b[<{};{};{}{}", button, col + 1, row + 1, terminator);
    } else {
        // Legacy encoding: one byte per value, offset by 32, capped at 223.
        let cb = if release { 35 } else { button.saturating_add(32) };
        let cx = (col.min(222) as u8).saturating_add(33);
        let cy = (row.min(222) as u8).saturating_add(33);
        let _ = write!(out, "\x1b[M{}{}{}", cb as char, cx as char, cy as char);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn stroke(key: &str, key_char: Option<&str>, mods: gpui::Modifiers) -> Keystroke {
        Keystroke {
            modifiers: mods,
            key: key.into(),
            key_char: key_char.map(Into::into),
        }
    }

    fn ctrl() -> gpui::Modifiers {
        gpui::Modifiers {
            control: true,
            ..Default::default()
        }
    }

    #[test]
    fn printable_text_is_sent_as_is() {
        let shifted = gpui::Modifiers {
            shift: true,
            ..Default::default()
        };
        assert_eq!(
            encode_key(&stroke("a", Some("A"), shifted), false).as_deref(),
            Some("A")
        );
    }

    #[test]
    fn control_letters_become_c0_codes() {
        assert_eq!(encode_key(&stroke("c", None, ctrl()), false).as_deref(), Some("\x03"));
    }

    #[test]
    fn arrows_follow_cursor_key_mode() {
        let none = gpui::Modifiers::default();
        assert_eq!(encode_key(&stroke("up", None, none), false).as_deref(), Some("\x1b[A"));
        assert_eq!(encode_key(&stroke("up", None, none), true).as_deref(), Some("\x1bOA"));
    }

    #[test]
    fn special_keys() {
        let none = gpui::Modifiers::default();
        let shift = gpui::Modifiers {
            shift: true,
            ..Default::default()
        };
        assert_eq!(encode_key(&stroke("enter", None, none), false).as_deref(), Some("\r"));
        assert_eq!(encode_key(&stroke("tab", None, shift), false).as_deref(), Some("\x1b[Z"));
        assert_eq!(encode_key(&stroke("backspace", None, none), false).as_deref(), Some("\x7f"));
    }

    #[test]
    fn unknown_named_keys_send_nothing() {
        assert_eq!(encode_key(&stroke("menu", None, ctrl()), false), None);
    }

    #[test]
    fn sgr_mouse_reports() {
        assert_eq!(encode_mouse(0, 4, 9, true, false), "\x1b[<0;5;10M");
        assert_eq!(encode_mouse(0, 4, 9, true, true), "\x1b[<0;5;10m");
    }

    #[test]
    fn legacy_mouse_reports_clamp_coordinates() {
        assert_eq!(encode_mouse(0, 0, 0, false, false), "\x1b[M !!");
        let far = encode_mouse(0, 500, 500, false, false);
        assert_eq!(far.chars().last(), Some(char::from(255u8)));
    }
}
