//! xterm `modifyOtherKeys` sequences for keys that have no distinct encoding
//! under Ctrl.
//!
//! Format: `CSI 27 ; <modifier> ; <code point> ~`. Unshifted keys use
//! modifier 5 (Ctrl) or 13 (Ctrl+Alt), shifted symbols use 6 (Ctrl+Shift) or
//! 14 (Ctrl+Alt+Shift). Applications key off that number, so the split
//! follows the character class of the key and not the modifiers held.

use crate::keymap::Key;

/// Which modifier class a lookup is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceTable {
    /// Ctrl and Ctrl+Shift.
    Plain,
    /// Ctrl+Alt and Ctrl+Alt+Shift.
    Meta,
}

const PLAIN: &[(u32, &str)] = &[
    (9, "\x1b[27;5;9~"),
    (13, "\x1b[27;5;13~"),
    (39, "\x1b[27;5;39~"),
    (44, "\x1b[27;5;44~"),
    (45, "\x1b[27;5;45~"),
    (46, "\x1b[27;5;46~"),
    (48, "\x1b[27;5;48~"),
    (49, "\x1b[27;5;49~"),
    (57, "\x1b[27;5;57~"),
    (59, "\x1b[27;5;59~"),
    (61, "\x1b[27;5;61~"),
    (33, "\x1b[27;6;33~"),
    (34, "\x1b[27;6;34~"),
    (35, "\x1b[27;6;35~"),
    (36, "\x1b[27;6;36~"),
    (37, "\x1b[27;6;37~"),
    (38, "\x1b[27;6;38~"),
    (40, "\x1b[27;6;40~"),
    (41, "\x1b[27;6;41~"),
    (42, "\x1b[27;6;42~"),
    (43, "\x1b[27;6;43~"),
    (58, "\x1b[27;6;58~"),
    (60, "\x1b[27;6;60~"),
    (62, "\x1b[27;6;62~"),
    (63, "\x1b[27;6;63~"),
];

const META: &[(u32, &str)] = &[
    (9, "\x1b[27;13;9~"),
    (13, "\x1b[27;13;13~"),
    (39, "\x1b[27;13;39~"),
    (44, "\x1b[27;13;44~"),
    (45, "\x1b[27;13;45~"),
    (46, "\x1b[27;13;46~"),
    (48, "\x1b[27;13;48~"),
    (49, "\x1b[27;13;49~"),
    (57, "\x1b[27;13;57~"),
    (59, "\x1b[27;13;59~"),
    (61, "\x1b[27;13;61~"),
    (33, "\x1b[27;14;33~"),
    (34, "\x1b[27;14;34~"),
    (35, "\x1b[27;14;35~"),
    (36, "\x1b[27;14;36~"),
    (37, "\x1b[27;14;37~"),
    (38, "\x1b[27;14;38~"),
    (40, "\x1b[27;14;40~"),
    (41, "\x1b[27;14;41~"),
    (42, "\x1b[27;14;42~"),
    (43, "\x1b[27;14;43~"),
    (58, "\x1b[27;14;58~"),
    (60, "\x1b[27;14;60~"),
    (62, "\x1b[27;14;62~"),
    (63, "\x1b[27;14;63~"),
];

impl SequenceTable {
    fn entries(self) -> &'static [(u32, &'static str)] {
        match self {
            SequenceTable::Plain => PLAIN,
            SequenceTable::Meta => META,
        }
    }

    /// Sequence for a key, which must already be lower-cased.
    pub fn lookup(self, key: &Key) -> Option<&'static str> {
        let code = key.code_point()?;
        self.entries()
            .iter()
            .find(|(entry, _)| *entry == code)
            .map(|(_, sequence)| *sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Key::Tab, "\x1b[27;5;9~" ; "tab")]
    #[test_case(Key::Enter, "\x1b[27;5;13~" ; "enter")]
    #[test_case(Key::Character('\''), "\x1b[27;5;39~" ; "apostrophe")]
    #[test_case(Key::Character(','), "\x1b[27;5;44~" ; "comma")]
    #[test_case(Key::Character('-'), "\x1b[27;5;45~" ; "minus")]
    #[test_case(Key::Character('.'), "\x1b[27;5;46~" ; "period")]
    #[test_case(Key::Character('0'), "\x1b[27;5;48~" ; "zero")]
    #[test_case(Key::Character('1'), "\x1b[27;5;49~" ; "one")]
    #[test_case(Key::Character('9'), "\x1b[27;5;57~" ; "nine")]
    #[test_case(Key::Character(';'), "\x1b[27;5;59~" ; "semicolon")]
    #[test_case(Key::Character('='), "\x1b[27;5;61~" ; "equal")]
    #[test_case(Key::Character('!'), "\x1b[27;6;33~" ; "exclam")]
    #[test_case(Key::Character('"'), "\x1b[27;6;34~" ; "quotedbl")]
    #[test_case(Key::Character('#'), "\x1b[27;6;35~" ; "numbersign")]
    #[test_case(Key::Character('$'), "\x1b[27;6;36~" ; "dollar")]
    #[test_case(Key::Character('%'), "\x1b[27;6;37~" ; "percent")]
    #[test_case(Key::Character('&'), "\x1b[27;6;38~" ; "ampersand")]
    #[test_case(Key::Character('('), "\x1b[27;6;40~" ; "parenleft")]
    #[test_case(Key::Character(')'), "\x1b[27;6;41~" ; "parenright")]
    #[test_case(Key::Character('*'), "\x1b[27;6;42~" ; "asterisk")]
    #[test_case(Key::Character('+'), "\x1b[27;6;43~" ; "plus")]
    #[test_case(Key::Character(':'), "\x1b[27;6;58~" ; "colon")]
    #[test_case(Key::Character('<'), "\x1b[27;6;60~" ; "less")]
    #[test_case(Key::Character('>'), "\x1b[27;6;62~" ; "greater")]
    #[test_case(Key::Character('?'), "\x1b[27;6;63~" ; "question")]
    fn plain_table(key: Key, expected: &str) {
        assert_eq!(SequenceTable::Plain.lookup(&key), Some(expected));
    }

    #[test]
    fn meta_table_mirrors_plain_with_alt_parameters() {
        for (code, plain) in PLAIN {
            let meta = SequenceTable::Meta
                .lookup(&Key::Character(char::from_u32(*code).unwrap()))
                .unwrap();
            let expected = plain
                .replace("27;5;", "27;13;")
                .replace("27;6;", "27;14;");
            assert_eq!(meta, expected, "code point {code}");
        }
    }

    #[test]
    fn meta_comma() {
        assert_eq!(
            SequenceTable::Meta.lookup(&Key::Character(',')),
            Some("\x1b[27;13;44~")
        );
    }

    #[test_case(Key::Character('a') ; "letters are not overridden")]
    #[test_case(Key::Character('2') ; "digit two")]
    #[test_case(Key::Character('/') ; "slash")]
    #[test_case(Key::Function(11) ; "function key")]
    #[test_case(Key::Named("escape".into()) ; "named key")]
    fn absent_keys(key: Key) {
        assert_eq!(SequenceTable::Plain.lookup(&key), None);
        assert_eq!(SequenceTable::Meta.lookup(&key), None);
    }

    #[test]
    fn tables_have_no_duplicate_keys() {
        for table in [PLAIN, META] {
            let mut codes: Vec<u32> = table.iter().map(|(c, _)| *c).collect();
            codes.sort_unstable();
            codes.dedup();
            assert_eq!(codes.len(), table.len());
        }
    }
}
