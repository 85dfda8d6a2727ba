//! Desktop-style keyfile (INI) parsing.
//!
//! ```text
//! # comment
//! [options]
//! font = Monospace 10
//! ```
//!
//! Groups and keys keep their file order. A repeated key replaces the earlier
//! value, a repeated group is merged into the first occurrence.

use collections::IndexMap;
use std::path::Path;
use thiserror::Error;

/// Errors from loading a keyfile or reading a value out of it.
#[derive(Debug, Error)]
pub enum KeyFileError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: &'static str },
    #[error("group [{0}] not found")]
    GroupNotFound(String),
    #[error("key {key} not found in group [{group}]")]
    KeyNotFound { group: String, key: String },
    #[error("invalid escape sequence in value {0:?}")]
    InvalidEscape(String),
    #[error("value {value:?} cannot be read as {expected}")]
    InvalidValue {
        value: String,
        expected: &'static str,
    },
}

/// A parsed keyfile document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyFile {
    groups: IndexMap<String, IndexMap<String, String>>,
}

impl KeyFile {
    /// Read and parse a keyfile from disk.
    pub fn load(path: &Path) -> Result<Self, KeyFileError> {
        let contents = std::fs::read_to_string(path).map_err(|source| KeyFileError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parse keyfile text.
    pub fn parse(contents: &str) -> Result<Self, KeyFileError> {
        let mut groups: IndexMap<String, IndexMap<String, String>> = IndexMap::default();
        let mut current: Option<String> = None;

        for (index, raw_line) in contents.lines().enumerate() {
            let line_number = index + 1;
            let line = raw_line.trim_start();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(rest) = line.strip_prefix('[') {
                let name = rest
                    .trim_end()
                    .strip_suffix(']')
                    .ok_or(KeyFileError::Syntax {
                        line: line_number,
                        message: "unterminated group header",
                    })?;
                if name.is_empty() || name.contains(['[', ']']) {
                    return Err(KeyFileError::Syntax {
                        line: line_number,
                        message: "invalid group name",
                    });
                }
                groups.entry(name.to_string()).or_default();
                current = Some(name.to_string());
                continue;
            }

            let (key, value) = line.split_once('=').ok_or(KeyFileError::Syntax {
                line: line_number,
                message: "expected key=value",
            })?;
            let key = key.trim_end();
            if key.is_empty() {
                return Err(KeyFileError::Syntax {
                    line: line_number,
                    message: "empty key",
                });
            }

            let group = current.as_ref().ok_or(KeyFileError::Syntax {
                line: line_number,
                message: "key outside of any group",
            })?;
            groups
                .entry(group.clone())
                .or_default()
                .insert(key.to_string(), value.trim_start().to_string());
        }

        Ok(Self { groups })
    }

    pub fn has_group(&self, group: &str) -> bool {
        self.groups.contains_key(group)
    }

    /// Raw value text, without escape processing.
    pub fn value(&self, group: &str, key: &str) -> Result<&str, KeyFileError> {
        let entries = self
            .groups
            .get(group)
            .ok_or_else(|| KeyFileError::GroupNotFound(group.to_string()))?;
        entries
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| KeyFileError::KeyNotFound {
                group: group.to_string(),
                key: key.to_string(),
            })
    }

    pub fn string(&self, group: &str, key: &str) -> Result<String, KeyFileError> {
        unescape(self.value(group, key)?)
    }

    pub fn boolean(&self, group: &str, key: &str) -> Result<bool, KeyFileError> {
        parse_boolean(self.value(group, key)?)
    }

    pub fn integer(&self, group: &str, key: &str) -> Result<i32, KeyFileError> {
        let raw = self.value(group, key)?;
        raw.trim_end()
            .parse::<i32>()
            .map_err(|_| invalid(raw, "an integer"))
    }

    pub fn double(&self, group: &str, key: &str) -> Result<f64, KeyFileError> {
        let raw = self.value(group, key)?;
        raw.trim_end()
            .parse::<f64>()
            .map_err(|_| invalid(raw, "a number"))
    }
}

fn invalid(value: &str, expected: &'static str) -> KeyFileError {
    KeyFileError::InvalidValue {
        value: value.to_string(),
        expected,
    }
}

fn parse_boolean(raw: &str) -> Result<bool, KeyFileError> {
    match raw.trim_end() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(invalid(raw, "a boolean")),
    }
}

fn unescape(raw: &str) -> Result<String, KeyFileError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => out.push(' '),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            _ => return Err(KeyFileError::InvalidEscape(raw.to_string())),
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    const SAMPLE: &str = "\
# termise config
[options]
font = Monospace 9,Sans 12
scrollback_lines=10000
  audible_bell = true

[colors]
background = #112233
";

    #[test]
    fn parses_groups_and_trims_around_separator() {
        let file = KeyFile::parse(SAMPLE).unwrap();
        assert!(file.has_group("options"));
        assert!(file.has_group("colors"));
        assert_eq!(file.value("options", "font").unwrap(), "Monospace 9,Sans 12");
        assert_eq!(file.value("colors", "background").unwrap(), "#112233");
    }

    #[test]
    fn typed_getters_read_values() {
        let file = KeyFile::parse(SAMPLE).unwrap();
        assert_eq!(file.integer("options", "scrollback_lines").unwrap(), 10000);
        assert!(file.boolean("options", "audible_bell").unwrap());
    }

    #[test]
    fn later_keys_win_and_groups_merge() {
        let file = KeyFile::parse("[a]\nx=1\n[b]\ny=2\n[a]\nx=3\nz=4\n").unwrap();
        assert_eq!(file.value("a", "x").unwrap(), "3");
        assert_eq!(file.value("a", "z").unwrap(), "4");
        assert_eq!(file.value("b", "y").unwrap(), "2");
    }

    #[test]
    fn key_before_group_is_a_syntax_error() {
        let err = KeyFile::parse("font=Mono\n[options]\n").unwrap_err();
        assert!(matches!(err, KeyFileError::Syntax { line: 1, .. }));
    }

    #[test]
    fn garbage_line_is_a_syntax_error() {
        let err = KeyFile::parse("[options]\nthis is not a pair\n").unwrap_err();
        assert!(matches!(err, KeyFileError::Syntax { line: 2, .. }));
    }

    #[test]
    fn unterminated_group_is_a_syntax_error() {
        assert!(KeyFile::parse("[options\n").is_err());
    }

    #[test]
    fn missing_group_and_key_are_reported() {
        let file = KeyFile::parse(SAMPLE).unwrap();
        assert!(matches!(
            file.value("nope", "font"),
            Err(KeyFileError::GroupNotFound(_))
        ));
        assert!(matches!(
            file.value("options", "nope"),
            Err(KeyFileError::KeyNotFound { .. })
        ));
    }

    #[test_case("true", Some(true) ; "true literal")]
    #[test_case("1", Some(true) ; "one")]
    #[test_case("false", Some(false) ; "false literal")]
    #[test_case("0", Some(false) ; "zero")]
    #[test_case("True", None ; "case sensitive")]
    #[test_case("yes", None ; "yes is not a boolean")]
    fn boolean_values(raw: &str, expected: Option<bool>) {
        let file = KeyFile::parse(&format!("[o]\nk={raw}\n")).unwrap();
        assert_eq!(file.boolean("o", "k").ok(), expected);
    }

    #[test_case("42", Some(42) ; "plain")]
    #[test_case("-7", Some(-7) ; "negative")]
    #[test_case("12abc", None ; "trailing garbage")]
    #[test_case("99999999999", None ; "overflow")]
    fn integer_values(raw: &str, expected: Option<i32>) {
        let file = KeyFile::parse(&format!("[o]\nk={raw}\n")).unwrap();
        assert_eq!(file.integer("o", "k").ok(), expected);
    }

    #[test]
    fn double_values() {
        let file = KeyFile::parse("[o]\na=1.5\nb=x\n").unwrap();
        assert_eq!(file.double("o", "a").unwrap(), 1.5);
        assert!(file.double("o", "b").is_err());
    }

    #[test]
    fn string_values_are_unescaped() {
        let file = KeyFile::parse("[o]\nk=a\\sb\\tc\\\\d\n").unwrap();
        assert_eq!(file.string("o", "k").unwrap(), "a b\tc\\d");
    }

    #[test]
    fn unknown_escape_invalidates_string() {
        let file = KeyFile::parse("[o]\nk=Mono\\,Sans\n").unwrap();
        assert!(matches!(
            file.string("o", "k"),
            Err(KeyFileError::InvalidEscape(_))
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = KeyFile::load(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, KeyFileError::Io { .. }));
    }
}
