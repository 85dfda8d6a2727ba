//! Config file discovery, typed option decoding, and change watching.
//!
//! Search order: the explicit `--config` path, then
//! `$XDG_CONFIG_HOME/termise/config`, then `termise/config` under each system
//! config dir. The first file that parses wins. No file at all is fine: at
//! startup every option falls back to its default, and a reload leaves the
//! running settings alone.

use crate::color::Rgba;
use crate::constants::{options as defaults, reload};
use crate::font::{split_fonts, FontSpec};
use crate::keyfile::{KeyFile, KeyFileError};
use std::path::{Path, PathBuf};

pub const OPTIONS_GROUP: &str = "options";
pub const COLORS_GROUP: &str = "colors";

/// Value kinds readable from a config source.
pub trait ConfigValue: Sized {
    fn read(file: &KeyFile, group: &str, key: &str) -> Result<Self, KeyFileError>;
}

impl ConfigValue for bool {
    fn read(file: &KeyFile, group: &str, key: &str) -> Result<Self, KeyFileError> {
        file.boolean(group, key)
    }
}

impl ConfigValue for i32 {
    fn read(file: &KeyFile, group: &str, key: &str) -> Result<Self, KeyFileError> {
        file.integer(group, key)
    }
}

impl ConfigValue for f64 {
    fn read(file: &KeyFile, group: &str, key: &str) -> Result<Self, KeyFileError> {
        file.double(group, key)
    }
}

impl ConfigValue for String {
    fn read(file: &KeyFile, group: &str, key: &str) -> Result<Self, KeyFileError> {
        file.string(group, key)
    }
}

impl ConfigValue for Rgba {
    fn read(file: &KeyFile, group: &str, key: &str) -> Result<Self, KeyFileError> {
        let spec = file.string(group, key)?;
        Rgba::parse(&spec).ok_or(KeyFileError::InvalidValue {
            value: spec,
            expected: "a color",
        })
    }
}

/// A loaded config document. Lives for one load or reload cycle.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    path: PathBuf,
    file: KeyFile,
}

impl ConfigSource {
    pub fn new(path: PathBuf, file: KeyFile) -> Self {
        Self { path, file }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a typed value. Missing keys and malformed values are both `None`.
    pub fn get<T: ConfigValue>(&self, group: &str, key: &str) -> Option<T> {
        match T::read(&self.file, group, key) {
            Ok(value) => Some(value),
            Err(KeyFileError::GroupNotFound(_) | KeyFileError::KeyNotFound { .. }) => None,
            Err(error) => {
                tracing::debug!(group, key, %error, "ignoring malformed option");
                None
            }
        }
    }

    pub fn get_or<T: ConfigValue>(&self, group: &str, key: &str, default: T) -> T {
        self.get(group, key).unwrap_or(default)
    }

    /// Like [`get`](Self::get) for colors, but a present value that does not
    /// parse is reported on stderr.
    pub fn get_color(&self, group: &str, key: &str) -> Option<Rgba> {
        match Rgba::read(&self.file, group, key) {
            Ok(color) => Some(color),
            Err(KeyFileError::InvalidValue { value, .. }) => {
                tracing::warn!("invalid color string: {}", value);
                None
            }
            Err(KeyFileError::GroupNotFound(_) | KeyFileError::KeyNotFound { .. }) => None,
            Err(error) => {
                tracing::debug!(group, key, %error, "ignoring malformed color");
                None
            }
        }
    }
}

/// `[colors]` values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorOptions {
    pub foreground: Option<Rgba>,
    pub foreground_bold: Option<Rgba>,
    pub background: Option<Rgba>,
    pub cursor: Option<Rgba>,
    pub cursor_foreground: Option<Rgba>,
    pub highlight: Option<Rgba>,
}

/// Every option decoded with its default applied. Built completely before
/// anything is handed to the terminal, so a reload never sees half a file.
#[derive(Debug, Clone, PartialEq)]
pub struct TerminalOptions {
    pub geometry: Option<String>,
    pub scroll_on_output: bool,
    pub scroll_on_keystroke: bool,
    pub audible_bell: bool,
    pub mouse_autohide: bool,
    pub allow_bold: bool,
    pub search_wrap: bool,
    pub dynamic_title: bool,
    pub urgent_on_bell: bool,
    pub size_hints: bool,
    pub modify_other_keys: bool,
    pub fullscreen: bool,
    /// `None` when the key is absent: the current fonts stay in place.
    pub fonts: Option<Vec<FontSpec>>,
    pub scrollback_lines: Option<i32>,
    pub cursor_blink: Option<String>,
    pub cursor_shape: Option<String>,
    pub icon_name: Option<String>,
    pub colors: ColorOptions,
}

impl Default for TerminalOptions {
    fn default() -> Self {
        Self {
            geometry: None,
            scroll_on_output: defaults::SCROLL_ON_OUTPUT,
            scroll_on_keystroke: defaults::SCROLL_ON_KEYSTROKE,
            audible_bell: defaults::AUDIBLE_BELL,
            mouse_autohide: defaults::MOUSE_AUTOHIDE,
            allow_bold: defaults::ALLOW_BOLD,
            search_wrap: defaults::SEARCH_WRAP,
            dynamic_title: defaults::DYNAMIC_TITLE,
            urgent_on_bell: defaults::URGENT_ON_BELL,
            size_hints: defaults::SIZE_HINTS,
            modify_other_keys: defaults::MODIFY_OTHER_KEYS,
            fullscreen: defaults::FULLSCREEN,
            fonts: None,
            scrollback_lines: None,
            cursor_blink: None,
            cursor_shape: None,
            icon_name: None,
            colors: ColorOptions::default(),
        }
    }
}

impl TerminalOptions {
    pub fn from_source(source: &ConfigSource) -> Self {
        let flag = |key: &str, default: bool| source.get_or(OPTIONS_GROUP, key, default);
        let color = |key: &str| source.get_color(COLORS_GROUP, key);

        Self {
            geometry: source.get(OPTIONS_GROUP, "geometry"),
            scroll_on_output: flag("scroll_on_output", defaults::SCROLL_ON_OUTPUT),
            scroll_on_keystroke: flag("scroll_on_keystroke", defaults::SCROLL_ON_KEYSTROKE),
            audible_bell: flag("audible_bell", defaults::AUDIBLE_BELL),
            mouse_autohide: flag("mouse_autohide", defaults::MOUSE_AUTOHIDE),
            allow_bold: flag("allow_bold", defaults::ALLOW_BOLD),
            search_wrap: flag("search_wrap", defaults::SEARCH_WRAP),
            dynamic_title: flag("dynamic_title", defaults::DYNAMIC_TITLE),
            urgent_on_bell: flag("urgent_on_bell", defaults::URGENT_ON_BELL),
            size_hints: flag("size_hints", defaults::SIZE_HINTS),
            modify_other_keys: flag("modify_other_keys", defaults::MODIFY_OTHER_KEYS),
            fullscreen: flag("fullscreen", defaults::FULLSCREEN),
            fonts: source
                .get::<String>(OPTIONS_GROUP, "font")
                .map(|list| split_fonts(&list)),
            scrollback_lines: source.get(OPTIONS_GROUP, "scrollback_lines"),
            cursor_blink: source.get(OPTIONS_GROUP, "cursor_blink"),
            cursor_shape: source.get(OPTIONS_GROUP, "cursor_shape"),
            icon_name: source.get(OPTIONS_GROUP, "icon_name"),
            colors: ColorOptions {
                foreground: color("foreground"),
                foreground_bold: color("foreground_bold"),
                background: color("background"),
                cursor: color("cursor"),
                cursor_foreground: color("cursor_foreground"),
                highlight: color("highlight"),
            },
        }
    }
}

/// Result of one resolution pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// The file that won, if any.
    pub path: Option<PathBuf>,
    /// `None` when no candidate loaded.
    pub options: Option<TerminalOptions>,
}

/// Locates the config file and decodes it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigResolver {
    explicit: Option<PathBuf>,
    user_dir: Option<PathBuf>,
    system_dirs: Vec<PathBuf>,
}

impl ConfigResolver {
    /// Resolver over the real user and system config roots.
    pub fn new(explicit: Option<PathBuf>) -> Self {
        Self::with_roots(
            explicit,
            termise_paths::user_config_dir().cloned(),
            termise_paths::system_config_dirs().to_vec(),
        )
    }

    pub fn with_roots(
        explicit: Option<PathBuf>,
        user_dir: Option<PathBuf>,
        system_dirs: Vec<PathBuf>,
    ) -> Self {
        Self {
            explicit,
            user_dir,
            system_dirs,
        }
    }

    pub fn explicit_path(&self) -> Option<&Path> {
        self.explicit.as_deref()
    }

    /// Candidate files in search order.
    pub fn candidates(&self) -> Vec<PathBuf> {
        self.explicit
            .iter()
            .cloned()
            .chain(self.user_dir.iter().map(|dir| termise_paths::config_file_in(dir)))
            .chain(
                self.system_dirs
                    .iter()
                    .map(|dir| termise_paths::config_file_in(dir)),
            )
            .collect()
    }

    /// Load the first candidate that reads and parses.
    pub fn load(&self) -> Option<ConfigSource> {
        for path in self.candidates() {
            match KeyFile::load(&path) {
                Ok(file) => {
                    tracing::debug!(path = %path.display(), "loaded config");
                    return Some(ConfigSource::new(path, file));
                }
                Err(KeyFileError::Io { source, .. })
                    if source.kind() == std::io::ErrorKind::NotFound => {}
                Err(error) => {
                    tracing::debug!(path = %path.display(), %error, "skipping config candidate");
                }
            }
        }
        None
    }

    /// Load and decode the first candidate that parses.
    pub fn resolve(&self) -> ResolvedConfig {
        match self.load() {
            Some(source) => ResolvedConfig {
                options: Some(TerminalOptions::from_source(&source)),
                path: Some(source.path().to_path_buf()),
            },
            None => {
                tracing::info!("no config file found");
                ResolvedConfig {
                    path: None,
                    options: None,
                }
            }
        }
    }
}

/// Watch a config file and call `on_change` after it settles.
///
/// The parent directory is watched so editors that replace the file on save
/// are still seen. Drop the returned debouncer to stop watching.
pub fn watch_config_file(
    path: &Path,
    mut on_change: impl FnMut() + Send + 'static,
) -> Option<notify_debouncer_mini::Debouncer<notify::RecommendedWatcher>> {
    use notify_debouncer_mini::new_debouncer;

    let watch_dir = path.parent()?.to_path_buf();
    let target = path.to_path_buf();

    let mut debouncer = new_debouncer(
        reload::WATCH_DEBOUNCE,
        move |res: notify_debouncer_mini::DebounceEventResult| match res {
            Ok(events) => {
                if events.iter().any(|event| event.path == target) {
                    on_change();
                }
            }
            Err(error) => tracing::warn!(%error, "config watcher error"),
        },
    )
    .map_err(|error| tracing::warn!(%error, "failed to create config watcher"))
    .ok()?;

    debouncer
        .watcher()
        .watch(&watch_dir, notify::RecursiveMode::NonRecursive)
        .map_err(|error| tracing::warn!(%error, dir = %watch_dir.display(), "failed to watch config dir"))
        .ok()?;

    tracing::info!(path = %path.display(), "watching config file");
    Some(debouncer)
}
