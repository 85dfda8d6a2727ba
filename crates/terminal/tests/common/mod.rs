//! Fakes and fixtures for the session integration tests.

#![allow(dead_code)]

use settings::{ConfigResolver, FontSpec, Rgba};
use std::path::{Path, PathBuf};
use terminal::{
    CellSize, ColorRole, CursorBlinkMode, CursorShape, GeometryHints, Padding, TerminalWidget,
    ToplevelWindow,
};
use tempfile::TempDir;

/// Isolated config roots. The user root is `<tmp>/user`, the single system
/// root is `<tmp>/system`.
pub struct TestEnv {
    pub temp_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            temp_dir: tempfile::tempdir().expect("failed to create temp dir"),
        }
    }

    pub fn user_root(&self) -> PathBuf {
        self.temp_dir.path().join("user")
    }

    pub fn system_root(&self) -> PathBuf {
        self.temp_dir.path().join("system")
    }

    pub fn user_config(&self) -> PathBuf {
        termise_config_in(&self.user_root())
    }

    /// Write the per-user config file.
    pub fn write_user_config(&self, contents: &str) -> PathBuf {
        let path = self.user_config();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, contents).unwrap();
        path
    }

    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    pub fn resolver(&self, explicit: Option<PathBuf>) -> ConfigResolver {
        ConfigResolver::with_roots(explicit, Some(self.user_root()), vec![self.system_root()])
    }
}

fn termise_config_in(root: &Path) -> PathBuf {
    root.join("termise").join("config")
}

/// In-memory terminal widget recording everything set on it.
#[derive(Debug, Clone)]
pub struct FakeTerminal {
    pub font: Option<FontSpec>,
    pub font_scale: f64,
    pub scrollback_lines: Option<i32>,
    pub blink: CursorBlinkMode,
    pub shape: CursorShape,
    pub colors: Vec<(ColorRole, Rgba)>,
    pub cell: CellSize,
    pub padding: Padding,
    pub scroll_on_output: bool,
    pub scroll_on_keystroke: bool,
    pub audible_bell: bool,
    pub mouse_autohide: bool,
    pub allow_bold: bool,
    pub search_wrap: bool,
    pub copies: usize,
    pub pastes: usize,
    pub fed: Vec<Vec<u8>>,
    pub title: Option<String>,
}

impl Default for FakeTerminal {
    fn default() -> Self {
        Self {
            font: None,
            font_scale: 1.0,
            scrollback_lines: None,
            blink: CursorBlinkMode::System,
            shape: CursorShape::Block,
            colors: Vec::new(),
            cell: CellSize {
                width: 8,
                height: 16,
            },
            padding: Padding::uniform(2),
            scroll_on_output: false,
            scroll_on_keystroke: false,
            audible_bell: true,
            mouse_autohide: false,
            allow_bold: false,
            search_wrap: false,
            copies: 0,
            pastes: 0,
            fed: Vec::new(),
            title: None,
        }
    }
}

impl FakeTerminal {
    /// Last color set for a role.
    pub fn color(&self, role: ColorRole) -> Option<Rgba> {
        self.colors
            .iter()
            .rev()
            .find(|(r, _)| *r == role)
            .map(|(_, c)| *c)
    }
}

impl TerminalWidget for FakeTerminal {
    fn set_font(&mut self, font: &FontSpec) {
        self.font = Some(font.clone());
    }
    fn font_scale(&self) -> f64 {
        self.font_scale
    }
    fn set_font_scale(&mut self, scale: f64) {
        self.font_scale = scale;
    }
    fn set_scrollback_lines(&mut self, lines: i32) {
        self.scrollback_lines = Some(lines);
    }
    fn set_cursor_blink_mode(&mut self, mode: CursorBlinkMode) {
        self.blink = mode;
    }
    fn set_cursor_shape(&mut self, shape: CursorShape) {
        self.shape = shape;
    }
    fn set_color(&mut self, role: ColorRole, color: Rgba) {
        self.colors.push((role, color));
    }
    fn cell_size(&self) -> CellSize {
        self.cell
    }
    fn padding(&self) -> Padding {
        self.padding
    }
    fn set_scroll_on_output(&mut self, enabled: bool) {
        self.scroll_on_output = enabled;
    }
    fn set_scroll_on_keystroke(&mut self, enabled: bool) {
        self.scroll_on_keystroke = enabled;
    }
    fn set_audible_bell(&mut self, enabled: bool) {
        self.audible_bell = enabled;
    }
    fn set_mouse_autohide(&mut self, enabled: bool) {
        self.mouse_autohide = enabled;
    }
    fn set_allow_bold(&mut self, enabled: bool) {
        self.allow_bold = enabled;
    }
    fn set_search_wrap(&mut self, enabled: bool) {
        self.search_wrap = enabled;
    }
    fn copy_clipboard(&mut self) {
        self.copies += 1;
    }
    fn paste_clipboard(&mut self) {
        self.pastes += 1;
    }
    fn feed_child(&mut self, bytes: &[u8]) {
        self.fed.push(bytes.to_vec());
    }
    fn title(&self) -> Option<String> {
        self.title.clone()
    }
}

/// In-memory window.
#[derive(Debug, Clone, Default)]
pub struct FakeWindow {
    pub title: String,
    pub urgent: bool,
    pub hints: Option<GeometryHints>,
    pub fullscreen: bool,
    pub fullscreen_requests: usize,
    pub icon_name: Option<String>,
    pub background: Option<Rgba>,
}

impl ToplevelWindow for FakeWindow {
    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }
    fn set_urgency_hint(&mut self, urgent: bool) {
        self.urgent = urgent;
    }
    fn set_geometry_hints(&mut self, hints: GeometryHints) {
        self.hints = Some(hints);
    }
    fn fullscreen(&mut self) {
        self.fullscreen = true;
        self.fullscreen_requests += 1;
    }
    fn unfullscreen(&mut self) {
        self.fullscreen = false;
        self.fullscreen_requests += 1;
    }
    fn set_icon_name(&mut self, name: &str) {
        self.icon_name = Some(name.to_string());
    }
    fn override_background(&mut self, color: Rgba) {
        self.background = Some(color);
    }
}
