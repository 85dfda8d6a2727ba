//! Per-process session state that config loads and shortcuts mutate.

use crate::widget::ToplevelWindow;
use settings::FontSpec;
use std::path::PathBuf;

/// Mutable session settings. One instance lives for the whole process; a
/// reload overwrites its fields in place.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub dynamic_title: bool,
    pub urgent_on_bell: bool,
    pub size_hints: bool,
    pub modify_other_keys: bool,
    pub fullscreen_enabled: bool,
    /// `--config` path, re-used by every reload.
    pub config_file: Option<PathBuf>,
    /// Scale restored by Ctrl+=, captured on each config load.
    pub base_font_scale: f64,
    fonts: Vec<FontSpec>,
    current_font: usize,
}

impl SessionConfig {
    /// Everything off until a config is applied.
    pub fn new(config_file: Option<PathBuf>) -> Self {
        Self {
            dynamic_title: false,
            urgent_on_bell: false,
            size_hints: false,
            modify_other_keys: false,
            fullscreen_enabled: false,
            config_file,
            base_font_scale: 1.0,
            fonts: Vec::new(),
            current_font: 0,
        }
    }

    pub fn fonts(&self) -> &[FontSpec] {
        &self.fonts
    }

    pub fn current_font_index(&self) -> usize {
        self.current_font
    }

    pub fn current_font(&self) -> Option<&FontSpec> {
        let font = self.fonts.get(self.current_font);
        if font.is_none() && !self.fonts.is_empty() {
            util::debug_panic!(
                "font index {} out of range for {} fonts",
                self.current_font,
                self.fonts.len()
            );
        }
        font
    }

    /// Install a new font list and select its first entry.
    pub fn replace_fonts(&mut self, fonts: Vec<FontSpec>) -> Option<&FontSpec> {
        self.fonts = fonts;
        self.current_font = 0;
        self.current_font()
    }

    /// Advance to the next font, wrapping. `None` when there are no fonts.
    pub fn cycle_font(&mut self) -> Option<&FontSpec> {
        if self.fonts.is_empty() {
            return None;
        }
        self.current_font = (self.current_font + 1) % self.fonts.len();
        self.current_font()
    }
}

/// Whether the window is currently fullscreen. Tracks the window, not the
/// user's intent: it is re-synced from every window state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FullscreenState {
    #[default]
    Windowed,
    Fullscreen,
}

impl FullscreenState {
    pub fn from_window(is_fullscreen: bool) -> Self {
        if is_fullscreen {
            Self::Fullscreen
        } else {
            Self::Windowed
        }
    }

    /// Ask the window for the opposite state.
    pub fn toggle(self, window: &mut dyn ToplevelWindow) {
        match self {
            Self::Windowed => window.fullscreen(),
            Self::Fullscreen => window.unfullscreen(),
        }
    }
}
