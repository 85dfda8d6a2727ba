//! Compile-time defaults for termise.
//!
//! Organized by concern. Option defaults are the values applied when the
//! config file does not set a key (or no config file exists).

/// Terminal pane rendering.
pub mod terminal {
    /// Default font size in points when the font descriptor has none.
    pub const DEFAULT_FONT_POINTS: f32 = 10.0;

    /// Default monospace font family (macOS).
    #[cfg(target_os = "macos")]
    pub const FONT_FAMILY: &str = "Menlo";

    /// Default monospace font family (Windows).
    #[cfg(target_os = "windows")]
    pub const FONT_FAMILY: &str = "Consolas";

    /// Default monospace font family (Linux and others).
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    pub const FONT_FAMILY: &str = "Monospace";

    /// Padding around terminal content, each side.
    pub const PADDING: f32 = 2.0;
    /// Cursor thickness for beam and underline shapes.
    pub const CURSOR_THICKNESS: f32 = 2.0;
    /// Cursor blink half-period.
    pub const CURSOR_BLINK_INTERVAL: std::time::Duration = std::time::Duration::from_millis(600);
    /// Scrollback lines before the config says otherwise.
    pub const DEFAULT_SCROLLBACK_LINES: usize = 10_000;
    /// Rough cell width / font pixel size, used before fonts are measured.
    pub const ESTIMATED_CELL_WIDTH_RATIO: f32 = 0.6;
    /// Rough cell height / font pixel size, used before fonts are measured.
    pub const ESTIMATED_CELL_HEIGHT_RATIO: f32 = 1.3;
}

/// Window defaults.
pub mod window {
    /// Title shown when dynamic titles are off or the terminal has none.
    pub const DEFAULT_TITLE: &str = "termise";
    pub const DEFAULT_COLUMNS: u16 = 80;
    pub const DEFAULT_ROWS: u16 = 24;
}

/// `[options]` defaults.
pub mod options {
    pub const SCROLL_ON_OUTPUT: bool = false;
    pub const SCROLL_ON_KEYSTROKE: bool = true;
    pub const AUDIBLE_BELL: bool = false;
    pub const MOUSE_AUTOHIDE: bool = true;
    pub const ALLOW_BOLD: bool = true;
    pub const SEARCH_WRAP: bool = true;
    pub const DYNAMIC_TITLE: bool = true;
    pub const URGENT_ON_BELL: bool = true;
    pub const SIZE_HINTS: bool = false;
    pub const MODIFY_OTHER_KEYS: bool = false;
    pub const FULLSCREEN: bool = true;
}

/// Config reload plumbing.
pub mod reload {
    use std::time::Duration;

    /// Debounce window for file change events.
    pub const WATCH_DEBOUNCE: Duration = Duration::from_millis(250);
    /// How often the foreground loop drains pending reload requests.
    pub const POLL_INTERVAL: Duration = Duration::from_millis(50);
}
