//! Top-level window state and the [`ToplevelWindow`] implementation over a
//! GPUI window.

use gpui::{px, size, Hsla, Window};
use terminal::{GeometryHints, ToplevelWindow};
use terminal_view::to_hsla;

/// What the session last asked of the window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowChrome {
    pub title: String,
    pub urgent: bool,
    pub hints: Option<GeometryHints>,
    pub icon_name: Option<String>,
    /// Set by `colors.background`; painted behind the terminal.
    pub background: Option<Hsla>,
}

impl WindowChrome {
    /// Returns `true` if the title changed.
    pub fn set_title(&mut self, title: &str) -> bool {
        if self.title == title {
            return false;
        }
        self.title = title.to_string();
        true
    }

    /// Returns `true` if the urgency changed.
    pub fn set_urgent(&mut self, urgent: bool) -> bool {
        std::mem::replace(&mut self.urgent, urgent) != urgent
    }

    /// Content size snapped to the hints, or `None` when it already fits.
    pub fn snapped_size(&self, width: u32, height: u32) -> Option<(u32, u32)> {
        let snapped = self.hints?.constrain(width, height);
        (snapped != (width, height)).then_some(snapped)
    }
}

/// Resize `window` so its content sits on whole cells.
pub fn snap_to_hints(chrome: &WindowChrome, window: &mut Window) {
    let viewport = window.viewport_size();
    let width = f32::from(viewport.width).round() as u32;
    let height = f32::from(viewport.height).round() as u32;
    if let Some((width, height)) = chrome.snapped_size(width, height) {
        tracing::trace!(width, height, "snapping window to cell grid");
        window.resize(size(px(width as f32), px(height as f32)));
    }
}

/// A GPUI window plus its chrome, borrowed for one dispatch.
pub struct WindowTarget<'a> {
    window: &'a mut Window,
    chrome: &'a mut WindowChrome,
}

impl<'a> WindowTarget<'a> {
    pub fn new(window: &'a mut Window, chrome: &'a mut WindowChrome) -> Self {
        Self { window, chrome }
    }
}

impl ToplevelWindow for WindowTarget<'_> {
    fn set_title(&mut self, title: &str) {
        if self.chrome.set_title(title) {
            self.window.set_window_title(title);
        }
    }

    fn set_urgency_hint(&mut self, urgent: bool) {
        if self.chrome.set_urgent(urgent) {
            platform::request_attention(urgent);
        }
    }

    fn set_geometry_hints(&mut self, hints: GeometryHints) {
        self.chrome.hints = Some(hints);
        snap_to_hints(self.chrome, self.window);
    }

    // The session's `FullscreenState` picks the direction; GPUI only toggles.
    fn fullscreen(&mut self) {
        self.window.toggle_fullscreen();
    }

    fn unfullscreen(&mut self) {
        self.window.toggle_fullscreen();
    }

    fn set_icon_name(&mut self, name: &str) {
        // GPUI has no per-window icon names; keep it for the record.
        tracing::debug!(name, "icon name set");
        self.chrome.icon_name = Some(name.to_string());
    }

    fn override_background(&mut self, color: settings::Rgba) {
        self.chrome.background = Some(to_hsla(color));
        self.window.refresh();
    }
}
