//! [`TerminalWidget`] over a live pane.

use crate::pane::TerminalPane;
use gpui::Context;
use settings::{FontSpec, Rgba};
use terminal::{CellSize, ColorRole, CursorBlinkMode, CursorShape, Padding, TerminalWidget};

/// Borrows a pane with its GPUI context for the duration of one dispatch.
pub struct PaneWidget<'a, 'b> {
    pane: &'a mut TerminalPane,
    cx: &'a mut Context<'b, TerminalPane>,
}

impl<'a, 'b> PaneWidget<'a, 'b> {
    pub fn new(pane: &'a mut TerminalPane, cx: &'a mut Context<'b, TerminalPane>) -> Self {
        Self { pane, cx }
    }
}

impl TerminalWidget for PaneWidget<'_, '_> {
    fn set_font(&mut self, font: &FontSpec) {
        self.pane.set_font(font, self.cx);
    }

    fn font_scale(&self) -> f64 {
        self.pane.font_scale()
    }

    fn set_font_scale(&mut self, scale: f64) {
        self.pane.set_font_scale(scale, self.cx);
    }

    fn set_scrollback_lines(&mut self, lines: i32) {
        self.pane.set_scrollback_lines(lines);
    }

    fn set_cursor_blink_mode(&mut self, mode: CursorBlinkMode) {
        self.pane.set_cursor_blink_mode(mode, self.cx);
    }

    fn set_cursor_shape(&mut self, shape: CursorShape) {
        self.pane.set_cursor_shape(shape, self.cx);
    }

    fn set_color(&mut self, role: ColorRole, color: Rgba) {
        self.pane.set_color(role, color, self.cx);
    }

    fn cell_size(&self) -> CellSize {
        self.pane.cell_size(self.cx)
    }

    fn padding(&self) -> Padding {
        self.pane.padding()
    }

    fn set_scroll_on_output(&mut self, enabled: bool) {
        self.pane.options_mut().scroll_on_output = enabled;
    }

    fn set_scroll_on_keystroke(&mut self, enabled: bool) {
        self.pane.options_mut().scroll_on_keystroke = enabled;
    }

    fn set_audible_bell(&mut self, enabled: bool) {
        self.pane.options_mut().audible_bell = enabled;
    }

    fn set_mouse_autohide(&mut self, enabled: bool) {
        self.pane.options_mut().mouse_autohide = enabled;
    }

    fn set_allow_bold(&mut self, enabled: bool) {
        self.pane.options_mut().allow_bold = enabled;
        self.cx.notify();
    }

    fn set_search_wrap(&mut self, enabled: bool) {
        self.pane.options_mut().search_wrap = enabled;
    }

    fn copy_clipboard(&mut self) {
        self.pane.copy_clipboard(self.cx);
    }

    fn paste_clipboard(&mut self) {
        self.pane.paste_clipboard(self.cx);
    }

    fn feed_child(&mut self, bytes: &[u8]) {
        self.pane.send_input(bytes);
    }

    fn title(&self) -> Option<String> {
        self.pane.title()
    }
}
