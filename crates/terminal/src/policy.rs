//! Applying decoded options to the terminal, the window, and the session.
//!
//! Every option is written on every call, so applying the same options twice
//! leaves the same state. Order matters in two places: fonts are set before
//! size hints read the cell size, and `foreground` also sets the bold color,
//! so `foreground_bold` has to come after it.

use crate::session::SessionConfig;
use crate::widget::{
    ColorRole, CursorBlinkMode, CursorShape, GeometryHints, TerminalWidget, ToplevelWindow,
};
use settings::TerminalOptions;

pub fn apply(
    options: &TerminalOptions,
    session: &mut SessionConfig,
    term: &mut dyn TerminalWidget,
    window: &mut dyn ToplevelWindow,
) {
    term.set_scroll_on_output(options.scroll_on_output);
    term.set_scroll_on_keystroke(options.scroll_on_keystroke);
    term.set_audible_bell(options.audible_bell);
    term.set_mouse_autohide(options.mouse_autohide);
    term.set_allow_bold(options.allow_bold);
    term.set_search_wrap(options.search_wrap);

    session.dynamic_title = options.dynamic_title;
    session.urgent_on_bell = options.urgent_on_bell;
    session.size_hints = options.size_hints;
    session.modify_other_keys = options.modify_other_keys;
    session.fullscreen_enabled = options.fullscreen;
    session.base_font_scale = term.font_scale();

    if let Some(fonts) = &options.fonts {
        if let Some(font) = session.replace_fonts(fonts.clone()) {
            term.set_font(font);
        }
    }

    if let Some(lines) = options.scrollback_lines {
        term.set_scrollback_lines(lines);
    }

    if let Some(mode) = options
        .cursor_blink
        .as_deref()
        .and_then(CursorBlinkMode::from_name)
    {
        term.set_cursor_blink_mode(mode);
    }

    if let Some(shape) = options
        .cursor_shape
        .as_deref()
        .and_then(CursorShape::from_name)
    {
        term.set_cursor_shape(shape);
    }

    if session.size_hints {
        window.set_geometry_hints(GeometryHints::for_cells(term.cell_size(), term.padding()));
    }

    let colors = &options.colors;
    if let Some(color) = colors.foreground {
        term.set_color(ColorRole::Foreground, color);
        term.set_color(ColorRole::Bold, color);
    }
    if let Some(color) = colors.foreground_bold {
        term.set_color(ColorRole::Bold, color);
    }
    if let Some(color) = colors.background {
        term.set_color(ColorRole::Background, color);
        window.override_background(color);
    }
    if let Some(color) = colors.cursor {
        term.set_color(ColorRole::Cursor, color);
    }
    if let Some(color) = colors.cursor_foreground {
        term.set_color(ColorRole::CursorForeground, color);
    }
    if let Some(color) = colors.highlight {
        term.set_color(ColorRole::Highlight, color);
    }
}
