//! Interfaces to the terminal widget and its top-level window.
//!
//! Policy and key handling drive these traits. The GPUI view implements them
//! for the real window; tests implement them with in-memory fakes.

use settings::{FontSpec, Rgba};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorBlinkMode {
    /// Follow the desktop setting.
    #[default]
    System,
    On,
    Off,
}

impl CursorBlinkMode {
    /// Case-insensitive `system|on|off`.
    pub fn from_name(name: &str) -> Option<Self> {
        [
            ("system", Self::System),
            ("on", Self::On),
            ("off", Self::Off),
        ]
        .into_iter()
        .find(|(candidate, _)| name.eq_ignore_ascii_case(candidate))
        .map(|(_, mode)| mode)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorShape {
    #[default]
    Block,
    IBeam,
    Underline,
}

impl CursorShape {
    /// Case-insensitive `block|ibeam|underline`.
    pub fn from_name(name: &str) -> Option<Self> {
        [
            ("block", Self::Block),
            ("ibeam", Self::IBeam),
            ("underline", Self::Underline),
        ]
        .into_iter()
        .find(|(candidate, _)| name.eq_ignore_ascii_case(candidate))
        .map(|(_, shape)| shape)
    }
}

/// Colors the terminal lets the config override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRole {
    Foreground,
    Background,
    /// Foreground for bold text.
    Bold,
    Cursor,
    CursorForeground,
    /// Selection background.
    Highlight,
}

/// Character cell size in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellSize {
    pub width: u32,
    pub height: u32,
}

/// Space between the widget edge and the character grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Padding {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Padding {
    pub fn uniform(amount: u32) -> Self {
        Self {
            left: amount,
            top: amount,
            right: amount,
            bottom: amount,
        }
    }

    pub fn horizontal(&self) -> u32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> u32 {
        self.top + self.bottom
    }
}

/// Window sizing constraints that keep the content on whole cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryHints {
    pub base_width: u32,
    pub base_height: u32,
    pub min_width: u32,
    pub min_height: u32,
    pub width_inc: u32,
    pub height_inc: u32,
}

impl GeometryHints {
    /// Base and minimum size of one cell plus padding, growing one cell at a time.
    pub fn for_cells(cell: CellSize, padding: Padding) -> Self {
        let base_width = cell.width + padding.horizontal();
        let base_height = cell.height + padding.vertical();
        Self {
            base_width,
            base_height,
            min_width: base_width,
            min_height: base_height,
            width_inc: cell.width,
            height_inc: cell.height,
        }
    }

    /// Largest size not exceeding `(width, height)` that satisfies the hints.
    pub fn constrain(&self, width: u32, height: u32) -> (u32, u32) {
        let snap = |value: u32, base: u32, min: u32, inc: u32| {
            let value = value.max(min);
            if inc == 0 {
                return value;
            }
            base + (value.saturating_sub(base) / inc) * inc
        };
        (
            snap(width, self.base_width, self.min_width, self.width_inc),
            snap(height, self.base_height, self.min_height, self.height_inc),
        )
    }
}

/// The terminal widget, as seen by policy and key handling.
#[cfg_attr(test, mockall::automock)]
pub trait TerminalWidget {
    fn set_font(&mut self, font: &FontSpec);
    fn font_scale(&self) -> f64;
    fn set_font_scale(&mut self, scale: f64);
    /// Negative means unlimited.
    fn set_scrollback_lines(&mut self, lines: i32);
    fn set_cursor_blink_mode(&mut self, mode: CursorBlinkMode);
    fn set_cursor_shape(&mut self, shape: CursorShape);
    fn set_color(&mut self, role: ColorRole, color: Rgba);
    fn cell_size(&self) -> CellSize;
    fn padding(&self) -> Padding;
    fn set_scroll_on_output(&mut self, enabled: bool);
    fn set_scroll_on_keystroke(&mut self, enabled: bool);
    fn set_audible_bell(&mut self, enabled: bool);
    fn set_mouse_autohide(&mut self, enabled: bool);
    fn set_allow_bold(&mut self, enabled: bool);
    fn set_search_wrap(&mut self, enabled: bool);
    fn copy_clipboard(&mut self);
    fn paste_clipboard(&mut self);
    /// Deliver bytes to the child as if typed.
    fn feed_child(&mut self, bytes: &[u8]);
    /// Title set by the application (OSC 0/2), if any.
    fn title(&self) -> Option<String>;
}

/// The top-level window hosting the terminal.
#[cfg_attr(test, mockall::automock)]
pub trait ToplevelWindow {
    fn set_title(&mut self, title: &str);
    fn set_urgency_hint(&mut self, urgent: bool);
    fn set_geometry_hints(&mut self, hints: GeometryHints);
    fn fullscreen(&mut self);
    fn unfullscreen(&mut self);
    fn set_icon_name(&mut self, name: &str);
    /// Window background, independent of the terminal's own background.
    fn override_background(&mut self, color: Rgba);
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("system", Some(CursorBlinkMode::System))]
    #[test_case("ON", Some(CursorBlinkMode::On))]
    #[test_case("Off", Some(CursorBlinkMode::Off))]
    #[test_case("sometimes", None)]
    fn blink_names(name: &str, expected: Option<CursorBlinkMode>) {
        assert_eq!(CursorBlinkMode::from_name(name), expected);
    }

    #[test_case("block", Some(CursorShape::Block))]
    #[test_case("IBeam", Some(CursorShape::IBeam))]
    #[test_case("UNDERLINE", Some(CursorShape::Underline))]
    #[test_case("bar", None)]
    fn shape_names(name: &str, expected: Option<CursorShape>) {
        assert_eq!(CursorShape::from_name(name), expected);
    }

    #[test]
    fn hints_are_one_cell_plus_padding() {
        let hints = GeometryHints::for_cells(
            CellSize {
                width: 8,
                height: 17,
            },
            Padding {
                left: 1,
                top: 2,
                right: 3,
                bottom: 4,
            },
        );
        assert_eq!(
            hints,
            GeometryHints {
                base_width: 12,
                base_height: 23,
                min_width: 12,
                min_height: 23,
                width_inc: 8,
                height_inc: 17,
            }
        );
    }

    #[test]
    fn constrain_snaps_down_to_whole_cells() {
        let hints = GeometryHints::for_cells(
            CellSize {
                width: 10,
                height: 20,
            },
            Padding::uniform(2),
        );
        assert_eq!(hints.constrain(105, 67), (104, 64));
        assert_eq!(hints.constrain(1, 1), (14, 24));
    }
}
