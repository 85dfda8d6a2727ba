//! Terminal GPUI view layer.
//!
//! Rendering, input handling, and color conversion for the terminal, plus
//! the adapter that lets session policy drive a live pane.

mod colors;
mod input;
mod keystroke;
mod pane;
mod widget;

pub use colors::{to_hsla, Palette};
pub use keystroke::{key_event, modifiers};
pub use pane::{PaneEvent, TerminalBackend, TerminalPane, WidgetOptions};
pub use widget::PaneWidget;
