//! Terminal session core.
//!
//! Key handling, font zoom, and config policy live here, written against the
//! [`TerminalWidget`] and [`ToplevelWindow`] traits so they run without a
//! window. The PTY and VT parsing thread that back the real widget are here
//! too. Nothing in this crate depends on GPUI.

pub mod dispatcher;
pub mod font_scale;
pub mod geometry;
pub mod keymap;
pub mod policy;
mod pty_handler;
pub mod sequences;
pub mod session;
pub mod types;
pub mod vt_processor;
pub mod widget;

pub use dispatcher::{resolve_key, KeyAction, KeybindDispatcher, Propagation, SessionEvent};
pub use geometry::{Geometry, GeometryError, Offset};
pub use keymap::{Key, KeyEvent, ModifierMask};
pub use pty_handler::{ChildCommand, CommandParseError, PtyHandler};
pub use sequences::SequenceTable;
pub use session::{FullscreenState, SessionConfig};
pub use types::TermSize;
pub use vt_processor::TerminalProcessor;
pub use widget::{
    CellSize, ColorRole, CursorBlinkMode, CursorShape, GeometryHints, Padding, TerminalWidget,
    ToplevelWindow,
};
