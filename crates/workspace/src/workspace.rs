//! The termise window.
//!
//! Hosts the terminal pane, implements the window side of the session, and
//! wires key presses, pane events, and reload requests into the dispatcher.

mod chrome;
mod reload;
mod termise_window;

pub use chrome::{WindowChrome, WindowTarget};
pub use reload::{ReloadSources, ReloadTrigger};
pub use termise_window::{exit_code, quit_with, LaunchOptions, TermiseWindow};
