//! Configuration for termise.
//!
//! The config file is a desktop-style keyfile with `[options]` and `[colors]`
//! groups. This crate finds it, decodes it into [`TerminalOptions`], and can
//! watch it for changes. It knows nothing about windows or terminals.

pub mod color;
mod color_names;
pub mod constants;
pub mod file;
pub mod font;
pub mod keyfile;

pub use color::Rgba;
pub use file::{
    watch_config_file, ColorOptions, ConfigResolver, ConfigSource, ConfigValue, ResolvedConfig,
    TerminalOptions, COLORS_GROUP, OPTIONS_GROUP,
};
pub use font::{split_fonts, FontSize, FontSpec, FontStyle};
pub use keyfile::{KeyFile, KeyFileError};
