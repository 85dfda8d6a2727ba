//! Configuration locations for termise.
//!
//! Directories are resolved lazily and cached. Use the `set_*` functions
//! before first access to override them in tests.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Directory name under every config root.
pub const APP_DIR_NAME: &str = "termise";
/// File name of the keyfile inside [`APP_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config";

const DEFAULT_SYSTEM_CONFIG_DIR: &str = "/etc/xdg";

static USER_CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();
static SYSTEM_CONFIG_DIRS: OnceLock<Vec<PathBuf>> = OnceLock::new();

/// Per-user config root, `$XDG_CONFIG_HOME` or `~/.config` (or platform equivalent).
pub fn user_config_dir() -> Option<&'static PathBuf> {
    USER_CONFIG_DIR.get_or_init(dirs::config_dir).as_ref()
}

/// System config roots in search order.
pub fn system_config_dirs() -> &'static [PathBuf] {
    SYSTEM_CONFIG_DIRS.get_or_init(system_dirs_from_env)
}

fn system_dirs_from_env() -> Vec<PathBuf> {
    parse_system_dirs(env::var("XDG_CONFIG_DIRS").ok().as_deref())
}

/// Override the user config root (must be called before first access). For testing.
pub fn set_user_config_dir(path: PathBuf) {
    let _ = USER_CONFIG_DIR.set(Some(path));
}

/// Override the system config roots (must be called before first access). For testing.
pub fn set_system_config_dirs(dirs: Vec<PathBuf>) {
    let _ = SYSTEM_CONFIG_DIRS.set(dirs);
}

/// `<root>/termise/config`
pub fn config_file_in(root: &Path) -> PathBuf {
    root.join(APP_DIR_NAME).join(CONFIG_FILE_NAME)
}

/// The per-user default config file, if a user config root exists.
pub fn user_config_file() -> Option<PathBuf> {
    user_config_dir().map(|dir| config_file_in(dir))
}

fn parse_system_dirs(raw: Option<&str>) -> Vec<PathBuf> {
    let dirs: Vec<PathBuf> = raw
        .unwrap_or_default()
        .split(':')
        .filter(|segment| !segment.is_empty())
        .map(PathBuf::from)
        .collect();

    if dirs.is_empty() {
        vec![PathBuf::from(DEFAULT_SYSTEM_CONFIG_DIR)]
    } else {
        dirs
    }
}
