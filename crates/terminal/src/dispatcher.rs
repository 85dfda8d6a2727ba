//! Keyboard shortcuts and session events.
//!
//! | keys                        | action                               |
//! |-----------------------------|--------------------------------------|
//! | F11 (any modifiers)         | toggle fullscreen                    |
//! | Ctrl+Shift `+`              | next font scale                      |
//! | Ctrl+Shift `_`              | next font in the `font` list         |
//! | Ctrl+Shift C / V            | copy / paste                         |
//! | Ctrl+Shift R                | reload config                        |
//! | Ctrl `-` / Ctrl `=`         | previous font scale / reset scale    |
//!
//! Other Ctrl, Ctrl+Shift, and Ctrl+Alt[+Shift] keys found in the
//! `modifyOtherKeys` tables are sent to the child as escape sequences when
//! `modify_other_keys` is on.

use crate::font_scale;
use crate::keymap::{Key, KeyEvent, ModifierMask};
use crate::policy;
use crate::sequences::SequenceTable;
use crate::session::{FullscreenState, SessionConfig};
use crate::widget::{TerminalWidget, ToplevelWindow};
use settings::constants::window::DEFAULT_TITLE;
use settings::{ConfigResolver, TerminalOptions};
use std::path::{Path, PathBuf};

const FULLSCREEN_KEY: Key = Key::Function(11);

/// What a key press resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    ToggleFullscreen,
    IncreaseFontScale,
    DecreaseFontScale,
    ResetFontScale,
    CycleFont,
    CopyClipboard,
    PasteClipboard,
    ReloadConfig,
    Inject(&'static str),
}

/// Whether the toolkit should continue its own processing of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Handled,
    Unhandled,
}

impl Propagation {
    pub fn is_handled(self) -> bool {
        self == Propagation::Handled
    }
}

/// Events the window and terminal report to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    KeyPress(KeyEvent),
    Bell,
    WindowStateChanged { fullscreen: bool },
    TitleChanged,
    FocusChanged,
}

/// Map a key press to an action. Pure: nothing is executed here.
pub fn resolve_key(event: &KeyEvent, session: &SessionConfig) -> Option<KeyAction> {
    let modifiers = event.modifiers.accelerator();
    let key = event.key.to_lower();

    if session.fullscreen_enabled && key == FULLSCREEN_KEY {
        return Some(KeyAction::ToggleFullscreen);
    }

    let inject = |table: SequenceTable| {
        if session.modify_other_keys {
            table.lookup(&key).map(KeyAction::Inject)
        } else {
            None
        }
    };

    let ctrl_shift = ModifierMask::CONTROL | ModifierMask::SHIFT;
    let ctrl_alt = ModifierMask::CONTROL | ModifierMask::ALT;

    if modifiers == ctrl_shift {
        match key {
            Key::Character('+') => Some(KeyAction::IncreaseFontScale),
            Key::Character('_') => Some(KeyAction::CycleFont),
            Key::Character('c') => Some(KeyAction::CopyClipboard),
            Key::Character('v') => Some(KeyAction::PasteClipboard),
            Key::Character('r') => Some(KeyAction::ReloadConfig),
            _ => inject(SequenceTable::Plain),
        }
    } else if modifiers == ctrl_alt || modifiers == ctrl_alt | ModifierMask::SHIFT {
        inject(SequenceTable::Meta)
    } else if modifiers == ModifierMask::CONTROL {
        match key {
            Key::Character('-') => Some(KeyAction::DecreaseFontScale),
            Key::Character('=') => Some(KeyAction::ResetFontScale),
            _ => inject(SequenceTable::Plain),
        }
    } else {
        None
    }
}

/// Owns the session and routes key presses and window events to it.
///
/// The terminal and window are passed into each call rather than stored, so
/// the view layer keeps ownership of its widgets.
#[derive(Debug)]
pub struct KeybindDispatcher {
    session: SessionConfig,
    fullscreen: FullscreenState,
    resolver: ConfigResolver,
    /// `--title`: pins the title and keeps dynamic titles off across reloads.
    fixed_title: Option<String>,
    loaded_from: Option<PathBuf>,
}

impl KeybindDispatcher {
    pub fn new(resolver: ConfigResolver) -> Self {
        let config_file = resolver.explicit_path().map(Path::to_path_buf);
        Self {
            session: SessionConfig::new(config_file),
            fullscreen: FullscreenState::default(),
            resolver,
            fixed_title: None,
            loaded_from: None,
        }
    }

    pub fn with_fixed_title(mut self, title: Option<String>) -> Self {
        self.fixed_title = title;
        self
    }

    pub fn session(&self) -> &SessionConfig {
        &self.session
    }

    pub fn fullscreen_state(&self) -> FullscreenState {
        self.fullscreen
    }

    /// The config file applied by the last load, if any.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.loaded_from.as_deref()
    }

    /// Resolve and apply the config at startup. Without a file the defaults
    /// are applied. Returns the options so startup can read the one-shot
    /// `geometry` and `icon_name` values.
    pub fn load(
        &mut self,
        term: &mut dyn TerminalWidget,
        window: &mut dyn ToplevelWindow,
    ) -> TerminalOptions {
        let resolved = self.resolver.resolve();
        let options = resolved.options.unwrap_or_default();
        self.apply(&options, resolved.path, term, window);
        options
    }

    /// Re-run config resolution and policy on top of the current state.
    /// Shared by the keybinding, SIGUSR1, and the file watcher. When no file
    /// loads, the running settings are kept.
    pub fn reload(&mut self, term: &mut dyn TerminalWidget, window: &mut dyn ToplevelWindow) {
        let resolved = self.resolver.resolve();
        let Some(options) = resolved.options else {
            tracing::warn!("no config file to reload, keeping current settings");
            return;
        };
        self.apply(&options, resolved.path, term, window);
        tracing::info!(
            path = ?self.loaded_from.as_ref().map(|p| p.display().to_string()),
            "config reloaded"
        );
    }

    fn apply(
        &mut self,
        options: &TerminalOptions,
        path: Option<PathBuf>,
        term: &mut dyn TerminalWidget,
        window: &mut dyn ToplevelWindow,
    ) {
        policy::apply(options, &mut self.session, term, window);
        if self.fixed_title.is_some() {
            self.session.dynamic_title = false;
        }
        self.loaded_from = path;
        self.refresh_title(term, window);
    }

    pub fn handle_event(
        &mut self,
        event: &SessionEvent,
        term: &mut dyn TerminalWidget,
        window: &mut dyn ToplevelWindow,
    ) -> Propagation {
        match event {
            SessionEvent::KeyPress(key) => return self.handle_key(key, term, window),
            SessionEvent::Bell => {
                if self.session.urgent_on_bell {
                    window.set_urgency_hint(true);
                }
            }
            SessionEvent::FocusChanged => window.set_urgency_hint(false),
            SessionEvent::WindowStateChanged { fullscreen } => {
                self.fullscreen = FullscreenState::from_window(*fullscreen);
            }
            SessionEvent::TitleChanged => self.refresh_title(term, window),
        }
        Propagation::Unhandled
    }

    pub fn handle_key(
        &mut self,
        event: &KeyEvent,
        term: &mut dyn TerminalWidget,
        window: &mut dyn ToplevelWindow,
    ) -> Propagation {
        let Some(action) = resolve_key(event, &self.session) else {
            return Propagation::Unhandled;
        };
        tracing::trace!(?action, "key action");

        match action {
            KeyAction::ToggleFullscreen => self.fullscreen.toggle(window),
            KeyAction::IncreaseFontScale => {
                term.set_font_scale(font_scale::next(term.font_scale()));
            }
            KeyAction::DecreaseFontScale => {
                term.set_font_scale(font_scale::previous(term.font_scale()));
            }
            KeyAction::ResetFontScale => {
                term.set_font_scale(font_scale::reset(self.session.base_font_scale));
            }
            KeyAction::CycleFont => match self.session.cycle_font() {
                Some(font) => term.set_font(font),
                None => return Propagation::Unhandled,
            },
            KeyAction::CopyClipboard => term.copy_clipboard(),
            KeyAction::PasteClipboard => term.paste_clipboard(),
            KeyAction::ReloadConfig => self.reload(term, window),
            KeyAction::Inject(sequence) => term.feed_child(sequence.as_bytes()),
        }
        Propagation::Handled
    }

    fn refresh_title(&self, term: &dyn TerminalWidget, window: &mut dyn ToplevelWindow) {
        let title = match &self.fixed_title {
            Some(fixed) => fixed.clone(),
            None => self
                .session
                .dynamic_title
                .then(|| term.title())
                .flatten()
                .filter(|title| !title.is_empty())
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        };
        window.set_title(&title);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::{MockTerminalWidget, MockToplevelWindow};
    use test_case::test_case;
    use tracing_test::traced_test;

    const CTRL: ModifierMask = ModifierMask::CONTROL;
    const SHIFT: ModifierMask = ModifierMask::SHIFT;
    const ALT: ModifierMask = ModifierMask::ALT;

    fn session(modify_other_keys: bool) -> SessionConfig {
        let mut session = SessionConfig::new(None);
        session.fullscreen_enabled = true;
        session.modify_other_keys = modify_other_keys;
        session
    }

    fn key(c: char, modifiers: ModifierMask) -> KeyEvent {
        KeyEvent::character(c, modifiers)
    }

    #[test_case(key('+', CTRL | SHIFT), KeyAction::IncreaseFontScale ; "ctrl shift plus")]
    #[test_case(key('_', CTRL | SHIFT), KeyAction::CycleFont ; "ctrl shift underscore")]
    #[test_case(key('C', CTRL | SHIFT), KeyAction::CopyClipboard ; "ctrl shift c upper")]
    #[test_case(key('c', CTRL | SHIFT), KeyAction::CopyClipboard ; "ctrl shift c lower")]
    #[test_case(key('V', CTRL | SHIFT), KeyAction::PasteClipboard ; "ctrl shift v")]
    #[test_case(key('R', CTRL | SHIFT), KeyAction::ReloadConfig ; "ctrl shift r")]
    #[test_case(key('-', CTRL), KeyAction::DecreaseFontScale ; "ctrl minus")]
    #[test_case(key('=', CTRL), KeyAction::ResetFontScale ; "ctrl equal")]
    fn shortcuts(event: KeyEvent, expected: KeyAction) {
        assert_eq!(resolve_key(&event, &session(false)), Some(expected));
    }

    #[test]
    fn f11_toggles_regardless_of_modifiers() {
        for modifiers in [ModifierMask::NONE, CTRL, CTRL | SHIFT | ALT] {
            let event = KeyEvent::new(Key::Function(11), modifiers);
            assert_eq!(
                resolve_key(&event, &session(false)),
                Some(KeyAction::ToggleFullscreen)
            );
        }
    }

    #[test]
    fn f11_ignored_when_fullscreen_disabled() {
        let mut session = session(false);
        session.fullscreen_enabled = false;
        let event = KeyEvent::new(Key::Function(11), ModifierMask::NONE);
        assert_eq!(resolve_key(&event, &session), None);
    }

    #[test]
    fn lock_keys_do_not_break_shortcuts() {
        let event = key('C', CTRL | SHIFT | ModifierMask::CAPS_LOCK | ModifierMask::NUM_LOCK);
        assert_eq!(
            resolve_key(&event, &session(false)),
            Some(KeyAction::CopyClipboard)
        );
    }

    #[test]
    fn extra_modifiers_do_not_match() {
        assert_eq!(
            resolve_key(&key('c', CTRL | SHIFT | ModifierMask::SUPER), &session(false)),
            None
        );
        assert_eq!(resolve_key(&key('-', CTRL | ALT), &session(false)), None);
    }

    #[test]
    fn ctrl_shift_comma_injects_when_enabled() {
        assert_eq!(
            resolve_key(&key(',', CTRL | SHIFT), &session(true)),
            Some(KeyAction::Inject("\x1b[27;5;44~"))
        );
        assert_eq!(resolve_key(&key(',', CTRL | SHIFT), &session(false)), None);
    }

    #[test]
    fn ctrl_alt_uses_meta_table() {
        assert_eq!(
            resolve_key(&key(',', CTRL | ALT), &session(true)),
            Some(KeyAction::Inject("\x1b[27;13;44~"))
        );
        assert_eq!(
            resolve_key(&key('!', CTRL | ALT | SHIFT), &session(true)),
            Some(KeyAction::Inject("\x1b[27;14;33~"))
        );
        assert_eq!(resolve_key(&key(',', CTRL | ALT), &session(false)), None);
    }

    #[test]
    fn ctrl_alone_injects_plain_table() {
        assert_eq!(
            resolve_key(&KeyEvent::new(Key::Enter, CTRL), &session(true)),
            Some(KeyAction::Inject("\x1b[27;5;13~"))
        );
        assert_eq!(resolve_key(&key('a', CTRL), &session(true)), None);
    }

    #[test]
    fn plain_keys_are_never_handled() {
        assert_eq!(resolve_key(&key('a', ModifierMask::NONE), &session(true)), None);
        assert_eq!(resolve_key(&key(',', SHIFT), &session(true)), None);
        assert_eq!(resolve_key(&key(',', ALT), &session(true)), None);
    }

    #[traced_test]
    #[test]
    fn reload_without_a_file_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = ConfigResolver::with_roots(None, Some(dir.path().to_path_buf()), vec![]);
        let mut dispatcher = KeybindDispatcher::new(resolver);
        dispatcher.session.modify_other_keys = true;

        // Bare mocks panic on any call.
        let mut term = MockTerminalWidget::new();
        let mut window = MockToplevelWindow::new();
        dispatcher.reload(&mut term, &mut window);

        assert!(dispatcher.session().modify_other_keys);
        assert!(logs_contain("keeping current settings"));
        assert!(!logs_contain("config reloaded"));
    }

    #[test]
    fn fullscreen_key_follows_tracked_state() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = ConfigResolver::with_roots(None, Some(dir.path().to_path_buf()), vec![]);
        let mut dispatcher = KeybindDispatcher::new(resolver);
        dispatcher.session.fullscreen_enabled = true;
        let mut term = MockTerminalWidget::new();

        let mut window = MockToplevelWindow::new();
        window.expect_fullscreen().times(1).return_const(());
        window.expect_unfullscreen().never();
        let f11 = KeyEvent::new(Key::Function(11), ModifierMask::NONE);
        assert_eq!(dispatcher.handle_key(&f11, &mut term, &mut window), Propagation::Handled);

        let mut window = MockToplevelWindow::new();
        dispatcher.handle_event(
            &SessionEvent::WindowStateChanged { fullscreen: true },
            &mut term,
            &mut window,
        );
        window.expect_unfullscreen().times(1).return_const(());
        window.expect_fullscreen().never();
        assert_eq!(dispatcher.handle_key(&f11, &mut term, &mut window), Propagation::Handled);
    }
}
