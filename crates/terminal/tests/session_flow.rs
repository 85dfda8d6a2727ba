//! Load, key handling, and reload against in-memory widgets.

mod common;

use common::{FakeTerminal, FakeWindow, TestEnv};
use pretty_assertions::assert_eq;
use settings::{FontSpec, Rgba};
use terminal::{
    font_scale, ColorRole, FullscreenState, Key, KeyEvent, KeybindDispatcher, ModifierMask,
    Propagation, SessionEvent,
};

const CTRL: ModifierMask = ModifierMask::CONTROL;

fn ctrl_shift() -> ModifierMask {
    ModifierMask::CONTROL | ModifierMask::SHIFT
}

struct Harness {
    env: TestEnv,
    dispatcher: KeybindDispatcher,
    term: FakeTerminal,
    window: FakeWindow,
}

impl Harness {
    fn new(user_config: Option<&str>) -> Self {
        let env = TestEnv::new();
        if let Some(contents) = user_config {
            env.write_user_config(contents);
        }
        let dispatcher = KeybindDispatcher::new(env.resolver(None));
        let mut harness = Self {
            env,
            dispatcher,
            term: FakeTerminal::default(),
            window: FakeWindow::default(),
        };
        harness.dispatcher.load(&mut harness.term, &mut harness.window);
        harness
    }

    fn press(&mut self, key: Key, modifiers: ModifierMask) -> Propagation {
        self.dispatcher
            .handle_key(&KeyEvent::new(key, modifiers), &mut self.term, &mut self.window)
    }

    fn event(&mut self, event: SessionEvent) -> Propagation {
        self.dispatcher
            .handle_event(&event, &mut self.term, &mut self.window)
    }
}

#[test]
fn missing_config_applies_defaults() {
    let h = Harness::new(None);
    assert_eq!(h.dispatcher.loaded_from(), None);
    assert!(!h.term.scroll_on_output);
    assert!(h.term.scroll_on_keystroke);
    assert!(!h.term.audible_bell);
    assert!(h.term.mouse_autohide);
    assert!(h.term.allow_bold);
    assert!(h.term.search_wrap);
    assert_eq!(h.term.font, None);
    assert!(h.term.colors.is_empty());
    assert_eq!(h.window.title, "termise");
    assert_eq!(h.window.hints, None);

    let session = h.dispatcher.session();
    assert!(session.dynamic_title);
    assert!(session.urgent_on_bell);
    assert!(session.fullscreen_enabled);
    assert!(!session.modify_other_keys);
    assert!(session.fonts().is_empty());
}

#[test]
fn font_list_cycles_and_wraps() {
    let mut h = Harness::new(Some("[options]\nfont=Mono 10,Sans 12\n"));
    assert_eq!(h.term.font, Some(FontSpec::parse("Mono 10")));
    assert_eq!(h.dispatcher.session().current_font_index(), 0);

    assert_eq!(h.press(Key::Character('_'), ctrl_shift()), Propagation::Handled);
    assert_eq!(h.term.font, Some(FontSpec::parse("Sans 12")));
    assert_eq!(h.dispatcher.session().current_font_index(), 1);

    assert_eq!(h.press(Key::Character('_'), ctrl_shift()), Propagation::Handled);
    assert_eq!(h.term.font, Some(FontSpec::parse("Mono 10")));
    assert_eq!(h.dispatcher.session().current_font_index(), 0);
}

#[test]
fn single_font_cycle_reapplies_it() {
    let mut h = Harness::new(Some("[options]\nfont=Mono 10\n"));
    h.term.font = None;
    assert_eq!(h.press(Key::Character('_'), ctrl_shift()), Propagation::Handled);
    assert_eq!(h.term.font, Some(FontSpec::parse("Mono 10")));
    assert_eq!(h.dispatcher.session().current_font_index(), 0);
}

#[test]
fn font_cycle_without_fonts_is_unhandled() {
    let mut h = Harness::new(None);
    assert_eq!(h.press(Key::Character('_'), ctrl_shift()), Propagation::Unhandled);
    assert_eq!(h.term.font, None);
}

#[test]
fn modify_other_keys_gates_injection() {
    let mut on = Harness::new(Some("[options]\nmodify_other_keys=true\n"));
    assert_eq!(on.press(Key::Character(','), ctrl_shift()), Propagation::Handled);
    assert_eq!(on.term.fed, vec![b"\x1b[27;5;44~".to_vec()]);

    let mut off = Harness::new(Some("[options]\nmodify_other_keys=false\n"));
    assert_eq!(off.press(Key::Character(','), ctrl_shift()), Propagation::Unhandled);
    assert!(off.term.fed.is_empty());
}

#[test]
fn reload_picks_up_edited_file() {
    let mut h = Harness::new(Some("[options]\naudible_bell=false\n"));
    assert!(!h.term.audible_bell);

    h.env.write_user_config("[options]\naudible_bell=true\n");
    assert_eq!(h.press(Key::Character('R'), ctrl_shift()), Propagation::Handled);
    assert!(h.term.audible_bell);
    assert_eq!(
        h.dispatcher.loaded_from(),
        Some(h.env.user_config().as_path())
    );
}

#[test]
fn reload_after_config_removed_keeps_settings() {
    let mut h = Harness::new(Some(
        "[options]\naudible_bell=true\nfullscreen=false\nmodify_other_keys=true\n",
    ));
    std::fs::remove_file(h.env.user_config()).unwrap();

    assert_eq!(h.press(Key::Character('R'), ctrl_shift()), Propagation::Handled);
    assert!(h.term.audible_bell);
    assert!(!h.dispatcher.session().fullscreen_enabled);
    assert!(h.dispatcher.session().modify_other_keys);
    assert_eq!(
        h.dispatcher.loaded_from(),
        Some(h.env.user_config().as_path())
    );
    assert_eq!(h.press(Key::Function(11), ModifierMask::NONE), Propagation::Unhandled);
}

#[test]
fn reload_is_idempotent() {
    let mut h = Harness::new(Some(
        "[options]\nfont=Mono 10\nsize_hints=true\ncursor_shape=ibeam\n[colors]\nbackground=#112233\n",
    ));
    let term_before = (h.term.font.clone(), h.term.shape, h.term.color(ColorRole::Background));
    let window_before = (h.window.hints, h.window.background, h.window.title.clone());

    h.dispatcher.reload(&mut h.term, &mut h.window);
    h.dispatcher.reload(&mut h.term, &mut h.window);

    assert_eq!(
        (h.term.font.clone(), h.term.shape, h.term.color(ColorRole::Background)),
        term_before
    );
    assert_eq!(
        (h.window.hints, h.window.background, h.window.title.clone()),
        window_before
    );
}

#[test]
fn reload_without_font_key_keeps_font_position() {
    let mut h = Harness::new(Some("[options]\nfont=A 1,B 2,C 3\n"));
    h.press(Key::Character('_'), ctrl_shift());
    assert_eq!(h.dispatcher.session().current_font_index(), 1);

    h.env.write_user_config("[options]\naudible_bell=true\n");
    h.dispatcher.reload(&mut h.term, &mut h.window);
    assert_eq!(h.dispatcher.session().current_font_index(), 1);
    assert_eq!(h.dispatcher.session().fonts().len(), 3);
    assert_eq!(h.term.font, Some(FontSpec::parse("B 2")));
}

#[test]
fn reload_with_font_key_resets_position() {
    let mut h = Harness::new(Some("[options]\nfont=A 1,B 2\n"));
    h.press(Key::Character('_'), ctrl_shift());
    h.dispatcher.reload(&mut h.term, &mut h.window);
    assert_eq!(h.dispatcher.session().current_font_index(), 0);
    assert_eq!(h.term.font, Some(FontSpec::parse("A 1")));
}

#[test]
fn explicit_config_path_is_used_for_reload() {
    let env = TestEnv::new();
    env.write_user_config("[options]\nscroll_on_output=false\n");
    let explicit = env.write_file("custom.ini", "[options]\nscroll_on_output=true\n");

    let mut dispatcher = KeybindDispatcher::new(env.resolver(Some(explicit.clone())));
    let mut term = FakeTerminal::default();
    let mut window = FakeWindow::default();
    dispatcher.load(&mut term, &mut window);
    assert!(term.scroll_on_output);
    assert_eq!(dispatcher.session().config_file.as_deref(), Some(explicit.as_path()));

    std::fs::write(&explicit, "[options]\nscroll_on_output=false\n").unwrap();
    dispatcher.reload(&mut term, &mut window);
    assert!(!term.scroll_on_output);
}

#[test]
fn colors_apply_with_window_background() {
    let h = Harness::new(Some(
        "[colors]\nforeground=#ffffff\nbackground=#112233\ncursor=not-a-color\nhighlight=red\n",
    ));
    let bg = Rgba::from_rgb8(0x11, 0x22, 0x33);
    assert_eq!(h.term.color(ColorRole::Background), Some(bg));
    assert_eq!(h.window.background, Some(bg));
    assert_eq!(h.term.color(ColorRole::Bold), Some(Rgba::from_rgb8(255, 255, 255)));
    assert_eq!(h.term.color(ColorRole::Cursor), None);
    assert_eq!(h.term.color(ColorRole::Highlight), Some(Rgba::from_rgb8(255, 0, 0)));
}

#[test]
fn size_hints_follow_cells() {
    let h = Harness::new(Some("[options]\nsize_hints=true\n"));
    let hints = h.window.hints.unwrap();
    assert_eq!((hints.base_width, hints.base_height), (12, 20));
    assert_eq!((hints.width_inc, hints.height_inc), (8, 16));
}

#[test]
fn font_scale_steps_and_resets_to_load_time_baseline() {
    let mut h = Harness::new(None);
    assert_eq!(h.press(Key::Character('+'), ctrl_shift()), Propagation::Handled);
    assert!((h.term.font_scale - 1.2).abs() < 1e-9);
    h.press(Key::Character('+'), ctrl_shift());
    assert!((h.term.font_scale - 1.44).abs() < 1e-9);

    assert_eq!(h.press(Key::Character('-'), CTRL), Propagation::Handled);
    assert!((h.term.font_scale - 1.2).abs() < 1e-9);

    assert_eq!(h.press(Key::Character('='), CTRL), Propagation::Handled);
    assert_eq!(h.term.font_scale, 1.0);
}

#[test]
fn font_scale_saturates_at_the_top() {
    let mut h = Harness::new(None);
    for _ in 0..20 {
        h.press(Key::Character('+'), ctrl_shift());
    }
    assert_eq!(h.term.font_scale, font_scale::MAXIMUM);
    assert_eq!(h.press(Key::Character('+'), ctrl_shift()), Propagation::Handled);
    assert_eq!(h.term.font_scale, font_scale::MAXIMUM);
}

#[test]
fn clipboard_shortcuts() {
    let mut h = Harness::new(None);
    h.press(Key::Character('C'), ctrl_shift());
    h.press(Key::Character('V'), ctrl_shift());
    assert_eq!((h.term.copies, h.term.pastes), (1, 1));
}

#[test]
fn fullscreen_toggle_tracks_window_state() {
    let mut h = Harness::new(None);
    assert_eq!(h.press(Key::Function(11), ModifierMask::NONE), Propagation::Handled);
    assert!(h.window.fullscreen);

    h.event(SessionEvent::WindowStateChanged { fullscreen: true });
    assert_eq!(h.dispatcher.fullscreen_state(), FullscreenState::Fullscreen);

    h.press(Key::Function(11), ModifierMask::SHIFT);
    assert!(!h.window.fullscreen);
    assert_eq!(h.window.fullscreen_requests, 2);
}

#[test]
fn fullscreen_key_disabled_by_config() {
    let mut h = Harness::new(Some("[options]\nfullscreen=false\n"));
    assert_eq!(h.press(Key::Function(11), ModifierMask::NONE), Propagation::Unhandled);
    assert!(!h.window.fullscreen);
}

#[test]
fn bell_raises_urgency_and_focus_clears_it() {
    let mut h = Harness::new(None);
    assert_eq!(h.event(SessionEvent::Bell), Propagation::Unhandled);
    assert!(h.window.urgent);
    h.event(SessionEvent::FocusChanged);
    assert!(!h.window.urgent);

    let mut quiet = Harness::new(Some("[options]\nurgent_on_bell=false\n"));
    quiet.event(SessionEvent::Bell);
    assert!(!quiet.window.urgent);
}

#[test]
fn dynamic_title_follows_terminal() {
    let mut h = Harness::new(None);
    h.term.title = Some("vim main.rs".into());
    h.event(SessionEvent::TitleChanged);
    assert_eq!(h.window.title, "vim main.rs");

    h.term.title = None;
    h.event(SessionEvent::TitleChanged);
    assert_eq!(h.window.title, "termise");
}

#[test]
fn static_title_when_dynamic_titles_are_off() {
    let mut h = Harness::new(Some("[options]\ndynamic_title=false\n"));
    h.term.title = Some("vim".into());
    h.event(SessionEvent::TitleChanged);
    assert_eq!(h.window.title, "termise");
}

#[test]
fn fixed_title_survives_reload() {
    let env = TestEnv::new();
    env.write_user_config("[options]\ndynamic_title=true\n");
    let mut dispatcher =
        KeybindDispatcher::new(env.resolver(None)).with_fixed_title(Some("scratch".into()));
    let mut term = FakeTerminal {
        title: Some("zsh".into()),
        ..FakeTerminal::default()
    };
    let mut window = FakeWindow::default();

    dispatcher.load(&mut term, &mut window);
    assert_eq!(window.title, "scratch");
    dispatcher.reload(&mut term, &mut window);
    dispatcher.handle_event(&SessionEvent::TitleChanged, &mut term, &mut window);
    assert_eq!(window.title, "scratch");
    assert!(!dispatcher.session().dynamic_title);
}

#[test]
fn key_press_events_route_through_handle_event() {
    let mut h = Harness::new(Some("[options]\nmodify_other_keys=true\n"));
    let handled = h.event(SessionEvent::KeyPress(KeyEvent::new(
        Key::Tab,
        ModifierMask::CONTROL | ModifierMask::ALT,
    )));
    assert_eq!(handled, Propagation::Handled);
    assert_eq!(h.term.fed, vec![b"\x1b[27;13;9~".to_vec()]);
}

#[test]
fn startup_only_options_are_returned() {
    let env = TestEnv::new();
    env.write_user_config("[options]\ngeometry=100x30\nicon_name=utilities-terminal\n");
    let mut dispatcher = KeybindDispatcher::new(env.resolver(None));
    let options = dispatcher.load(&mut FakeTerminal::default(), &mut FakeWindow::default());
    assert_eq!(options.geometry.as_deref(), Some("100x30"));
    assert_eq!(options.icon_name.as_deref(), Some("utilities-terminal"));
}
