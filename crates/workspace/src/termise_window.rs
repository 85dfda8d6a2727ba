//! The root view: one terminal pane in one window.

use crate::chrome::{snap_to_hints, WindowChrome, WindowTarget};
use crate::reload::{ReloadSources, ReloadTrigger};
use gpui::prelude::FluentBuilder;
use gpui::*;
use settings::constants::reload::POLL_INTERVAL;
use settings::ConfigResolver;
use std::sync::atomic::{AtomicI32, Ordering};
use terminal::{
    Geometry, GeometryHints, KeybindDispatcher, Propagation, SessionEvent, TerminalWidget,
    ToplevelWindow,
};
use terminal_view::{key_event, PaneEvent, PaneWidget, TerminalBackend, TerminalPane};

static EXIT_CODE: AtomicI32 = AtomicI32::new(0);

/// Exit status the process should end with: the child's, once it has exited.
pub fn exit_code() -> i32 {
    EXIT_CODE.load(Ordering::SeqCst)
}

/// Record the process exit status and quit the app.
pub fn quit_with(code: i32, cx: &mut App) {
    EXIT_CODE.store(code, Ordering::SeqCst);
    cx.quit();
}

/// Command line values the window needs.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub resolver: ConfigResolver,
    /// Fixed title; disables dynamic titles for the session.
    pub title: Option<String>,
    /// Overrides the config's `geometry`.
    pub geometry: Option<String>,
    /// Overrides the config's `icon_name`.
    pub icon: Option<String>,
    pub hold: bool,
}

pub struct TermiseWindow {
    pane: Entity<TerminalPane>,
    dispatcher: KeybindDispatcher,
    chrome: WindowChrome,
    reload: ReloadSources,
    hold: bool,
    _subscriptions: Vec<Subscription>,
}

impl TermiseWindow {
    pub fn new(
        launch: LaunchOptions,
        backend: TerminalBackend,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let pane = cx.new(|cx| TerminalPane::new(backend, cx));
        let subscriptions = vec![
            cx.subscribe_in(&pane, window, Self::on_pane_event),
            cx.observe_window_activation(window, |this, window, cx| {
                this.dispatch_event(&SessionEvent::FocusChanged, window, cx);
            }),
            cx.observe_window_bounds(window, |this, window, cx| {
                let fullscreen = window.is_fullscreen();
                this.dispatch_event(&SessionEvent::WindowStateChanged { fullscreen }, window, cx);
                if !fullscreen {
                    snap_to_hints(&this.chrome, window);
                }
            }),
        ];

        let mut this = Self {
            pane,
            dispatcher: KeybindDispatcher::new(launch.resolver.clone())
                .with_fixed_title(launch.title.clone()),
            chrome: WindowChrome::default(),
            reload: ReloadSources::new(),
            hold: launch.hold,
            _subscriptions: subscriptions,
        };

        let options = this.with_session(window, cx, |dispatcher, term, target| {
            dispatcher.load(term, target)
        });
        this.apply_startup_options(&launch, options, window, cx);

        this.reload.listen_for_signal(cx);
        this.watch_config_file();
        Self::start_reload_polling(window, cx);

        window.focus(&this.pane.read(cx).focus_handle(cx));
        this
    }

    /// Run `f` against the session with the pane and window as collaborators.
    fn with_session<R>(
        &mut self,
        window: &mut Window,
        cx: &mut Context<Self>,
        f: impl FnOnce(&mut KeybindDispatcher, &mut dyn TerminalWidget, &mut dyn ToplevelWindow) -> R,
    ) -> R {
        let dispatcher = &mut self.dispatcher;
        let chrome = &mut self.chrome;
        self.pane.update(cx, |pane, pane_cx| {
            let mut widget = PaneWidget::new(pane, pane_cx);
            let mut target = WindowTarget::new(window, chrome);
            f(dispatcher, &mut widget, &mut target)
        })
    }

    /// `geometry` and `icon_name` are read once; reloads leave them alone.
    fn apply_startup_options(
        &mut self,
        launch: &LaunchOptions,
        options: settings::TerminalOptions,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        if let Some(icon) = launch.icon.clone().or(options.icon_name) {
            WindowTarget::new(window, &mut self.chrome).set_icon_name(&icon);
        }

        let Some(spec) = launch.geometry.clone().or(options.geometry) else {
            return;
        };
        let geometry = match Geometry::parse(&spec) {
            Ok(geometry) => geometry,
            Err(error) => {
                tracing::warn!("{error}");
                return;
            }
        };
        if let Some((columns, rows)) = geometry.size {
            let pane = self.pane.read(cx);
            let hints = GeometryHints::for_cells(pane.cell_size(cx), pane.padding());
            let width = hints.base_width + hints.width_inc * u32::from(columns.saturating_sub(1));
            let height = hints.base_height + hints.height_inc * u32::from(rows.saturating_sub(1));
            tracing::debug!(columns, rows, width, height, "initial size from geometry");
            window.resize(size(px(width as f32), px(height as f32)));
        }
        if let Some(position) = geometry.position {
            tracing::debug!(?position, "window placement is left to the platform");
        }
    }

    fn watch_config_file(&mut self) {
        let path = self
            .dispatcher
            .loaded_from()
            .map(ToOwned::to_owned)
            .or_else(|| self.dispatcher.session().config_file.clone())
            .or_else(termise_paths::user_config_file);
        if let Some(path) = path {
            self.reload.watch(&path);
        }
    }

    /// Drain reload requests on the UI thread.
    fn start_reload_polling(window: &mut Window, cx: &mut Context<Self>) {
        cx.spawn_in(window, async move |this, cx| loop {
            cx.background_executor().timer(POLL_INTERVAL).await;
            let polled = this.update_in(cx, |this, window, cx| {
                if let Some(trigger) = this.reload.take_pending() {
                    this.reload(trigger, window, cx);
                }
            });
            if polled.is_err() {
                break;
            }
        })
        .detach();
    }

    fn reload(&mut self, trigger: ReloadTrigger, window: &mut Window, cx: &mut Context<Self>) {
        tracing::info!(?trigger, "reloading config");
        self.with_session(window, cx, |dispatcher, term, target| {
            dispatcher.reload(term, target)
        });
        self.watch_config_file();
        cx.notify();
    }

    fn dispatch_event(&mut self, event: &SessionEvent, window: &mut Window, cx: &mut Context<Self>) {
        self.with_session(window, cx, |dispatcher, term, target| {
            dispatcher.handle_event(event, term, target)
        });
        cx.notify();
    }

    fn on_key_down(&mut self, event: &KeyDownEvent, window: &mut Window, cx: &mut Context<Self>) {
        let key = key_event(&event.keystroke);
        let propagation = self.with_session(window, cx, |dispatcher, term, target| {
            let propagation = dispatcher.handle_key(&key, term, target);
            // A font change moves the cell grid.
            if propagation.is_handled() && dispatcher.session().size_hints {
                target.set_geometry_hints(GeometryHints::for_cells(term.cell_size(), term.padding()));
            }
            propagation
        });
        if propagation == Propagation::Handled {
            cx.stop_propagation();
            self.watch_config_file();
            cx.notify();
        }
    }

    fn on_pane_event(
        &mut self,
        _pane: &Entity<TerminalPane>,
        event: &PaneEvent,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        match event {
            PaneEvent::Bell => self.dispatch_event(&SessionEvent::Bell, window, cx),
            PaneEvent::TitleChanged => self.dispatch_event(&SessionEvent::TitleChanged, window, cx),
            PaneEvent::ChildExited(code) => {
                if self.hold {
                    tracing::info!(code, "child exited, holding window open");
                    return;
                }
                quit_with(*code, cx);
            }
        }
    }
}

impl Render for TermiseWindow {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        div()
            .id("termise-window")
            .size_full()
            .when_some(self.chrome.background, |d, background| d.bg(background))
            .capture_key_down(cx.listener(Self::on_key_down))
            .child(self.pane.clone())
    }
}
