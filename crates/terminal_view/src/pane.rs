//! Terminal pane that renders a PTY session.

use crate::colors::{apply_dim, Palette};
use crate::input::{encode_key, encode_mouse};
use alacritty_terminal::event::{Event, EventListener, WindowSize};
use alacritty_terminal::grid::{Dimensions, Scroll};
use alacritty_terminal::index::{Column, Line, Point as TermPoint, Side};
use alacritty_terminal::selection::{Selection as TermSelection, SelectionRange, SelectionType};
use alacritty_terminal::term::cell::Flags as CellFlags;
use alacritty_terminal::term::{Config, Term, TermMode};
use alacritty_terminal::vte::ansi::CursorShape as VtCursorShape;
use anyhow::{Context as _, Result};
use gpui::prelude::FluentBuilder;
use gpui::*;
use parking_lot::{Mutex, RwLock};
use settings::constants::terminal::{
    CURSOR_BLINK_INTERVAL, CURSOR_THICKNESS, DEFAULT_FONT_POINTS, DEFAULT_SCROLLBACK_LINES,
    ESTIMATED_CELL_HEIGHT_RATIO, ESTIMATED_CELL_WIDTH_RATIO, FONT_FAMILY, PADDING,
};
use settings::{FontSize, FontSpec};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use terminal::{
    CellSize, ChildCommand, CursorBlinkMode, CursorShape, Padding, PtyHandler, TermSize,
    TerminalProcessor,
};
use util::ResultExt;

/// Scrollback kept when the config asks for an unlimited history.
const UNLIMITED_SCROLLBACK: usize = 100_000;

const ACTIVE_POLL_INTERVAL: Duration = Duration::from_millis(4);
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(100);
const IDLE_THRESHOLD: u32 = 5;

const MOUSE_REPORTING: TermMode = TermMode::MOUSE_REPORT_CLICK
    .union(TermMode::MOUSE_DRAG)
    .union(TermMode::MOUSE_MOTION)
    .union(TermMode::MOUSE_MODE);

/// Standard ligatures for fonts that have them.
fn ligature_features() -> FontFeatures {
    FontFeatures(Arc::new(vec![
        ("liga".into(), 1),
        ("calt".into(), 1),
        ("clig".into(), 1),
    ]))
}

/// Cell size for a font: the advance of `0` by ascent plus descent.
fn cell_metrics(text_system: &TextSystem, font: &Font, font_size: f32) -> (f32, f32) {
    let size = px(font_size);
    let font_id = text_system.resolve_font(font);

    let width = match text_system.advance(font_id, size, '0') {
        Ok(advance) => f32::from(advance.width),
        Err(error) => {
            tracing::debug!(%error, font = %font.family, "no advance for '0', estimating");
            font_size * ESTIMATED_CELL_WIDTH_RATIO
        }
    };
    let ascent = f32::from(text_system.ascent(font_id, size));
    let descent = f32::from(text_system.descent(font_id, size));
    let height = ascent + descent.abs();
    let height = if height > 0.0 {
        height
    } else {
        font_size * ESTIMATED_CELL_HEIGHT_RATIO
    };

    tracing::debug!(font = %font.family, size = font_size, width, height, "cell metrics");
    (width, height)
}

/// Size, metrics, and placement shared with the VT thread's listener.
struct DisplayState {
    size: TermSize,
    cell_dims: (f32, f32),
    bounds: Option<Bounds<Pixels>>,
    /// Font and pixel size the cached `cell_dims` belong to.
    metrics_key: Option<(Font, u32)>,
}

impl DisplayState {
    fn new(size: TermSize) -> Self {
        Self {
            size,
            cell_dims: (
                DEFAULT_FONT_POINTS * ESTIMATED_CELL_WIDTH_RATIO,
                DEFAULT_FONT_POINTS * ESTIMATED_CELL_HEIGHT_RATIO,
            ),
            bounds: None,
            metrics_key: None,
        }
    }
}

/// Receives terminal events on the VT thread.
#[derive(Clone)]
struct Listener {
    title: Arc<Mutex<Option<String>>>,
    title_changed: Arc<AtomicBool>,
    bell: Arc<AtomicBool>,
    pty: Arc<Mutex<PtyHandler>>,
    palette: Arc<RwLock<Palette>>,
    display: Arc<RwLock<DisplayState>>,
}

impl Listener {
    fn pty_write(&self, data: &[u8]) {
        self.pty.lock().write(data).log_err();
    }
}

impl EventListener for Listener {
    fn send_event(&self, event: Event) {
        match event {
            Event::Title(title) => {
                *self.title.lock() = Some(title);
                self.title_changed.store(true, Ordering::Release);
            }
            Event::ResetTitle => {
                *self.title.lock() = None;
                self.title_changed.store(true, Ordering::Release);
            }
            Event::Bell => self.bell.store(true, Ordering::Release),
            Event::PtyWrite(text) => self.pty_write(text.as_bytes()),
            Event::ColorRequest(index, formatter) => {
                let rgb = self.palette.read().query(index);
                self.pty_write(formatter(rgb).as_bytes());
            }
            Event::TextAreaSizeRequest(formatter) => {
                let response = {
                    let display = self.display.read();
                    formatter(WindowSize {
                        num_lines: display.size.rows,
                        num_cols: display.size.cols,
                        cell_width: display.cell_dims.0 as u16,
                        cell_height: display.cell_dims.1 as u16,
                    })
                };
                self.pty_write(response.as_bytes());
            }
            _ => {}
        }
    }
}

/// The child process and terminal state behind a pane, created before the
/// window so a failed spawn can abort startup.
pub struct TerminalBackend {
    pty: Arc<Mutex<PtyHandler>>,
    term: Arc<Mutex<Term<Listener>>>,
    listener: Listener,
    display: Arc<RwLock<DisplayState>>,
    palette: Arc<RwLock<Palette>>,
    config: Config,
    vt: TerminalProcessor,
}

impl TerminalBackend {
    pub fn spawn(
        command: &ChildCommand,
        working_dir: Option<PathBuf>,
        size: TermSize,
    ) -> Result<Self> {
        let mut pty = PtyHandler::spawn(command, working_dir, size.rows, size.cols)?;
        let output = pty.take_output().context("PTY output already taken")?;
        let exited = pty.exited_flag();
        let pty = Arc::new(Mutex::new(pty));

        let display = Arc::new(RwLock::new(DisplayState::new(size)));
        let palette = Arc::new(RwLock::new(Palette::default()));
        let listener = Listener {
            title: Arc::new(Mutex::new(None)),
            title_changed: Arc::new(AtomicBool::new(false)),
            bell: Arc::new(AtomicBool::new(false)),
            pty: pty.clone(),
            palette: palette.clone(),
            display: display.clone(),
        };

        let config = Config {
            scrolling_history: DEFAULT_SCROLLBACK_LINES,
            ..Config::default()
        };
        let term = Arc::new(Mutex::new(Term::new(config.clone(), &size, listener.clone())));
        let vt = TerminalProcessor::start(output, term.clone(), exited)?;

        tracing::info!(?command, cols = size.cols, rows = size.rows, "child started");
        Ok(Self {
            pty,
            term,
            listener,
            display,
            palette,
            config,
            vt,
        })
    }
}

/// Emitted to the window that hosts the pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaneEvent {
    Bell,
    TitleChanged,
    ChildExited(i32),
}

/// Widget switches set by the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetOptions {
    pub scroll_on_output: bool,
    pub scroll_on_keystroke: bool,
    pub audible_bell: bool,
    pub mouse_autohide: bool,
    pub allow_bold: bool,
    pub search_wrap: bool,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self {
            scroll_on_output: true,
            scroll_on_keystroke: false,
            audible_bell: true,
            mouse_autohide: false,
            allow_bold: true,
            search_wrap: true,
        }
    }
}

pub struct TerminalPane {
    pty: Arc<Mutex<PtyHandler>>,
    term: Arc<Mutex<Term<Listener>>>,
    listener: Listener,
    display: Arc<RwLock<DisplayState>>,
    palette: Arc<RwLock<Palette>>,
    config: Config,
    vt: TerminalProcessor,
    font: FontSpec,
    font_scale: f64,
    blink_mode: CursorBlinkMode,
    blink_visible: bool,
    options: WidgetOptions,
    mouse_hidden: bool,
    dragging: bool,
    focus_handle: FocusHandle,
    exit_emitted: bool,
}

impl EventEmitter<PaneEvent> for TerminalPane {}

impl TerminalPane {
    pub fn new(backend: TerminalBackend, cx: &mut Context<Self>) -> Self {
        let TerminalBackend {
            pty,
            term,
            listener,
            display,
            palette,
            config,
            vt,
        } = backend;

        Self::start_polling(cx);
        Self::start_blinking(cx);

        Self {
            pty,
            term,
            listener,
            display,
            palette,
            config,
            vt,
            font: FontSpec::default(),
            font_scale: 1.0,
            blink_mode: CursorBlinkMode::default(),
            blink_visible: true,
            options: WidgetOptions::default(),
            mouse_hidden: false,
            dragging: false,
            // Tab must reach the child instead of moving focus.
            focus_handle: cx.focus_handle().tab_stop(false),
            exit_emitted: false,
        }
    }

    /// Poll the VT thread's flags on a timer, backing off while idle.
    fn start_polling(cx: &mut Context<Self>) {
        cx.spawn(async move |this, cx| {
            let mut idle_ticks = 0u32;
            loop {
                let interval = if idle_ticks >= IDLE_THRESHOLD {
                    IDLE_POLL_INTERVAL
                } else {
                    ACTIVE_POLL_INTERVAL
                };
                cx.background_executor().timer(interval).await;

                let Ok((active, finished)) = this.update(cx, |pane, cx| pane.poll(cx)) else {
                    break;
                };
                if finished {
                    break;
                }
                idle_ticks = if active {
                    0
                } else {
                    idle_ticks.saturating_add(1)
                };
            }
        })
        .detach();
    }

    fn start_blinking(cx: &mut Context<Self>) {
        cx.spawn(async move |this, cx| loop {
            cx.background_executor().timer(CURSOR_BLINK_INTERVAL).await;
            let updated = this.update(cx, |pane, cx| {
                if pane.cursor_blinks() {
                    pane.blink_visible = !pane.blink_visible;
                    cx.notify();
                } else if !pane.blink_visible {
                    pane.blink_visible = true;
                    cx.notify();
                }
            });
            if updated.is_err() {
                break;
            }
        })
        .detach();
    }

    /// Returns `(had_activity, child_finished)`.
    fn poll(&mut self, cx: &mut Context<Self>) -> (bool, bool) {
        let rendered = self.vt.take_render_needed();
        if rendered {
            cx.notify();
        }
        if self.vt.take_output_seen() && self.options.scroll_on_output {
            self.term.lock().scroll_display(Scroll::Bottom);
        }
        if self.listener.bell.swap(false, Ordering::AcqRel) {
            if self.options.audible_bell {
                platform::beep();
            }
            cx.emit(PaneEvent::Bell);
        }
        if self.listener.title_changed.swap(false, Ordering::AcqRel) {
            cx.emit(PaneEvent::TitleChanged);
        }

        if self.vt.has_exited() && !self.exit_emitted {
            // EOF can arrive before the child is reaped; keep polling until it is.
            if let Some(code) = self.pty.lock().exit_code() {
                tracing::info!(code, "child exited");
                self.exit_emitted = true;
                cx.emit(PaneEvent::ChildExited(code));
                return (rendered, true);
            }
        }
        (rendered, false)
    }

    fn cursor_blinks(&self) -> bool {
        match self.blink_mode {
            CursorBlinkMode::On => true,
            CursorBlinkMode::Off => false,
            CursorBlinkMode::System => self.term.lock().cursor_style().blinking,
        }
    }

    fn apply_config(&mut self) {
        self.term.lock().set_options(self.config.clone());
    }

    pub fn send_input(&self, input: &[u8]) {
        self.pty.lock().write(input).log_err();
    }

    pub fn title(&self) -> Option<String> {
        self.listener.title.lock().clone()
    }

    pub fn options(&self) -> WidgetOptions {
        self.options
    }

    pub fn options_mut(&mut self) -> &mut WidgetOptions {
        &mut self.options
    }

    pub fn font_scale(&self) -> f64 {
        self.font_scale
    }

    pub fn set_font(&mut self, font: &FontSpec, cx: &mut Context<Self>) {
        self.font = font.clone();
        cx.notify();
    }

    pub fn set_font_scale(&mut self, scale: f64, cx: &mut Context<Self>) {
        self.font_scale = scale;
        cx.notify();
    }

    /// Negative means unlimited.
    pub fn set_scrollback_lines(&mut self, lines: i32) {
        self.config.scrolling_history = usize::try_from(lines).unwrap_or(UNLIMITED_SCROLLBACK);
        self.apply_config();
    }

    pub fn set_cursor_blink_mode(&mut self, mode: CursorBlinkMode, cx: &mut Context<Self>) {
        self.blink_mode = mode;
        self.config.default_cursor_style.blinking = mode == CursorBlinkMode::On;
        self.apply_config();
        self.blink_visible = true;
        cx.notify();
    }

    pub fn set_cursor_shape(&mut self, shape: CursorShape, cx: &mut Context<Self>) {
        self.config.default_cursor_style.shape = match shape {
            CursorShape::Block => VtCursorShape::Block,
            CursorShape::IBeam => VtCursorShape::Beam,
            CursorShape::Underline => VtCursorShape::Underline,
        };
        self.apply_config();
        cx.notify();
    }

    pub fn set_color(
        &mut self,
        role: terminal::ColorRole,
        color: settings::Rgba,
        cx: &mut Context<Self>,
    ) {
        self.palette.write().set_role(role, color);
        cx.notify();
    }

    pub fn padding(&self) -> Padding {
        Padding::uniform(PADDING as u32)
    }

    fn gpui_font(&self) -> Font {
        Font {
            family: self
                .font
                .family
                .clone()
                .unwrap_or_else(|| FONT_FAMILY.to_string())
                .into(),
            features: ligature_features(),
            fallbacks: None,
            weight: self
                .font
                .weight
                .map(|weight| FontWeight(f32::from(weight)))
                .unwrap_or(FontWeight::NORMAL),
            style: match self.font.style {
                settings::FontStyle::Normal => FontStyle::Normal,
                settings::FontStyle::Italic => FontStyle::Italic,
                settings::FontStyle::Oblique => FontStyle::Oblique,
            },
        }
    }

    fn font_size(&self) -> f32 {
        let base = self
            .font
            .size
            .unwrap_or(FontSize::Points(DEFAULT_FONT_POINTS))
            .to_pixels();
        base * self.font_scale as f32
    }

    /// Cell size for the current font and scale, rounded up to whole pixels.
    pub fn cell_size(&self, cx: &App) -> CellSize {
        let (width, height) = cell_metrics(cx.text_system(), &self.gpui_font(), self.font_size());
        CellSize {
            width: width.ceil() as u32,
            height: height.ceil() as u32,
        }
    }

    fn refresh_metrics(&self, cx: &App) -> (f32, f32) {
        let font = self.gpui_font();
        let size = self.font_size();
        let key = (font, size.to_bits());
        {
            let display = self.display.read();
            if display.metrics_key.as_ref() == Some(&key) {
                return display.cell_dims;
            }
        }
        let dims = cell_metrics(cx.text_system(), &key.0, size);
        let mut display = self.display.write();
        display.cell_dims = dims;
        display.metrics_key = Some(key);
        dims
    }

    pub fn copy_clipboard(&self, cx: &mut Context<Self>) {
        if let Some(text) = self.term.lock().selection_to_string() {
            cx.write_to_clipboard(ClipboardItem::new_string(text));
        }
    }

    /// Paste, bracketed when the application asked for it.
    pub fn paste_clipboard(&mut self, cx: &mut Context<Self>) {
        let Some(text) = cx.read_from_clipboard().and_then(|item| item.text()) else {
            return;
        };
        let bracketed = {
            let mut term = self.term.lock();
            term.selection = None;
            term.mode().contains(TermMode::BRACKETED_PASTE)
        };
        if bracketed {
            self.send_input(b"\x1b[200~");
            self.send_input(text.as_bytes());
            self.send_input(b"\x1b[201~");
        } else {
            self.send_input(text.as_bytes());
        }
        cx.notify();
    }

    fn handle_key(&mut self, event: &KeyDownEvent, cx: &mut Context<Self>) {
        let keystroke = &event.keystroke;
        if keystroke.modifiers.platform {
            return;
        }
        let application_cursor = self.term.lock().mode().contains(TermMode::APP_CURSOR);
        let Some(bytes) = encode_key(keystroke, application_cursor) else {
            return;
        };

        {
            let mut term = self.term.lock();
            term.selection = None;
            if self.options.scroll_on_keystroke {
                term.scroll_display(Scroll::Bottom);
            }
        }
        if self.options.mouse_autohide {
            self.mouse_hidden = true;
        }
        self.blink_visible = true;
        self.send_input(bytes.as_bytes());
        cx.notify();
    }

    /// Grid cell under a window position, as `(column, visible row)`.
    fn pixel_to_cell(&self, position: Point<Pixels>) -> Option<(usize, usize)> {
        let display = self.display.read();
        let bounds = display.bounds?;
        let (cell_width, cell_height) = display.cell_dims;
        if cell_width <= 0.0 || cell_height <= 0.0 {
            return None;
        }
        let x = f32::from(position.x - bounds.origin.x) - PADDING;
        let y = f32::from(position.y - bounds.origin.y) - PADDING;
        let col = (x / cell_width).floor().max(0.0) as usize;
        let row = (y / cell_height).floor().max(0.0) as usize;
        Some((
            col.min(usize::from(display.size.cols).saturating_sub(1)),
            row.min(usize::from(display.size.rows).saturating_sub(1)),
        ))
    }

    fn grid_point(term: &Term<Listener>, col: usize, row: usize) -> TermPoint {
        let offset = term.grid().display_offset() as i32;
        TermPoint::new(Line(row as i32 - offset), Column(col))
    }

    fn mouse_button_code(button: MouseButton) -> Option<u8> {
        match button {
            MouseButton::Left => Some(0),
            MouseButton::Middle => Some(1),
            MouseButton::Right => Some(2),
            _ => None,
        }
    }

    fn handle_mouse_down(&mut self, event: &MouseDownEvent, cx: &mut Context<Self>) {
        let Some((col, row)) = self.pixel_to_cell(event.position) else {
            return;
        };
        let mode = *self.term.lock().mode();

        if mode.intersects(MOUSE_REPORTING) {
            if let Some(button) = Self::mouse_button_code(event.button) {
                let report = encode_mouse(button, col, row, mode.contains(TermMode::SGR_MOUSE), false);
                self.send_input(report.as_bytes());
            }
            self.dragging = event.button == MouseButton::Left;
        } else if event.button == MouseButton::Left {
            let mut term = self.term.lock();
            let point = Self::grid_point(&term, col, row);
            let kind = match (event.click_count, event.modifiers.alt) {
                (_, true) => SelectionType::Block,
                (2, _) => SelectionType::Semantic,
                (n, _) if n >= 3 => SelectionType::Lines,
                _ => SelectionType::Simple,
            };
            term.selection = Some(TermSelection::new(kind, point, Side::Left));
            drop(term);
            self.dragging = true;
            cx.notify();
        }
    }

    fn handle_mouse_up(&mut self, event: &MouseUpEvent, cx: &mut Context<Self>) {
        let Some((col, row)) = self.pixel_to_cell(event.position) else {
            return;
        };
        let mode = *self.term.lock().mode();

        if mode.intersects(MOUSE_REPORTING) {
            if let Some(button) = Self::mouse_button_code(event.button) {
                let report = encode_mouse(button, col, row, mode.contains(TermMode::SGR_MOUSE), true);
                self.send_input(report.as_bytes());
            }
        } else if event.button == MouseButton::Left && self.dragging {
            let mut term = self.term.lock();
            let point = Self::grid_point(&term, col, row);
            if let Some(selection) = term.selection.as_mut() {
                selection.update(point, Side::Right);
            }
            drop(term);
            cx.notify();
        }
        self.dragging = false;
    }

    fn handle_mouse_move(&mut self, event: &MouseMoveEvent, cx: &mut Context<Self>) {
        if self.mouse_hidden {
            self.mouse_hidden = false;
            cx.notify();
        }
        let Some((col, row)) = self.pixel_to_cell(event.position) else {
            return;
        };
        let mode = *self.term.lock().mode();
        let sgr = mode.contains(TermMode::SGR_MOUSE);

        if self.dragging && mode.intersects(TermMode::MOUSE_DRAG | TermMode::MOUSE_MOTION) {
            self.send_input(encode_mouse(32, col, row, sgr, false).as_bytes());
        } else if !self.dragging && mode.contains(TermMode::MOUSE_MOTION) {
            self.send_input(encode_mouse(35, col, row, sgr, false).as_bytes());
        } else if self.dragging && !mode.intersects(MOUSE_REPORTING) {
            let mut term = self.term.lock();
            let point = Self::grid_point(&term, col, row);
            if let Some(selection) = term.selection.as_mut() {
                selection.update(point, Side::Right);
            }
            drop(term);
            cx.notify();
        }
    }

    fn handle_scroll(&mut self, event: &ScrollWheelEvent, cx: &mut Context<Self>) {
        let Some((col, row)) = self.pixel_to_cell(event.position) else {
            return;
        };
        let cell_height = self.display.read().cell_dims.1;
        let delta_y = f32::from(event.delta.pixel_delta(px(cell_height)).y);
        let lines = (delta_y.abs() / cell_height).ceil() as i32;
        if lines == 0 {
            return;
        }

        let mode = *self.term.lock().mode();
        if mode.intersects(MOUSE_REPORTING) {
            let button = if delta_y > 0.0 { 64 } else { 65 };
            let report = encode_mouse(button, col, row, mode.contains(TermMode::SGR_MOUSE), false);
            self.send_input(report.as_bytes());
        } else if mode.contains(TermMode::ALT_SCREEN) {
            let arrow: &[u8] = if delta_y > 0.0 { b"\x1b[A" } else { b"\x1b[B" };
            for _ in 0..lines.min(5) {
                self.send_input(arrow);
            }
        } else {
            let scroll = if delta_y > 0.0 { lines } else { -lines };
            self.term.lock().scroll_display(Scroll::Delta(scroll));
            cx.notify();
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct RenderCell {
    row: usize,
    col: usize,
    c: char,
    fg: Hsla,
    bold: bool,
    italic: bool,
    wide: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct BgRegion {
    row: usize,
    col_start: usize,
    col_end: usize,
    color: Hsla,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CursorInfo {
    row: usize,
    col: usize,
    shape: VtCursorShape,
    color: Hsla,
}

struct RenderData {
    cells: Vec<RenderCell>,
    bg_regions: Vec<BgRegion>,
    cursor: Option<CursorInfo>,
    selection: Option<SelectionRange>,
    display_offset: i32,
    rows: usize,
    cols: usize,
}

/// How the cursor should be drawn this frame.
#[derive(Debug, Clone, Copy)]
struct CursorStyleHint {
    visible: bool,
    focused: bool,
}

fn build_render_data<L: EventListener>(
    term: &Term<L>,
    palette: &Palette,
    allow_bold: bool,
    cursor_hint: CursorStyleHint,
) -> RenderData {
    let content = term.renderable_content();
    let term_colors = content.colors;
    let rows = term.screen_lines();
    let cols = term.columns();
    let display_offset = content.display_offset as i32;
    let default_bg = palette.resolve(
        alacritty_terminal::vte::ansi::Color::Named(
            alacritty_terminal::vte::ansi::NamedColor::Background,
        ),
        term_colors,
    );

    let cursor_row = content.cursor.point.line.0 + display_offset;
    let cursor_col = content.cursor.point.column.0;
    let cursor = (cursor_hint.visible
        && content.cursor.shape != VtCursorShape::Hidden
        && cursor_row >= 0
        && (cursor_row as usize) < rows
        && cursor_col < cols)
        .then(|| CursorInfo {
            row: cursor_row as usize,
            col: cursor_col,
            shape: if cursor_hint.focused {
                content.cursor.shape
            } else {
                VtCursorShape::HollowBlock
            },
            color: palette.cursor,
        });
    let filled_block = cursor.filter(|c| c.shape == VtCursorShape::Block);

    let mut cells = Vec::with_capacity(rows * cols / 3);
    let mut bg_regions: Vec<BgRegion> = Vec::with_capacity(rows * 2);
    let mut current_bg: Option<BgRegion> = None;

    for cell in content.display_iter {
        let row = (cell.point.line.0 + display_offset) as usize;
        let col = cell.point.column.0;
        if row >= rows || col >= cols {
            continue;
        }
        let mut flags = cell.flags;
        if flags.contains(CellFlags::WIDE_CHAR_SPACER) {
            continue;
        }
        if !allow_bold {
            flags.remove(CellFlags::BOLD);
        }

        let mut fg = if flags.contains(CellFlags::BOLD) {
            palette.resolve_bold(cell.fg, term_colors)
        } else {
            palette.resolve(cell.fg, term_colors)
        };
        let mut bg = palette.resolve(cell.bg, term_colors);
        if flags.contains(CellFlags::DIM) {
            fg = apply_dim(fg);
        }
        if flags.contains(CellFlags::INVERSE) {
            std::mem::swap(&mut fg, &mut bg);
        }
        if flags.contains(CellFlags::HIDDEN) {
            fg = bg;
        }
        if filled_block.is_some_and(|c| c.row == row && c.col == col) {
            fg = palette.cursor_foreground.unwrap_or(bg);
        }

        if bg != default_bg {
            match current_bg.as_mut() {
                Some(region) if region.row == row && region.col_end == col && region.color == bg => {
                    region.col_end = col + 1;
                }
                _ => {
                    if let Some(done) = current_bg.take() {
                        bg_regions.push(done);
                    }
                    current_bg = Some(BgRegion {
                        row,
                        col_start: col,
                        col_end: col + 1,
                        color: bg,
                    });
                }
            }
        } else if let Some(done) = current_bg.take() {
            bg_regions.push(done);
        }

        if cell.c != ' ' && cell.c != '\0' {
            cells.push(RenderCell {
                row,
                col,
                c: cell.c,
                fg,
                bold: flags.contains(CellFlags::BOLD),
                italic: flags.contains(CellFlags::ITALIC),
                wide: flags.contains(CellFlags::WIDE_CHAR),
            });
        }
    }
    if let Some(done) = current_bg {
        bg_regions.push(done);
    }

    RenderData {
        cells,
        bg_regions,
        cursor,
        selection: content.selection,
        display_offset,
        rows,
        cols,
    }
}

/// Everything the paint phase needs, computed in prepaint.
struct Frame {
    data: RenderData,
    origin: Point<Pixels>,
    cell_width: f32,
    cell_height: f32,
    font: Font,
    font_size: f32,
    highlight: Hsla,
}

impl Frame {
    fn cell_origin(&self, row: usize, col: usize) -> Point<Pixels> {
        Point::new(
            self.origin.x + px(PADDING + col as f32 * self.cell_width),
            self.origin.y + px(PADDING + row as f32 * self.cell_height),
        )
    }

    fn fill_cells(&self, row: usize, col_start: usize, col_end: usize, color: Hsla, window: &mut Window) {
        let width = px(col_end.saturating_sub(col_start) as f32 * self.cell_width);
        window.paint_quad(fill(
            Bounds::new(
                self.cell_origin(row, col_start),
                Size {
                    width,
                    height: px(self.cell_height),
                },
            ),
            color,
        ));
    }

    fn paint_selection(&self, window: &mut Window) {
        let Some(selection) = self.data.selection else {
            return;
        };
        if selection.start == selection.end {
            return;
        }
        let start = selection.start.line.0 + self.data.display_offset;
        let end = selection.end.line.0 + self.data.display_offset;
        if end < 0 || start >= self.data.rows as i32 {
            return;
        }
        let first = start.max(0) as usize;
        let last = (end as usize).min(self.data.rows.saturating_sub(1));
        for row in first..=last {
            let (from, to) = if selection.is_block {
                (selection.start.column.0, selection.end.column.0 + 1)
            } else {
                let from = if row as i32 == start {
                    selection.start.column.0
                } else {
                    0
                };
                let to = if row as i32 == end {
                    selection.end.column.0 + 1
                } else {
                    self.data.cols
                };
                (from, to)
            };
            self.fill_cells(row, from, to, self.highlight, window);
        }
    }

    fn paint_text(&self, window: &mut Window, cx: &mut App) {
        let with_style = |bold: bool, italic: bool| Font {
            weight: if bold {
                FontWeight::BOLD
            } else {
                self.font.weight
            },
            style: if italic {
                FontStyle::Italic
            } else {
                self.font.style
            },
            ..self.font.clone()
        };
        let font_size = px(self.font_size);
        let line_height = px(self.cell_height);

        // Adjacent cells with the same style are shaped together so
        // ligatures form; each run starts at its first cell's grid position.
        let cells = &self.data.cells;
        let mut text = String::with_capacity(32);
        let mut i = 0;
        while i < cells.len() {
            let start = cells[i];
            let mut last = start;
            text.clear();
            text.push(start.c);
            i += 1;
            while let Some(next) = cells.get(i) {
                let expected = last.col + if last.wide { 2 } else { 1 };
                if next.row != start.row
                    || next.col != expected
                    || next.fg != start.fg
                    || next.bold != start.bold
                    || next.italic != start.italic
                {
                    break;
                }
                text.push(next.c);
                last = *next;
                i += 1;
            }

            let shared: SharedString = text.clone().into();
            let run = TextRun {
                len: shared.len(),
                font: with_style(start.bold, start.italic),
                color: start.fg,
                background_color: None,
                underline: None,
                strikethrough: None,
            };
            let shaped = window
                .text_system()
                .shape_line(shared, font_size, &[run], None);
            let _ = shaped.paint(self.cell_origin(start.row, start.col), line_height, window, cx);
        }
    }

    fn paint_cursor(&self, filled: bool, window: &mut Window) {
        let Some(cursor) = self.data.cursor else {
            return;
        };
        let origin = self.cell_origin(cursor.row, cursor.col);
        let (w, h) = (px(self.cell_width), px(self.cell_height));
        let thickness = px(CURSOR_THICKNESS);
        let bar = |x, y, width, height| {
            fill(
                Bounds::new(Point::new(x, y), Size { width, height }),
                cursor.color,
            )
        };

        match (cursor.shape, filled) {
            (VtCursorShape::Block, true) => window.paint_quad(bar(origin.x, origin.y, w, h)),
            (VtCursorShape::Block, false) => {}
            (VtCursorShape::HollowBlock, false) => {
                let hair = px(1.0);
                window.paint_quad(bar(origin.x, origin.y, w, hair));
                window.paint_quad(bar(origin.x, origin.y + h - hair, w, hair));
                window.paint_quad(bar(origin.x, origin.y, hair, h));
                window.paint_quad(bar(origin.x + w - hair, origin.y, hair, h));
            }
            (VtCursorShape::Beam, false) => window.paint_quad(bar(origin.x, origin.y, thickness, h)),
            (VtCursorShape::Underline, false) => {
                window.paint_quad(bar(origin.x, origin.y + h - thickness, w, thickness))
            }
            _ => {}
        }
    }

    fn paint(&self, window: &mut Window, cx: &mut App) {
        for region in &self.data.bg_regions {
            self.fill_cells(region.row, region.col_start, region.col_end, region.color, window);
        }
        self.paint_selection(window);
        self.paint_cursor(true, window);
        self.paint_text(window, cx);
        self.paint_cursor(false, window);
    }
}

impl Render for TerminalPane {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let (cell_width, cell_height) = self.refresh_metrics(cx);
        let palette = *self.palette.read();
        let font = self.gpui_font();
        let font_size = self.font_size();
        let allow_bold = self.options.allow_bold;
        let cursor_hint = CursorStyleHint {
            visible: self.blink_visible,
            focused: self.focus_handle.is_focused(window),
        };

        let term = self.term.clone();
        let pty = self.pty.clone();
        let display = self.display.clone();

        div()
            .id("terminal-pane")
            .key_context("terminal")
            .track_focus(&self.focus_handle)
            .size_full()
            .bg(palette.background)
            .when(self.mouse_hidden, |d| d.cursor(CursorStyle::None))
            .on_key_down(cx.listener(|this, event: &KeyDownEvent, _window, cx| {
                this.handle_key(event, cx);
            }))
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(|this, event: &MouseDownEvent, window, cx| {
                    window.focus(&this.focus_handle);
                    this.handle_mouse_down(event, cx);
                }),
            )
            .on_mouse_down(
                MouseButton::Middle,
                cx.listener(|this, event: &MouseDownEvent, _window, cx| {
                    this.handle_mouse_down(event, cx);
                }),
            )
            .on_mouse_down(
                MouseButton::Right,
                cx.listener(|this, event: &MouseDownEvent, _window, cx| {
                    this.handle_mouse_down(event, cx);
                }),
            )
            .on_mouse_up(
                MouseButton::Left,
                cx.listener(|this, event: &MouseUpEvent, _window, cx| {
                    this.handle_mouse_up(event, cx);
                }),
            )
            .on_mouse_up(
                MouseButton::Middle,
                cx.listener(|this, event: &MouseUpEvent, _window, cx| {
                    this.handle_mouse_up(event, cx);
                }),
            )
            .on_mouse_up(
                MouseButton::Right,
                cx.listener(|this, event: &MouseUpEvent, _window, cx| {
                    this.handle_mouse_up(event, cx);
                }),
            )
            .on_mouse_move(cx.listener(|this, event: &MouseMoveEvent, _window, cx| {
                this.handle_mouse_move(event, cx);
            }))
            .on_scroll_wheel(cx.listener(|this, event: &ScrollWheelEvent, _window, cx| {
                this.handle_scroll(event, cx);
            }))
            .child(
                canvas(
                    move |bounds, _window, _cx| {
                        let width = f32::from(bounds.size.width) - PADDING * 2.0;
                        let height = f32::from(bounds.size.height) - PADDING * 2.0;
                        let size = TermSize::fitting(width, height, cell_width, cell_height);

                        let resized = {
                            let mut display = display.write();
                            display.bounds = Some(bounds);
                            let changed = display.size != size;
                            display.size = size;
                            changed
                        };
                        if resized {
                            if let Err(error) = pty.lock().resize(size.rows, size.cols) {
                                tracing::warn!(cols = size.cols, rows = size.rows, %error, "PTY resize failed");
                            }
                            term.lock().resize(size);
                        }

                        let data = {
                            let term = term.lock();
                            build_render_data(&*term, &palette, allow_bold, cursor_hint)
                        };
                        Frame {
                            data,
                            origin: bounds.origin,
                            cell_width,
                            cell_height,
                            font,
                            font_size,
                            highlight: palette.highlight,
                        }
                    },
                    move |_bounds, frame, window, cx| frame.paint(window, cx),
                )
                .size_full(),
            )
    }
}

impl Focusable for TerminalPane {
    fn focus_handle(&self, _cx: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}
