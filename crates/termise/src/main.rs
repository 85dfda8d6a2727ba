//! termise - a small terminal configured from a keyfile.
//!
//! Main entry point: logging, command line, child process, window.

use anyhow::{Context as _, Result};
use clap::Parser;
use gpui::*;
use settings::constants::terminal::{
    DEFAULT_FONT_POINTS, ESTIMATED_CELL_HEIGHT_RATIO, ESTIMATED_CELL_WIDTH_RATIO, PADDING,
};
use settings::constants::window::{DEFAULT_COLUMNS, DEFAULT_ROWS, DEFAULT_TITLE};
use settings::{ConfigResolver, FontSize};
use std::path::PathBuf;
use terminal::{ChildCommand, Geometry, TermSize};
use terminal_view::TerminalBackend;
use termise_workspace::{LaunchOptions, TermiseWindow};
use tracing::{debug, error, info};

#[derive(Debug, Parser)]
#[command(
    name = "termise",
    about = "A keyfile-configured terminal",
    disable_version_flag = true
)]
struct Cli {
    /// Print the version and exit.
    #[arg(short = 'v', long)]
    version: bool,

    /// Command to run instead of the login shell.
    #[arg(short = 'e', long, value_name = "COMMAND")]
    exec: Option<String>,

    /// Application id of the window.
    #[arg(short = 'r', long)]
    role: Option<String>,

    /// Fixed window title; disables dynamic titles.
    #[arg(short = 't', long)]
    title: Option<String>,

    /// Working directory.
    #[arg(short = 'd', long, value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Window geometry, e.g. 100x30+10-10.
    #[arg(long, value_name = "GEOMETRY")]
    geometry: Option<String>,

    /// Keep the window open after the command exits.
    #[arg(long)]
    hold: bool,

    /// Config file to use instead of the default search path.
    #[arg(short = 'c', long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Window icon name.
    #[arg(short = 'i', long)]
    icon: Option<String>,
}

fn is_debug_mode() -> bool {
    std::env::var_os("TERMISE_DEBUG").is_some()
}

/// Diagnostics go to stderr. `RUST_LOG` overrides the default filter.
fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default_filter = if is_debug_mode() {
        "debug"
    } else {
        "warn,termise=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(filter)
        .init();
}

/// Grid size from `--geometry`, before any font is known. Bad strings are
/// reported once the window applies them.
fn initial_grid(geometry: Option<&str>) -> TermSize {
    let (cols, rows) = geometry
        .and_then(|spec| Geometry::parse(spec).ok())
        .and_then(|geometry| geometry.size)
        .unwrap_or((DEFAULT_COLUMNS, DEFAULT_ROWS));
    TermSize { cols, rows }
}

/// Window content size for a grid at the default font, estimated.
fn estimated_window_size(grid: TermSize) -> Size<Pixels> {
    let font_px = FontSize::Points(DEFAULT_FONT_POINTS).to_pixels();
    let width = f32::from(grid.cols) * font_px * ESTIMATED_CELL_WIDTH_RATIO + PADDING * 2.0;
    let height = f32::from(grid.rows) * font_px * ESTIMATED_CELL_HEIGHT_RATIO + PADDING * 2.0;
    size(px(width.ceil()), px(height.ceil()))
}

fn window_options(cli: &Cli, grid: TermSize, cx: &mut App) -> WindowOptions {
    let window_size = estimated_window_size(grid);
    WindowOptions {
        window_bounds: Some(WindowBounds::Windowed(Bounds::centered(None, window_size, cx))),
        titlebar: Some(TitlebarOptions {
            title: Some(
                cli.title
                    .clone()
                    .unwrap_or_else(|| DEFAULT_TITLE.to_string())
                    .into(),
            ),
            ..Default::default()
        }),
        focus: true,
        window_background: WindowBackgroundAppearance::Transparent,
        app_id: cli.role.clone(),
        ..Default::default()
    }
}

fn open_main_window(
    cli: &Cli,
    launch: LaunchOptions,
    backend: TerminalBackend,
    grid: TermSize,
    cx: &mut App,
) -> Result<()> {
    let options = window_options(cli, grid, cx);
    cx.open_window(options, |window, cx| {
        cx.new(|cx| TermiseWindow::new(launch, backend, window, cx))
    })
    .context("failed to open window")?;
    Ok(())
}

fn run(cli: Cli) -> Result<i32> {
    if let Some(dir) = &cli.directory {
        std::env::set_current_dir(dir)
            .with_context(|| format!("failed to change directory to {}", dir.display()))?;
    }

    let command = match &cli.exec {
        Some(exec) => ChildCommand::from_exec(exec).context("failed to parse command")?,
        None => ChildCommand::LoginShell,
    };

    let grid = initial_grid(cli.geometry.as_deref());
    let working_dir = std::env::current_dir().ok();
    let backend =
        TerminalBackend::spawn(&command, working_dir, grid).context("the command failed to run")?;

    let launch = LaunchOptions {
        resolver: ConfigResolver::new(cli.config.clone()),
        title: cli.title.clone(),
        geometry: cli.geometry.clone(),
        icon: cli.icon.clone(),
        hold: cli.hold,
    };

    Application::new().run(move |cx: &mut App| {
        if let Err(error) = gpui_tokio::init(cx) {
            error!(%error, "failed to start async runtime");
        }

        cx.on_window_closed(|cx| {
            if cx.windows().is_empty() {
                cx.quit();
            }
        })
        .detach();

        // Some platforms end the process inside `quit`; exit with the child's status first.
        cx.on_app_quit(|_| async {
            let code = termise_workspace::exit_code();
            if code != 0 {
                std::process::exit(code);
            }
        })
        .detach();

        if let Err(error) = open_main_window(&cli, launch, backend, grid, cx) {
            error!("{error:#}");
            termise_workspace::quit_with(1, cx);
            return;
        }
        cx.activate(true);
        debug!("window opened");
    });

    Ok(termise_workspace::exit_code())
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    if cli.version {
        println!("termise {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    info!(version = env!("CARGO_PKG_VERSION"), "termise starting");
    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(error) => {
            error!("{error:#}");
            std::process::exit(1);
        }
    }
}
