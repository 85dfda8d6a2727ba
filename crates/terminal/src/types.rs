//! Grid sizing shared by the PTY and the VT parser.

use alacritty_terminal::grid::Dimensions;
use settings::constants::window::{DEFAULT_COLUMNS, DEFAULT_ROWS};

/// Visible grid size in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TermSize {
    pub cols: u16,
    pub rows: u16,
}

impl TermSize {
    /// Cells that fit in a content area, never less than 1x1.
    pub fn fitting(width: f32, height: f32, cell_width: f32, cell_height: f32) -> Self {
        let fit = |extent: f32, cell: f32| {
            if cell <= 0.0 {
                return 1;
            }
            (extent / cell).floor().clamp(1.0, f32::from(u16::MAX)) as u16
        };
        Self {
            cols: fit(width, cell_width),
            rows: fit(height, cell_height),
        }
    }
}

impl Default for TermSize {
    fn default() -> Self {
        Self {
            cols: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
        }
    }
}

impl Dimensions for TermSize {
    fn total_lines(&self) -> usize {
        self.rows as usize
    }

    fn screen_lines(&self) -> usize {
        self.rows as usize
    }

    fn columns(&self) -> usize {
        self.cols as usize
    }
}
