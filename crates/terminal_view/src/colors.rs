//! Terminal color conversion.
//!
//! Maps alacritty_terminal colors to GPUI colors through a [`Palette`]. The
//! palette holds the six roles the config can override plus the 16 ANSI
//! colors; colors set by the running application (OSC 4/10/11) win over it.

use alacritty_terminal::term::color::Colors as TermColors;
use alacritty_terminal::vte::ansi::{Color, NamedColor, Rgb};
use gpui::{hsla, Hsla, Rgba};
use terminal::ColorRole;

/// Tango palette, normal then bright.
const ANSI: [u32; 16] = [
    0x000000, 0xcc0000, 0x4e9a06, 0xc4a000, 0x3465a4, 0x75507b, 0x06989a, 0xd3d7cf, 0x555753,
    0xef2929, 0x8ae234, 0xfce94f, 0x729fcf, 0xad7fa8, 0x34e2e2, 0xeeeeec,
];

/// xterm color cube channel levels.
const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub foreground: Hsla,
    pub background: Hsla,
    /// Color of bold text drawn in the default foreground.
    pub bold: Option<Hsla>,
    pub cursor: Hsla,
    /// Text color under a block cursor; the background when unset.
    pub cursor_foreground: Option<Hsla>,
    /// Selection background.
    pub highlight: Hsla,
    pub ansi: [Hsla; 16],
}

impl Default for Palette {
    fn default() -> Self {
        let ansi = ANSI.map(|hex| Hsla::from(gpui::rgb(hex)));
        let foreground = ansi[7];
        Self {
            foreground,
            background: ansi[0],
            bold: None,
            cursor: foreground,
            cursor_foreground: None,
            highlight: hsla(foreground.h, foreground.s, foreground.l, 0.35),
            ansi,
        }
    }
}

impl Palette {
    pub fn set_role(&mut self, role: ColorRole, color: settings::Rgba) {
        let color = to_hsla(color);
        match role {
            ColorRole::Foreground => self.foreground = color,
            ColorRole::Background => self.background = color,
            ColorRole::Bold => self.bold = Some(color),
            ColorRole::Cursor => self.cursor = color,
            ColorRole::CursorForeground => self.cursor_foreground = Some(color),
            ColorRole::Highlight => self.highlight = color,
        }
    }

    fn named(&self, color: NamedColor) -> Hsla {
        match color {
            NamedColor::Foreground | NamedColor::BrightForeground => self.foreground,
            NamedColor::DimForeground => apply_dim(self.foreground),
            NamedColor::Background => self.background,
            NamedColor::Cursor => self.cursor,
            NamedColor::DimBlack
            | NamedColor::DimRed
            | NamedColor::DimGreen
            | NamedColor::DimYellow
            | NamedColor::DimBlue
            | NamedColor::DimMagenta
            | NamedColor::DimCyan
            | NamedColor::DimWhite => {
                let base = color as usize - NamedColor::DimBlack as usize;
                apply_dim(self.ansi[base])
            }
            other => self.ansi.get(other as usize).copied().unwrap_or(self.foreground),
        }
    }

    fn indexed(&self, index: u8) -> Hsla {
        match index {
            0..=15 => self.ansi[index as usize],
            16..=231 => {
                let index = index - 16;
                let level = |n: u8| CUBE_LEVELS[n as usize];
                rgb_to_hsla(Rgb {
                    r: level(index / 36),
                    g: level((index % 36) / 6),
                    b: level(index % 6),
                })
            }
            232..=255 => {
                let gray = 8 + (index - 232) * 10;
                rgb_to_hsla(Rgb {
                    r: gray,
                    g: gray,
                    b: gray,
                })
            }
        }
    }

    /// Resolve a cell color. Application overrides in `term_colors` win.
    pub fn resolve(&self, color: Color, term_colors: &TermColors) -> Hsla {
        match color {
            Color::Spec(rgb) => rgb_to_hsla(rgb),
            Color::Named(named) => term_colors[named]
                .map(rgb_to_hsla)
                .unwrap_or_else(|| self.named(named)),
            Color::Indexed(index) => term_colors[index as usize]
                .map(rgb_to_hsla)
                .unwrap_or_else(|| self.indexed(index)),
        }
    }

    /// Foreground for bold text: bright variants of the first eight colors,
    /// and the bold color for the default foreground.
    pub fn resolve_bold(&self, color: Color, term_colors: &TermColors) -> Hsla {
        let bright = |index: usize| {
            term_colors[index]
                .map(rgb_to_hsla)
                .unwrap_or(self.ansi[index])
        };
        match color {
            Color::Named(NamedColor::Foreground) if term_colors[NamedColor::Foreground].is_none() => {
                self.bold.unwrap_or(self.foreground)
            }
            Color::Named(named) if (named as usize) < 8 => bright(named as usize + 8),
            Color::Indexed(index) if index < 8 => bright(index as usize + 8),
            other => self.resolve(other, term_colors),
        }
    }

    /// The 8-bit value of a dynamic color, for OSC 10/11/12 queries.
    pub fn query(&self, index: usize) -> Rgb {
        let color = match index {
            i if i < 16 => self.ansi[i],
            i if i == NamedColor::Background as usize => self.background,
            i if i == NamedColor::Cursor as usize => self.cursor,
            _ => self.foreground,
        };
        hsla_to_rgb(color)
    }
}

pub fn to_hsla(color: settings::Rgba) -> Hsla {
    Hsla::from(Rgba {
        r: color.red,
        g: color.green,
        b: color.blue,
        a: color.alpha,
    })
}

pub fn rgb_to_hsla(rgb: Rgb) -> Hsla {
    Hsla::from(Rgba {
        r: rgb.r as f32 / 255.0,
        g: rgb.g as f32 / 255.0,
        b: rgb.b as f32 / 255.0,
        a: 1.0,
    })
}

fn hsla_to_rgb(color: Hsla) -> Rgb {
    let rgba = Rgba::from(color);
    let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Rgb {
        r: byte(rgba.r),
        g: byte(rgba.g),
        b: byte(rgba.b),
    }
}

/// Faint text: two thirds of the lightness.
pub fn apply_dim(color: Hsla) -> Hsla {
    hsla(color.h, color.s, color.l * 0.66, color.a)
}
