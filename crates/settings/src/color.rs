//! Color specification strings.
//!
//! Accepted forms:
//! - X11 color names (`black`, `dark slate gray`, `gray50`, `transparent`, ...)
//! - `#rgb`, `#rrggbb`, `#rrrgggbbb`, `#rrrrggggbbbb`
//! - `rgb(r, g, b)` and `rgba(r, g, b, a)` with 0-255 or percentage channels

use crate::color_names::NAMED_COLORS;

/// An RGBA color with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Opaque color from 8-bit channels.
    pub fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::new(
            f32::from(red) / 255.0,
            f32::from(green) / 255.0,
            f32::from(blue) / 255.0,
            1.0,
        )
    }

    /// Parse a color specification. Returns `None` for anything unrecognized.
    pub fn parse(spec: &str) -> Option<Self> {
        let spec = spec.trim();
        if let Some(hex) = spec.strip_prefix('#') {
            return parse_hex(hex);
        }
        if let Some(args) = function_args(spec, "rgba") {
            return parse_rgb_function(args, true);
        }
        if let Some(args) = function_args(spec, "rgb") {
            return parse_rgb_function(args, false);
        }
        named(spec)
    }

    /// `#rrggbb` form, dropping alpha.
    pub fn to_hex(self) -> String {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            byte(self.red),
            byte(self.green),
            byte(self.blue)
        )
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let width = match hex.len() {
        3 => 1,
        6 => 2,
        9 => 3,
        12 => 4,
        _ => return None,
    };
    let max = f32::from(u16::MAX >> (16 - 4 * width));
    let channel = |i: usize| -> Option<f32> {
        let digits = &hex[i * width..(i + 1) * width];
        let value = u16::from_str_radix(digits, 16).ok()?;
        Some(f32::from(value) / max)
    };
    Some(Rgba::new(channel(0)?, channel(1)?, channel(2)?, 1.0))
}

fn function_args<'a>(spec: &'a str, name: &str) -> Option<&'a str> {
    let rest = spec.get(..name.len())?;
    if !rest.eq_ignore_ascii_case(name) {
        return None;
    }
    spec[name.len()..]
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn parse_rgb_function(args: &str, with_alpha: bool) -> Option<Rgba> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let expected = if with_alpha { 4 } else { 3 };
    if parts.len() != expected {
        return None;
    }

    let channel = |raw: &str| -> Option<f32> {
        match raw.strip_suffix('%') {
            Some(percent) => Some((percent.trim().parse::<f32>().ok()? / 100.0).clamp(0.0, 1.0)),
            None => Some((raw.parse::<f32>().ok()? / 255.0).clamp(0.0, 1.0)),
        }
    };

    let alpha = if with_alpha {
        parts[3].parse::<f32>().ok()?.clamp(0.0, 1.0)
    } else {
        1.0
    };

    Some(Rgba::new(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        alpha,
    ))
}

/// X11 names, matched without case or spaces: `Light Blue` is `lightblue`.
fn named(name: &str) -> Option<Rgba> {
    let key: String = name
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if key == "transparent" {
        return Some(Rgba::TRANSPARENT);
    }
    let index = NAMED_COLORS
        .binary_search_by(|(entry, _)| entry.cmp(&key.as_str()))
        .ok()?;
    let [r, g, b] = NAMED_COLORS[index].1;
    Some(Rgba::from_rgb8(r, g, b))
}
