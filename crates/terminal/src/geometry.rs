//! X11-style geometry strings: `[=][<cols>x<rows>][{+-}<x>{+-}<y>]`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid geometry string: {0}")]
pub struct GeometryError(pub String);

/// A window position offset. Negative offsets count from the right or
/// bottom screen edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offset {
    pub value: i32,
    pub from_end: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Geometry {
    /// `(columns, rows)` in character cells.
    pub size: Option<(u16, u16)>,
    /// `(x, y)` in pixels.
    pub position: Option<(Offset, Offset)>,
}

impl Geometry {
    pub fn parse(spec: &str) -> Result<Self, GeometryError> {
        let error = || GeometryError(spec.to_string());
        let mut rest = spec.trim();
        rest = rest.strip_prefix('=').unwrap_or(rest);

        let mut geometry = Geometry::default();

        let size_end = rest.find(['+', '-']).unwrap_or(rest.len());
        let (size, position) = rest.split_at(size_end);

        if !size.is_empty() {
            let (cols, rows) = size.split_once(['x', 'X']).ok_or_else(error)?;
            let cols = parse_dimension(cols).ok_or_else(error)?;
            let rows = parse_dimension(rows).ok_or_else(error)?;
            geometry.size = Some((cols, rows));
        }

        if !position.is_empty() {
            let (x, remainder) = parse_offset(position).ok_or_else(error)?;
            let (y, remainder) = parse_offset(remainder).ok_or_else(error)?;
            if !remainder.is_empty() {
                return Err(error());
            }
            geometry.position = Some((x, y));
        }

        if geometry.size.is_none() && geometry.position.is_none() {
            return Err(error());
        }
        Ok(geometry)
    }
}

fn parse_dimension(digits: &str) -> Option<u16> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().filter(|&n| n > 0)
}

fn parse_offset(input: &str) -> Option<(Offset, &str)> {
    let mut chars = input.chars();
    let from_end = match chars.next()? {
        '+' => false,
        '-' => true,
        _ => return None,
    };
    let body = &input[1..];
    let digits_end = body
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(body.len());
    if digits_end == 0 {
        return None;
    }
    let value: i32 = body[..digits_end].parse().ok()?;
    Some((Offset { value, from_end }, &body[digits_end..]))
}
