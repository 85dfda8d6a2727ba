//! Font descriptors in the `"Family [Style...] [Size]"` form, e.g. `"DejaVu Sans Mono Bold 11"`.

/// Font size from a descriptor. Bare numbers are points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FontSize {
    Points(f32),
    Pixels(f32),
}

impl FontSize {
    /// Size in logical pixels at 96 dpi.
    pub fn to_pixels(self) -> f32 {
        match self {
            FontSize::Points(pt) => pt * 96.0 / 72.0,
            FontSize::Pixels(px) => px,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

/// A parsed font descriptor. Absent fields mean "keep the terminal default".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FontSpec {
    pub family: Option<String>,
    /// CSS-style weight, 100..=900.
    pub weight: Option<u16>,
    pub style: FontStyle,
    pub size: Option<FontSize>,
}

impl FontSpec {
    /// Parse one descriptor. Never fails: unknown words become part of the family.
    pub fn parse(descriptor: &str) -> Self {
        let mut words: Vec<&str> = descriptor.split_whitespace().collect();
        let mut spec = FontSpec::default();

        if let Some(size) = words.last().and_then(|w| parse_size(w)) {
            spec.size = Some(size);
            words.pop();
        }

        while let Some(word) = words.last() {
            let lower = word.to_ascii_lowercase();
            if let Some(weight) = weight_for(&lower) {
                spec.weight.get_or_insert(weight);
            } else if let Some(style) = style_for(&lower) {
                if spec.style == FontStyle::Normal {
                    spec.style = style;
                }
            } else if !matches!(lower.as_str(), "normal" | "regular" | "roman") {
                break;
            }
            words.pop();
        }

        if !words.is_empty() {
            spec.family = Some(words.join(" "));
        }
        spec
    }

    pub fn is_bold(&self) -> bool {
        self.weight.is_some_and(|w| w >= 600)
    }
}

impl std::fmt::Display for FontSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        if let Some(family) = &self.family {
            parts.push(family.clone());
        }
        if let Some(weight) = self.weight {
            parts.push(format!("weight={weight}"));
        }
        match self.style {
            FontStyle::Normal => {}
            FontStyle::Italic => parts.push("Italic".into()),
            FontStyle::Oblique => parts.push("Oblique".into()),
        }
        match self.size {
            Some(FontSize::Points(pt)) => parts.push(format!("{pt}")),
            Some(FontSize::Pixels(px)) => parts.push(format!("{px}px")),
            None => {}
        }
        write!(f, "{}", parts.join(" "))
    }
}

/// Split a comma-separated font list. No trimming, no quoting, trailing empty
/// segments are kept (an empty segment is the default font).
pub fn split_fonts(list: &str) -> Vec<FontSpec> {
    list.split(',').map(FontSpec::parse).collect()
}

fn parse_size(word: &str) -> Option<FontSize> {
    let (number, pixels) = match word.strip_suffix("px") {
        Some(number) => (number, true),
        None => (word, false),
    };
    let value: f32 = number.parse().ok()?;
    if !(value.is_finite() && value > 0.0) {
        return None;
    }
    Some(if pixels {
        FontSize::Pixels(value)
    } else {
        FontSize::Points(value)
    })
}

fn weight_for(word: &str) -> Option<u16> {
    Some(match word {
        "thin" => 100,
        "ultra-light" | "extra-light" => 200,
        "light" => 300,
        "semi-light" | "book" => 350,
        "medium" => 500,
        "semi-bold" | "demi-bold" => 600,
        "bold" => 700,
        "ultra-bold" | "extra-bold" => 800,
        "heavy" | "black" => 900,
        _ => return None,
    })
}

fn style_for(word: &str) -> Option<FontStyle> {
    match word {
        "italic" => Some(FontStyle::Italic),
        "oblique" => Some(FontStyle::Oblique),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn family_and_size() {
        let spec = FontSpec::parse("Mono 10");
        assert_eq!(spec.family.as_deref(), Some("Mono"));
        assert_eq!(spec.size, Some(FontSize::Points(10.0)));
        assert_eq!(spec.weight, None);
    }

    #[test]
    fn multi_word_family_with_style() {
        let spec = FontSpec::parse("DejaVu Sans Mono Bold Italic 11.5");
        assert_eq!(spec.family.as_deref(), Some("DejaVu Sans Mono"));
        assert_eq!(spec.weight, Some(700));
        assert_eq!(spec.style, FontStyle::Italic);
        assert_eq!(spec.size, Some(FontSize::Points(11.5)));
        assert!(spec.is_bold());
    }

    #[test]
    fn pixel_sizes() {
        let spec = FontSpec::parse("Terminus 16px");
        assert_eq!(spec.size, Some(FontSize::Pixels(16.0)));
        assert_eq!(FontSize::Pixels(16.0).to_pixels(), 16.0);
        assert!((FontSize::Points(9.0).to_pixels() - 12.0).abs() < f32::EPSILON);
    }

    #[test]
    fn empty_descriptor_is_the_default_font() {
        assert_eq!(FontSpec::parse(""), FontSpec::default());
    }

    #[test]
    fn split_keeps_whitespace_and_trailing_segments() {
        let fonts = split_fonts("Mono 10, Sans 12,");
        assert_eq!(fonts.len(), 3);
        assert_eq!(fonts[0].family.as_deref(), Some("Mono"));
        assert_eq!(fonts[1].family.as_deref(), Some("Sans"));
        assert_eq!(fonts[1].size, Some(FontSize::Points(12.0)));
        assert_eq!(fonts[2], FontSpec::default());
    }

    #[test]
    fn single_font_list() {
        assert_eq!(split_fonts("Mono 10").len(), 1);
    }

    #[test]
    fn display_round_trips_family_and_size() {
        assert_eq!(FontSpec::parse("Mono 10").to_string(), "Mono 10");
    }
}
