//! RGBA colors as used by MapCSS declarations.
//!
//! Every accepted spelling (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, named
//! colors, `rgb()` and `rgba()`) normalizes into the same four-channel
//! floating point representation.

use std::fmt;

use phf::phf_map;
use serde::Serialize;

/// An RGBA color with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

/// Errors produced while reading a color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// Hex string of an unsupported length or containing non-hex digits
    InvalidHex(String),
    /// `rgb()`/`rgba()` called with the wrong number of components
    Arity {
        function: &'static str,
        expected: usize,
        found: usize,
    },
    /// A functional component that is not a float literal
    InvalidComponent(String),
    /// Text that is not a color in any supported notation
    NotAColor(String),
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorError::InvalidHex(hex) => write!(f, "invalid hex color: #{}", hex),
            ColorError::Arity {
                function,
                expected,
                found,
            } => write!(
                f,
                "{}() requires {} values, got {}",
                function, expected, found
            ),
            ColorError::InvalidComponent(part) => {
                write!(f, "invalid color component: {:?}", part)
            }
            ColorError::NotAColor(text) => write!(f, "not a color: {:?}", text),
        }
    }
}

impl std::error::Error for ColorError {}

/// Named colors understood by MapCSS, keyed by lowercase name.
static NAMED_COLORS: phf::Map<&'static str, Color> = phf_map! {
    "black" => Color::opaque(0.0, 0.0, 0.0),
    "white" => Color::opaque(1.0, 1.0, 1.0),
    "red" => Color::opaque(1.0, 0.0, 0.0),
    "green" => Color::opaque(0.0, 0.5, 0.0),
    "blue" => Color::opaque(0.0, 0.0, 1.0),
    "yellow" => Color::opaque(1.0, 1.0, 0.0),
    "cyan" => Color::opaque(0.0, 1.0, 1.0),
    "magenta" => Color::opaque(1.0, 0.0, 1.0),
    "gray" => Color::opaque(0.5, 0.5, 0.5),
    "grey" => Color::opaque(0.5, 0.5, 0.5),
    "orange" => Color::opaque(1.0, 0.647, 0.0),
    "purple" => Color::opaque(0.5, 0.0, 0.5),
    "brown" => Color::opaque(0.647, 0.165, 0.165),
    "pink" => Color::opaque(1.0, 0.753, 0.796),
    "lime" => Color::opaque(0.0, 1.0, 0.0),
    "navy" => Color::opaque(0.0, 0.0, 0.5),
    "teal" => Color::opaque(0.0, 0.5, 0.5),
    "olive" => Color::opaque(0.5, 0.5, 0.0),
    "maroon" => Color::opaque(0.5, 0.0, 0.0),
    "aqua" => Color::opaque(0.0, 1.0, 1.0),
    "silver" => Color::opaque(0.753, 0.753, 0.753),
    "fuchsia" => Color::opaque(1.0, 0.0, 1.0),
};

impl Color {
    /// Create a color from float channels.
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Color { r, g, b, a }
    }

    /// Create a fully opaque color.
    pub const fn opaque(r: f64, g: f64, b: f64) -> Self {
        Color { r, g, b, a: 1.0 }
    }

    /// Whether alpha is exactly 1.
    pub fn is_opaque(&self) -> bool {
        self.a == 1.0
    }

    /// Look up a named color, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        NAMED_COLORS
            .get(name.trim().to_ascii_lowercase().as_str())
            .copied()
    }

    /// Parse a 3, 4, 6 or 8 digit hex color, with or without the leading `#`.
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let invalid = || ColorError::InvalidHex(hex.to_string());

        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let short = |i: usize| -> Result<f64, ColorError> {
            let v = u8::from_str_radix(&hex[i..i + 1], 16).map_err(|_| invalid())?;
            Ok(f64::from(v * 17) / 255.0)
        };
        let long = |i: usize| -> Result<f64, ColorError> {
            let v = u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid())?;
            Ok(f64::from(v) / 255.0)
        };

        match hex.len() {
            3 => Ok(Color::opaque(short(0)?, short(1)?, short(2)?)),
            4 => Ok(Color::new(short(0)?, short(1)?, short(2)?, short(3)?)),
            6 => Ok(Color::opaque(long(0)?, long(2)?, long(4)?)),
            8 => Ok(Color::new(long(0)?, long(2)?, long(4)?, long(6)?)),
            _ => Err(invalid()),
        }
    }

    /// Build a color from the inside of `rgb(...)` (`with_alpha == false`) or
    /// `rgba(...)`. Components are float literals in `0.0..=1.0`.
    pub fn from_components(content: &str, with_alpha: bool) -> Result<Self, ColorError> {
        let (function, expected) = if with_alpha { ("rgba", 4) } else { ("rgb", 3) };

        let parts: Vec<&str> = content.split(',').map(str::trim).collect();
        if parts.len() != expected {
            return Err(ColorError::Arity {
                function,
                expected,
                found: parts.len(),
            });
        }

        let mut channels = [0.0, 0.0, 0.0, 1.0];
        for (slot, part) in channels.iter_mut().zip(&parts) {
            *slot = part
                .parse::<f64>()
                .map_err(|_| ColorError::InvalidComponent(part.to_string()))?;
        }

        Ok(Color::new(channels[0], channels[1], channels[2], channels[3]))
    }

    /// Render as `#rrggbb`, or `#rrggbbaa` when not opaque.
    pub fn hex(&self) -> String {
        let r = channel_byte(self.r);
        let g = channel_byte(self.g);
        let b = channel_byte(self.b);

        if self.is_opaque() {
            format!("#{:02x}{:02x}{:02x}", r, g, b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, channel_byte(self.a))
        }
    }
}

fn channel_byte(channel: f64) -> u8 {
    (channel * 255.0).round().clamp(0.0, 255.0) as u8
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "rgb({:.3}, {:.3}, {:.3})", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "rgba({:.3}, {:.3}, {:.3}, {:.3})",
                self.r, self.g, self.b, self.a
            )
        }
    }
}

/// Parse any supported color notation.
///
/// Named colors are tried first, then `rgba(...)`/`rgb(...)`, then hex with a
/// leading `#`. Bare text is accepted as hex only when it consists entirely of
/// hex digits.
pub fn parse_color(text: &str) -> Result<Color, ColorError> {
    let text = text.trim();

    if let Some(color) = Color::from_name(text) {
        return Ok(color);
    }

    if let Some(inner) = functional_args(text, "rgba") {
        return Color::from_components(inner, true);
    }
    if let Some(inner) = functional_args(text, "rgb") {
        return Color::from_components(inner, false);
    }

    if text.starts_with('#') {
        return Color::from_hex(text);
    }
    if !text.is_empty() && text.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Color::from_hex(text);
    }

    Err(ColorError::NotAColor(text.to_string()))
}

fn functional_args<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    text.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}
