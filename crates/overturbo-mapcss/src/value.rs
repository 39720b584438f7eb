//! Declaration values.

use serde::Serialize;

use crate::color::Color;
use crate::error::MapCssResult;
use crate::parser::Parser;

/// The typed payload of a [`Value`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ValueKind {
    /// Plain string, as produced by `set` directives
    String,
    Number(f64),
    Color(Color),
    /// Content of `url(...)` with surrounding quotes removed
    Url(String),
    /// Content of `eval(...)` with surrounding quotes removed
    Eval(String),
    /// Comma separated dash pattern such as `5, 8`
    Dashes(Vec<f64>),
    /// Anything else, e.g. `round`
    Keyword,
}

/// The tag of a [`ValueKind`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValueType {
    String,
    Number,
    Color,
    Url,
    Eval,
    Dashes,
    Keyword,
}

/// A declaration value together with the text it was read from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Value {
    pub raw: String,
    pub kind: ValueKind,
}

impl Value {
    pub fn new(raw: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            raw: raw.into(),
            kind,
        }
    }

    /// A plain string value, as produced by `set` directives. Its raw text
    /// re-parses as whatever [`Value::infer`] makes of it, not as a string.
    pub fn string(raw: impl Into<String>) -> Self {
        Self::new(raw, ValueKind::String)
    }

    /// Parse a standalone value as if it followed `property:`.
    pub fn parse(text: &str) -> MapCssResult<Self> {
        Parser::new(text).parse_value()
    }

    /// Classify free-form value text: named color, then number, then an
    /// all-numeric comma list, then keyword.
    pub fn infer(raw: &str) -> Self {
        if let Some(color) = Color::from_name(raw) {
            return Self::new(raw, ValueKind::Color(color));
        }

        if let Ok(number) = raw.parse::<f64>() {
            return Self::new(raw, ValueKind::Number(number));
        }

        if raw.contains(',') && !raw.contains(['(', ')']) {
            let dashes: Result<Vec<f64>, _> =
                raw.split(',').map(|part| part.trim().parse::<f64>()).collect();
            if let Ok(dashes) = dashes {
                return Self::new(raw, ValueKind::Dashes(dashes));
            }
        }

        Self::new(raw, ValueKind::Keyword)
    }

    pub fn value_type(&self) -> ValueType {
        match self.kind {
            ValueKind::String => ValueType::String,
            ValueKind::Number(_) => ValueType::Number,
            ValueKind::Color(_) => ValueType::Color,
            ValueKind::Url(_) => ValueType::Url,
            ValueKind::Eval(_) => ValueType::Eval,
            ValueKind::Dashes(_) => ValueType::Dashes,
            ValueKind::Keyword => ValueType::Keyword,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn as_number(&self) -> Option<f64> {
        match self.kind {
            ValueKind::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<&Color> {
        match &self.kind {
            ValueKind::Color(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_url(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::Url(url) => Some(url),
            _ => None,
        }
    }

    pub fn as_eval(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::Eval(expr) => Some(expr),
            _ => None,
        }
    }

    pub fn as_dashes(&self) -> Option<&[f64]> {
        match &self.kind {
            ValueKind::Dashes(d) => Some(d),
            _ => None,
        }
    }
}
