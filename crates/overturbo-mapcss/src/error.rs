//! Error types for MapCSS parsing.

use std::fmt;

/// A stylesheet parse failure with the cursor position where it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapCssError {
    /// 1-based line, or 0 when the error is not tied to a position
    pub line: usize,
    /// 1-based column
    pub column: usize,
    pub message: String,
}

impl MapCssError {
    /// Create an error at a source position.
    pub fn at(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create an error with no position information.
    pub fn new(message: impl Into<String>) -> Self {
        Self::at(0, 0, message)
    }
}

impl fmt::Display for MapCssError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line > 0 {
            write!(
                f,
                "mapcss: line {}, col {}: {}",
                self.line, self.column, self.message
            )
        } else {
            write!(f, "mapcss: {}", self.message)
        }
    }
}

impl std::error::Error for MapCssError {}

/// Result type for stylesheet parsing.
pub type MapCssResult<T> = Result<T, MapCssError>;
