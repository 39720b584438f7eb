//! MapCSS stylesheet language used by `{{style:...}}` query macros.
//!
//! Parses the CSS-like MapCSS dialect into [`Stylesheet`]s of selector
//! lists and typed declarations. Parsing is pure and holds no shared state.
//!
//! ```
//! use overturbo_mapcss::parse_mapcss;
//!
//! let sheet = parse_mapcss("way[highway=primary] { color: red; width: 4 }").unwrap();
//! assert_eq!(sheet.rules[0].selectors[0].selector_type, "way");
//! assert_eq!(sheet.rules[0].declarations.len(), 2);
//! ```

pub mod ast;
pub mod color;
pub mod error;
mod parser;
pub mod value;

pub use ast::{Condition, Declaration, Operator, Rule, Selector, Stylesheet, WrappedRegex};
pub use color::{parse_color, Color, ColorError};
pub use error::{MapCssError, MapCssResult};
pub use parser::parse_mapcss;
pub use value::{Value, ValueKind, ValueType};

#[cfg(test)]
mod tests;
