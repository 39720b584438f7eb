//! Parsed MapCSS structures.

use regex::Regex;
use serde::Serialize;

use crate::value::Value;

/// A parsed stylesheet: rules in source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Stylesheet {
    pub rules: Vec<Rule>,
}

/// One rule block: a selector list and its declarations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    /// Never empty
    pub selectors: Vec<Selector>,
    pub declarations: Vec<Declaration>,
}

/// A single selector, possibly the tail of a descendant chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Selector {
    /// `node`, `way`, `relation`, `area`, `line`, `canvas`, `*`, or empty for
    /// a selector made only of conditions, pseudo-classes or classes
    pub selector_type: String,
    /// Layer name from `::layer`
    pub layer: Option<String>,
    /// Minimum zoom, 0 when unspecified
    pub zoom_min: u32,
    /// Maximum zoom, 0 meaning unbounded
    pub zoom_max: u32,
    pub conditions: Vec<Condition>,
    pub pseudo_classes: Vec<String>,
    pub classes: Vec<String>,
    /// Ancestor in a descendant chain such as `relation[type=route] way`
    pub parent: Option<Box<Selector>>,
}

impl Selector {
    /// A selector with no type, conditions, pseudo-classes or classes matches
    /// nothing and ends a selector chain.
    pub(crate) fn is_empty(&self) -> bool {
        self.selector_type.is_empty()
            && self.conditions.is_empty()
            && self.pseudo_classes.is_empty()
            && self.classes.is_empty()
    }

    /// Iterate over the ancestors, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = &Selector> {
        std::iter::successors(self.parent.as_deref(), |s| s.parent.as_deref())
    }

    /// Number of selectors in the chain, including this one.
    pub fn chain_len(&self) -> usize {
        1 + self.ancestors().count()
    }
}

/// Comparison operator of a tag condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Operator {
    /// `[key]`
    Exists,
    /// `[!key]`
    NotExists,
    /// `=`
    Eq,
    /// `!=`
    NotEq,
    /// `=~`
    Match,
    /// `!~`
    NotMatch,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Le,
    /// `>=`
    Ge,
}

impl Operator {
    /// The textual form; empty for [`Operator::Exists`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Exists => "",
            Operator::NotExists => "!",
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::Match => "=~",
            Operator::NotMatch => "!~",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Le => "<=",
            Operator::Ge => ">=",
        }
    }

    /// Map a comparison token to an operator.
    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "=" => Operator::Eq,
            "!=" => Operator::NotEq,
            "=~" => Operator::Match,
            "!~" => Operator::NotMatch,
            "<" => Operator::Lt,
            ">" => Operator::Gt,
            "<=" => Operator::Le,
            ">=" => Operator::Ge,
            _ => return None,
        })
    }

    pub fn is_regex(&self) -> bool {
        matches!(self, Operator::Match | Operator::NotMatch)
    }
}

/// A compiled regex compared by pattern.
#[derive(Debug, Clone)]
pub struct WrappedRegex(pub Regex);

impl PartialEq for WrappedRegex {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_str() == other.0.as_str()
    }
}

impl std::ops::Deref for WrappedRegex {
    type Target = Regex;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A tag filter such as `[highway=primary]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    /// Identifier, unquoted string, or `@`-prefixed meta attribute
    pub key: String,
    pub operator: Operator,
    /// Raw value text; regex literals keep their `/` delimiters
    pub value: String,
    /// Compiled pattern for `=~` and `!~`
    #[serde(skip)]
    pub regex: Option<WrappedRegex>,
}

/// A `property: value` pair, or a synthetic `set-class` / `set-tag:<name>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Declaration {
    pub property: String,
    pub value: Value,
}
