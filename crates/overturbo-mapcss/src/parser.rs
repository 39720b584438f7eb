//! Recursive-descent MapCSS parser
//!
//! A single forward-only cursor walks the input, tracking line and column
//! for diagnostics. The grammar is:
//!
//! ```text
//! stylesheet  := (comment | at-rule | rule)*
//! rule        := selector ("," selector)* "{" declaration* "}"
//! selector    := single (whitespace single)*        descendant chain
//! single      := type? ("::" layer)? ("|z" zoom)? modifier*
//! modifier    := "[" condition "]" | ":" pseudo | "." class | "::" layer
//! declaration := "set" set-body ";"? | ident ":" value ";"?
//! ```

use regex::Regex;

use crate::ast::{Condition, Declaration, Operator, Rule, Selector, Stylesheet, WrappedRegex};
use crate::color::Color;
use crate::error::{MapCssError, MapCssResult};
use crate::value::{Value, ValueKind};

/// Parse a MapCSS stylesheet.
pub fn parse_mapcss(input: &str) -> MapCssResult<Stylesheet> {
    Parser::new(input).parse()
}

impl Stylesheet {
    /// Parse a MapCSS stylesheet.
    pub fn parse(input: &str) -> MapCssResult<Self> {
        parse_mapcss(input)
    }
}

pub(crate) struct Parser<'a> {
    input: &'a str,
    /// Byte offset of the cursor
    pos: usize,
    line: usize,
    col: usize,
}

fn is_ident(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '@'
}

fn is_type_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '*'
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

impl<'a> Parser<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Parser {
            input,
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    // ------------------------------------------------------------------
    // Cursor
    // ------------------------------------------------------------------

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_is(&self, c: char) -> bool {
        self.peek() == Some(c)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
            self.pos += c.len_utf8();
        }
    }

    fn advance_by(&mut self, chars: usize) {
        for _ in 0..chars {
            self.advance();
        }
    }

    /// Consume characters while `pred` holds and return them.
    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.advance();
        }
        &self.input[start..self.pos]
    }

    fn error(&self, message: impl Into<String>) -> MapCssError {
        MapCssError::at(self.line, self.col, message)
    }

    fn expect(&mut self, c: char) -> MapCssResult<()> {
        if self.peek_is(c) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", c)))
        }
    }

    fn skip_whitespace(&mut self) {
        self.take_while(is_space);
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            self.skip_whitespace();
            if self.rest().starts_with("/*") {
                self.skip_block_comment();
            } else if self.rest().starts_with("//") {
                self.take_while(|c| c != '\n');
            } else {
                break;
            }
        }
    }

    fn skip_block_comment(&mut self) {
        self.advance_by(2);
        while !self.at_end() {
            if self.rest().starts_with("*/") {
                self.advance_by(2);
                return;
            }
            self.advance();
        }
    }

    /// Skip `@import ...;` or `@name ... { ... }` including nested blocks.
    fn skip_at_rule(&mut self) {
        self.take_while(|c| c != ';' && c != '{');

        match self.peek() {
            Some('{') => {
                self.advance();
                let mut depth = 1usize;
                while depth > 0 {
                    match self.peek() {
                        Some('{') => depth += 1,
                        Some('}') => depth -= 1,
                        Some(_) => {}
                        None => break,
                    }
                    self.advance();
                }
            }
            Some(_) => self.advance(),
            None => {}
        }
    }

    // ------------------------------------------------------------------
    // Rules and selectors
    // ------------------------------------------------------------------

    pub(crate) fn parse(&mut self) -> MapCssResult<Stylesheet> {
        let mut rules = Vec::new();

        loop {
            self.skip_whitespace_and_comments();
            if self.at_end() {
                break;
            }

            if self.peek_is('@') {
                self.skip_at_rule();
                continue;
            }

            rules.push(self.parse_rule()?);
        }

        Ok(Stylesheet { rules })
    }

    fn parse_rule(&mut self) -> MapCssResult<Rule> {
        let selectors = self.parse_selectors()?;
        if selectors.is_empty() {
            return Err(self.error("no selectors found"));
        }

        self.skip_whitespace_and_comments();
        self.expect('{')?;

        let declarations = self.parse_declarations()?;

        self.skip_whitespace_and_comments();
        self.expect('}')?;

        Ok(Rule {
            selectors,
            declarations,
        })
    }

    fn parse_selectors(&mut self) -> MapCssResult<Vec<Selector>> {
        let mut selectors = Vec::new();

        loop {
            self.skip_whitespace_and_comments();
            if self.at_end() || self.peek_is('{') {
                break;
            }

            selectors.push(self.parse_selector()?);

            self.skip_whitespace_and_comments();
            if self.peek_is(',') {
                self.advance();
                continue;
            }
            break;
        }

        Ok(selectors)
    }

    /// Parse a descendant chain and link it so the last selector is returned
    /// with every earlier one as its ancestor.
    fn parse_selector(&mut self) -> MapCssResult<Selector> {
        self.skip_whitespace_and_comments();
        if self.at_end() {
            return Err(self.error("unexpected end of input"));
        }

        let mut chain = Vec::new();
        while let Some(sel) = self.parse_single_selector()? {
            chain.push(sel);

            self.skip_whitespace_and_comments();
            match self.peek() {
                Some(c) if is_type_start(c) => continue,
                _ => break,
            }
        }

        let mut chain = chain.into_iter();
        let mut current = chain
            .next()
            .ok_or_else(|| self.error("no selector parsed"))?;
        for mut next in chain {
            next.parent = Some(Box::new(current));
            current = next;
        }

        Ok(current)
    }

    /// Parse one selector without combinators. `None` ends the chain: end of
    /// input, a character that cannot start a selector, or an empty selector.
    fn parse_single_selector(&mut self) -> MapCssResult<Option<Selector>> {
        self.skip_whitespace_and_comments();

        let mut sel = Selector::default();
        match self.peek() {
            None | Some('{') | Some(',') => return Ok(None),
            Some('*') => {
                sel.selector_type = "*".to_string();
                self.advance();
            }
            Some(c) if c.is_ascii_alphabetic() => {
                sel.selector_type = self.parse_ident().to_string();
            }
            Some('[') | Some(':') | Some('.') | Some('|') => {}
            Some(_) => return Ok(None),
        }

        if self.rest().starts_with("::") {
            self.parse_layer(&mut sel);
        }

        self.parse_zoom_range(&mut sel);
        self.parse_modifiers(&mut sel)?;

        if sel.is_empty() {
            return Ok(None);
        }
        Ok(Some(sel))
    }

    /// `::layer`, accepted right after the type or among the modifiers.
    fn parse_layer(&mut self, sel: &mut Selector) {
        self.advance_by(2);
        sel.layer = Some(self.parse_ident().to_string());
    }

    /// `|zN`, `|zN-M` or `|zN-`.
    fn parse_zoom_range(&mut self, sel: &mut Selector) {
        if !self.peek_is('|') {
            return;
        }
        self.advance();

        if !self.peek_is('z') {
            return;
        }
        self.advance();

        let zoom = self.parse_number();
        if let Some((min, max)) = zoom.split_once('-') {
            sel.zoom_min = min.parse().unwrap_or(0);
            if !max.is_empty() {
                sel.zoom_max = max.parse().unwrap_or(0);
            }
            return;
        }

        let level = zoom.parse().unwrap_or(0);
        sel.zoom_min = level;
        sel.zoom_max = level;

        if self.peek_is('-') {
            self.advance();
            let max = self.parse_number();
            sel.zoom_max = if max.is_empty() {
                0
            } else {
                max.parse().unwrap_or(0)
            };
        }
    }

    fn parse_modifiers(&mut self, sel: &mut Selector) -> MapCssResult<()> {
        loop {
            match self.peek() {
                Some('[') => {
                    let cond = self.parse_condition()?;
                    sel.conditions.push(cond);
                }
                Some(':') if self.rest().starts_with("::") => self.parse_layer(sel),
                Some(':') => {
                    self.advance();
                    let pseudo = self.parse_ident();
                    if !pseudo.is_empty() {
                        sel.pseudo_classes.push(pseudo.to_string());
                    }
                }
                Some('.') => {
                    self.advance();
                    let class = self.parse_ident();
                    if !class.is_empty() {
                        sel.classes.push(class.to_string());
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn parse_condition(&mut self) -> MapCssResult<Condition> {
        self.expect('[')?;
        self.skip_whitespace();

        let mut operator = Operator::Exists;
        if self.peek_is('!') {
            self.advance();
            operator = Operator::NotExists;
        }

        let key = self.parse_key_or_string();
        self.skip_whitespace();

        let mut value = String::new();
        let mut regex = None;
        if !self.at_end() && !self.peek_is(']') {
            if let Some(op) = self.parse_operator() {
                operator = op;
                self.skip_whitespace();
                value = self.parse_value_string();
                if op.is_regex() {
                    regex = Some(self.compile_regex(&value)?);
                }
            }
        }

        self.skip_whitespace();
        self.expect(']')?;

        Ok(Condition {
            key,
            operator,
            value,
            regex,
        })
    }

    fn compile_regex(&self, value: &str) -> MapCssResult<WrappedRegex> {
        let pattern = if value.len() >= 2 && value.starts_with('/') && value.ends_with('/') {
            &value[1..value.len() - 1]
        } else {
            value
        };

        Regex::new(pattern)
            .map(WrappedRegex)
            .map_err(|err| self.error(format!("invalid regex: {}", err)))
    }

    fn parse_operator(&mut self) -> Option<Operator> {
        let rest = self.rest();
        for len in [2, 1] {
            if let Some(op) = rest.get(..len).and_then(Operator::from_token) {
                self.advance_by(len);
                return Some(op);
            }
        }
        None
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    fn parse_declarations(&mut self) -> MapCssResult<Vec<Declaration>> {
        let mut declarations = Vec::new();

        loop {
            self.skip_whitespace_and_comments();
            if self.at_end() || self.peek_is('}') {
                break;
            }

            if let Some(decl) = self.parse_declaration()? {
                declarations.push(decl);
            }
        }

        Ok(declarations)
    }

    fn starts_with_set(&self) -> bool {
        self.rest()
            .strip_prefix("set")
            .and_then(|after| after.chars().next())
            .is_some_and(|c| !is_ident(c))
    }

    /// Returns `None` for a stray `;`.
    fn parse_declaration(&mut self) -> MapCssResult<Option<Declaration>> {
        self.skip_whitespace_and_comments();

        if self.starts_with_set() {
            return self.parse_set_declaration().map(Some);
        }

        let property = self.parse_ident();
        if property.is_empty() {
            if self.peek_is(';') {
                self.advance();
                return Ok(None);
            }
            return Err(self.error("expected property name"));
        }

        self.skip_whitespace();
        self.expect(':')?;
        self.skip_whitespace();

        let value = self.parse_value()?;

        self.skip_whitespace();
        if self.peek_is(';') {
            self.advance();
        }

        Ok(Some(Declaration {
            property: property.to_string(),
            value,
        }))
    }

    /// `set .class;`, `set tag;` or `set tag=value;`.
    fn parse_set_declaration(&mut self) -> MapCssResult<Declaration> {
        self.advance_by(3);
        self.skip_whitespace();

        let declaration = if self.peek_is('.') {
            self.advance();
            let class = self.parse_ident();
            Declaration {
                property: "set-class".to_string(),
                value: Value::string(class),
            }
        } else {
            let tag = self.parse_ident();
            self.skip_whitespace();

            let value = if self.peek_is('=') {
                self.advance();
                self.parse_value_string()
            } else {
                "yes".to_string()
            };

            Declaration {
                property: format!("set-tag:{}", tag),
                value: Value::string(value),
            }
        };

        self.skip_whitespace();
        if self.peek_is(';') {
            self.advance();
        }

        Ok(declaration)
    }

    // ------------------------------------------------------------------
    // Values
    // ------------------------------------------------------------------

    pub(crate) fn parse_value(&mut self) -> MapCssResult<Value> {
        self.skip_whitespace();
        if self.at_end() {
            return Ok(Value::string(""));
        }

        let rest = self.rest();
        if rest.starts_with("url(") {
            self.advance_by(4);
            let content = self.parse_until_closing_paren();
            return Ok(Value::new(
                format!("url({})", content),
                ValueKind::Url(trim_quotes(content).to_string()),
            ));
        }
        if rest.starts_with("eval(") {
            self.advance_by(5);
            let content = self.parse_until_closing_paren();
            return Ok(Value::new(
                format!("eval({})", content),
                ValueKind::Eval(trim_quotes(content).to_string()),
            ));
        }
        if rest.starts_with("rgb(") {
            self.advance_by(4);
            return self.parse_functional_color("rgb", false);
        }
        if rest.starts_with("rgba(") {
            self.advance_by(5);
            return self.parse_functional_color("rgba", true);
        }
        if rest.starts_with('#') {
            return self.parse_hex_color();
        }

        let raw = self.take_while(|c| c != ';' && c != '}');
        Ok(Value::infer(raw.trim()))
    }

    fn parse_functional_color(&mut self, name: &str, with_alpha: bool) -> MapCssResult<Value> {
        let content = self.parse_until_closing_paren();
        let color =
            Color::from_components(content, with_alpha).map_err(|e| self.error(e.to_string()))?;
        Ok(Value::new(
            format!("{}({})", name, content),
            ValueKind::Color(color),
        ))
    }

    fn parse_hex_color(&mut self) -> MapCssResult<Value> {
        self.expect('#')?;
        let digits = self.take_while(|c| c.is_ascii_hexdigit());
        let color = Color::from_hex(digits).map_err(|e| self.error(e.to_string()))?;
        Ok(Value::new(format!("#{}", digits), ValueKind::Color(color)))
    }

    /// Consume up to the `)` matching an already consumed `(` and return the
    /// text in between. The closing paren is consumed but not returned.
    fn parse_until_closing_paren(&mut self) -> &'a str {
        let start = self.pos;
        let mut depth = 1usize;

        while let Some(c) = self.peek() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        let content = &self.input[start..self.pos];
                        self.advance();
                        return content;
                    }
                }
                _ => {}
            }
            self.advance();
        }

        &self.input[start..]
    }

    // ------------------------------------------------------------------
    // Tokens
    // ------------------------------------------------------------------

    fn parse_ident(&mut self) -> &'a str {
        self.take_while(is_ident)
    }

    fn parse_number(&mut self) -> &'a str {
        self.take_while(|c| c.is_ascii_digit() || c == '-' || c == '.')
    }

    fn parse_key_or_string(&mut self) -> String {
        self.skip_whitespace();
        match self.peek() {
            Some('"') | Some('\'') => self.parse_quoted_string(),
            _ => self.parse_ident().to_string(),
        }
    }

    /// Read a quoted string, resolving backslash escapes. An unterminated
    /// string runs to the end of input.
    fn parse_quoted_string(&mut self) -> String {
        let Some(quote) = self.peek() else {
            return String::new();
        };
        self.advance();

        let mut out = String::new();
        while let Some(c) = self.peek() {
            self.advance();
            if c == quote {
                break;
            }
            if c == '\\' {
                if let Some(escaped) = self.peek() {
                    out.push(escaped);
                    self.advance();
                    continue;
                }
            }
            out.push(c);
        }
        out
    }

    /// Read a `/regex/` literal verbatim, delimiters and escapes included.
    fn parse_regex_literal(&mut self) -> String {
        let start = self.pos;
        self.advance();

        while let Some(c) = self.peek() {
            self.advance();
            match c {
                '\\' => self.advance(),
                '/' => break,
                _ => {}
            }
        }

        self.input[start..self.pos].to_string()
    }

    fn parse_value_string(&mut self) -> String {
        self.skip_whitespace();
        match self.peek() {
            Some('"') | Some('\'') => self.parse_quoted_string(),
            Some('/') => self.parse_regex_literal(),
            Some(_) => self
                .take_while(|c| c != ']' && c != ';' && c != '}' && !is_space(c))
                .to_string(),
            None => String::new(),
        }
    }
}

fn trim_quotes(s: &str) -> &str {
    s.trim_matches(|c| c == '\'' || c == '"')
}
