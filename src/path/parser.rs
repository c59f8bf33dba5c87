//! Parser for JSONPath expressions.
//!
//! Turns an expression string into a sequence of [`Step`]s. The filter
//! sub-language is parsed into an AST here as well; evaluation happens in
//! [`eval`](super::eval).

use crate::value::JsonValue;

use super::expr::{CompareOp, FilterExpr, Operand, PathStep, Selector, Step};

/// Error that occurs while parsing an expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    fn new(message: impl Into<String>, position: usize) -> Self {
        ParseError {
            message: message.into(),
            position,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "jsonpath parse error at position {}: {}",
            self.position, self.message
        )
    }
}

impl std::error::Error for ParseError {}

/// Parse an expression into steps. The expression must begin with `$`.
pub fn parse_expression(input: &str) -> Result<Vec<Step>, ParseError> {
    let mut parser = Parser { input, pos: 0 };

    parser.skip_ws();
    if !parser.eat('$') {
        return Err(parser.error("expected '$' at start"));
    }

    let mut steps = Vec::new();
    loop {
        parser.skip_ws();
        if parser.is_eof() {
            break;
        }
        steps.push(parser.parse_step()?);
    }
    Ok(steps)
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, literal: &str) -> bool {
        if self.input[self.pos..].starts_with(literal) {
            self.pos += literal.len();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.next();
        }
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.pos)
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        self.skip_ws();
        match self.peek() {
            Some(c) if c == expected => {
                self.next();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{expected}', found '{c}'"))),
            None => Err(self.error(format!("expected '{expected}', found end of input"))),
        }
    }

    // ---- steps and selectors ----

    fn parse_step(&mut self) -> Result<Step, ParseError> {
        if self.eat('.') {
            let recursive = self.eat('.');
            let selector = if self.eat('*') {
                Selector::Wildcard
            } else if self.peek() == Some('[') {
                // `..[...]`: subscript applied to the descendant set.
                if !recursive {
                    return Err(self.error("expected property name after '.'"));
                }
                self.next();
                self.parse_subscript()?
            } else {
                let what = if recursive { "'..'" } else { "'.'" };
                let name = self
                    .parse_identifier()
                    .ok_or_else(|| self.error(format!("expected property name after {what}")))?;
                Selector::Member(name)
            };
            Ok(Step {
                recursive,
                selector,
            })
        } else if self.eat('[') {
            Ok(Step {
                recursive: false,
                selector: self.parse_subscript()?,
            })
        } else {
            let c = self.peek().unwrap_or('\0');
            Err(self.error(format!("unexpected character '{c}'")))
        }
    }

    /// Parse the interior of `[...]` (the opening bracket is consumed).
    fn parse_subscript(&mut self) -> Result<Selector, ParseError> {
        self.skip_ws();

        if self.eat('*') {
            self.expect(']')?;
            return Ok(Selector::Wildcard);
        }

        if self.eat('?') {
            self.expect('(')?;
            let expr = self.parse_filter_expr()?;
            self.expect(')')?;
            self.expect(']')?;
            return Ok(Selector::Filter(expr));
        }

        if matches!(self.peek(), Some('\'' | '"')) {
            let mut names = vec![self.parse_quoted()?];
            self.skip_ws();
            while self.eat(',') {
                self.skip_ws();
                names.push(self.parse_quoted()?);
                self.skip_ws();
            }
            self.expect(']')?;
            return Ok(Selector::MemberUnion(names));
        }

        // Index, index union, or slice.
        let start = self.parse_int()?;
        self.skip_ws();

        if self.eat(':') {
            self.skip_ws();
            let mut end = None;
            if !matches!(self.peek(), Some(']' | ':')) {
                end = Some(self.parse_int()?);
                self.skip_ws();
            }
            let mut step = 1;
            if self.eat(':') {
                self.skip_ws();
                step = self.parse_int()?;
            }
            self.expect(']')?;
            return Ok(Selector::Slice { start, end, step });
        }

        let mut indices = vec![start];
        while self.eat(',') {
            self.skip_ws();
            indices.push(self.parse_int()?);
            self.skip_ws();
        }
        self.expect(']')?;
        Ok(Selector::IndexUnion(indices))
    }

    /// Identifier: letter or underscore, then letters, digits, underscores.
    fn parse_identifier(&mut self) -> Option<String> {
        let start = self.pos;
        match self.peek() {
            Some(c) if c.is_alphabetic() || c == '_' => {
                self.next();
            }
            _ => return None,
        }
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.next();
        }
        Some(self.input[start..self.pos].to_string())
    }

    /// Quoted name: `'...'` or `"..."`, with `\x` unescaping to `x`.
    fn parse_quoted(&mut self) -> Result<String, ParseError> {
        let quote = match self.next() {
            Some(c @ ('\'' | '"')) => c,
            _ => return Err(self.error("expected quoted name")),
        };
        let mut out = String::new();
        loop {
            match self.next() {
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.next() {
                    Some(escaped) => out.push(escaped),
                    None => return Err(self.error("unterminated quoted name")),
                },
                Some(c) => out.push(c),
                None => return Err(self.error("unterminated quoted name")),
            }
        }
    }

    /// Signed decimal integer.
    fn parse_int(&mut self) -> Result<i64, ParseError> {
        let negative = self.eat('-');
        if !matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            return Err(self.error("expected integer"));
        }
        let mut value: i64 = 0;
        while let Some(c) = self.peek() {
            match c.to_digit(10) {
                Some(d) => {
                    value = value.saturating_mul(10).saturating_add(i64::from(d));
                    self.next();
                }
                None => break,
            }
        }
        Ok(if negative { -value } else { value })
    }

    // ---- filter sub-language ----

    fn parse_filter_expr(&mut self) -> Result<FilterExpr, ParseError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<FilterExpr, ParseError> {
        let mut left = self.parse_and()?;
        loop {
            self.skip_ws();
            if self.eat_str("||") {
                let right = self.parse_and()?;
                left = FilterExpr::Or(Box::new(left), Box::new(right));
            } else {
                return Ok(left);
            }
        }
    }

    fn parse_and(&mut self) -> Result<FilterExpr, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            self.skip_ws();
            if self.eat_str("&&") {
                let right = self.parse_unary()?;
                left = FilterExpr::And(Box::new(left), Box::new(right));
            } else {
                return Ok(left);
            }
        }
    }

    fn parse_unary(&mut self) -> Result<FilterExpr, ParseError> {
        self.skip_ws();
        if self.eat('!') {
            let inner = self.parse_unary()?;
            return Ok(FilterExpr::Not(Box::new(inner)));
        }
        if self.eat('(') {
            let inner = self.parse_filter_expr()?;
            self.expect(')')?;
            return Ok(inner);
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<FilterExpr, ParseError> {
        let left = self.parse_operand()?;
        self.skip_ws();

        let op = if self.eat_str("==") {
            CompareOp::Eq
        } else if self.eat_str("!=") {
            CompareOp::Ne
        } else if self.eat_str(">=") {
            CompareOp::Ge
        } else if self.eat_str("<=") {
            CompareOp::Le
        } else if self.eat('>') {
            CompareOp::Gt
        } else if self.eat('<') {
            CompareOp::Lt
        } else {
            return Ok(FilterExpr::Truthy(left));
        };

        self.skip_ws();
        let right = self.parse_operand()?;
        Ok(FilterExpr::Compare { op, left, right })
    }

    fn parse_operand(&mut self) -> Result<Operand, ParseError> {
        self.skip_ws();
        if self.eat('@') {
            return Ok(Operand::Current(self.parse_continuation()?));
        }
        self.parse_literal().map(Operand::Literal)
    }

    /// Path continuation after `@`: `.name`, `['name']`, `[n]`.
    fn parse_continuation(&mut self) -> Result<Vec<PathStep>, ParseError> {
        let mut steps = Vec::new();
        loop {
            if self.eat('.') {
                // `@..` is not part of the dialect: recursive descent is
                // only a top-level selector.
                if self.peek() == Some('.') {
                    return Err(
                        self.error("recursive descent is not supported inside filters")
                    );
                }
                let name = self
                    .parse_identifier()
                    .ok_or_else(|| self.error("expected property name after '.'"))?;
                steps.push(PathStep::Member(name));
            } else if self.eat('[') {
                self.skip_ws();
                if matches!(self.peek(), Some('\'' | '"')) {
                    let name = self.parse_quoted()?;
                    self.expect(']')?;
                    steps.push(PathStep::Member(name));
                } else {
                    let index = self.parse_int()?;
                    self.expect(']')?;
                    steps.push(PathStep::Index(index));
                }
            } else {
                return Ok(steps);
            }
        }
    }

    fn parse_literal(&mut self) -> Result<JsonValue, ParseError> {
        self.skip_ws();
        if self.eat_str("true") {
            return Ok(JsonValue::Bool(true));
        }
        if self.eat_str("false") {
            return Ok(JsonValue::Bool(false));
        }
        if self.eat_str("null") {
            return Ok(JsonValue::Null);
        }
        if matches!(self.peek(), Some('\'' | '"')) {
            return Ok(JsonValue::String(self.parse_quoted()?));
        }

        // Decimal number with optional sign and fraction.
        let start = self.pos;
        if matches!(self.peek(), Some('+' | '-')) {
            self.next();
        }
        if !matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            return Err(self.error("expected literal or '@'"));
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.next();
        }
        if self.eat('.') {
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.next();
            }
        }
        let text = &self.input[start..self.pos];
        let number: f64 = text
            .parse()
            .map_err(|_| self.error(format!("invalid number '{text}'")))?;
        Ok(JsonValue::Number(number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dot_and_bracket_members() {
        let steps = parse_expression("$.store.book").unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].selector, Selector::Member("store".into()));
        assert!(!steps[0].recursive);

        let steps = parse_expression("$['a','b']").unwrap();
        assert_eq!(
            steps[0].selector,
            Selector::MemberUnion(vec!["a".into(), "b".into()])
        );
    }

    #[test]
    fn parses_recursive_descent() {
        let steps = parse_expression("$..author").unwrap();
        assert!(steps[0].recursive);
        assert_eq!(steps[0].selector, Selector::Member("author".into()));

        let steps = parse_expression("$..*").unwrap();
        assert_eq!(steps[0].selector, Selector::Wildcard);

        let steps = parse_expression("$..[0]").unwrap();
        assert_eq!(steps[0].selector, Selector::IndexUnion(vec![0]));
    }

    #[test]
    fn parses_indices_unions_and_slices() {
        let steps = parse_expression("$[0]").unwrap();
        assert_eq!(steps[0].selector, Selector::IndexUnion(vec![0]));

        let steps = parse_expression("$[0,2,4]").unwrap();
        assert_eq!(steps[0].selector, Selector::IndexUnion(vec![0, 2, 4]));

        let steps = parse_expression("$[1:3]").unwrap();
        assert_eq!(
            steps[0].selector,
            Selector::Slice {
                start: 1,
                end: Some(3),
                step: 1
            }
        );

        let steps = parse_expression("$[1:]").unwrap();
        assert_eq!(
            steps[0].selector,
            Selector::Slice {
                start: 1,
                end: None,
                step: 1
            }
        );

        let steps = parse_expression("$[0:10:2]").unwrap();
        assert_eq!(
            steps[0].selector,
            Selector::Slice {
                start: 0,
                end: Some(10),
                step: 2
            }
        );
    }

    #[test]
    fn parses_filters() {
        let steps = parse_expression("$[?(@.price < 10)]").unwrap();
        let Selector::Filter(expr) = &steps[0].selector else {
            panic!("expected filter");
        };
        assert_eq!(
            *expr,
            FilterExpr::Compare {
                op: CompareOp::Lt,
                left: Operand::Current(vec![PathStep::Member("price".into())]),
                right: Operand::Literal(JsonValue::number(10.0)),
            }
        );
    }

    #[test]
    fn filter_precedence_not_binds_tightest() {
        let steps = parse_expression("$[?(!@.a && @.b || @.c)]").unwrap();
        let Selector::Filter(expr) = &steps[0].selector else {
            panic!("expected filter");
        };
        // ((!a && b) || c)
        assert!(matches!(expr, FilterExpr::Or(left, _)
            if matches!(**left, FilterExpr::And(..))));
    }

    #[test]
    fn filter_parses_parenthesized_groups() {
        let steps = parse_expression("$[?(@.a && (@.b || @.c))]").unwrap();
        let Selector::Filter(expr) = &steps[0].selector else {
            panic!("expected filter");
        };
        assert!(matches!(expr, FilterExpr::And(_, right)
            if matches!(**right, FilterExpr::Or(..))));
    }

    #[test]
    fn rejects_bad_expressions() {
        assert!(parse_expression("store.book").is_err());
        assert!(parse_expression("$.").is_err());
        assert!(parse_expression("$[").is_err());
        assert!(parse_expression("$['a'").is_err());
        assert!(parse_expression("$[1,]").is_err());
        assert!(parse_expression("$[?(@.a]").is_err());
        assert!(parse_expression("$.4name").is_err());
    }

    #[test]
    fn rejects_recursive_descent_inside_filters() {
        assert!(parse_expression("$[?(@..price == 1)]").is_err());
    }

    #[test]
    fn negative_indices_parse_but_are_flagged_later() {
        // The parser accepts them; the evaluator enforces the failure mode.
        let steps = parse_expression("$[-1]").unwrap();
        assert_eq!(steps[0].selector, Selector::IndexUnion(vec![-1]));
    }
}
