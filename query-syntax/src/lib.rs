//! # Boolean query syntax for table search
//!
//! `query-syntax` turns what a user types in the search box into a flat list
//! of [`Token`]s and then into a postfix program that an evaluator can run
//! with a plain stack. The language is deliberately small:
//!
//! - bare words (`premium`, `sku-42`, `a.b@c`),
//! - double-quoted phrases (`"active user"`), kept verbatim,
//! - `AND`, `OR`, `NOT` in any letter case,
//! - parentheses for grouping,
//! - whitespace or commas between terms.
//!
//! ## Example
//! ```
//! use query_syntax::{compile_to_postfix, tokenize};
//!
//! let tokens = tokenize("premium AND NOT inactive OR standard");
//! let postfix = compile_to_postfix(&tokens).unwrap();
//! let values: Vec<&str> = postfix.iter().map(|token| token.value()).collect();
//! assert_eq!(values, ["premium", "inactive", "NOT", "AND", "standard", "OR"]);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Splits a raw query into operand and operator tokens.
///
/// Tokenizing never fails: anything that is not an operator becomes an
/// operand, and structural problems surface later from
/// [`compile_to_postfix`] or from the evaluator.
///
/// ```
/// use query_syntax::{tokenize, Token};
///
/// let tokens = tokenize("premium AND \"active user\"");
/// assert_eq!(tokens[2], Token::operand("active user"));
/// ```
pub fn tokenize(input: &str) -> Vec<Token> {
    Lexer::new(input).collect()
}

/// Boolean connectives and grouping delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
    #[serde(rename = "NOT")]
    Not,
    #[serde(rename = "(")]
    Open,
    #[serde(rename = ")")]
    Close,
}

impl Operator {
    const KEYWORDS: [(&'static str, Operator); 3] = [
        ("AND", Operator::And),
        ("OR", Operator::Or),
        ("NOT", Operator::Not),
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Not => "NOT",
            Operator::Open => "(",
            Operator::Close => ")",
        }
    }

    /// Binding strength used by the shunting-yard pass. Parentheses never
    /// compete on precedence and report zero.
    pub fn precedence(self) -> u8 {
        match self {
            Operator::Not => 3,
            Operator::And => 2,
            Operator::Or => 1,
            Operator::Open | Operator::Close => 0,
        }
    }

    pub fn is_right_associative(self) -> bool {
        matches!(self, Operator::Not)
    }

    /// Number of values the operator consumes when a postfix program runs.
    pub fn arity(self) -> usize {
        match self {
            Operator::Not => 1,
            Operator::And | Operator::Or => 2,
            Operator::Open | Operator::Close => 0,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One lexical unit of a query.
///
/// Serializes as `{"type": "operand", "value": "..."}` so front ends that
/// display parsed queries get the same shape for both variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Token {
    /// A keyword or phrase to look up in cells. Phrases have their quotes
    /// removed.
    Operand(String),
    Operator(Operator),
}

impl Token {
    pub fn operand(value: impl Into<String>) -> Self {
        Token::Operand(value.into())
    }

    pub fn value(&self) -> &str {
        match self {
            Token::Operand(value) => value,
            Token::Operator(op) => op.as_str(),
        }
    }

    pub fn is_operand(&self) -> bool {
        matches!(self, Token::Operand(_))
    }

    pub fn as_operand(&self) -> Option<&str> {
        match self {
            Token::Operand(value) => Some(value),
            Token::Operator(_) => None,
        }
    }

    pub fn as_operator(&self) -> Option<Operator> {
        match self {
            Token::Operand(_) => None,
            Token::Operator(op) => Some(*op),
        }
    }
}

/// Operand values in query order, operators dropped. This is the list the
/// highlight pass works from.
pub fn operand_values(tokens: &[Token]) -> Vec<&str> {
    tokens.iter().filter_map(Token::as_operand).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// A `)` without a matching `(`, or a `(` still open at the end of the
    /// query. `position` is the index of the offending token.
    UnbalancedParentheses { position: usize },
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::UnbalancedParentheses { position } => {
                write!(f, "parentheses unbalanced (at token {position})")
            }
        }
    }
}

impl std::error::Error for CompileError {}

/// Reorders infix tokens into postfix form with the shunting-yard algorithm.
///
/// `NOT` binds tightest and is right-associative, then `AND`, then `OR`.
/// Operands are copied through in their original order and no implicit
/// operator is ever inserted between adjacent operands; the evaluator is the
/// one that rejects such programs.
pub fn compile_to_postfix(tokens: &[Token]) -> Result<Vec<Token>, CompileError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<(usize, Operator)> = Vec::new();

    for (position, token) in tokens.iter().enumerate() {
        match token {
            Token::Operand(_) => output.push(token.clone()),
            Token::Operator(Operator::Open) => stack.push((position, Operator::Open)),
            Token::Operator(Operator::Close) => loop {
                match stack.pop() {
                    Some((_, Operator::Open)) => break,
                    Some((_, op)) => output.push(Token::Operator(op)),
                    None => return Err(CompileError::UnbalancedParentheses { position }),
                }
            },
            Token::Operator(incoming) => {
                while let Some(&(_, top)) = stack.last() {
                    if !pops_before(top, *incoming) {
                        break;
                    }
                    stack.pop();
                    output.push(Token::Operator(top));
                }
                stack.push((position, *incoming));
            }
        }
    }

    while let Some((position, op)) = stack.pop() {
        if matches!(op, Operator::Open | Operator::Close) {
            return Err(CompileError::UnbalancedParentheses { position });
        }
        output.push(Token::Operator(op));
    }

    Ok(output)
}

// `(` acts as a floor: nothing below it is popped by an operator.
fn pops_before(top: Operator, incoming: Operator) -> bool {
    if top == Operator::Open {
        return false;
    }
    top.precedence() > incoming.precedence()
        || (top.precedence() == incoming.precedence() && !incoming.is_right_associative())
}

/// Hand-rolled scanner. The grammar is a handful of alternatives tried in a
/// fixed order at each token start: quoted phrase, parenthesis, keyword,
/// bare word.
struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn next_token(&mut self) -> Option<Token> {
        loop {
            self.skip_separators();
            let ch = self.peek_char()?;
            match ch {
                '(' => {
                    self.advance_char();
                    return Some(Token::Operator(Operator::Open));
                }
                ')' => {
                    self.advance_char();
                    return Some(Token::Operator(Operator::Close));
                }
                '"' => {
                    if let Some(phrase) = self.parse_phrase() {
                        if phrase.trim().is_empty() {
                            continue;
                        }
                        return Some(Token::Operand(phrase.to_string()));
                    }
                    // Unterminated or empty quotes are read as a bare word.
                }
                _ => {
                    if let Some(op) = self.consume_keyword() {
                        return Some(Token::Operator(op));
                    }
                }
            }

            let word = strip_quotes(self.parse_word());
            if word.trim().is_empty() {
                continue;
            }
            return Some(Token::Operand(word.to_string()));
        }
    }

    // A phrase needs a closing quote and at least one character between the
    // quotes. Nothing inside is escaped.
    fn parse_phrase(&mut self) -> Option<&'a str> {
        let rest = &self.remaining()[1..];
        let end = rest.find('"')?;
        if end == 0 {
            return None;
        }
        self.pos += 1 + end + 1;
        Some(&rest[..end])
    }

    fn parse_word(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(ch) = self.peek_char() {
            if is_word_breaker(ch) {
                break;
            }
            self.advance_char();
        }
        &self.input[start..self.pos]
    }

    // Keywords are recognised when the next character cannot continue an
    // ASCII identifier, so `ANDROID` stays a word while `AND(` is `AND`.
    fn consume_keyword(&mut self) -> Option<Operator> {
        let rest = self.remaining();
        for (keyword, op) in Operator::KEYWORDS {
            if rest.len() < keyword.len() || !rest.is_char_boundary(keyword.len()) {
                continue;
            }
            if !rest[..keyword.len()].eq_ignore_ascii_case(keyword) {
                continue;
            }
            if let Some(next) = rest[keyword.len()..].chars().next() {
                if next.is_ascii_alphanumeric() || next == '_' {
                    continue;
                }
            }
            self.pos += keyword.len();
            return Some(op);
        }
        None
    }

    fn skip_separators(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() || ch == ',' {
                self.advance_char();
            } else {
                break;
            }
        }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance_char(&mut self) {
        if let Some(ch) = self.peek_char() {
            self.pos += ch.len_utf8();
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

fn is_word_breaker(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, ',' | '(' | ')')
}

fn strip_quotes(word: &str) -> &str {
    if word.len() >= 2 && word.starts_with('"') && word.ends_with('"') {
        &word[1..word.len() - 1]
    } else {
        word
    }
}
