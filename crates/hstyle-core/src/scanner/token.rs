//! Tokens within code spans.

use crate::span::{Pos, Span, SpanKind};
use serde::{Deserialize, Serialize};

use super::is_symbol_char;

/// Reserved words of the language.
pub const KEYWORDS: &[&str] = &[
    "case", "class", "data", "default", "deriving", "do", "else", "foreign", "if", "import", "in",
    "infix", "infixl", "infixr", "instance", "let", "mdo", "module", "newtype", "of", "then",
    "type", "where", "_",
];

/// Reserved operator symbols.
pub const RESERVED_OPS: &[&str] = &["..", ":", "::", "=", "\\", "|", "<-", "->", "@", "~", "=>"];

/// Case class of an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseClass {
    /// Starts with an uppercase letter (types, constructors, modules).
    Upper,
    /// Starts with a lowercase letter or underscore (values, functions).
    Lower,
    /// A user-definable operator symbol (`<+>`, `:|`).
    Operator,
}

/// Kind of literal token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiteralKind {
    /// Integer or floating point literal.
    Number,
    /// A whole string literal span.
    String,
    /// A whole character literal span.
    Char,
}

/// Classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// A (possibly qualified) name; the case class is taken from its last segment.
    Identifier(CaseClass),
    /// A reserved word.
    Keyword,
    /// A literal.
    Literal(LiteralKind),
    /// `(`, `)`, `[`, `]`, `{`, `}`, `,`, `;`, `` ` `` or a stray quote.
    Punctuation,
    /// A reserved operator such as `=`, `::` or `->`.
    Operator,
}

/// A lexical unit with its position and raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Classification.
    pub kind: TokenKind,
    /// Raw text.
    pub text: String,
    /// First character.
    pub start: Pos,
    /// Position just past the last character.
    pub end: Pos,
    /// Kind of the span the token came from.
    pub source: SpanKind,
}

impl Token {
    /// Returns true if the token is the given keyword.
    #[must_use]
    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == word
    }

    /// Returns true if the token is the given punctuation character.
    #[must_use]
    pub fn is_punct(&self, punct: &str) -> bool {
        self.kind == TokenKind::Punctuation && self.text == punct
    }

    /// Returns true if the token is the given reserved operator.
    #[must_use]
    pub fn is_op(&self, op: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == op
    }

    /// Returns the identifier case class, if the token is an identifier.
    #[must_use]
    pub fn case_class(&self) -> Option<CaseClass> {
        match self.kind {
            TokenKind::Identifier(class) => Some(class),
            _ => None,
        }
    }

    /// Returns the unqualified part of an identifier (`lookup` for `Map.lookup`).
    #[must_use]
    pub fn unqualified(&self) -> &str {
        match self.kind {
            TokenKind::Identifier(CaseClass::Upper | CaseClass::Lower) => {
                self.text.rsplit('.').next().unwrap_or(&self.text)
            }
            _ => &self.text,
        }
    }
}

/// Lexes code spans into tokens.
///
/// Each string or character literal span becomes a single literal token.
/// Comments and pragmas produce no tokens.
#[must_use]
pub fn tokenize(spans: &[Span]) -> Vec<Token> {
    let mut tokens = Vec::new();
    for span in spans {
        match span.kind {
            SpanKind::Code => Lexer::new(span).run(&mut tokens),
            SpanKind::StringLiteral | SpanKind::CharLiteral => {
                let literal = if span.kind == SpanKind::StringLiteral {
                    LiteralKind::String
                } else {
                    LiteralKind::Char
                };
                tokens.push(Token {
                    kind: TokenKind::Literal(literal),
                    text: span.text.clone(),
                    start: span.start,
                    end: span.end,
                    source: span.kind,
                });
            }
            _ => {}
        }
    }
    tokens
}

struct Lexer {
    chars: Vec<char>,
    current: usize,
    pos: Pos,
}

impl Lexer {
    fn new(span: &Span) -> Self {
        Self {
            chars: span.text.chars().collect(),
            current: 0,
            pos: span.start,
        }
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.current + ahead).copied()
    }

    fn advance(&mut self) {
        if let Some(&c) = self.chars.get(self.current) {
            self.pos = self.pos.advance(c);
            self.current += 1;
        }
    }

    fn advance_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek_at(0).is_some_and(&pred) {
            self.advance();
        }
    }

    fn run(mut self, tokens: &mut Vec<Token>) {
        while let Some(c) = self.peek_at(0) {
            if c.is_whitespace() {
                self.advance();
                continue;
            }
            let start = self.current;
            let start_pos = self.pos;
            let kind = self.next_kind(c);
            let text: String = self.chars[start..self.current].iter().collect();
            tokens.push(Token {
                kind,
                text,
                start: start_pos,
                end: self.pos,
                source: SpanKind::Code,
            });
        }
    }

    fn next_kind(&mut self, c: char) -> TokenKind {
        if c.is_uppercase() {
            return self.qualified_name();
        }
        if c.is_alphabetic() || c == '_' {
            let start = self.current;
            self.advance_while(super::is_ident_char);
            let word: String = self.chars[start..self.current].iter().collect();
            return if KEYWORDS.contains(&word.as_str()) {
                TokenKind::Keyword
            } else {
                TokenKind::Identifier(CaseClass::Lower)
            };
        }
        if c.is_ascii_digit() {
            self.number();
            return TokenKind::Literal(LiteralKind::Number);
        }
        if "()[]{},;`'".contains(c) {
            self.advance();
            return TokenKind::Punctuation;
        }
        if is_symbol_char(c) {
            let start = self.current;
            self.advance_while(is_symbol_char);
            let symbol: String = self.chars[start..self.current].iter().collect();
            return if RESERVED_OPS.contains(&symbol.as_str()) {
                TokenKind::Operator
            } else {
                TokenKind::Identifier(CaseClass::Operator)
            };
        }
        self.advance();
        TokenKind::Identifier(CaseClass::Operator)
    }

    /// `Data.Map`, `Map.lookup`, `M.!`: one token, classified by the last segment.
    fn qualified_name(&mut self) -> TokenKind {
        loop {
            self.advance_while(super::is_ident_char);
            if self.peek_at(0) != Some('.') {
                return TokenKind::Identifier(CaseClass::Upper);
            }
            match self.peek_at(1) {
                Some(next) if next.is_uppercase() => {
                    self.advance();
                }
                Some(next) if next.is_alphabetic() || next == '_' => {
                    self.advance();
                    self.advance_while(super::is_ident_char);
                    return TokenKind::Identifier(CaseClass::Lower);
                }
                Some(next) if is_symbol_char(next) => {
                    self.advance();
                    self.advance_while(is_symbol_char);
                    return TokenKind::Identifier(CaseClass::Operator);
                }
                _ => return TokenKind::Identifier(CaseClass::Upper),
            }
        }
    }

    fn number(&mut self) {
        while let Some(c) = self.peek_at(0) {
            let digit_follows = self.peek_at(1).is_some_and(|n| n.is_ascii_digit());
            let exponent_sign = matches!(c, '+' | '-')
                && self.current > 0
                && matches!(self.chars[self.current - 1], 'e' | 'E')
                && digit_follows;
            if c.is_ascii_alphanumeric() || c == '_' || (c == '.' && digit_follows) || exponent_sign
            {
                self.advance();
            } else {
                break;
            }
        }
    }
}
