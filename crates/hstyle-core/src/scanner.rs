//! Lexical scanner: splits source text into classified spans.
//!
//! The scanner never fails. Malformed input (an unterminated comment, a
//! stray `-}`, a string running into a newline) is recorded as a
//! [`ScanError`] and recovered from, so downstream rules still see the whole
//! document.

pub mod token;

use crate::span::{Pos, Span, SpanKind};
use tracing::debug;

pub use token::{tokenize, CaseClass, LiteralKind, Token, TokenKind};

/// Characters that make up operator symbols.
const SYMBOL_CHARS: &str = "!#$%&*+./<=>?@\\^|-~:";

/// Characters that mark a comment as Haddock documentation.
const HADDOCK_MARKERS: [char; 4] = ['|', '^', '*', '$'];

/// Longest escape accepted inside a character literal (`'\DEL'`, `'\x10FFFF'`).
const MAX_CHAR_ESCAPE: usize = 10;

/// Returns true if `c` can be part of an operator symbol.
#[must_use]
pub fn is_symbol_char(c: char) -> bool {
    SYMBOL_CHARS.contains(c)
}

/// Returns true if `c` can continue an identifier.
#[must_use]
pub fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '\''
}

/// Recoverable problems found while scanning.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    /// A block comment or pragma was still open at end of input.
    #[error("unterminated comment opened at {start}")]
    UnterminatedComment {
        /// Position of the opening `{-`.
        start: Pos,
        /// End of input.
        end: Pos,
    },

    /// A `-}` appeared outside any block comment.
    #[error("unexpected comment close `-}}` at {at}")]
    UnexpectedCommentClose {
        /// Position of the `-`.
        at: Pos,
    },

    /// A string literal ran into a raw newline or end of input.
    #[error("unterminated string literal starting at {start}")]
    UnterminatedString {
        /// Position of the opening quote.
        start: Pos,
        /// Where the literal was cut off.
        end: Pos,
    },
}

impl ScanError {
    /// Returns the start and end positions of the offending text.
    #[must_use]
    pub fn range(&self) -> (Pos, Pos) {
        match self {
            Self::UnterminatedComment { start, end } | Self::UnterminatedString { start, end } => {
                (*start, *end)
            }
            Self::UnexpectedCommentClose { at } => {
                let end = at.advance('-').advance('}');
                (*at, end)
            }
        }
    }

    /// Returns the synthetic rule id used when reporting this error.
    #[must_use]
    pub fn rule_id(&self) -> &'static str {
        match self {
            Self::UnterminatedComment { .. } => "unterminated-comment",
            Self::UnexpectedCommentClose { .. } => "unexpected-comment-close",
            Self::UnterminatedString { .. } => "unterminated-string",
        }
    }
}

/// Output of [`scan`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Spans in document order covering the whole input.
    pub spans: Vec<Span>,
    /// Recovered problems, in the order they were found.
    pub errors: Vec<ScanError>,
}

/// Scans `text` into classified spans.
#[must_use]
pub fn scan(text: &str) -> ScanResult {
    let result = Scanner::new(text).scan_spans();
    debug!(
        "Scanned {} spans with {} errors",
        result.spans.len(),
        result.errors.len()
    );
    result
}

struct Scanner {
    source: Vec<char>,
    current: usize,
    pos: Pos,
    code_start: usize,
    code_start_pos: Pos,
    spans: Vec<Span>,
    errors: Vec<ScanError>,
}

impl Scanner {
    fn new(text: &str) -> Self {
        Self {
            source: text.chars().collect(),
            current: 0,
            pos: Pos::origin(),
            code_start: 0,
            code_start_pos: Pos::origin(),
            spans: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.source.get(self.current + ahead).copied()
    }

    fn advance(&mut self) {
        if let Some(&c) = self.source.get(self.current) {
            self.pos = self.pos.advance(c);
            self.current += 1;
        }
    }

    fn advance_by(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    fn scan_spans(mut self) -> ScanResult {
        while let Some(c) = self.peek_at(0) {
            match c {
                '{' if self.peek_at(1) == Some('-') => {
                    if self.peek_at(2) == Some('#') {
                        self.pragma();
                    } else {
                        self.block_comment();
                    }
                }
                '-' if self.peek_at(1) == Some('-') && self.starts_line_comment() => {
                    self.line_comment();
                }
                '-' if self.peek_at(1) == Some('}') => {
                    self.errors
                        .push(ScanError::UnexpectedCommentClose { at: self.pos });
                    self.advance_by(2);
                }
                '"' => self.string_literal(),
                '\'' => match self.char_literal_len() {
                    Some(len) => self.char_literal(len),
                    None => self.advance(),
                },
                _ => self.advance(),
            }
        }
        self.flush_code();

        ScanResult {
            spans: self.spans,
            errors: self.errors,
        }
    }

    fn flush_code(&mut self) {
        if self.current > self.code_start {
            let text: String = self.source[self.code_start..self.current].iter().collect();
            self.spans
                .push(Span::new(SpanKind::Code, self.code_start_pos, self.pos, text));
        }
        self.code_start = self.current;
        self.code_start_pos = self.pos;
    }

    fn emit(&mut self, kind: SpanKind, start: usize, start_pos: Pos) {
        let text: String = self.source[start..self.current].iter().collect();
        self.spans.push(Span::new(kind, start_pos, self.pos, text));
        self.code_start = self.current;
        self.code_start_pos = self.pos;
    }

    /// `--` starts a comment unless the dashes belong to a longer operator.
    fn starts_line_comment(&self) -> bool {
        if self.current > 0 && is_symbol_char(self.source[self.current - 1]) {
            return false;
        }
        let mut i = self.current;
        while self.source.get(i) == Some(&'-') {
            i += 1;
        }
        !self.source.get(i).is_some_and(|&c| is_symbol_char(c))
    }

    fn line_comment(&mut self) {
        self.flush_code();
        let start = self.current;
        let start_pos = self.pos;
        while self.peek_at(0).is_some_and(|c| c != '\n') {
            self.advance();
        }
        let body = self.source[start..self.current]
            .iter()
            .skip_while(|&&c| c == '-')
            .skip_while(|c| c.is_whitespace());
        let kind = match body.copied().next() {
            Some(c) if HADDOCK_MARKERS.contains(&c) => SpanKind::HaddockComment,
            _ => SpanKind::LineComment,
        };
        self.emit(kind, start, start_pos);
    }

    fn block_comment(&mut self) {
        self.flush_code();
        let start = self.current;
        let start_pos = self.pos;
        self.advance_by(2);

        let kind = match self.source[self.current..]
            .iter()
            .copied()
            .find(|c| !matches!(c, ' ' | '\t'))
        {
            Some(c) if HADDOCK_MARKERS.contains(&c) => SpanKind::HaddockComment,
            _ => SpanKind::BlockComment,
        };

        let mut depth = 1usize;
        while depth > 0 {
            match (self.peek_at(0), self.peek_at(1)) {
                (None, _) => {
                    self.errors.push(ScanError::UnterminatedComment {
                        start: start_pos,
                        end: self.pos,
                    });
                    break;
                }
                (Some('{'), Some('-')) => {
                    depth += 1;
                    self.advance_by(2);
                }
                (Some('-'), Some('}')) => {
                    depth -= 1;
                    self.advance_by(2);
                }
                _ => self.advance(),
            }
        }
        self.emit(kind, start, start_pos);
    }

    fn pragma(&mut self) {
        self.flush_code();
        let start = self.current;
        let start_pos = self.pos;
        self.advance_by(3);
        loop {
            match (self.peek_at(0), self.peek_at(1), self.peek_at(2)) {
                (None, _, _) => {
                    self.errors.push(ScanError::UnterminatedComment {
                        start: start_pos,
                        end: self.pos,
                    });
                    break;
                }
                (Some('#'), Some('-'), Some('}')) => {
                    self.advance_by(3);
                    break;
                }
                _ => self.advance(),
            }
        }
        self.emit(SpanKind::Pragma, start, start_pos);
    }

    fn string_literal(&mut self) {
        self.flush_code();
        let start = self.current;
        let start_pos = self.pos;
        self.advance();
        loop {
            match self.peek_at(0) {
                None | Some('\n') => {
                    self.errors.push(ScanError::UnterminatedString {
                        start: start_pos,
                        end: self.pos,
                    });
                    break;
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    if self.peek_at(0).is_some_and(char::is_whitespace) {
                        // String gap: whitespace up to the closing backslash.
                        while self.peek_at(0).is_some_and(char::is_whitespace) {
                            self.advance();
                        }
                        if self.peek_at(0) == Some('\\') {
                            self.advance();
                        }
                    } else {
                        self.advance();
                    }
                }
                Some(_) => self.advance(),
            }
        }
        self.emit(SpanKind::StringLiteral, start, start_pos);
    }

    /// Length in characters of the character literal starting here, if any.
    ///
    /// A quote directly after an identifier character is a prime (`foo'`),
    /// and a quote not closed within one character or one escape is a
    /// Template Haskell name quote or a promoted constructor.
    fn char_literal_len(&self) -> Option<usize> {
        if self.current > 0 && is_ident_char(self.source[self.current - 1]) {
            return None;
        }
        match (self.peek_at(1), self.peek_at(2)) {
            (Some('\\'), Some(_)) => (3..=MAX_CHAR_ESCAPE + 2)
                .map_while(|i| self.peek_at(i).filter(|&c| c != '\n').map(|c| (i, c)))
                .find(|&(_, c)| c == '\'')
                .map(|(i, _)| i + 1),
            (Some(c), Some('\'')) if c != '\n' && c != '\'' => Some(3),
            _ => None,
        }
    }

    fn char_literal(&mut self, len: usize) {
        self.flush_code();
        let start = self.current;
        let start_pos = self.pos;
        self.advance_by(len);
        self.emit(SpanKind::CharLiteral, start, start_pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<(SpanKind, String)> {
        scan(text)
            .spans
            .into_iter()
            .map(|s| (s.kind, s.text))
            .collect()
    }

    fn assert_covers(text: &str) {
        let result = scan(text);
        let joined: String = result.spans.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(joined, text);
        let mut expected_start = Pos::origin();
        for span in &result.spans {
            assert_eq!(span.start, expected_start, "gap or overlap before {span:?}");
            assert!(span.end.offset > span.start.offset, "empty span {span:?}");
            expected_start = span.end;
        }
        assert_eq!(expected_start.offset, text.len());
    }

    #[test]
    fn nested_block_comment_is_one_span() {
        let text = "{- outer {- inner -} still outer -}";
        let result = scan(text);
        assert!(result.errors.is_empty());
        assert_eq!(result.spans.len(), 1);
        assert_eq!(result.spans[0].kind, SpanKind::BlockComment);
        assert_eq!(result.spans[0].text, text);
    }

    #[test]
    fn span_listing() {
        let listing: Vec<String> = scan("x = \"a\" -- c\n{-# LANGUAGE X #-}\n")
            .spans
            .iter()
            .map(|s| format!("{} {}:{} {:?}", s.kind.as_str(), s.start.line, s.start.column, s.text))
            .collect();
        insta::assert_snapshot!(listing.join("\n"), @r#"
        code 1:1 "x = "
        string-literal 1:5 "\"a\""
        code 1:8 " "
        line-comment 1:9 "-- c"
        code 1:13 "\n"
        pragma 2:1 "{-# LANGUAGE X #-}"
        code 2:19 "\n"
        "#);
    }

    #[test]
    fn line_comment_stops_before_newline() {
        assert_eq!(
            kinds("x = 1 -- one\ny = 2\n"),
            vec![
                (SpanKind::Code, "x = 1 ".to_string()),
                (SpanKind::LineComment, "-- one".to_string()),
                (SpanKind::Code, "\ny = 2\n".to_string()),
            ]
        );
    }

    #[test]
    fn dashes_inside_operators_are_code() {
        assert_eq!(kinds("a --> b"), vec![(SpanKind::Code, "a --> b".to_string())]);
        assert_eq!(kinds("a <-- b"), vec![(SpanKind::Code, "a <-- b".to_string())]);
        assert_eq!(kinds("---- banner")[0].0, SpanKind::LineComment);
    }

    #[test]
    fn comment_markers_inside_strings_are_ignored() {
        let spans = kinds(r#"s = "-- not {- a comment" ++ "\"-}""#);
        assert_eq!(spans.len(), 4);
        assert_eq!(spans[1], (SpanKind::StringLiteral, "\"-- not {- a comment\"".to_string()));
        assert_eq!(spans[3], (SpanKind::StringLiteral, r#""\"-}""#.to_string()));
        assert!(scan(r#"s = "\"-}""#).errors.is_empty());
    }

    #[test]
    fn string_gap_spans_lines() {
        let text = "s = \"abc\\\n    \\def\"\n";
        let result = scan(text);
        assert!(result.errors.is_empty());
        let lit = result.spans.iter().find(|s| s.kind == SpanKind::StringLiteral).unwrap();
        assert_eq!(lit.start.line, 1);
        assert_eq!(lit.end.line, 2);
        assert_covers(text);
    }

    #[test]
    fn char_literals_and_primes() {
        let spans = kinds("f' x = x == '\\'' || x == '\"' || g 'a'");
        let chars: Vec<&str> = spans
            .iter()
            .filter(|(k, _)| *k == SpanKind::CharLiteral)
            .map(|(_, t)| t.as_str())
            .collect();
        assert_eq!(chars, vec!["'\\''", "'\"'", "'a'"]);
        assert!(spans.iter().all(|(k, _)| *k != SpanKind::StringLiteral));
    }

    #[test]
    fn template_haskell_quotes_are_code() {
        assert_eq!(
            kinds("deriveJSON ''Foo 'bar"),
            vec![(SpanKind::Code, "deriveJSON ''Foo 'bar".to_string())]
        );
    }

    #[test]
    fn pragmas_are_classified_separately() {
        let spans = kinds("{-# LANGUAGE GADTs #-}\nmodule M where\n");
        assert_eq!(spans[0], (SpanKind::Pragma, "{-# LANGUAGE GADTs #-}".to_string()));
        assert_eq!(spans[1].0, SpanKind::Code);
    }

    #[test]
    fn haddock_comments_are_classified() {
        let spans = kinds("-- | Doc\n-- ^ After\n-- * Section\n-- plain\n{-| Block doc -}\n");
        let comment_kinds: Vec<SpanKind> = spans
            .iter()
            .map(|(k, _)| *k)
            .filter(|k| *k != SpanKind::Code)
            .collect();
        assert_eq!(
            comment_kinds,
            vec![
                SpanKind::HaddockComment,
                SpanKind::HaddockComment,
                SpanKind::HaddockComment,
                SpanKind::LineComment,
                SpanKind::HaddockComment,
            ]
        );
    }

    #[test]
    fn unterminated_comment_recovers_to_end() {
        let text = "x = 1\n{- open {- nested -}\ny = 2\n";
        let result = scan(text);
        assert_eq!(result.errors.len(), 1);
        assert!(matches!(
            result.errors[0],
            ScanError::UnterminatedComment { start, .. } if start.line == 2
        ));
        assert_eq!(result.spans.last().unwrap().kind, SpanKind::BlockComment);
        assert_covers(text);
    }

    #[test]
    fn stray_comment_close_is_reported_and_kept_as_code() {
        let result = scan("x = 1 -}\n");
        assert_eq!(
            result.errors,
            vec![ScanError::UnexpectedCommentClose {
                at: Pos::new(6, 1, 7)
            }]
        );
        assert_eq!(result.spans.len(), 1);
        assert_eq!(result.spans[0].kind, SpanKind::Code);
    }

    #[test]
    fn unterminated_string_closes_at_end_of_line() {
        let result = scan("s = \"abc\nt = 1\n");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].rule_id(), "unterminated-string");
        let lit = result.spans.iter().find(|s| s.kind == SpanKind::StringLiteral).unwrap();
        assert_eq!(lit.text, "\"abc");
    }

    #[test]
    fn coverage_holds_for_mixed_input() {
        assert_covers("");
        assert_covers("{-# LANGUAGE X #-}\n-- | doc\nf :: Int -> Int\nf x = x + 1 {- c -} -- d\n");
        assert_covers("s = \"unterminated\n{- open");
        assert_covers("λx → 'λ' -- ünïcödé\n");
    }

    #[test]
    fn scanning_is_idempotent() {
        let text = "main = do\n  putStrLn \"hi\" -- greet\n  {- a {- b -} -}\n";
        assert_eq!(scan(text), scan(text));
    }
}
