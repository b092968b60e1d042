//! Rule enforcing case conventions on declared names.
//!
//! # Detected Patterns
//!
//! - Bound values, functions and class methods, and record fields, must be
//!   lowerCamelCase: a leading `_` and trailing primes are fine, inner
//!   underscores are not (`parse_line`).
//! - Declared types, classes and constructors must be UpperCamelCase
//!   (`Parse_Error`).
//! - All-caps abbreviations of two or more letters (`parseHTTP`,
//!   `XMLNode`) must be written as words unless listed in `abbreviations`.
//!
//! Only binding sites are checked; uses of a name are left to its
//! declaration.

use hstyle_core::layout::LayoutBlock;
use hstyle_core::scanner::{CaseClass, Token, TokenKind};
use hstyle_core::{Finding, LayoutKind, Rule, TokenContext};

/// Family name for naming-case.
pub const FAMILY: &str = "naming-case";

/// Keywords after which an UpperCamelCase type or class name is declared.
const TYPE_DECLARATORS: &[&str] = &["data", "newtype", "type", "class", "family"];

/// Checks naming conventions.
#[derive(Debug, Clone)]
pub struct NamingCase {
    /// Permitted all-caps abbreviations.
    pub abbreviations: Vec<String>,
}

impl Default for NamingCase {
    fn default() -> Self {
        Self::new(["IO", "ID", "OK", "UI"].map(String::from).to_vec())
    }
}

impl NamingCase {
    /// Creates the rule with the given abbreviation allow list.
    #[must_use]
    pub fn new(abbreviations: Vec<String>) -> Self {
        Self { abbreviations }
    }
}

/// Which convention a binding site follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Convention {
    LowerCamel,
    UpperCamel,
}

/// Head token of the enclosing item the block was opened in.
fn opener_head<'a>(ctx: &TokenContext<'a>, block: &LayoutBlock) -> Option<&'a Token> {
    let parent = ctx.doc.layout.tree.parent(block)?;
    let opener = block.opener?;
    let item = parent
        .items
        .iter()
        .rev()
        .find(|i| (i.start_line, i.start_column) <= (opener.line, opener.column))?;
    ctx.doc.layout.tokens.get(item.first_token)
}

fn is_item_head(ctx: &TokenContext<'_>) -> bool {
    ctx.item_head.is_some_and(|h| h.start == ctx.token.start)
}

fn head_is(ctx: &TokenContext<'_>, words: &[&str]) -> bool {
    ctx.item_head
        .is_some_and(|h| words.iter().any(|w| h.is_keyword(w) || h.text == *w))
}

/// Decides whether the current token is a binding site, and for which
/// convention.
fn binding_site(ctx: &TokenContext<'_>) -> Option<Convention> {
    let token = ctx.token;
    let prev = ctx.neighbour(-1);
    let next = ctx.neighbour(1);

    match token.kind {
        TokenKind::Identifier(CaseClass::Lower) => {
            if is_item_head(ctx) {
                let declares = match ctx.block.kind {
                    LayoutKind::Module | LayoutKind::Where | LayoutKind::Let => true,
                    LayoutKind::Instance => {
                        opener_head(ctx, ctx.block).is_some_and(|h| h.is_keyword("class"))
                    }
                    _ => false,
                };
                return declares.then_some(Convention::LowerCamel);
            }

            let field = ctx.block.kind == LayoutKind::Record
                && head_is(ctx, &["data", "newtype"])
                && prev.is_some_and(|t| t.is_punct("{") || t.is_punct(","))
                && next.is_some_and(|t| t.is_op("::") || t.is_punct(","));
            field.then_some(Convention::LowerCamel)
        }
        TokenKind::Identifier(CaseClass::Upper) => {
            let after_declarator = prev.is_some_and(|p| {
                TYPE_DECLARATORS.iter().any(|w| p.is_keyword(w) || p.text == *w)
            });
            let class_after_context = prev.is_some_and(|p| p.is_op("=>")) && head_is(ctx, &["class"]);
            let constructor = prev.is_some_and(|p| p.is_op("=") || p.is_op("|"))
                && head_is(ctx, &["data", "newtype"])
                && ctx.block.kind != LayoutKind::Record;
            let gadt_constructor = is_item_head(ctx)
                && ctx.block.kind == LayoutKind::Where
                && opener_head(ctx, ctx.block)
                    .is_some_and(|h| h.is_keyword("data") || h.is_keyword("newtype"))
                && next.is_some_and(|t| t.is_op("::") || t.is_punct(","));

            (after_declarator || class_after_context || constructor || gadt_constructor)
                .then_some(Convention::UpperCamel)
        }
        _ => None,
    }
}

/// Checks the case shape of `name`, returning a description of the problem.
fn case_problem(name: &str, convention: Convention) -> Option<&'static str> {
    let core = name.trim_end_matches('\'');
    let core = match convention {
        Convention::LowerCamel => core.trim_start_matches('_'),
        Convention::UpperCamel => core,
    };
    let first = core.chars().next()?;

    match convention {
        Convention::LowerCamel if first.is_uppercase() => Some("lowerCamelCase"),
        Convention::UpperCamel if !first.is_uppercase() => Some("UpperCamelCase"),
        Convention::LowerCamel if core.contains('_') => Some("lowerCamelCase"),
        Convention::UpperCamel if core.contains('_') => Some("UpperCamelCase"),
        _ => None,
    }
}

/// All-caps runs of two or more letters, as written in the name.
///
/// In `XMLNode` the run `XMLN` ends where `Node` begins, so the
/// abbreviation is `XML`.
fn abbreviations(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut found = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if !chars[i].is_uppercase() {
            i += 1;
            continue;
        }
        let start = i;
        while i < chars.len() && chars[i].is_uppercase() {
            i += 1;
        }
        let mut end = i;
        if chars.get(i).is_some_and(|c| c.is_lowercase()) {
            end -= 1;
        }
        if end - start >= 2 {
            found.push(chars[start..end].iter().collect());
        }
    }

    found
}

impl Rule for NamingCase {
    fn family(&self) -> &'static str {
        FAMILY
    }

    fn description(&self) -> &'static str {
        "Enforces camel case and abbreviation conventions on declared names"
    }

    fn check_token(&self, ctx: &TokenContext<'_>) -> Vec<Finding> {
        let Some(convention) = binding_site(ctx) else {
            return Vec::new();
        };
        let name = ctx.token.text.as_str();

        if let Some(expected) = case_problem(name, convention) {
            return vec![Finding::at_token(
                ctx.token,
                format!("`{name}` should be {expected}"),
            )];
        }

        abbreviations(name)
            .into_iter()
            .find(|abbr| !self.abbreviations.iter().any(|a| a == abbr))
            .map(|abbr| {
                Finding::at_token(
                    ctx.token,
                    format!("`{name}` contains the abbreviation `{abbr}`; write it as a word"),
                )
            })
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::check;

    const RULE: &str = "[[rules]]\nid = \"naming\"\ncheck = \"naming-case\"\n";

    fn flagged(text: &str) -> Vec<String> {
        check(text, RULE)
            .into_iter()
            .map(|v| v.message)
            .collect()
    }

    #[test]
    fn test_abbreviation_runs() {
        assert_eq!(abbreviations("parseHTTP"), vec!["HTTP"]);
        assert_eq!(abbreviations("XMLNode"), vec!["XML"]);
        assert_eq!(abbreviations("IOError"), vec!["IO"]);
        assert!(abbreviations("parseLine").is_empty());
        assert!(abbreviations("ANode").is_empty());
    }

    #[test]
    fn test_case_shapes() {
        assert_eq!(case_problem("parse_line", Convention::LowerCamel), Some("lowerCamelCase"));
        assert_eq!(case_problem("_unused", Convention::LowerCamel), None);
        assert_eq!(case_problem("go'", Convention::LowerCamel), None);
        assert_eq!(case_problem("Parse_Error", Convention::UpperCamel), Some("UpperCamelCase"));
    }

    #[test]
    fn test_value_bindings() {
        let text = "\
snake_case :: Int
snake_case = 1

fooBar = helper_fn 2
  where
    inner_value = 3
";
        assert_eq!(
            flagged(text),
            vec![
                "`snake_case` should be lowerCamelCase",
                "`snake_case` should be lowerCamelCase",
                "`inner_value` should be lowerCamelCase",
            ]
        );
    }

    #[test]
    fn test_types_constructors_and_fields() {
        let text = "\
data Http_Status = Status_OK | Failed
  { error_code :: Int
  , message :: String
  }

newtype UserID = UserID Int
";
        assert_eq!(
            flagged(text),
            vec![
                "`Http_Status` should be UpperCamelCase",
                "`Status_OK` should be UpperCamelCase",
                "`error_code` should be lowerCamelCase",
            ]
        );
    }

    #[test]
    fn test_abbreviations_outside_allow_list() {
        let text = "parseHTTP = 1\n\nreadIO' = 2\n\nclass ToJSON a where\n  toJSON :: a -> String\n";
        assert_eq!(
            flagged(text),
            vec![
                "`parseHTTP` contains the abbreviation `HTTP`; write it as a word",
                "`ToJSON` contains the abbreviation `JSON`; write it as a word",
                "`toJSON` contains the abbreviation `JSON`; write it as a word",
            ]
        );
    }

    #[test]
    fn test_uses_are_not_checked() {
        assert!(flagged("main = print some_value\n").is_empty());
        assert!(flagged("f = do\n  x_y <- get\n  pure x_y\n").is_empty());
    }
}
