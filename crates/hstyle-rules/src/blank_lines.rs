//! Rule fixing the number of blank lines between top-level declarations.
//!
//! A declaration is a module-level layout item. The whole import group
//! counts as one declaration, and consecutive items defining the same name
//! (a type signature followed by its equations) form one declaration.
//! Only blank lines outside comments and strings are counted, and nothing
//! before the first declaration is checked.

use hstyle_core::layout::LayoutItem;
use hstyle_core::scanner::{CaseClass, Token, TokenKind};
use hstyle_core::{DocumentContext, Finding, Rule};

/// Family name for blank-lines-between-top-level.
pub const FAMILY: &str = "blank-lines-between-top-level";

/// Checks spacing between top-level declarations.
#[derive(Debug, Clone)]
pub struct BlankLinesBetweenTopLevel {
    /// Required number of blank lines.
    pub exactly: usize,
}

impl Default for BlankLinesBetweenTopLevel {
    fn default() -> Self {
        Self::new(1)
    }
}

impl BlankLinesBetweenTopLevel {
    /// Creates the rule.
    #[must_use]
    pub fn new(exactly: usize) -> Self {
        Self { exactly }
    }
}

/// A run of root items forming one declaration.
struct Declaration<'a> {
    head: &'a Token,
    name: Option<&'a str>,
    start_line: usize,
    end_line: usize,
}

/// Name defined by an item, if it starts with one.
fn defined_name<'a>(tokens: &'a [Token], item: &LayoutItem) -> Option<&'a str> {
    let head = tokens.get(item.first_token)?;
    match head.kind {
        TokenKind::Identifier(CaseClass::Lower) => Some(head.text.as_str()),
        TokenKind::Punctuation if head.text == "(" => {
            let op = tokens.get(item.first_token + 1)?;
            let close = tokens.get(item.first_token + 2)?;
            (close.is_punct(")") && matches!(op.kind, TokenKind::Identifier(CaseClass::Operator)))
                .then_some(op.text.as_str())
        }
        _ => None,
    }
}

fn declarations<'a>(ctx: &DocumentContext<'a>) -> Vec<Declaration<'a>> {
    let tokens = ctx.tokens();
    let mut declarations: Vec<Declaration<'a>> = Vec::new();

    for item in &ctx.layout.tree.root().items {
        let Some(head) = tokens.get(item.first_token) else {
            continue;
        };
        let name = defined_name(tokens, item);
        if let Some(last) = declarations.last_mut() {
            if name.is_some() && last.name == name {
                last.end_line = last.end_line.max(item.end_line);
                continue;
            }
        }
        declarations.push(Declaration {
            head,
            name,
            start_line: item.start_line,
            end_line: item.end_line,
        });
    }

    declarations
}

impl Rule for BlankLinesBetweenTopLevel {
    fn family(&self) -> &'static str {
        FAMILY
    }

    fn description(&self) -> &'static str {
        "Requires a fixed number of blank lines between top-level declarations"
    }

    fn check_document(&self, ctx: &DocumentContext<'_>) -> Vec<Finding> {
        let declarations = declarations(ctx);
        let mut findings = Vec::new();

        for pair in declarations.windows(2) {
            let (previous, next) = (&pair[0], &pair[1]);
            let blank = (previous.end_line + 1..next.start_line)
                .filter_map(|n| ctx.lines.get(n))
                .filter(|line| line.is_blank_code())
                .count();
            if blank != self.exactly {
                findings.push(Finding::at_token(
                    next.head,
                    format!(
                        "expected {} blank line(s) before this declaration, found {blank}",
                        self.exactly
                    ),
                ));
            }
        }

        findings
    }
}
