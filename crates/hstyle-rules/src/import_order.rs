//! Rule requiring sorted imports.
//!
//! # Detected Patterns
//!
//! Within each import group, module paths must ascend (case-sensitive):
//!
//! ```text
//! import Data.Set
//! import Data.Map    -- reported: sorts before Data.Set
//! import Prelude
//! ```
//!
//! # Configuration
//!
//! - `last`: a module that must be the final import of its group
//!   (default `Prelude`); it is skipped when comparing neighbours
//! - `reset_on_blank_line`: a blank line starts a new sorted section
//!   (default true)

use hstyle_core::layout::LayoutItem;
use hstyle_core::scanner::{CaseClass, Token, TokenKind};
use hstyle_core::{DocumentContext, Finding, LayoutKind, Rule};

/// Family name for import-order.
pub const FAMILY: &str = "import-order";

/// Checks import ordering.
#[derive(Debug, Clone)]
pub struct ImportOrder {
    /// Module that must come last.
    pub last: Option<String>,
    /// Whether a blank line starts a new section.
    pub reset_on_blank_line: bool,
}

impl Default for ImportOrder {
    fn default() -> Self {
        Self {
            last: Some("Prelude".to_string()),
            reset_on_blank_line: true,
        }
    }
}

impl ImportOrder {
    /// Creates the rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the module that must come last.
    #[must_use]
    pub fn last(mut self, module: Option<String>) -> Self {
        self.last = module;
        self
    }

    /// Sets whether blank lines reset the ordering.
    #[must_use]
    pub fn reset_on_blank_line(mut self, reset: bool) -> Self {
        self.reset_on_blank_line = reset;
        self
    }

    fn is_last(&self, module: &str) -> bool {
        self.last.as_deref() == Some(module)
    }
}

/// The module path token of an import item.
///
/// Skips `qualified`, `safe` and a package-name string literal.
fn module_token<'a>(tokens: &'a [Token], item: &LayoutItem) -> Option<&'a Token> {
    let head = tokens.get(item.first_token)?;
    if !head.is_keyword("import") {
        return None;
    }
    tokens[item.first_token + 1..]
        .iter()
        .take_while(|t| t.start.line <= item.end_line)
        .find(|t| t.kind == TokenKind::Identifier(CaseClass::Upper))
}

impl Rule for ImportOrder {
    fn family(&self) -> &'static str {
        FAMILY
    }

    fn description(&self) -> &'static str {
        "Requires imports sorted by module name"
    }

    fn check_document(&self, ctx: &DocumentContext<'_>) -> Vec<Finding> {
        let tokens = ctx.tokens();
        let tree = &ctx.layout.tree;
        let mut findings = Vec::new();

        let groups = tree
            .root()
            .children
            .iter()
            .filter_map(|&id| tree.get(id))
            .filter(|b| b.kind == LayoutKind::ImportGroup);

        for group in groups {
            let imports: Vec<(&LayoutItem, &Token)> = group
                .items
                .iter()
                .filter_map(|item| module_token(tokens, item).map(|t| (item, t)))
                .collect();

            let mut previous: Option<(&LayoutItem, &Token)> = None;
            let mut pending_last: Option<&Token> = None;

            for &(item, module) in &imports {
                if let Some(last) = pending_last.take() {
                    findings.push(Finding::at_token(
                        last,
                        format!("`{}` must be the last import", last.text),
                    ));
                }
                if self.is_last(&module.text) {
                    pending_last = Some(module);
                    continue;
                }

                if let Some((prev_item, prev)) = previous {
                    let separated = self.reset_on_blank_line
                        && (prev_item.end_line + 1..item.start_line)
                            .filter_map(|n| ctx.lines.get(n))
                            .any(|line| line.is_blank_code());
                    if !separated && module.text < prev.text {
                        findings.push(Finding::at_token(
                            module,
                            format!("`{}` should be imported before `{}`", module.text, prev.text),
                        ));
                    }
                }
                previous = Some((item, module));
            }
        }

        findings
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::check;

    const RULE: &str = "[[rules]]\nid = \"import-order\"\ncheck = \"import-order\"\n";

    #[test]
    fn test_reports_only_the_descending_import() {
        let text = "import Data.Set\nimport Data.Map\nimport Prelude\n";
        let violations = check(text, RULE);
        assert_eq!(violations.len(), 1);
        assert_eq!((violations[0].line, violations[0].column), (2, 8));
        assert_eq!(
            violations[0].message,
            "`Data.Map` should be imported before `Data.Set`"
        );
    }

    #[test]
    fn test_qualified_and_package_imports() {
        let text = "\
import qualified Data.Map as Map
import \"text\" Data.Text (Text)
import Data.Char
";
        let violations = check(text, RULE);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line, 3);
    }

    #[test]
    fn test_designated_last_must_be_final() {
        let text = "import Prelude\nimport Data.Map\n";
        let violations = check(text, RULE);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].message, "`Prelude` must be the last import");
    }

    #[test]
    fn test_blank_line_starts_new_section() {
        let text = "import System.IO\n\nimport Control.Monad\nimport Data.List\n";
        assert!(check(text, RULE).is_empty());

        let rule = "[[rules]]\nid = \"import-order\"\ncheck = \"import-order\"\nreset-on-blank-line = false\n";
        assert_eq!(check(text, rule).len(), 1);
    }

    #[test]
    fn test_ordering_is_case_sensitive() {
        let text = "import Data.Map\nimport Data.MAP\n";
        assert_eq!(check(text, RULE).len(), 1);
    }
}
