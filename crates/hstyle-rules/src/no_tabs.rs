//! Rule forbidding tab characters.
//!
//! Layout is decided by columns, and a tab's width depends on the reader's
//! editor. Each run of consecutive tabs is reported once.

use hstyle_core::{Finding, LineContext, Rule};

/// Family name for no-tabs.
pub const FAMILY: &str = "no-tabs";

/// Flags tab characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTabs;

impl NoTabs {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for NoTabs {
    fn family(&self) -> &'static str {
        FAMILY
    }

    fn description(&self) -> &'static str {
        "Forbids tab characters"
    }

    fn check_line(&self, ctx: &LineContext<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();
        let mut run: Option<usize> = None;

        for (i, c) in ctx.line.text.chars().chain(std::iter::once('\n')).enumerate() {
            let column = i + 1;
            let is_tab = c == '\t' && ctx.is_visible(column);
            match (is_tab, run) {
                (true, None) => run = Some(column),
                (false, Some(start)) => {
                    findings.push(Finding::on_line(
                        ctx.line.number,
                        start,
                        column - start,
                        "tab character",
                    ));
                    run = None;
                }
                _ => {}
            }
        }

        findings
    }
}
