//! Rule requiring file-header pragmas before the first line of code.
//!
//! `LANGUAGE` and `OPTIONS_GHC` pragmas only take effect in the file
//! header; placed after the module line they are silently ignored.
//! Pragma names compare case-insensitively.

use hstyle_core::{DocumentContext, Finding, Rule, SpanKind};

/// Family name for pragma-placement.
pub const FAMILY: &str = "pragma-placement";

/// Checks header pragma positions.
#[derive(Debug, Clone)]
pub struct PragmaPlacement {
    /// Pragma names that belong in the header.
    pub header_pragmas: Vec<String>,
}

impl Default for PragmaPlacement {
    fn default() -> Self {
        Self::new(
            ["LANGUAGE", "OPTIONS_GHC", "OPTIONS_HADDOCK", "INCLUDE"]
                .map(String::from)
                .to_vec(),
        )
    }
}

impl PragmaPlacement {
    /// Creates the rule for the given header pragma names.
    #[must_use]
    pub fn new(header_pragmas: Vec<String>) -> Self {
        Self { header_pragmas }
    }

    fn is_header_pragma(&self, name: &str) -> bool {
        self.header_pragmas
            .iter()
            .any(|p| p.eq_ignore_ascii_case(name))
    }
}

/// The pragma name: the first word after `{-#`.
fn pragma_name(text: &str) -> Option<&str> {
    text.strip_prefix("{-#")?
        .split(|c: char| c.is_whitespace() || c == '#')
        .find(|w| !w.is_empty())
        .filter(|w| w.chars().all(|c| c.is_alphanumeric() || c == '_'))
}

impl Rule for PragmaPlacement {
    fn family(&self) -> &'static str {
        FAMILY
    }

    fn description(&self) -> &'static str {
        "Requires file-header pragmas before the first code token"
    }

    fn check_document(&self, ctx: &DocumentContext<'_>) -> Vec<Finding> {
        let Some(first_code) = ctx.tokens().first() else {
            return Vec::new();
        };

        ctx.spans()
            .filter(|s| s.kind == SpanKind::Pragma && s.start > first_code.start)
            .filter_map(|s| {
                let name = pragma_name(&s.text)?;
                self.is_header_pragma(name).then(|| {
                    Finding::between(
                        s.start,
                        s.end,
                        format!("`{name}` pragma must come before the first line of code"),
                    )
                })
            })
            .collect()
    }
}
