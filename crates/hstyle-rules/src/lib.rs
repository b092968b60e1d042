//! # hstyle-rules
//!
//! Built-in rule families and the default catalogue for hstyle.
//!
//! ## Available Families
//!
//! | Family | Scope | Description |
//! |--------|-------|-------------|
//! | `max-line-length` | line | Lines longer than `n` characters |
//! | `no-trailing-whitespace` | line | Spaces or tabs before the end of a line |
//! | `no-tabs` | line | Tab characters |
//! | `indent-step` | block | Block anchors `k` columns past their parent |
//! | `blank-lines-between-top-level` | document | Blank lines between declarations |
//! | `import-order` | document | Sorted imports, designated last import |
//! | `naming-case` | token | camelCase names, no unlisted abbreviations |
//! | `export-list-structure` | document | Aligned export list, standalone section markers |
//! | `pragma-placement` | document | Header pragmas before the first code token |
//! | `comment-placement` | document | Gap before end-of-line comments |
//! | `haddock-presence` | document | Haddock comments on top-level declarations |
//!
//! ## Usage
//!
//! ```ignore
//! use hstyle_core::{lint_source, Config};
//! use hstyle_rules::load_catalogue;
//!
//! let catalogue = load_catalogue(&Config::default())?;
//! let violations = lint_source("foo = 1 \n", &catalogue);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod blank_lines;
mod comment_placement;
mod export_list;
mod haddock_presence;
mod import_order;
mod indent_step;
mod max_line_length;
mod naming_case;
mod no_tabs;
mod pragma_placement;
mod presets;
mod trailing_whitespace;

pub use blank_lines::BlankLinesBetweenTopLevel;
pub use comment_placement::CommentPlacement;
pub use export_list::ExportListStructure;
pub use haddock_presence::HaddockPresence;
pub use import_order::ImportOrder;
pub use indent_step::IndentStep;
pub use max_line_length::MaxLineLength;
pub use naming_case::NamingCase;
pub use no_tabs::NoTabs;
pub use pragma_placement::PragmaPlacement;
pub use presets::{
    default_catalogue, load_catalogue, preset_model, rule_for, Preset, DEFAULT_CATALOGUE,
};
pub use trailing_whitespace::NoTrailingWhitespace;

/// Re-export core types for convenience.
pub use hstyle_core::{Rule, Severity, Violation};

#[cfg(test)]
pub(crate) mod test_support {
    use hstyle_core::catalogue::load_model_from_toml;
    use hstyle_core::{lint_source, Catalogue, Violation};

    /// Lints `text` against a catalogue given as TOML.
    pub fn check(text: &str, catalogue_toml: &str) -> Vec<Violation> {
        let model = load_model_from_toml(catalogue_toml).unwrap();
        lint_source(text, &Catalogue::new(model, crate::rule_for))
    }
}
