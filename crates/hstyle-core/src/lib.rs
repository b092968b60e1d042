//! # hstyle-core
//!
//! Core engine for checking style conventions in layout-sensitive source
//! files.
//!
//! Each document runs through a pure pipeline:
//!
//! - [`scanner`] partitions the text into classified spans
//! - [`layout`] builds the tree of indentation-defined blocks
//! - [`catalogue`] holds the declarative rule definitions
//! - [`evaluator`] dispatches every rule over lines, tokens, blocks and the
//!   whole document
//! - [`reporter`] orders and de-duplicates the findings
//!
//! The [`Analyzer`] walks a source tree and runs the pipeline over every
//! document in parallel.
//!
//! ## Example
//!
//! ```ignore
//! use hstyle_core::{lint_source, Catalogue};
//!
//! let model = hstyle_core::catalogue::load_model_from_toml(TOML)?;
//! let catalogue = Catalogue::new(model, my_factory);
//! for violation in lint_source("foo = 1 \n", &catalogue) {
//!     println!("{violation}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
pub mod catalogue;
mod config;
pub mod context;
pub mod evaluator;
pub mod layout;
pub mod lines;
pub mod reporter;
mod rule;
pub mod scanner;
pub mod span;
mod suppression;
mod types;

pub use analyzer::{lint_source, Analyzer, AnalyzerBuilder, AnalyzerError};
pub use catalogue::{Catalogue, CatalogueEntry, CatalogueError};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::{BlockContext, DocumentContext, Finding, LineContext, TokenContext};
pub use layout::{build_layout, Layout, LayoutKind};
pub use rule::{Rule, RuleBox, RuleScope};
pub use scanner::{scan, ScanResult};
pub use span::{Pos, Span, SpanKind};
pub use suppression::{parse_allow_directive, AllowCheck, AllowDirective, Suppressions};
pub use types::{DocumentReport, LintResult, Severity, Violation, ViolationDiagnostic};
