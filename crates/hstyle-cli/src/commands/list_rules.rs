//! List rules command implementation.

use anyhow::{Context, Result};
use hstyle_core::Catalogue;
use hstyle_rules::load_catalogue;
use std::fmt::Write;

use crate::config_resolver::ConfigSource;

/// Runs the list-rules command.
pub fn run(source: &ConfigSource) -> Result<()> {
    let config = super::load_config(source)?;
    let catalogue = load_catalogue(&config).context("Failed to load rule catalogue")?;

    print!("{}", render(&catalogue));

    println!("\nPresets:");
    println!("  default  - the bundled catalogue (used unless `preset` is set)");
    println!("  none     - only the [[rules]] of the configuration");

    println!("\nUse --rules to run specific rules, e.g.:");
    println!("  hstyle check --rules line-length,import-order");
    Ok(())
}

fn render(catalogue: &Catalogue) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Effective rules ({}):\n", catalogue.len());
    let _ = writeln!(
        out,
        "{:<22} {:<30} {:<8} Applies to",
        "Id", "Family", "Severity"
    );
    let _ = writeln!(out, "{}", "-".repeat(80));

    for entry in catalogue.entries() {
        let definition = entry.definition();
        let _ = writeln!(
            out,
            "{:<22} {:<30} {:<8} {}",
            entry.id(),
            entry.rule().family(),
            definition.severity().to_string(),
            definition.applies_to().names().join(", ")
        );
    }
    out
}
