//! Check command implementation.

use anyhow::{Context, Result};
use hstyle_core::{Analyzer, Catalogue};
use hstyle_rules::load_catalogue;
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the check command.
pub fn run(
    path: &Path,
    format: OutputFormat,
    rules_filter: Option<String>,
    exclude: Vec<String>,
    source: &ConfigSource,
) -> Result<()> {
    let config = super::load_config(source)?;
    let fail_on = config.fail_on().context("Invalid fail_on setting")?;

    let mut catalogue = load_catalogue(&config).context("Failed to load rule catalogue")?;
    if let Some(filter) = rules_filter {
        let ids: Vec<&str> = filter.split(',').map(str::trim).collect();
        catalogue = filter_rules(catalogue, &ids);
    }

    let analyzer = Analyzer::builder()
        .root(path)
        .config(config)
        .excludes(exclude)
        .catalogue(catalogue)
        .build()
        .context("Failed to build analyzer")?;

    tracing::info!("Checking {:?} with {} rules", path, analyzer.rule_count());

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, analyzer.root(), format)?;

    if !result.failed.is_empty() {
        tracing::warn!("{} file(s) could not be read", result.failed.len());
    }

    // Exit with error code if a violation reaches the threshold
    if result.has_violations_at(fail_on) {
        std::process::exit(1);
    }

    Ok(())
}

/// Keeps the catalogue entries named in `ids`, warning about unknown ones.
fn filter_rules(catalogue: Catalogue, ids: &[&str]) -> Catalogue {
    for id in ids {
        if catalogue.get(id).is_none() {
            tracing::warn!("Unknown rule: {}", id);
        }
    }
    catalogue.retain(|d| ids.contains(&d.id().as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_keeps_named_rules_in_catalogue_order() {
        let catalogue = hstyle_rules::default_catalogue().unwrap();
        let filtered = filter_rules(catalogue, &["no-tabs", "line-length", "missing"]);
        let ids: Vec<&str> = filtered.entries().iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec!["line-length", "no-tabs"]);
    }
}
