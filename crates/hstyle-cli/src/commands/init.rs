//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# hstyle configuration

# Catalogue to start from: "default" or "none"
preset = "default"

# Lowest severity that makes `hstyle check` exit with status 1
fail_on = "error"

[analyzer]
# Glob patterns to exclude from analysis
exclude = [
    "**/dist-newstyle/**",
    "**/.stack-work/**",
]

# File extensions to check
extensions = ["hs"]

# Respect .gitignore files
respect_gitignore = true

# Number of parallel workers (default: one per CPU)
# parallelism = 4

# Per-rule overrides, keyed by rule id (see `hstyle list-rules`)

# [overrides.line-length]
# severity = "warning"

# [overrides.comment-placement]
# enabled = false

# Additional rules, appended to the preset

# [[rules]]
# id = "docs"
# check = "haddock-presence"
# severity = "warning"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new("hstyle.toml"), force)?;

    println!("Created hstyle.toml");
    println!("\nNext steps:");
    println!("  1. Edit hstyle.toml to configure rules");
    println!("  2. Run: hstyle check");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hstyle_core::Config;
    use tempfile::TempDir;

    #[test]
    fn default_config_loads() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.preset_name(), "default");
        let catalogue = hstyle_rules::load_catalogue(&config).unwrap();
        assert_eq!(catalogue.len(), 10);
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("hstyle.toml");
        std::fs::write(&path, "preset = \"none\"\n").unwrap();

        assert!(write_config(&path, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "preset = \"none\"\n");

        write_config(&path, true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
