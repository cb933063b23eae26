//! Project configuration module.
//!
//! Handles loading and validating `docmark.toml`. The file is
//! optional; stock defaults are used for every key it does not set.
//!
//! ## Config File Location
//!
//! ```text
//! project/
//! ├── docmark.toml             # Project config (overrides stock defaults)
//! ├── README.md                # Usually owns the [TOC] directive
//! └── docs/                    # documentation_root
//!     ├── 1_Introduction.md
//!     ├── 2_Setup/
//!     └── legacy/              # legacy_directory, left out of TOCs and Hugo output
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! documentation_root = "docs"       # Projected by `docmark hugo`
//! legacy_directory = "legacy"       # Relative to documentation_root
//! excluded_directories = ["target", "node_modules"]
//!
//! [toc]
//! ignored_directories = ["images", "img", "assets"]
//!
//! [hugo]
//! output = "hugo/content"           # Relative to the project root
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the project root.
pub const CONFIG_FILENAME: &str = "docmark.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Project configuration loaded from `docmark.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Directory (relative to the project root) projected into Hugo output.
    pub documentation_root: String,
    /// Sub-directory of the documentation root skipped by TOCs and the Hugo
    /// projection.
    pub legacy_directory: String,
    /// Directory names never scanned anywhere in the project.
    pub excluded_directories: Vec<String>,
    /// Table-of-contents settings.
    pub toc: TocConfig,
    /// Hugo projection settings.
    pub hugo: HugoConfig,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            documentation_root: "docs".to_string(),
            legacy_directory: "legacy".to_string(),
            excluded_directories: vec!["target".to_string(), "node_modules".to_string()],
            toc: TocConfig::default(),
            hugo: HugoConfig::default(),
        }
    }
}

impl ProjectConfig {
    /// Validate values that serde alone cannot check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.documentation_root.trim().is_empty() {
            return Err(ConfigError::Validation(
                "documentation_root must not be empty".into(),
            ));
        }
        if Path::new(&self.legacy_directory).is_absolute() {
            return Err(ConfigError::Validation(
                "legacy_directory must be relative to documentation_root".into(),
            ));
        }
        if self.hugo.output.trim().is_empty() {
            return Err(ConfigError::Validation("hugo.output must not be empty".into()));
        }
        Ok(())
    }

    /// Whether a directory with this name is ever scanned.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded_directories.iter().any(|d| d == name)
    }
}

/// Table-of-contents settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TocConfig {
    /// Directory names that TOC trees never descend into (asset folders).
    pub ignored_directories: Vec<String>,
}

impl Default for TocConfig {
    fn default() -> Self {
        Self {
            ignored_directories: ["images", "img", "assets"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Hugo projection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HugoConfig {
    /// Output directory for the projected content tree.
    pub output: String,
}

impl Default for HugoConfig {
    fn default() -> Self {
        Self {
            output: "hugo/content".to_string(),
        }
    }
}

// =============================================================================
// Config loading and validation
// =============================================================================

/// Read `docmark.toml` from the project root. `Ok(None)` when there is none.
pub fn read_config_file(root: &Path) -> Result<Option<String>, ConfigError> {
    match fs::read_to_string(root.join(CONFIG_FILENAME)) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Parse config text (or nothing) into a validated config.
///
/// Every table carries `#[serde(default)]`, so keys the file leaves out
/// keep their stock values, nested tables included.
pub fn resolve_config(source: Option<&str>) -> Result<ProjectConfig, ConfigError> {
    let config = match source {
        Some(text) => toml::from_str::<ProjectConfig>(text)?,
        None => ProjectConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Load the project config: stock defaults with `docmark.toml` on top.
pub fn load_config(root: &Path) -> Result<ProjectConfig, ConfigError> {
    let source = read_config_file(root)?;
    let config = resolve_config(source.as_deref())?;
    tracing::debug!(
        from_file = source.is_some(),
        documentation_root = %config.documentation_root,
        hugo_output = %config.hugo.output,
        "Loaded project config"
    );
    Ok(config)
}

/// A documented `docmark.toml` with every option at its default.
pub fn stock_config_toml() -> &'static str {
    r#"# docmark configuration
# All options are optional. Values shown are the defaults.

# Directory (relative to the project root) projected by `docmark hugo`.
documentation_root = "docs"

# Sub-directory of documentation_root left out of TOCs and the Hugo projection.
legacy_directory = "legacy"

# Directory names never scanned for markdown files.
excluded_directories = ["target", "node_modules"]

[toc]
# Directory names that tables of contents never descend into.
ignored_directories = ["images", "img", "assets"]

[hugo]
# Output directory for the projected content tree, relative to the project root.
output = "hugo/content"
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.documentation_root, "docs");
        assert_eq!(config.legacy_directory, "legacy");
        assert_eq!(config.hugo.output, "hugo/content");
    }

    #[test]
    fn load_config_merges_partial_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            "documentation_root = \"documentation\"\n[hugo]\noutput = \"site/content\"\n",
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.documentation_root, "documentation");
        assert_eq!(config.hugo.output, "site/content");
        // untouched keys keep their defaults
        assert_eq!(config.legacy_directory, "legacy");
        assert!(config.toc.ignored_directories.contains(&"images".to_string()));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "this is not valid toml [[[").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "documentaton_root = \"x\"\n").unwrap();

        assert!(load_config(tmp.path()).is_err());
    }

    #[test]
    fn unknown_nested_key_rejected() {
        let toml = "[hugo]\nouput = \"x\"\n";
        let result: Result<ProjectConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn validate_empty_documentation_root() {
        let config = ProjectConfig {
            documentation_root: "  ".to_string(),
            ..ProjectConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_absolute_legacy_directory() {
        let config = ProjectConfig {
            legacy_directory: "/legacy".to_string(),
            ..ProjectConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(ProjectConfig::default().validate().is_ok());
    }

    #[test]
    fn resolve_config_keeps_defaults_of_untouched_tables() {
        let config = resolve_config(Some("[hugo]\noutput = \"b\"\n[toc]\n")).unwrap();
        assert_eq!(config.hugo.output, "b");
        assert_eq!(config.toc.ignored_directories, TocConfig::default().ignored_directories);
        assert_eq!(config.documentation_root, "docs");
    }

    #[test]
    fn resolve_config_validates_file_values() {
        let result = resolve_config(Some("documentation_root = \"\"\n"));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn read_config_file_absent_is_none() {
        let tmp = TempDir::new().unwrap();
        assert!(read_config_file(tmp.path()).unwrap().is_none());
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let config: ProjectConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = ProjectConfig::default();
        assert_eq!(config.documentation_root, defaults.documentation_root);
        assert_eq!(config.legacy_directory, defaults.legacy_directory);
        assert_eq!(config.excluded_directories, defaults.excluded_directories);
        assert_eq!(config.toc.ignored_directories, defaults.toc.ignored_directories);
        assert_eq!(config.hugo.output, defaults.hugo.output);
    }

    #[test]
    fn excluded_directory_lookup() {
        let config = ProjectConfig::default();
        assert!(config.is_excluded("target"));
        assert!(!config.is_excluded("docs"));
    }
}
