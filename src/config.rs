//! Configuration schema for retdoc.
//!
//! Configuration is optional: every field has a default, so the tool runs
//! without a config file at all.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub name: String,
    /// Whether functions with missing or unrecognized docstrings are exempt
    /// from the missing-documentation checks (default: true)
    #[serde(default)]
    pub accept_no_return_doc: Option<bool>,
    /// Whether to include test files in analysis (default: false)
    #[serde(default)]
    pub include_test_files: Option<bool>,
    /// Glob patterns for paths to exclude from analysis (e.g., "**/migrations/**")
    #[serde(default)]
    pub excluded_paths: Vec<String>,
    /// Minimum documentation coverage to pass, 0-100 (default: 100)
    #[serde(default)]
    pub min_coverage: Option<i32>,
}

impl Config {
    /// Parse a configuration from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Returns whether undocumented returns are accepted (defaults to true).
    pub fn accept_no_return_doc(&self) -> bool {
        self.accept_no_return_doc.unwrap_or(true)
    }

    /// Returns whether to include test files (defaults to false).
    pub fn should_include_test_files(&self) -> bool {
        self.include_test_files.unwrap_or(false)
    }

    /// Returns the coverage threshold (defaults to 100).
    pub fn coverage_threshold(&self) -> i32 {
        self.min_coverage.unwrap_or(100).clamp(0, 100)
    }

    /// Check if a path should be excluded based on excluded_paths patterns.
    /// Uses globset for matching, which supports `**` for recursive directory matching.
    pub fn is_path_excluded(&self, path: &Path) -> bool {
        if self.excluded_paths.is_empty() {
            return false;
        }

        let path_str = path.to_string_lossy();

        for pattern in &self.excluded_paths {
            if let Ok(glob) = globset::Glob::new(pattern) {
                let matcher = glob.compile_matcher();
                if matcher.is_match(&*path_str) {
                    return true;
                }
            }
        }
        false
    }
}

/// Validate a parsed configuration.
pub fn validate(config: &Config) -> anyhow::Result<()> {
    if let Some(threshold) = config.min_coverage {
        if !(0..=100).contains(&threshold) {
            anyhow::bail!("min_coverage must be between 0 and 100, got {}", threshold);
        }
    }
    for pattern in &config.excluded_paths {
        if globset::Glob::new(pattern).is_err() {
            anyhow::bail!("invalid exclusion pattern: {:?}", pattern);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.accept_no_return_doc());
        assert!(!config.should_include_test_files());
        assert_eq!(config.coverage_threshold(), 100);
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
version: "1"
name: my-project
accept_no_return_doc: false
include_test_files: true
excluded_paths:
  - "**/migrations/**"
min_coverage: 80
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(!config.accept_no_return_doc());
        assert!(config.should_include_test_files());
        assert_eq!(config.coverage_threshold(), 80);
        assert!(config.is_path_excluded(Path::new("app/migrations/0001_initial.py")));
        assert!(!config.is_path_excluded(Path::new("app/models.py")));
    }

    #[test]
    fn test_validate_rejects_bad_threshold() {
        let config = Config {
            min_coverage: Some(150),
            ..Default::default()
        };
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_glob() {
        let config = Config {
            excluded_paths: vec!["[".to_string()],
            ..Default::default()
        };
        assert!(validate(&config).is_err());
    }
}
