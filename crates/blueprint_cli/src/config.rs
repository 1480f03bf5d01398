//! CLI configuration.
//!
//! Read from `.blueprint.yaml` in the working directory when present:
//!
//! ```yaml
//! templates_paths:
//!   - .blueprints
//!   - ~/shared-blueprints
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Configuration file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".blueprint.yaml";

fn default_templates_paths() -> Vec<String> {
    vec![".blueprints".to_string()]
}

/// Blueprint CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlueprintConfig {
    /// Template search roots, in lookup order
    #[serde(default = "default_templates_paths")]
    pub templates_paths: Vec<String>,
}

impl Default for BlueprintConfig {
    fn default() -> Self {
        Self {
            templates_paths: default_templates_paths(),
        }
    }
}

impl BlueprintConfig {
    /// Load the configuration from `workspace_root`, falling back to defaults
    /// when no configuration file exists.
    pub fn load(workspace_root: &Path) -> Result<Self> {
        let path = workspace_root.join(CONFIG_FILE_NAME);
        if !path.exists() {
            debug!("No {} found, using defaults", CONFIG_FILE_NAME);
            return Ok(Self::default());
        }

        let content =
            fs::read_to_string(&path).with_context(|| format!("Failed to read {:?}", path))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content).with_context(|| format!("Invalid configuration in {:?}", path))
    }

    /// Replace the configured search roots when any are given on the command line.
    pub fn with_overrides(mut self, templates_paths: &[String]) -> Self {
        if !templates_paths.is_empty() {
            self.templates_paths = templates_paths.to_vec();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_when_missing() {
        let temp = tempdir().unwrap();
        let config = BlueprintConfig::load(temp.path()).unwrap();
        assert_eq!(config.templates_paths, vec![".blueprints"]);
    }

    #[test]
    fn test_load_yaml() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "templates_paths:\n  - templates\n  - ~/shared\n",
        )
        .unwrap();

        let config = BlueprintConfig::load(temp.path()).unwrap();
        assert_eq!(config.templates_paths, vec!["templates", "~/shared"]);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), "templates_paths: [unclosed").unwrap();
        assert!(BlueprintConfig::load(temp.path()).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = BlueprintConfig::default().with_overrides(&["other".to_string()]);
        assert_eq!(config.templates_paths, vec!["other"]);
        let config = BlueprintConfig::default().with_overrides(&[]);
        assert_eq!(config.templates_paths, vec![".blueprints"]);
    }
}
