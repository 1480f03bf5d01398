//! Per-template manifest.
//!
//! A template directory may carry a `blueprint-manifest.json` at its root that
//! tweaks how the input name is interpreted and where output lands. The
//! manifest is optional and loading it never fails: a missing, empty or
//! malformed file yields [`TemplateManifest::default`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::transforms::apply_name_transforms;

/// Reserved manifest file name at the root of each template.
pub const MANIFEST_FILE_NAME: &str = "blueprint-manifest.json";

/// Template manifest options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateManifest {
    /// Suffixes stripped from the end of the input name (first match wins)
    #[serde(default)]
    pub suffixes_to_ignore_in_input: Vec<String>,
    /// Pattern for a wrapper folder that receives all generated output
    #[serde(default)]
    pub create_files_in_folder_with_pattern: Option<String>,
}

impl TemplateManifest {
    /// Container folder pattern, treating an empty string as absent.
    pub fn container_folder_pattern(&self) -> Option<&str> {
        self.create_files_in_folder_with_pattern
            .as_deref()
            .filter(|p| !p.is_empty())
    }

    /// Name of the container folder for `name`, or `None` to write directly
    /// into the destination.
    pub fn container_folder_name(&self, name: &str) -> Option<String> {
        self.container_folder_pattern()
            .map(|pattern| apply_name_transforms(pattern, name))
            .filter(|folder| !folder.is_empty())
    }

    /// Strip at most one ignorable suffix from `input_name`.
    pub fn sanitized_name(&self, input_name: &str) -> String {
        sanitized_name(input_name, &self.suffixes_to_ignore_in_input)
    }
}

/// Load the manifest for a template directory.
pub fn load_manifest(template_path: &Path) -> TemplateManifest {
    let manifest_path = template_path.join(MANIFEST_FILE_NAME);

    let content = match fs::read_to_string(&manifest_path) {
        Ok(content) => content,
        Err(e) => {
            debug!("No manifest at {:?} ({}), using defaults", manifest_path, e);
            return TemplateManifest::default();
        }
    };

    if content.trim().is_empty() {
        return TemplateManifest::default();
    }

    match serde_json::from_str::<Option<TemplateManifest>>(&content) {
        Ok(Some(manifest)) => manifest,
        Ok(None) => TemplateManifest::default(),
        Err(e) => {
            warn!("Ignoring malformed manifest {:?}: {}", manifest_path, e);
            TemplateManifest::default()
        }
    }
}

/// Strip the first matching suffix (case-insensitive) from the end of `name`.
pub fn sanitized_name(name: &str, suffixes: &[String]) -> String {
    let chars: Vec<char> = name.chars().collect();

    for suffix in suffixes.iter().filter(|s| !s.is_empty()) {
        let suffix_len = suffix.chars().count();
        if suffix_len > chars.len() {
            continue;
        }
        let split = chars.len() - suffix_len;
        let tail: String = chars[split..].iter().collect();
        if tail.to_lowercase() == suffix.to_lowercase() {
            return chars[..split].iter().collect();
        }
    }

    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn suffixes(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_missing_manifest_is_default() {
        let temp = tempdir().unwrap();
        assert_eq!(load_manifest(temp.path()), TemplateManifest::default());
    }

    #[test]
    fn test_empty_and_malformed_manifest_is_default() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(MANIFEST_FILE_NAME);

        fs::write(&path, "").unwrap();
        assert_eq!(load_manifest(temp.path()), TemplateManifest::default());

        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_manifest(temp.path()), TemplateManifest::default());

        fs::write(&path, "null").unwrap();
        assert_eq!(load_manifest(temp.path()), TemplateManifest::default());

        fs::write(&path, "[1, 2]").unwrap();
        assert_eq!(load_manifest(temp.path()), TemplateManifest::default());
    }

    #[test]
    fn test_partial_manifest_merges_with_defaults() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join(MANIFEST_FILE_NAME),
            r#"{ "suffixesToIgnoreInInput": ["Component"], "author": "someone" }"#,
        )
        .unwrap();

        let manifest = load_manifest(temp.path());
        assert_eq!(manifest.suffixes_to_ignore_in_input, suffixes(&["Component"]));
        assert_eq!(manifest.create_files_in_folder_with_pattern, None);
    }

    #[test]
    fn test_container_folder_name() {
        let manifest: TemplateManifest = serde_json::from_str(
            r#"{ "createFilesInFolderWithPattern": "__kebabCase_name__" }"#,
        )
        .unwrap();
        assert_eq!(manifest.container_folder_name("MyWidget"), Some("my-widget".to_string()));

        let empty: TemplateManifest =
            serde_json::from_str(r#"{ "createFilesInFolderWithPattern": "" }"#).unwrap();
        assert_eq!(empty.container_folder_name("MyWidget"), None);
        assert_eq!(TemplateManifest::default().container_folder_name("MyWidget"), None);
    }

    #[test]
    fn test_sanitized_name() {
        assert_eq!(sanitized_name("FooComponent", &suffixes(&["Component"])), "Foo");
        assert_eq!(sanitized_name("Foocomponent", &suffixes(&["Component"])), "Foo");
        assert_eq!(sanitized_name("Foo", &suffixes(&["Component"])), "Foo");
        assert_eq!(sanitized_name("FooComponent", &[]), "FooComponent");
    }

    #[test]
    fn test_sanitized_name_strips_at_most_one_suffix() {
        let list = suffixes(&["Page", "ViewPage"]);
        assert_eq!(sanitized_name("HomeViewPage", &list), "HomeView");

        let list = suffixes(&["Component", "Component"]);
        assert_eq!(sanitized_name("FooComponentComponent", &list), "FooComponent");
    }
}
