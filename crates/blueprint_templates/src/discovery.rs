//! Discovery of user-defined `{{$token}}` placeholders.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use regex::Regex;
use tracing::debug;

use crate::error::TemplateResult;
use crate::scanner::list_all_files_recursively;

/// Finds dynamic tokens in template files.
///
/// A dynamic token is the `$`-prefixed identifier inside a mustache, so
/// `{{$status}}` and `{{upperCase $status }}` both yield `$status`.
pub struct DynamicTokenScanner {
    pattern: Regex,
}

impl Default for DynamicTokenScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl DynamicTokenScanner {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"\{\{.*?(\$.*?)\s?\}\}").expect("dynamic token pattern is valid"),
        }
    }

    /// Tokens found in a piece of text, in order of appearance.
    pub fn tokens_in<'a>(&'a self, content: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pattern
            .captures_iter(content)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
    }

    /// Distinct tokens used anywhere under `template_path`.
    pub fn discover(&self, template_path: &Path) -> TemplateResult<BTreeSet<String>> {
        let mut tokens = BTreeSet::new();
        for relative in list_all_files_recursively(template_path)? {
            if let Some(content) = read_text(&template_path.join(&relative)) {
                tokens.extend(self.tokens_in(&content).map(str::to_string));
            }
        }
        Ok(tokens)
    }

    /// Whether any file under `template_path` uses a dynamic token.
    pub fn has_tokens(&self, template_path: &Path) -> TemplateResult<bool> {
        for relative in list_all_files_recursively(template_path)? {
            if let Some(content) = read_text(&template_path.join(&relative)) {
                if self.pattern.is_match(&content) {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
}

fn read_text(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            debug!("Skipping {:?} during token discovery: {}", path, e);
            None
        }
    }
}

/// Distinct dynamic tokens used anywhere under `template_path`.
pub fn discover_dynamic_tokens(template_path: &Path) -> TemplateResult<BTreeSet<String>> {
    DynamicTokenScanner::new().discover(template_path)
}

/// Whether any file under `template_path` uses a dynamic token.
pub fn has_dynamic_tokens(template_path: &Path) -> TemplateResult<bool> {
    DynamicTokenScanner::new().has_tokens(template_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_tokens_in_content() {
        let scanner = DynamicTokenScanner::new();
        let found: Vec<&str> = scanner
            .tokens_in("{{$test}} and {{upperCase $status }} but not {{name}}")
            .collect();
        assert_eq!(found, vec!["$test", "$status"]);
    }

    #[test]
    fn test_discover_dedupes_across_files() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("a.txt"), "{{$emotion}} {{$test}}").unwrap();
        fs::write(temp.path().join("nested/b.txt"), "{{$test}} {{kebabCase $status}}").unwrap();
        fs::write(temp.path().join("image.bin"), [0xff, 0xfe, 0x00]).unwrap();

        let tokens = discover_dynamic_tokens(temp.path()).unwrap();
        let expected: BTreeSet<String> = ["$emotion", "$status", "$test"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(tokens, expected);
        assert!(has_dynamic_tokens(temp.path()).unwrap());
    }

    #[test]
    fn test_no_tokens() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("a.txt"), "Hello {{pascalCase name}}").unwrap();

        assert!(discover_dynamic_tokens(temp.path()).unwrap().is_empty());
        assert!(!has_dynamic_tokens(temp.path()).unwrap());
    }
}
