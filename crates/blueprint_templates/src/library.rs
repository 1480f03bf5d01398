//! Template discovery across configured search roots.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{TemplateError, TemplateResult};
use crate::scanner::list_folders;

/// A selectable template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEntry {
    /// Folder name of the template
    pub name: String,
    /// Full path to the template directory
    pub path: PathBuf,
    /// Search root the template was found in
    pub root: PathBuf,
}

/// Expand a configured templates folder.
///
/// A leading `~` resolves against the home directory; any other relative
/// path resolves against `workspace_root`.
pub fn expand_folder_path(folder: &str, workspace_root: &Path, home: Option<&Path>) -> PathBuf {
    if let Some(rest) = folder.strip_prefix('~') {
        if let Some(home) = home {
            let rest = rest.trim_start_matches(['/', '\\']);
            return if rest.is_empty() {
                home.to_path_buf()
            } else {
                home.join(rest)
            };
        }
    }

    let path = Path::new(folder);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        workspace_root.join(path)
    }
}

/// Ordered set of template search roots.
#[derive(Debug, Clone, Default)]
pub struct TemplateLibrary {
    search_roots: Vec<PathBuf>,
}

impl TemplateLibrary {
    pub fn new<I, P>(search_roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            search_roots: search_roots.into_iter().map(Into::into).collect(),
        }
    }

    /// Build a library from configured folder strings.
    pub fn from_folders(folders: &[String], workspace_root: &Path) -> Self {
        let home = dirs::home_dir();
        Self::new(
            folders
                .iter()
                .map(|folder| expand_folder_path(folder, workspace_root, home.as_deref())),
        )
    }

    pub fn search_roots(&self) -> &[PathBuf] {
        &self.search_roots
    }

    /// Every template in every search root, in root order.
    ///
    /// Roots that cannot be read are skipped. Finding no template at all is a
    /// setup error.
    pub fn discover(&self) -> TemplateResult<Vec<TemplateEntry>> {
        let mut templates = Vec::new();

        for root in &self.search_roots {
            match list_folders(root) {
                Ok(names) => {
                    debug!("Found {} templates in {:?}", names.len(), root);
                    templates.extend(names.into_iter().map(|name| TemplateEntry {
                        path: root.join(&name),
                        root: root.clone(),
                        name,
                    }));
                }
                Err(e) => {
                    warn!("Error loading template path {:?}: {}", root, e);
                }
            }
        }

        if templates.is_empty() {
            return Err(TemplateError::no_templates_found());
        }

        info!("Discovered {} templates", templates.len());
        Ok(templates)
    }

    /// Find a template by folder name, or accept a direct path to one.
    pub fn find(&self, name_or_path: &str) -> TemplateResult<TemplateEntry> {
        if name_or_path.trim().is_empty() {
            return Err(TemplateError::NoTemplateSelected);
        }

        let direct = Path::new(name_or_path);
        if direct.components().count() > 1 && direct.is_dir() {
            return Ok(TemplateEntry {
                name: direct
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| name_or_path.to_string()),
                path: direct.to_path_buf(),
                root: direct.parent().map(Path::to_path_buf).unwrap_or_default(),
            });
        }

        self.discover()?
            .into_iter()
            .find(|entry| entry.name == name_or_path)
            .ok_or(TemplateError::NoTemplateSelected)
    }
}
