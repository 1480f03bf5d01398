//! Template tree scanning.
//!
//! Lists the files and folders that make up a template, skipping the manifest
//! and the junk files operating systems like to drop into folders.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::TemplateResult;
use crate::manifest::MANIFEST_FILE_NAME;

/// File name prefixes that are never treated as template files.
pub const IGNORED_FILE_PREFIXES: [&str; 7] = [
    ".DS_Store",
    ".DS_Store?",
    "._",
    ".Spotlight-V100",
    ".Trashes",
    "ehthumbs.db",
    "Thumbs.db",
];

/// Whether a file name is an OS artifact that should be skipped.
pub fn should_ignore_file_name(file_name: &str) -> bool {
    IGNORED_FILE_PREFIXES
        .iter()
        .any(|prefix| file_name.starts_with(prefix))
}

/// An entry of a template tree, relative to the template root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEntry {
    Folder(PathBuf),
    File(PathBuf),
}

impl TreeEntry {
    pub fn relative_path(&self) -> &Path {
        match self {
            TreeEntry::Folder(path) | TreeEntry::File(path) => path,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, TreeEntry::Folder(_))
    }
}

/// Lazy, depth-first walk over a template directory.
///
/// Every folder is yielded before anything inside it. Within one folder,
/// sub-folders (and their contents) come before files, both sorted by name.
pub struct TemplateTree {
    root: PathBuf,
    walker: walkdir::FilterEntry<walkdir::IntoIter, fn(&DirEntry) -> bool>,
}

impl TemplateTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let walker = WalkDir::new(&root)
            .min_depth(1)
            .follow_links(true)
            .sort_by(|a, b| {
                b.file_type()
                    .is_dir()
                    .cmp(&a.file_type().is_dir())
                    .then_with(|| a.file_name().cmp(b.file_name()))
            })
            .into_iter()
            .filter_entry(is_template_entry as fn(&DirEntry) -> bool);

        Self { root, walker }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn is_template_entry(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return true;
    }
    let name = entry.file_name().to_string_lossy();
    if name == MANIFEST_FILE_NAME {
        return false;
    }
    entry.file_type().is_dir() || !should_ignore_file_name(&name)
}

impl Iterator for TemplateTree {
    type Item = TemplateResult<TreeEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = match self.walker.next()? {
            Ok(entry) => entry,
            Err(e) => return Some(Err(e.into())),
        };

        let relative = entry
            .path()
            .strip_prefix(&self.root)
            .unwrap_or_else(|_| entry.path())
            .to_path_buf();

        Some(Ok(if entry.file_type().is_dir() {
            TreeEntry::Folder(relative)
        } else {
            TreeEntry::File(relative)
        }))
    }
}

/// File names directly inside `directory`, sorted.
pub fn list_files(directory: &Path) -> TemplateResult<Vec<String>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if fs::metadata(entry.path())?.is_dir() {
            continue;
        }
        if name == MANIFEST_FILE_NAME || should_ignore_file_name(&name) {
            continue;
        }
        files.push(name);
    }
    files.sort();
    Ok(files)
}

/// Folder names directly inside `directory`, sorted.
pub fn list_folders(directory: &Path) -> TemplateResult<Vec<String>> {
    let mut folders = Vec::new();
    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name != MANIFEST_FILE_NAME && fs::metadata(entry.path())?.is_dir() {
            folders.push(name);
        }
    }
    folders.sort();
    Ok(folders)
}

/// Every template file under `root`, as paths relative to `root`.
pub fn list_all_files_recursively(root: &Path) -> TemplateResult<Vec<PathBuf>> {
    TemplateTree::new(root)
        .filter_map(|entry| match entry {
            Ok(TreeEntry::File(path)) => Some(Ok(path)),
            Ok(TreeEntry::Folder(_)) => None,
            Err(e) => Some(Err(e)),
        })
        .collect()
}
