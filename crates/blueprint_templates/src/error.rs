//! Error types for template materialization.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur while discovering or materializing templates.
///
/// The set is closed: callers decide how to surface an error by matching on
/// the variant, or through [`TemplateError::is_silent`] and
/// [`TemplateError::is_modal`].
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("canceled")]
    Cancelled,

    #[error("{0}")]
    Setup(String),

    #[error("Unable to create file(s): No Name Given")]
    NoNameGiven,

    #[error("Unable to create file(s): No Template Selected")]
    NoTemplateSelected,

    #[error("File already exists at path: {}", .path.display())]
    WriteConflict { path: PathBuf },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to walk template tree: {0}")]
    Walk(#[from] walkdir::Error),
}

impl TemplateError {
    /// Build the error raised when no template exists in any search root.
    pub fn no_templates_found() -> Self {
        TemplateError::Setup(
            "No templates found. Create a templates folder (for example .blueprints) \
             with one sub-folder per template, or point templates_paths at one."
                .to_string(),
        )
    }

    /// Whether the error should be swallowed without telling the user.
    pub fn is_silent(&self) -> bool {
        matches!(self, TemplateError::Cancelled)
    }

    /// Whether the error blocks the user until they fix their setup.
    pub fn is_modal(&self) -> bool {
        matches!(self, TemplateError::Setup(_))
    }

    /// The colliding destination path, for write conflicts.
    pub fn conflict_path(&self) -> Option<&std::path::Path> {
        match self {
            TemplateError::WriteConflict { path } => Some(path),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_flags() {
        assert!(TemplateError::Cancelled.is_silent());
        assert!(!TemplateError::Cancelled.is_modal());
        assert!(TemplateError::no_templates_found().is_modal());
        assert!(!TemplateError::NoNameGiven.is_silent());
    }

    #[test]
    fn test_write_conflict_names_path() {
        let err = TemplateError::WriteConflict {
            path: PathBuf::from("/tmp/out/Foo.txt"),
        };
        assert_eq!(err.to_string(), "File already exists at path: /tmp/out/Foo.txt");
        assert_eq!(err.conflict_path(), Some(std::path::Path::new("/tmp/out/Foo.txt")));
    }
}
