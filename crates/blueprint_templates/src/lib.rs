//! # blueprint_templates
//!
//! File and folder scaffolding from template directories.
//!
//! A template is a directory tree whose file names, folder names and file
//! contents carry placeholder tokens. Materializing it for a name such as
//! `MyWidget` produces a new tree with every token resolved:
//!
//! - `__kebabCase_name__` style literal tokens in paths and contents
//! - `{{pascalCase name}}` style Handlebars helpers in contents
//! - `{{$token}}` dynamic tokens whose values the user supplies
//! - `__currentYear__` / `{{currentYear}}` date tokens
//!
//! An optional `blueprint-manifest.json` per template strips suffixes from
//! the input name and can wrap the output in a container folder.
//!
//! ## Example
//!
//! ```rust,no_run
//! use blueprint_templates::{Materializer, TemplateLibrary, UserInput};
//! use std::path::Path;
//!
//! # async fn run() -> blueprint_templates::TemplateResult<()> {
//! let library = TemplateLibrary::new([".blueprints"]);
//! let template = library.find("component")?;
//!
//! let input = UserInput::new("UserCard", &template.path)
//!     .with_dynamic_value("$status", "draft");
//!
//! let outcome = Materializer::new()
//!     .create_files_now(&input, Path::new("src/components"))
//!     .await?;
//! println!("created {} entries", outcome.created_paths.len());
//! # Ok(())
//! # }
//! ```

pub mod discovery;
pub mod error;
pub mod input;
pub mod library;
pub mod manifest;
pub mod materializer;
pub mod renderer;
pub mod scanner;
pub mod transforms;

pub use discovery::{discover_dynamic_tokens, has_dynamic_tokens, DynamicTokenScanner};
pub use error::{TemplateError, TemplateResult};
pub use input::{parse_dynamic_assignment, DynamicTemplateValues, DynamicValue, UserInput};
pub use library::{expand_folder_path, TemplateEntry, TemplateLibrary};
pub use manifest::{load_manifest, sanitized_name, TemplateManifest, MANIFEST_FILE_NAME};
pub use materializer::{MaterializeOutcome, Materializer};
pub use renderer::{RenderedContent, TemplateRenderer};
pub use scanner::{
    list_all_files_recursively, list_files, list_folders, TemplateTree, TreeEntry,
};
pub use transforms::{
    apply_date_transforms, apply_name_transforms, substitute_all_occurrences, CaseTransform,
};
