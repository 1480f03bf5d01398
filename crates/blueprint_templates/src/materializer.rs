//! Template materialization.
//!
//! [`Materializer::create_files`] builds the complete output tree in a fresh
//! staging directory, checks every staged entry against the destination, and
//! only then copies the tree into place. Copying never overwrites: each
//! folder is created with `create_dir` and each file with `create_new`, so a
//! path that appears between the pre-flight check and the copy still fails
//! with [`TemplateError::WriteConflict`]. Entries copied before such a late
//! conflict are left in place.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use serde_json::Value;
use tempfile::TempDir;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{TemplateError, TemplateResult};
use crate::input::UserInput;
use crate::manifest::load_manifest;
use crate::renderer::{RenderedContent, TemplateRenderer};
use crate::scanner::{TemplateTree, TreeEntry};
use crate::transforms::{apply_date_transforms, apply_name_transforms};

/// Report of a successful materialization.
#[derive(Debug, Clone, Default)]
pub struct MaterializeOutcome {
    /// Directory the template was written into (includes the container folder).
    pub destination_root: PathBuf,
    /// Every folder and file created, in copy order.
    pub created_paths: Vec<PathBuf>,
    /// Files copied unmodified because their contents could not be rendered,
    /// relative to `destination_root`.
    pub verbatim_files: Vec<PathBuf>,
}

/// Materializes templates into destination directories.
pub struct Materializer {
    renderer: Arc<TemplateRenderer>,
    staging_parent: Option<PathBuf>,
}

impl Default for Materializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Materializer {
    /// Create a materializer with its own template renderer.
    pub fn new() -> Self {
        Self::with_renderer(Arc::new(TemplateRenderer::new()))
    }

    /// Create a materializer sharing an existing renderer.
    pub fn with_renderer(renderer: Arc<TemplateRenderer>) -> Self {
        Self {
            renderer,
            staging_parent: None,
        }
    }

    /// Create staging directories under `dir` instead of the system temp dir.
    pub fn with_staging_parent(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_parent = Some(dir.into());
        self
    }

    /// Materialize using the current local time for date tokens.
    pub async fn create_files_now(
        &self,
        input: &UserInput,
        destination: &Path,
    ) -> TemplateResult<MaterializeOutcome> {
        self.create_files(input, destination, Local::now().naive_local())
            .await
    }

    /// Materialize `input` into `destination`.
    pub async fn create_files(
        &self,
        input: &UserInput,
        destination: &Path,
        reference_date: NaiveDateTime,
    ) -> TemplateResult<MaterializeOutcome> {
        input.validate()?;

        let template_path = input.selected_template_path.clone();
        let manifest = load_manifest(&template_path);
        let name = manifest.sanitized_name(&input.input_name);

        let destination_root = match manifest.container_folder_name(&name) {
            Some(folder) => destination.join(container_folder_path(&folder, &name)?),
            None => destination.to_path_buf(),
        };

        info!(
            "Materializing template {:?} as '{}' into {:?}",
            template_path, name, destination_root
        );

        let staging = self.create_staging_dir()?;
        debug!("Staging in {:?}", staging.path());

        let context = Arc::new(self.renderer.build_context(
            &name,
            &input.context_values(),
            &reference_date,
        ));
        let verbatim_files = self
            .stage_tree(&template_path, staging.path(), &name, reference_date, context)
            .await?;

        let staging_root = staging.path().to_path_buf();
        let copy_root = destination_root.clone();
        let created_paths =
            tokio::task::spawn_blocking(move || copy_staged_tree(&staging_root, &copy_root))
                .await
                .map_err(join_error)??;

        if let Err(e) = staging.close() {
            warn!("Failed to remove staging directory: {}", e);
        }

        info!(
            "Created {} entries in {:?}",
            created_paths.len(),
            destination_root
        );

        Ok(MaterializeOutcome {
            destination_root,
            created_paths,
            verbatim_files,
        })
    }

    fn create_staging_dir(&self) -> io::Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("blueprint-staging-");
        match &self.staging_parent {
            Some(parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        }
    }

    /// Replicate the template under `staging`, returning files kept verbatim.
    ///
    /// Folders are created first, parents before children. File rendering
    /// then runs concurrently, one blocking task per file.
    async fn stage_tree(
        &self,
        template_path: &Path,
        staging: &Path,
        name: &str,
        date: NaiveDateTime,
        context: Arc<Value>,
    ) -> TemplateResult<Vec<PathBuf>> {
        let files = {
            let template_path = template_path.to_path_buf();
            let staging = staging.to_path_buf();
            let name = name.to_string();
            tokio::task::spawn_blocking(move || {
                stage_folders(&template_path, &staging, &name, &date)
            })
            .await
            .map_err(join_error)??
        };

        let mut tasks = JoinSet::new();
        for (source_relative, staged_relative) in files {
            let source = template_path.join(&source_relative);
            let target = staging.join(&staged_relative);
            let renderer = Arc::clone(&self.renderer);
            let context = Arc::clone(&context);
            let name = name.to_string();

            tasks.spawn_blocking(move || -> TemplateResult<Option<PathBuf>> {
                let verbatim = stage_file(&renderer, &source, &target, &name, &date, &context)?;
                Ok(verbatim.then_some(staged_relative))
            });
        }

        join_staged_files(tasks).await
    }
}

/// Wait for every staging task. On the first failure, tasks that have not
/// started are aborted, but running ones are still awaited so nothing writes
/// into the staging directory after it is removed.
async fn join_staged_files(
    mut tasks: JoinSet<TemplateResult<Option<PathBuf>>>,
) -> TemplateResult<Vec<PathBuf>> {
    let mut verbatim_files = Vec::new();
    let mut failure = None;

    while let Some(joined) = tasks.join_next().await {
        if failure.is_some() {
            continue;
        }
        match joined.map_err(join_error).and_then(|result| result) {
            Ok(Some(path)) => verbatim_files.push(path),
            Ok(None) => {}
            Err(e) => {
                tasks.abort_all();
                failure = Some(e);
            }
        }
    }

    match failure {
        Some(e) => Err(e),
        None => {
            verbatim_files.sort();
            Ok(verbatim_files)
        }
    }
}

fn join_error(e: tokio::task::JoinError) -> TemplateError {
    TemplateError::Io(io::Error::new(io::ErrorKind::Other, e))
}

/// Apply name and date tokens to every component of a relative path.
pub fn transform_relative_path(
    relative: &Path,
    name: &str,
    date: &NaiveDateTime,
) -> TemplateResult<PathBuf> {
    let mut transformed = PathBuf::new();
    for component in relative.components() {
        let raw = component.as_os_str().to_string_lossy();
        let segment = apply_date_transforms(&apply_name_transforms(&raw, name), date);
        if segment.is_empty() || segment == "." || segment == ".." || segment.contains(['/', '\\']) {
            return Err(TemplateError::InvalidInput(format!(
                "name '{}' turns {:?} into an invalid path segment {:?}",
                name, raw, segment
            )));
        }
        transformed.push(segment);
    }
    Ok(transformed)
}

/// Validate a container folder name produced from the manifest pattern.
///
/// Nested relative folders (`packages/my-widget`) are allowed; absolute
/// paths and empty, `.` or `..` segments are not.
fn container_folder_path(folder: &str, name: &str) -> TemplateResult<PathBuf> {
    let path = Path::new(folder);
    let invalid_segment = folder
        .split(['/', '\\'])
        .any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if path.is_absolute() || path.has_root() || invalid_segment {
        return Err(TemplateError::InvalidInput(format!(
            "name '{}' turns the container folder into an invalid path {:?}",
            name, folder
        )));
    }
    Ok(folder.split(['/', '\\']).collect())
}

/// Create every staged folder and return `(template file, staged file)`
/// pairs, both relative.
fn stage_folders(
    template_path: &Path,
    staging: &Path,
    name: &str,
    date: &NaiveDateTime,
) -> TemplateResult<Vec<(PathBuf, PathBuf)>> {
    let mut files = Vec::new();
    for entry in TemplateTree::new(template_path) {
        let entry = entry?;
        let staged = transform_relative_path(entry.relative_path(), name, date)?;
        match entry {
            TreeEntry::Folder(_) => {
                fs::create_dir_all(staging.join(&staged))?;
                debug!("Staged folder {:?}", staged);
            }
            TreeEntry::File(source) => files.push((source, staged)),
        }
    }
    Ok(files)
}

/// Render one template file into the staging tree. Returns `true` when the
/// file had to be copied verbatim.
fn stage_file(
    renderer: &TemplateRenderer,
    source: &Path,
    target: &Path,
    name: &str,
    date: &NaiveDateTime,
    context: &Value,
) -> TemplateResult<bool> {
    let raw = fs::read(source)?;

    let text = match String::from_utf8(raw) {
        Ok(text) => text,
        Err(e) => {
            debug!("Copying binary file {:?}", source);
            fs::write(target, e.into_bytes())?;
            return Ok(false);
        }
    };

    match renderer.render_with_context(&text, name, date, context) {
        RenderedContent::Rendered(content) => {
            fs::write(target, content)?;
            debug!("Rendered {:?}", target);
            Ok(false)
        }
        RenderedContent::Verbatim { reason } => {
            warn!("Copying {:?} unmodified: {}", source, reason);
            fs::write(target, text)?;
            Ok(true)
        }
    }
}

fn conflict_or_io(e: io::Error, path: &Path) -> TemplateError {
    if e.kind() == io::ErrorKind::AlreadyExists {
        TemplateError::WriteConflict {
            path: path.to_path_buf(),
        }
    } else {
        TemplateError::Io(e)
    }
}

/// Copy the staged tree into `destination_root` without overwriting anything.
fn copy_staged_tree(staging: &Path, destination_root: &Path) -> TemplateResult<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(staging).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(staging)
            .unwrap_or_else(|_| entry.path())
            .to_path_buf();
        entries.push((entry.path().to_path_buf(), relative, entry.file_type().is_dir()));
    }

    if fs::metadata(destination_root).map_or(false, |meta| !meta.is_dir()) {
        return Err(TemplateError::WriteConflict {
            path: destination_root.to_path_buf(),
        });
    }

    if let Some((_, relative, _)) = entries
        .iter()
        .find(|(_, relative, _)| fs::symlink_metadata(destination_root.join(relative)).is_ok())
    {
        return Err(TemplateError::WriteConflict {
            path: destination_root.join(relative),
        });
    }

    fs::create_dir_all(destination_root).map_err(|e| conflict_or_io(e, destination_root))?;

    let mut created = Vec::with_capacity(entries.len());
    for (staged, relative, is_dir) in entries {
        let target = destination_root.join(&relative);
        if is_dir {
            fs::create_dir(&target).map_err(|e| conflict_or_io(e, &target))?;
        } else {
            let mut output = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&target)
                .map_err(|e| conflict_or_io(e, &target))?;
            let mut input = fs::File::open(&staged)?;
            io::copy(&mut input, &mut output)?;
        }
        debug!("Created {:?}", target);
        created.push(target);
    }

    Ok(created)
}
