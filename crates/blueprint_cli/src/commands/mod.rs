//! CLI command definitions.
//!
//! Each subcommand maps to one step a host editor would drive: listing the
//! available templates, asking which dynamic tokens a template needs, and
//! materializing it.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use blueprint_templates::TemplateLibrary;

use crate::config::BlueprintConfig;

pub mod list;
pub mod new;
pub mod tokens;

/// Blueprint - scaffold files and folders from templates
#[derive(Parser)]
#[command(name = "blueprint")]
#[command(version, about = "Blueprint - scaffold files and folders from templates")]
#[command(long_about = r#"
Blueprint creates files and folders from template directories. Template file
names, folder names and contents may use name tokens such as
__kebabCase_name__ or {{pascalCase name}}, date tokens such as
{{currentYear}}, and dynamic tokens such as {{$status}}.

COMMANDS:
  list     → Show templates found in the configured search roots
  tokens   → Show the dynamic tokens a template expects
  new      → Create files from a template

EXIT CODES:
  0   - Success
  1   - General error
  2   - Invalid input
  3   - Setup error (no templates found)
  4   - Write conflict
  130 - Cancelled
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Template search root (repeatable, replaces the configured list)
    #[arg(long = "templates-path", global = true, env = "BLUEPRINT_TEMPLATES_PATH")]
    pub templates_paths: Vec<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List available templates
    List(list::ListArgs),

    /// Show the dynamic tokens used by a template
    Tokens(tokens::TokensArgs),

    /// Create files from a template
    New(new::NewArgs),
}

/// Build the template library from configuration and command-line overrides.
pub fn template_library(templates_paths: &[String]) -> Result<TemplateLibrary> {
    let workspace_root: PathBuf = std::env::current_dir()?;
    let config = BlueprintConfig::load(&workspace_root)?.with_overrides(templates_paths);
    Ok(TemplateLibrary::from_folders(
        &config.templates_paths,
        &workspace_root,
    ))
}
