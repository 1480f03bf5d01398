//! List command - Show discovered templates.

use anyhow::Result;
use clap::Args;
use tracing::info;

use blueprint_templates::has_dynamic_tokens;

#[derive(Args)]
pub struct ListArgs {
    /// Also report whether each template uses dynamic tokens
    #[arg(long)]
    tokens: bool,
}

pub async fn execute(args: ListArgs, templates_paths: &[String]) -> Result<()> {
    let library = super::template_library(templates_paths)?;
    let templates = library.discover()?;

    info!("Listing {} templates", templates.len());

    let mut current_root = None;
    for template in &templates {
        if current_root != Some(&template.root) {
            println!("{}", template.root.display());
            current_root = Some(&template.root);
        }

        if args.tokens && has_dynamic_tokens(&template.path)? {
            println!("  {} (dynamic tokens)", template.name);
        } else {
            println!("  {}", template.name);
        }
    }

    Ok(())
}
