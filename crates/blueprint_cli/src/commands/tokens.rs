//! Tokens command - Show the dynamic tokens a template expects.

use anyhow::Result;
use clap::Args;

use blueprint_templates::discover_dynamic_tokens;

#[derive(Args)]
pub struct TokensArgs {
    /// Template name (or path to a template directory)
    template: String,
}

pub async fn execute(args: TokensArgs, templates_paths: &[String]) -> Result<()> {
    let library = super::template_library(templates_paths)?;
    let template = library.find(&args.template)?;

    let tokens = discover_dynamic_tokens(&template.path)?;
    if tokens.is_empty() {
        println!("Template '{}' has no dynamic tokens", template.name);
        return Ok(());
    }

    for token in tokens {
        println!("{}", token);
    }
    Ok(())
}
