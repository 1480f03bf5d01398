//! Blueprint CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid input
//! - 3: Setup error
//! - 4: Write conflict
//! - 130: Cancelled

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use blueprint_templates::TemplateError;

mod commands;
mod config;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INPUT_ERROR: u8 = 2;
    pub const SETUP_ERROR: u8 = 3;
    pub const WRITE_CONFLICT: u8 = 4;
    pub const CANCELLED: u8 = 130;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::List(args) => commands::list::execute(args, &cli.templates_paths).await,
        Commands::Tokens(args) => commands::tokens::execute(args, &cli.templates_paths).await,
        Commands::New(args) => commands::new::execute(args, &cli.templates_paths).await,
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let template_error = e.downcast_ref::<TemplateError>();
            if !template_error.is_some_and(TemplateError::is_silent) {
                if template_error.is_some_and(TemplateError::is_modal) {
                    eprintln!("Setup required: {:#}", e);
                } else {
                    eprintln!("Error: {:#}", e);
                }
            }
            ExitCode::from(categorize_error(template_error))
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let directives = if verbose {
        ["blueprint=debug", "warn"]
    } else if quiet {
        ["blueprint=error", "error"]
    } else {
        ["blueprint=info", "warn"]
    };

    let mut filter = EnvFilter::from_default_env();
    for directive in directives {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }

    // Logging may already be initialized
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

/// Categorize error to determine exit code
fn categorize_error(e: Option<&TemplateError>) -> u8 {
    match e {
        Some(TemplateError::Cancelled) => ExitCodes::CANCELLED,
        Some(TemplateError::NoNameGiven)
        | Some(TemplateError::NoTemplateSelected)
        | Some(TemplateError::InvalidInput(_)) => ExitCodes::INPUT_ERROR,
        Some(TemplateError::Setup(_)) => ExitCodes::SETUP_ERROR,
        Some(TemplateError::WriteConflict { .. }) => ExitCodes::WRITE_CONFLICT,
        Some(TemplateError::Io(_)) | Some(TemplateError::Walk(_)) | None => {
            ExitCodes::GENERAL_ERROR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_exit_codes_by_variant() {
        assert_eq!(categorize_error(Some(&TemplateError::Cancelled)), 130);
        assert_eq!(categorize_error(Some(&TemplateError::NoNameGiven)), 2);
        assert_eq!(categorize_error(Some(&TemplateError::no_templates_found())), 3);
        assert_eq!(
            categorize_error(Some(&TemplateError::WriteConflict {
                path: PathBuf::from("a.txt")
            })),
            4
        );
        assert_eq!(categorize_error(None), 1);
    }

    #[test]
    fn test_cli_parses_new_command() {
        let cli = Cli::try_parse_from([
            "blueprint",
            "--templates-path",
            "tpl",
            "new",
            "component",
            "my widget",
            "--set",
            "$status=active",
        ])
        .unwrap();
        assert_eq!(cli.templates_paths, vec!["tpl"]);
        assert!(matches!(cli.command, Commands::New(_)));
    }
}
