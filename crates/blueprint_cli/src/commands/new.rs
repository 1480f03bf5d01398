//! New command - Create files from a template.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDateTime};
use clap::Args;
use tracing::{info, warn};

use blueprint_templates::{
    discover_dynamic_tokens, parse_dynamic_assignment, DynamicValue, Materializer,
    TemplateError, UserInput,
};

#[derive(Args)]
pub struct NewArgs {
    /// Template name (or path to a template directory)
    template: String,

    /// Name substituted into name tokens
    name: String,

    /// Destination directory (defaults to the current directory)
    #[arg(short, long)]
    dest: Option<PathBuf>,

    /// Dynamic token value, e.g. --set '$status=active' (repeatable)
    #[arg(long = "set", value_name = "TOKEN=VALUE")]
    set: Vec<String>,

    /// Reference date for date tokens (RFC 3339, defaults to now)
    #[arg(long)]
    date: Option<String>,

    /// Prompt on stdin for dynamic tokens without a value
    #[arg(long)]
    prompt: bool,
}

pub async fn execute(args: NewArgs, templates_paths: &[String]) -> Result<()> {
    let library = super::template_library(templates_paths)?;
    let template = library.find(&args.template)?;

    let mut input = UserInput::new(args.name.clone(), template.path.clone());
    for assignment in &args.set {
        let (token, value) = parse_dynamic_assignment(assignment)?;
        input.dynamic_template_values.insert(token, value);
    }

    let tokens = discover_dynamic_tokens(&template.path)?;
    let missing: Vec<String> = tokens
        .into_iter()
        .filter(|token| !input.dynamic_template_values.contains_key(token))
        .collect();

    if args.prompt {
        for token in &missing {
            let value = prompt_value(token)?;
            input
                .dynamic_template_values
                .insert(token.clone(), DynamicValue::new(value));
        }
    } else if !missing.is_empty() {
        warn!(
            "No value given for dynamic tokens {:?}; they will render empty",
            missing
        );
    }

    let reference_date = match &args.date {
        Some(date) => parse_reference_date(date)?,
        None => Local::now().naive_local(),
    };

    let destination = match args.dest {
        Some(dest) => dest,
        None => std::env::current_dir()?,
    };

    info!(
        "Creating '{}' from template '{}'",
        input.input_name, template.name
    );

    let materializer = Materializer::new();
    let outcome = materializer
        .create_files(&input, &destination, reference_date)
        .await?;

    println!("Created {} entries in {}", outcome.created_paths.len(), outcome.destination_root.display());
    for path in &outcome.created_paths {
        println!("  {}", path.display());
    }
    if !outcome.verbatim_files.is_empty() {
        println!("Copied without rendering:");
        for path in &outcome.verbatim_files {
            println!("  {}", path.display());
        }
    }

    Ok(())
}

/// Parse an RFC 3339 timestamp, keeping its wall-clock time.
fn parse_reference_date(date: &str) -> Result<NaiveDateTime> {
    let parsed = DateTime::parse_from_rfc3339(date)
        .map_err(|e| TemplateError::InvalidInput(format!("invalid --date '{}': {}", date, e)))?;
    Ok(parsed.naive_local())
}

/// Read one token value from stdin. End of input cancels the command.
fn prompt_value(token: &str) -> Result<String> {
    print!("Replace {} with: ", token);
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    if read == 0 {
        return Err(TemplateError::Cancelled.into());
    }
    Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reference_date_keeps_wall_clock() {
        let date = parse_reference_date("1965-10-31T22:43:54+02:00").unwrap();
        assert_eq!(date.format("%Y-%m-%d %H:%M:%S").to_string(), "1965-10-31 22:43:54");
    }

    #[test]
    fn test_parse_reference_date_rejects_garbage() {
        let err = parse_reference_date("yesterday").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TemplateError>(),
            Some(TemplateError::InvalidInput(_))
        ));
    }
}
