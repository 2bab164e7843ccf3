//! Command-line front end: parse a predicate and evaluate it against
//! `NAME=VALUE` assignments.

use anyhow::{bail, Context};
use clap::Parser;
use predlang_core::{parse_predicate, Variables};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Predicate to evaluate, e.g. "kind in {street, district} and country == 'TR'"
    predicate: String,

    /// Variable assignments
    #[arg(value_name = "NAME=VALUE")]
    assignments: Vec<String>,

    /// JSON object of string variables, applied before the assignments
    #[arg(long, value_name = "PATH")]
    vars_file: Option<PathBuf>,

    /// Print the parsed tree as JSON instead of evaluating it
    #[arg(long, conflicts_with = "canonical")]
    json: bool,

    /// Print the canonical form of the predicate instead of evaluating it
    #[arg(long)]
    canonical: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let predicate = match parse_predicate(&args.predicate) {
        Ok(predicate) => predicate,
        Err(e) => {
            tracing::warn!("Invalid predicate: {}", e);
            println!("None");
            return Ok(ExitCode::from(2));
        }
    };

    if args.json {
        println!("{}", predicate.to_json()?);
        return Ok(ExitCode::SUCCESS);
    }
    if args.canonical {
        println!("{}", predicate);
        return Ok(ExitCode::SUCCESS);
    }

    let mut vars = match &args.vars_file {
        Some(path) => load_variables(path)?,
        None => Variables::new(),
    };
    for assignment in &args.assignments {
        let (name, value) = parse_assignment(assignment)?;
        vars.insert(name.to_string(), value.to_string());
    }

    for name in predicate.variables() {
        if !vars.contains_key(name) {
            tracing::debug!("Variable {} is unbound, reading as empty", name);
        }
    }

    let result = predicate.evaluate(&vars);
    println!("{}", if result { "True" } else { "False" });
    Ok(ExitCode::SUCCESS)
}

fn load_variables(path: &Path) -> anyhow::Result<Variables> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read variables file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON object of strings", path.display()))
}

/// Split `NAME=VALUE`. The value may be empty and may contain `=`.
fn parse_assignment(assignment: &str) -> anyhow::Result<(&str, &str)> {
    let Some((name, value)) = assignment.split_once('=') else {
        bail!("Expected NAME=VALUE, got {:?}", assignment);
    };
    if name.is_empty() {
        bail!("Missing variable name in {:?}", assignment);
    }
    Ok((name, value))
}
