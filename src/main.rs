//! Command-line interface for yamlator

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use serde::Serialize;

#[cfg(feature = "cli")]
use yamlator::{load_yaml_file, Violation, YamlatorSchema};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "yamlator")]
#[command(author, version, about = "YAML schema validation tool", long_about = None)]
struct Cli {
    /// Path to the YAML file to validate
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Path to the schema file
    #[arg(short, long, value_name = "SCHEMA")]
    schema: PathBuf,

    /// Output format: table, json, yaml
    #[arg(short, long, default_value = "table")]
    output: String,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy)]
enum OutputFormat {
    Table,
    Json,
    Yaml,
}

#[cfg(feature = "cli")]
#[derive(Serialize)]
struct ValidationReport<'a> {
    violations: &'a [Violation],
    violations_count: usize,
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(violation_count) => {
            if violation_count > 0 {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(feature = "cli")]
fn run(cli: Cli) -> Result<usize, Box<dyn std::error::Error>> {
    let format = parse_format(&cli.output)?;

    let schema = YamlatorSchema::from_file(&cli.schema)?;
    let data = load_yaml_file(&cli.file)?;
    let violations = schema.validate(&data);

    match format {
        OutputFormat::Table => print_table(&violations),
        OutputFormat::Json => print_json(&violations)?,
        OutputFormat::Yaml => print_yaml(&violations)?,
    }

    Ok(violations.len())
}

#[cfg(feature = "cli")]
fn parse_format(name: &str) -> Result<OutputFormat, Box<dyn std::error::Error>> {
    match name.to_lowercase().as_str() {
        "table" => Ok(OutputFormat::Table),
        "json" => Ok(OutputFormat::Json),
        "yaml" => Ok(OutputFormat::Yaml),
        _ => Err(format!("Unknown output format: {}. Use: table, json, yaml", name).into()),
    }
}

#[cfg(feature = "cli")]
fn print_table(violations: &[Violation]) {
    println!("{} violation(s) found", violations.len());

    if violations.is_empty() {
        return;
    }

    let headers = ["Parent Key", "Key", "Violation", "Message"];
    let mut widths = [headers[0].len(), headers[1].len(), headers[2].len()];
    for violation in violations {
        widths[0] = widths[0].max(violation.parent.len());
        widths[1] = widths[1].max(violation.key.len());
        widths[2] = widths[2].max(violation.kind.as_str().len());
    }

    println!();
    println!(
        "{:<parent$}  {:<key$}  {:<kind$}  {}",
        headers[0],
        headers[1],
        headers[2],
        headers[3],
        parent = widths[0],
        key = widths[1],
        kind = widths[2],
    );

    for violation in violations {
        println!(
            "{:<parent$}  {:<key$}  {:<kind$}  {}",
            violation.parent,
            violation.key,
            violation.kind.as_str(),
            violation.message,
            parent = widths[0],
            key = widths[1],
            kind = widths[2],
        );
    }
}

#[cfg(feature = "cli")]
fn print_json(violations: &[Violation]) -> Result<(), Box<dyn std::error::Error>> {
    let report = ValidationReport {
        violations,
        violations_count: violations.len(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(feature = "cli")]
fn print_yaml(violations: &[Violation]) -> Result<(), Box<dyn std::error::Error>> {
    let report = ValidationReport {
        violations,
        violations_count: violations.len(),
    };
    print!("{}", serde_yaml::to_string(&report)?);
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
