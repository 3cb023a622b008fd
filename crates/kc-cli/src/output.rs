//! Output formatting utilities.

use colored::Colorize;
use kc_provider::{Plan, PlanAction};
use serde_json::Value;
use tabled::{settings::Style, Table, Tabled};

use crate::config::OutputFormat;

/// Prints a success message.
pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Prints an error message.
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Prints a warning message.
pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message);
}

/// Prints an info message.
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Prints a success message in table mode only.
pub fn notice(message: &str, format: OutputFormat) {
    if format == OutputFormat::Table {
        success(message);
    }
}

/// Outputs rows in the specified format.
pub fn output<T: Tabled + serde::Serialize>(
    data: &[T],
    format: OutputFormat,
) -> crate::CliResult<()> {
    match format {
        OutputFormat::Table => {
            if data.is_empty() {
                info("No results found.");
            } else {
                let table = Table::new(data).with(Style::rounded()).to_string();
                println!("{table}");
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data)?;
            println!("{json}");
        }
        OutputFormat::Yaml => {
            for item in data {
                let json = serde_json::to_value(item)?;
                print_yaml_value(&json, 0);
                println!();
            }
        }
        OutputFormat::Quiet => {}
    }
    Ok(())
}

/// Outputs a single item.
pub fn output_single<T: serde::Serialize>(item: &T, format: OutputFormat) -> crate::CliResult<()> {
    match format {
        OutputFormat::Table | OutputFormat::Yaml => {
            let json = serde_json::to_value(item)?;
            print_yaml_value(&json, 0);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(item)?;
            println!("{json}");
        }
        OutputFormat::Quiet => {}
    }
    Ok(())
}

/// One row of a rendered plan.
#[derive(Debug, serde::Serialize, Tabled)]
pub struct ChangeRow {
    /// Field name.
    #[tabled(rename = "Field")]
    pub field: &'static str,
    /// Tracked value.
    #[tabled(rename = "Before")]
    pub before: String,
    /// Configured value.
    #[tabled(rename = "After")]
    pub after: String,
    /// Marker for fields forcing replacement.
    #[tabled(rename = "Replace")]
    pub replace: &'static str,
}

/// Outputs a plan: a summary line and a table of changes in table mode,
/// the serialized plan otherwise.
pub fn output_plan(plan: &Plan, format: OutputFormat) -> crate::CliResult<()> {
    if format != OutputFormat::Table {
        return output_single(plan, format);
    }

    let summary = match plan.action {
        PlanAction::Create => "+ realm will be created".green(),
        PlanAction::Update => "~ realm will be updated in place".yellow(),
        PlanAction::Replace => "-/+ realm will be replaced".red(),
        PlanAction::NoOp => "No changes. Realm matches the configuration.".normal(),
    };
    println!("{}", summary.bold());

    if plan.changes.is_empty() {
        return Ok(());
    }
    let rows: Vec<ChangeRow> = plan
        .changes
        .iter()
        .map(|c| ChangeRow {
            field: c.field,
            before: c.before.as_ref().map_or_else(|| "(unset)".to_string(), render_value),
            after: render_value(&c.after),
            replace: if c.requires_replace { "forces replacement" } else { "" },
        })
        .collect();
    output(&rows, format)
}

/// Renders a value for a table cell.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Prints a JSON value as YAML-like output.
fn print_yaml_value(value: &Value, indent: usize) {
    let prefix = "  ".repeat(indent);

    match value {
        Value::Null => println!("{prefix}null"),
        Value::Bool(b) => println!("{prefix}{b}"),
        Value::Number(n) => println!("{prefix}{n}"),
        Value::String(s) => println!("{prefix}{s}"),
        Value::Array(arr) => {
            for item in arr {
                print!("{prefix}- ");
                print_yaml_value(item, indent + 1);
            }
        }
        Value::Object(map) => {
            for (key, val) in map {
                if val.is_object() || val.is_array() {
                    println!("{prefix}{key}:");
                    print_yaml_value(val, indent + 1);
                } else {
                    println!("{prefix}{key}: {}", render_value(val));
                }
            }
        }
    }
}

/// Prompts for confirmation.
pub fn confirm(message: &str) -> crate::CliResult<bool> {
    print!("{message} [y/N]: ");
    std::io::Write::flush(&mut std::io::stdout())?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    Ok(input.trim().eq_ignore_ascii_case("y") || input.trim().eq_ignore_ascii_case("yes"))
}
