//! Output formatting utilities

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print a table from a list of items
pub fn print_table<T: Tabled + Serialize>(items: &[T], format: OutputFormat) -> Result<()> {
    println!("{}", render(items, format)?);
    Ok(())
}

fn render<T: Tabled + Serialize>(items: &[T], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table if items.is_empty() => Ok("No files found".yellow().to_string()),
        OutputFormat::Table => Ok(Table::new(items).with(Style::rounded()).to_string()),
        OutputFormat::Json => {
            serde_json::to_string_pretty(&items).context("Failed to serialize results as JSON")
        }
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message);
}

/// Format probability as percentage
pub fn format_probability(probability: f32) -> String {
    format!("{:.1}%", probability * 100.0)
}

/// Color probability based on value
pub fn color_probability(probability: f32) -> String {
    let formatted = format_probability(probability);
    if probability >= 0.9 {
        formatted.green().to_string()
    } else if probability >= 0.5 {
        formatted.yellow().to_string()
    } else {
        formatted.red().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::{Error, Serializer};

    #[derive(Tabled)]
    struct Unserializable {
        name: String,
    }

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> std::result::Result<S::Ok, S::Error> {
            Err(S::Error::custom("label is not valid UTF-8"))
        }
    }

    #[test]
    fn test_render_json_failure_is_reported() {
        let items = [Unserializable {
            name: "broken".to_string(),
        }];
        let err = render(&items, OutputFormat::Json).unwrap_err();
        assert!(format!("{:#}", err).contains("label is not valid UTF-8"));
        assert!(render(&items, OutputFormat::Table).unwrap().contains("broken"));
    }

    #[test]
    fn test_render_empty_table() {
        colored::control::set_override(false);
        let items: [Unserializable; 0] = [];
        assert_eq!(render(&items, OutputFormat::Table).unwrap(), "No files found");
    }

    #[test]
    fn test_format_probability() {
        assert_eq!(format_probability(1.0), "100.0%");
        assert_eq!(format_probability(0.4567), "45.7%");
        assert_eq!(format_probability(0.0), "0.0%");
    }

    #[test]
    fn test_color_probability_keeps_text() {
        colored::control::set_override(false);
        assert_eq!(color_probability(0.95), "95.0%");
        assert_eq!(color_probability(0.3), "30.0%");
    }
}
