//! Output formatting for CLI commands

use colored::Colorize;
use serde::Serialize;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format (default)
    #[default]
    Table,
    Json,
    /// Plain text, no colour
    Plain,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "plain" => Ok(OutputFormat::Plain),
            _ => Err(format!(
                "Unknown output format '{}'. Valid options: table, json, plain",
                s
            )),
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Plain => write!(f, "plain"),
        }
    }
}

/// Output formatter for consistent CLI output
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"status": "success", "message": message}));
            }
            OutputFormat::Plain => println!("ok: {}", message),
            OutputFormat::Table => println!("{} {}", "✓".green(), message),
        }
    }

    pub fn error(&self, message: &str) {
        match self.format {
            OutputFormat::Json => {
                eprintln!("{}", serde_json::json!({"status": "error", "message": message}));
            }
            OutputFormat::Plain => eprintln!("error: {}", message),
            OutputFormat::Table => eprintln!("{} {}", "✗".red(), message),
        }
    }

    pub fn warning(&self, message: &str) {
        match self.format {
            OutputFormat::Json => {
                eprintln!("{}", serde_json::json!({"status": "warning", "message": message}));
            }
            OutputFormat::Plain => eprintln!("warning: {}", message),
            OutputFormat::Table => eprintln!("{} {}", "⚠".yellow(), message),
        }
    }

    /// Print data as pretty JSON
    pub fn json<T: Serialize>(&self, data: &T) {
        match serde_json::to_string_pretty(data) {
            Ok(json) => println!("{}", json),
            Err(e) => self.error(&format!("Failed to serialize to JSON: {}", e)),
        }
    }

    pub fn kv(&self, key: &str, value: &str) {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::json!({key: value})),
            OutputFormat::Table => println!("{}: {}", key.cyan(), value),
            OutputFormat::Plain => println!("{}: {}", key, value),
        }
    }

    /// Column widths are fixed by the header labels.
    pub fn table_header(&self, columns: &[(&str, usize)]) {
        if self.format == OutputFormat::Table {
            let header: Vec<_> = columns
                .iter()
                .map(|(c, w)| format!("{:<w$}", c, w = *w).bold().to_string())
                .collect();
            println!("{}", header.join("  "));
            println!("{}", "-".repeat(columns.iter().map(|(_, w)| w + 2).sum()));
        }
    }

    pub fn table_row(&self, values: &[(&str, usize)]) {
        match self.format {
            OutputFormat::Table => {
                let row: Vec<_> = values.iter().map(|(v, w)| format!("{:<w$}", v, w = *w)).collect();
                println!("{}", row.join("  ").trim_end());
            }
            OutputFormat::Plain => {
                let row: Vec<_> = values.iter().map(|(v, _)| *v).collect();
                println!("{}", row.join("\t"));
            }
            OutputFormat::Json => {}
        }
    }

    pub fn section(&self, title: &str) {
        match self.format {
            OutputFormat::Table => {
                println!();
                println!("{}", title.bold().underline());
                println!();
            }
            OutputFormat::Plain => {
                println!();
                println!("{}", title);
                println!();
            }
            OutputFormat::Json => {}
        }
    }

    pub fn list_item(&self, item: &str) {
        match self.format {
            OutputFormat::Table => println!("  {} {}", "•".cyan(), item),
            _ => println!("  - {}", item),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_names_round_trip() {
        for format in [OutputFormat::Table, OutputFormat::Json, OutputFormat::Plain] {
            assert_eq!(format.to_string().parse::<OutputFormat>(), Ok(format));
        }
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
