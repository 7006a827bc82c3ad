// Output formatting for CLI

use anyhow::Result;
use clap::ValueEnum;
use serde_json::Value;
use std::io::Write;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Pretty,
    /// Compact JSON
    Json,
    /// Sorted key: value lines
    KeyValue,
    /// Aligned table
    Table,
}

/// Format and output data
pub struct OutputFormatter {
    format: OutputFormat,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    /// Output metadata
    pub fn output_metadata(&self, metadata: &Value, writer: &mut impl Write) -> Result<()> {
        match self.format {
            OutputFormat::Pretty => {
                writeln!(writer, "{}", serde_json::to_string_pretty(metadata)?)?
            }
            OutputFormat::Json => writeln!(writer, "{}", serde_json::to_string(metadata)?)?,
            OutputFormat::KeyValue => self.output_key_value(metadata, writer)?,
            OutputFormat::Table => self.output_table(metadata, writer)?,
        }
        Ok(())
    }

    /// Output as key-value pairs, nested objects flattened with a dot
    fn output_key_value(&self, metadata: &Value, writer: &mut impl Write) -> Result<()> {
        let mut items = Vec::new();
        flatten("", metadata, &mut items);
        items.sort_by(|a, b| a.0.cmp(&b.0));

        for (key, value) in items {
            writeln!(writer, "{}: {}", key, value)?;
        }
        Ok(())
    }

    /// Output as table
    fn output_table(&self, metadata: &Value, writer: &mut impl Write) -> Result<()> {
        let mut items = Vec::new();
        flatten("", metadata, &mut items);
        let max_key_len = items.iter().map(|(k, _)| k.len()).max().unwrap_or(0);

        writeln!(writer, "{}", "=".repeat(max_key_len + 30))?;
        for (key, value) in items {
            writeln!(writer, "{:<width$}{}", format!("{}:", key), value, width = max_key_len + 2)?;
        }
        writeln!(writer, "{}", "=".repeat(max_key_len + 30))?;
        Ok(())
    }

    /// Print success message
    pub fn print_success(&self, message: &str) {
        if !self.quiet {
            println!("✓ {}", message);
        }
    }

    /// Print error message
    pub fn print_error(&self, message: &str) {
        eprintln!("✗ {}", message);
    }
}

fn flatten(prefix: &str, value: &Value, items: &mut Vec<(String, String)>) {
    match value {
        Value::Object(obj) => {
            for (key, value) in obj {
                let key = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten(&key, value, items);
            }
        }
        other => items.push((prefix.to_string(), format_value(other))),
    }
}

/// Format a JSON value for display
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "(null)".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} items}}", obj.len()),
    }
}
