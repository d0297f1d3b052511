//! Console output and formatting utilities
//!
//! This module provides functionality for formatting and displaying
//! tabular data with color support, plus the progress spinner shown
//! while a long-running operation is polled.

use std::io::{stdout, Write};
use std::time::Duration;

use crossterm::{
    style::{Color as CrosstermColor, Stylize},
    terminal::size,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tabled::{
    settings::{object::Rows, Alignment, Color, Modify, Padding, Style, Width},
    Table, Tabled,
};

use crate::error::Result;

/// Output format options
#[derive(Debug, Clone, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Color theme for console output
#[derive(Debug, Clone)]
pub struct ColorTheme {
    pub header: CrosstermColor,
    pub success: CrosstermColor,
    pub warning: CrosstermColor,
    pub error: CrosstermColor,
    pub info: CrosstermColor,
    pub accent: CrosstermColor,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            header: CrosstermColor::Blue,
            success: CrosstermColor::Green,
            warning: CrosstermColor::Yellow,
            error: CrosstermColor::Red,
            info: CrosstermColor::Cyan,
            accent: CrosstermColor::Magenta,
        }
    }
}

/// Table formatter with color support
pub struct TableFormatter {
    format: OutputFormat,
    no_color: bool,
}

impl TableFormatter {
    /// Create a new table formatter
    pub fn new(format: OutputFormat, no_color: bool) -> Self {
        Self { format, no_color }
    }

    /// Create a formatted rendering of the data
    pub fn format_table<T: Tabled + Serialize>(&self, data: &[T]) -> Result<String> {
        if data.is_empty() {
            return Ok("No data to display".to_string());
        }

        match self.format {
            OutputFormat::Table => self.format_as_table(data),
            OutputFormat::Json => self.format_as_json(data),
        }
    }

    /// Format data as a styled table
    fn format_as_table<T: Tabled>(&self, data: &[T]) -> Result<String> {
        let mut table = Table::new(data);

        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()))
            .with(Padding::new(1, 1, 0, 0));

        if !self.no_color {
            table.with(Modify::new(Rows::first()).with(Color::FG_BLUE));
        }

        // Auto-adjust width to terminal
        if let Ok((width, _)) = size() {
            table.with(Width::wrap(width as usize));
        }

        Ok(table.to_string())
    }

    /// Format data as JSON
    fn format_as_json<T: Serialize>(&self, data: &[T]) -> Result<String> {
        let rendered = if data.len() == 1 {
            serde_json::to_string_pretty(&data[0])?
        } else {
            serde_json::to_string_pretty(data)?
        };
        Ok(rendered)
    }
}

/// Display utilities for console messages
pub struct DisplayUtils {
    theme: ColorTheme,
    no_color: bool,
}

impl DisplayUtils {
    /// Create new display utilities
    pub fn new(no_color: bool) -> Self {
        Self {
            theme: ColorTheme::default(),
            no_color,
        }
    }

    /// Print a section header
    pub fn print_header(&self, title: &str) -> Result<()> {
        let styled_title = if self.no_color {
            format!("=== {} ===", title)
        } else {
            format!("=== {} ===", title.with(self.theme.header).bold())
        };

        println!("{}", styled_title);
        Ok(())
    }

    /// Print a success message
    pub fn print_success(&self, message: &str) -> Result<()> {
        let styled_message = if self.no_color {
            format!("✓ {}", message)
        } else {
            format!("✓ {}", message.with(self.theme.success))
        };

        println!("{}", styled_message);
        Ok(())
    }

    /// Print a warning message
    pub fn print_warning(&self, message: &str) -> Result<()> {
        let styled_message = if self.no_color {
            format!("⚠ {}", message)
        } else {
            format!("⚠ {}", message.with(self.theme.warning))
        };

        println!("{}", styled_message);
        Ok(())
    }

    /// Print an error message
    pub fn print_error(&self, message: &str) -> Result<()> {
        let styled_message = if self.no_color {
            format!("✗ {}", message)
        } else {
            format!("✗ {}", message.with(self.theme.error))
        };

        eprintln!("{}", styled_message);
        Ok(())
    }

    /// Print an info message
    pub fn print_info(&self, message: &str) -> Result<()> {
        let styled_message = if self.no_color {
            format!("ℹ {}", message)
        } else {
            format!("ℹ {}", message.with(self.theme.info))
        };

        println!("{}", styled_message);
        Ok(())
    }

    /// Format key-value pairs
    pub fn format_key_value_pairs(&self, pairs: &[(&str, &str)]) -> String {
        let max_key_length = pairs.iter().map(|(key, _)| key.len()).max().unwrap_or(0);

        pairs
            .iter()
            .map(|(key, value)| {
                let formatted_key = if self.no_color {
                    format!("{:width$}", key, width = max_key_length)
                } else {
                    format!(
                        "{:width$}",
                        key.with(self.theme.accent).bold(),
                        width = max_key_length
                    )
                };
                format!("{}: {}", formatted_key, value)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Print a separator line
    pub fn print_separator(&self) -> Result<()> {
        if let Ok((width, _)) = size() {
            let line = "─".repeat(width as usize);
            if self.no_color {
                println!("{}", line);
            } else {
                println!("{}", line.with(self.theme.info));
            }
        } else {
            println!("{}", "─".repeat(80));
        }
        Ok(())
    }

    /// Flush stdout
    pub fn flush(&self) -> Result<()> {
        stdout().flush()?;
        Ok(())
    }
}

/// Spinner shown while a long-running operation is in flight
pub struct ProgressIndicator {
    bar: ProgressBar,
}

impl ProgressIndicator {
    /// Create and start a new spinner
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
                .template("{spinner:.blue} {msg}")
                .expect("Progress bar template should be valid"),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Update the progress message
    pub fn set_message(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    /// Finish with success message
    pub fn finish_success(&self, message: &str) {
        self.bar.finish_with_message(format!("✓ {message}"));
    }

    /// Finish with error message
    pub fn finish_error(&self, message: &str) {
        self.bar.finish_with_message(format!("✗ {message}"));
    }

    /// Clear the spinner without a final message
    pub fn clear(&self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use tabled::Tabled;

    #[derive(Tabled, Serialize)]
    struct TestRow {
        name: String,
        value: String,
    }

    fn rows() -> Vec<TestRow> {
        vec![TestRow {
            name: "account".to_string(),
            value: "samplestor042".to_string(),
        }]
    }

    #[test]
    fn test_format_table_contains_values() {
        let formatter = TableFormatter::new(OutputFormat::Table, true);
        let output = formatter.format_table(&rows()).unwrap();
        assert!(output.contains("samplestor042"));
    }

    #[test]
    fn test_format_json_single_row_is_object() {
        let formatter = TableFormatter::new(OutputFormat::Json, true);
        let output = formatter.format_table(&rows()).unwrap();
        assert!(output.trim_start().starts_with('{'));
        assert!(output.contains("\"value\": \"samplestor042\""));
    }

    #[test]
    fn test_format_empty_data() {
        let formatter = TableFormatter::new(OutputFormat::Table, true);
        let output = formatter.format_table::<TestRow>(&[]).unwrap();
        assert_eq!(output, "No data to display");
    }

    #[test]
    fn test_key_value_alignment() {
        let display = DisplayUtils::new(true);
        let output =
            display.format_key_value_pairs(&[("Name", "samplestor042"), ("Location", "westus")]);
        assert!(output.contains("Name    : samplestor042"));
        assert!(output.contains("Location: westus"));
    }
}
