use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{Attribute, Cell, Table};
use serde::Serialize;

use crate::theme::{GLYPHS, PALETTE, Rgb};

/// Output format options for CLI commands
#[derive(Clone, Debug, ValueEnum, Default, PartialEq)]
pub enum OutputFormat {
    /// Formatted table output (default)
    #[default]
    Table,
    /// JSON output for scripting
    Json,
}

/// Global CLI options that affect output and behavior
#[derive(Clone, Debug, Default)]
pub struct GlobalOptions {
    pub output_format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
    pub no_color: bool,
}

/// Output manager handles formatting and display.
///
/// Status lines go to stderr so generated source on stdout stays clean.
pub struct OutputManager {
    pub options: GlobalOptions,
}

impl OutputManager {
    pub fn new(options: GlobalOptions) -> Self {
        Self { options }
    }

    pub fn is_json(&self) -> bool {
        self.options.output_format == OutputFormat::Json
    }

    /// Print data as pretty JSON on stdout
    pub fn json<T: Serialize>(&self, data: &T) -> Result<()> {
        if self.options.quiet {
            return Ok(());
        }
        println!("{}", serde_json::to_string_pretty(data)?);
        Ok(())
    }

    /// Display a success message with color and icon
    pub fn success(&self, message: &str) {
        if !self.options.quiet {
            eprintln!("{}", self.decorate(GLYPHS.ok, message, PALETTE.ok));
        }
    }

    /// Display an error message with color and icon
    pub fn error(&self, message: &str) {
        eprintln!("{}", self.decorate(GLYPHS.failure, message, PALETTE.failure));
    }

    /// Display a warning message
    pub fn warning(&self, message: &str) {
        if !self.options.quiet {
            eprintln!("{}", self.decorate(GLYPHS.caution, message, PALETTE.caution));
        }
    }

    /// Display info message with color and icon
    pub fn info(&self, message: &str) {
        if !self.options.quiet {
            eprintln!("{}", self.decorate(GLYPHS.note, message, PALETTE.note));
        }
    }

    /// Display verbose information (only if verbose mode is enabled)
    pub fn verbose(&self, message: &str) {
        if self.options.verbose && !self.options.quiet {
            eprintln!("{}", self.decorate(GLYPHS.note, message, PALETTE.dim));
        }
    }

    fn decorate(&self, glyph: &str, message: &str, color: Rgb) -> String {
        if self.options.no_color {
            format!("{glyph} {message}")
        } else {
            format!("{} {}", glyph.color(color.term()).bold(), message)
        }
    }

    /// Print a unit path as a section heading
    pub fn heading(&self, text: &str) {
        if !self.options.quiet {
            let output = if self.options.no_color {
                format!("\n{text}\n{}", "-".repeat(text.chars().count()))
            } else {
                format!("\n{}", text.color(PALETTE.unit.term()).bold().underline())
            };
            println!("{output}");
        }
    }

    /// Print one labelled detail line, aligned under the heading
    pub fn key_value(&self, key: &str, value: &str) {
        if !self.options.quiet {
            let output = if self.options.no_color {
                format!("  {key:<7} {value}")
            } else {
                format!(
                    "  {} {}",
                    format!("{key:<7}").color(PALETTE.key.term()),
                    value.color(PALETTE.value.term())
                )
            };
            println!("{output}");
        }
    }

    /// Display a bullet list item
    pub fn bullet(&self, text: &str) {
        if !self.options.quiet {
            let output = if self.options.no_color {
                format!("  {} {text}", GLYPHS.item)
            } else {
                format!("  {} {text}", GLYPHS.item.color(PALETTE.dim.term()))
            };
            eprintln!("{output}");
        }
    }

    /// Print a table on stdout
    pub fn table(&self, table: &Table) {
        if !self.options.quiet {
            println!("{table}");
        }
    }

    /// Create a themed table
    pub fn create_table(&self) -> Table {
        let mut table = Table::new();

        if !self.options.no_color {
            table.load_preset(comfy_table::presets::UTF8_FULL_CONDENSED);
        } else {
            table.load_preset(comfy_table::presets::ASCII_FULL);
        }

        table
    }

    /// Add a bold header row in the heading color
    pub fn add_table_header(&self, table: &mut Table, headers: &[&str]) {
        let header_cells: Vec<Cell> = headers
            .iter()
            .map(|h| self.paint(Cell::new(h).add_attribute(Attribute::Bold), PALETTE.heading))
            .collect();
        table.set_header(header_cells);
    }

    /// Cell for an inspect method role, colored by whether it belongs to a field
    pub fn role_cell(&self, role: &str) -> Cell {
        self.paint(Cell::new(role), PALETTE.role(role))
    }

    fn paint(&self, cell: Cell, color: Rgb) -> Cell {
        if self.options.no_color { cell } else { cell.fg(color.table()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct TestData {
        name: String,
        value: i32,
    }

    #[test]
    fn test_output_manager_json() {
        let options = GlobalOptions {
            output_format: OutputFormat::Json,
            ..Default::default()
        };
        let manager = OutputManager::new(options);
        assert!(manager.is_json());
        let data = TestData {
            name: "test".to_string(),
            value: 42,
        };

        assert!(manager.json(&data).is_ok());
    }

    #[test]
    fn test_output_manager_quiet() {
        let options = GlobalOptions {
            quiet: true,
            ..Default::default()
        };
        let manager = OutputManager::new(options);
        let data = TestData {
            name: "test".to_string(),
            value: 42,
        };

        assert!(manager.json(&data).is_ok());
    }

    #[test]
    fn test_table_header_without_color() {
        let manager = OutputManager::new(GlobalOptions {
            no_color: true,
            ..Default::default()
        });
        let mut table = manager.create_table();
        manager.add_table_header(&mut table, &["Method", "Key"]);
        table.add_row(vec!["getAge", "age"]);
        let rendered = table.to_string();
        assert!(rendered.contains("Method"));
        assert!(rendered.contains("getAge"));
    }
}
