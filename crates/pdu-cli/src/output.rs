//! Output formatting for pdu-cli (table, json)

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
        }
    }
}

/// Context for output rendering
pub struct OutputContext {
    pub format: OutputFormat,
    pub quiet: bool,
}

impl OutputContext {
    pub fn new(format: OutputFormat, no_color: bool, quiet: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { format, quiet }
    }

    /// Print a success message (unless in quiet mode or emitting JSON)
    pub fn success(&self, msg: &str) {
        if !self.quiet && self.format == OutputFormat::Table {
            println!("{}", msg.green());
        }
    }

    /// Print an info message (unless in quiet mode or emitting JSON)
    pub fn info(&self, msg: &str) {
        if !self.quiet && self.format == OutputFormat::Table {
            println!("{}", msg);
        }
    }

    /// Print an error message
    pub fn error(&self, msg: &str) {
        eprintln!("{}", msg.red());
    }

    /// Print data in the configured format
    pub fn print<T: Tabled + Serialize>(&self, data: &[T]) {
        match self.format {
            OutputFormat::Table => {
                if data.is_empty() {
                    if !self.quiet {
                        println!("No data");
                    }
                } else {
                    println!("{}", Table::new(data));
                }
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(data).unwrap_or_else(|_| "[]".to_string())
                );
            }
        }
    }

    /// Print a single item in the configured format
    pub fn print_one<T: Tabled + Serialize>(&self, data: &T) {
        match self.format {
            OutputFormat::Table => println!("{}", Table::new([data])),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string())
                );
            }
        }
    }

    /// Print key-value pairs (for info command)
    pub fn print_kv(&self, pairs: &[(&str, String)]) {
        match self.format {
            OutputFormat::Table => {
                for (key, value) in pairs {
                    println!("{}: {}", key.bold(), value);
                }
            }
            OutputFormat::Json => {
                let map: serde_json::Map<String, serde_json::Value> = pairs
                    .iter()
                    .map(|(k, v)| (k.to_lowercase(), serde_json::Value::from(v.as_str())))
                    .collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&map).unwrap_or_else(|_| "{}".to_string())
                );
            }
        }
    }
}

/// Render an outlet state for display
pub fn on_off(state: bool) -> String {
    let text = if state { "on" } else { "off" };
    text.to_string()
}

// =============================================================================
// Display types for various commands
// =============================================================================

/// Outlet display for state/states/set commands
#[derive(Debug, Tabled, Serialize)]
pub struct OutletRow {
    #[tabled(rename = "Outlet")]
    pub outlet: i64,
    #[tabled(rename = "State")]
    pub state: String,
}

/// Bank display for load command
#[derive(Debug, Tabled, Serialize)]
pub struct BankRow {
    #[tabled(rename = "Bank")]
    pub bank: i64,
    #[tabled(rename = "Load (A)")]
    #[serde(rename = "load_amps")]
    pub load: f64,
}
