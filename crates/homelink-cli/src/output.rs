//! Output formatting for the CLI.

use clap::ValueEnum;
use serde_json::Value;

/// Output format.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print an API response body.
///
/// Text mode prints the `message` field when there is one and falls back to
/// compact JSON otherwise.
pub fn print_response(body: &Value, format: &OutputFormat) {
    match format {
        OutputFormat::Text => match body.get("message").and_then(Value::as_str) {
            Some(message) => {
                println!("{}", message);
                if let Some(command) = body.get("command").and_then(Value::as_str) {
                    print_row("command", command);
                }
                if let Some(volume) = body.get("new_volume") {
                    print_row("new volume", &volume.to_string());
                }
            }
            None => println!("{}", body),
        },
        OutputFormat::Json => match serde_json::to_string_pretty(body) {
            Ok(json) => println!("{}", json),
            Err(_) => println!("{}", body),
        },
    }
}

/// Print a plain message.
pub fn print_message(message: &str, format: &OutputFormat) {
    match format {
        OutputFormat::Text => println!("{}", message),
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "message": message }));
        }
    }
}

/// Print an error message.
pub fn print_error(message: &str, format: &OutputFormat) {
    match format {
        OutputFormat::Text => eprintln!("Error: {}", message),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": message }));
        }
    }
}

/// Print a table row.
pub fn print_row(label: &str, value: &str) {
    println!("  {:<16} {}", format!("{}:", label), value);
}
