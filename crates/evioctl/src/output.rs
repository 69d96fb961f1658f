//! Output formatting for CLI responses

use anyhow::Error;
use colored::Colorize;
use evio_device::{Bitset, Domain, Event, codes};
use serde::Serialize;
use serde_json::{Map, Value, json};

/// Print a successful response as pretty JSON under `key`.
pub fn print_json<T: Serialize + ?Sized>(key: &str, value: &T) {
    let rendered = serde_json::to_value(value).and_then(|value| {
        let mut output = Map::new();
        output.insert("success".to_string(), Value::Bool(true));
        output.insert(key.to_string(), value);
        serde_json::to_string_pretty(&output)
    });
    match rendered {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format {key} as JSON: {e}"),
    }
}

/// Print one event as a single JSON line.
pub fn print_event_json(event: &Event) {
    match serde_json::to_string(event) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format event as JSON: {e}"),
    }
}

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let error_json = json!({
        "success": false,
        "error": {
            "message": format!("{error:#}"),
        }
    });
    match serde_json::to_string_pretty(&error_json) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format error as JSON: {e}"),
    }
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

/// Print a labelled field.
pub fn field(label: &str, value: impl std::fmt::Display) {
    println!("  {:<12} {}", format!("{label}:").bold(), value);
}

/// Render the set codes of a mask for humans.
///
/// Event types are shown by name; other domains as hex codes.
pub fn format_mask(domain: Domain, mask: &Bitset) -> String {
    if mask.is_empty() {
        return "none".dimmed().to_string();
    }
    let codes: Vec<String> = mask
        .iter_ones()
        .map(|code| match domain {
            Domain::EventTypes => u16::try_from(code)
                .ok()
                .and_then(codes::event_type_name)
                .map_or_else(|| format!("{code:#04x}"), str::to_string),
            _ => format!("{code:#x}"),
        })
        .collect();
    codes.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_types_are_named() {
        colored::control::set_override(false);
        let mask = Bitset::with_bits(32, [0, 1, 3]);
        assert_eq!(format_mask(Domain::EventTypes, &mask), "SYN KEY ABS");
    }

    #[test]
    fn test_codes_are_hex() {
        colored::control::set_override(false);
        let mask = Bitset::with_bits(768, [0x110, 0x111]);
        assert_eq!(format_mask(Domain::Keys, &mask), "0x110 0x111");
        assert_eq!(format_mask(Domain::Keys, &Bitset::new(768)), "none");
    }
}
