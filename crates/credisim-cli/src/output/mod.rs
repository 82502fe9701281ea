pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod proposal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
        OutputFormat::Proposal => proposal::print_proposal(value),
    }
}

/// The `result` payload of a computation envelope, or the value itself.
pub(crate) fn result_of(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
}

/// Flatten nested objects into dotted keys. Arrays are left as leaves.
pub(crate) fn flatten(prefix: &str, value: &Value, out: &mut Vec<(String, Value)>) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, val, out);
            }
        }
        other => out.push((prefix.to_string(), other.clone())),
    }
}
