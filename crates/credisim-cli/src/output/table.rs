use colored::Colorize;
use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{flatten, result_of};

/// Format output as tables using the tabled crate.
///
/// Scalar and nested fields of the result go into one Field/Value table.
/// Arrays of objects (schedule records, comparison criteria) get a table each.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) if map.contains_key("result") => {
            print_result(result_of(value));
            print_envelope_notes(map);
        }
        Value::Object(_) => print_result(value),
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result(result: &Value) {
    let mut fields = Vec::new();
    flatten("", result, &mut fields);

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut arrays: Vec<(String, Vec<Value>)> = Vec::new();
    for (key, val) in fields {
        match val {
            Value::Array(items) if items.iter().any(Value::is_object) => {
                arrays.push((key, items));
            }
            other => builder.push_record([key, format_value(&other)]),
        }
    }
    println!("{}", Table::from(builder));

    for (key, items) in arrays {
        println!("\n{}", key.as_str().bold());
        print_array_table(&items);
    }
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\n{}", "Warnings:".yellow().bold());
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let mut probe = Vec::new();
        flatten("", &Value::Object(first.clone()), &mut probe);
        let headers: Vec<String> = probe.into_iter().map(|(k, _)| k).collect();

        let mut builder = Builder::default();
        builder.push_record(headers.clone());
        for item in arr {
            let mut cells = Vec::new();
            flatten("", item, &mut cells);
            let row: Vec<String> = headers
                .iter()
                .map(|h| {
                    cells
                        .iter()
                        .find(|(k, _)| k == h)
                        .map(|(_, v)| format_value(v))
                        .unwrap_or_default()
                })
                .collect();
            builder.push_record(row);
        }
        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
