use serde_json::Value;
use std::io;

use super::{flatten, result_of};

/// Write output as CSV to stdout.
///
/// A loan schedule (alone or inside a simulation) is written one row per
/// period; anything else as field,value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    let result = result_of(value);

    let records = result
        .get("records")
        .or_else(|| result.get("schedule").and_then(|s| s.get("records")));

    match (records, result) {
        (Some(Value::Array(rows)), _) => write_array_csv(&mut wtr, rows),
        (_, Value::Array(arr)) => write_array_csv(&mut wtr, arr),
        (_, Value::Object(_)) => {
            let mut fields = Vec::new();
            flatten("", result, &mut fields);
            let _ = wtr.write_record(["field", "value"]);
            for (key, val) in fields {
                let _ = wtr.write_record([key.as_str(), &format_csv_value(&val)]);
            }
        }
        _ => {
            let _ = wtr.write_record([&format_csv_value(result)]);
        }
    }

    let _ = wtr.flush();
}

fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
