use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Deserialise piped stdin (JSON, or YAML as a fallback) into `T`.
/// Returns None when stdin is a TTY or the pipe is empty.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_piped(&buffer)
}

fn parse_piped<T: DeserializeOwned>(buffer: &str) -> Result<Option<T>, Box<dyn std::error::Error>> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match serde_json::from_str(trimmed) {
        Ok(value) => Ok(Some(value)),
        Err(json_err) => serde_yaml::from_str(trimmed)
            .map(Some)
            .map_err(|_| format!("stdin is neither valid JSON nor YAML: {json_err}").into()),
    }
}
