//! Batch input reading.
//!
//! Accepts NDJSON (one record per line) or a single JSON array of objects,
//! from a file path or stdin ("-").

use std::io::Read;
use std::path::Path;

use contracts::EventRecord;
use serde_json::Value;
use tracing::debug;

use crate::error::CliError;

/// Read a batch of event records from a file path, or stdin for "-"
pub fn read_records(input: &Path) -> Result<Vec<EventRecord>, CliError> {
    let content = if input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(input)?
    };

    let records = parse_records(&content)?;
    debug!(records = records.len(), input = %input.display(), "Batch loaded");
    Ok(records)
}

/// Parse batch content: JSON array when it starts with '[', NDJSON otherwise
pub fn parse_records(content: &str) -> Result<Vec<EventRecord>, CliError> {
    let trimmed = content.trim_start();
    if trimmed.starts_with('[') {
        parse_json_array(trimmed)
    } else {
        parse_ndjson(content)
    }
}

fn parse_json_array(content: &str) -> Result<Vec<EventRecord>, CliError> {
    let values: Vec<Value> = serde_json::from_str(content)
        .map_err(|e| CliError::input_format(format!("invalid JSON array: {e}")))?;

    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            EventRecord::from_value(value).map_err(|e| CliError::input_parse(index, e.to_string()))
        })
        .collect()
}

fn parse_ndjson(content: &str) -> Result<Vec<EventRecord>, CliError> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(index, line)| {
            EventRecord::from_json(line).map_err(|e| CliError::input_parse(index, e.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_parse_ndjson() {
        let content = "{\"id\": 1}\n\n{\"id\": 2}\n{\"id\": 3}\n";
        let records = parse_records(content).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].get("id"), Some(&json!(2)));
    }

    #[test]
    fn test_parse_json_array() {
        let content = r#"[{"id": 1}, {"id": 2}]"#;
        let records = parse_records(content).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_parse_rejects_non_object_record() {
        let result = parse_records("[1, 2, 3]");
        assert!(matches!(result, Err(CliError::InputParse { index: 0, .. })));
    }

    #[test]
    fn test_parse_rejects_broken_line() {
        let result = parse_records("{\"id\": 1}\nnot json\n");
        assert!(matches!(result, Err(CliError::InputParse { index: 1, .. })));
    }

    #[test]
    fn test_read_records_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", r#"{"messageId": "m-1"}"#).unwrap();
        writeln!(file, "{}", r#"{"messageId": "m-2"}"#).unwrap();

        let records = read_records(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("messageId"), Some(&json!("m-1")));
    }
}
