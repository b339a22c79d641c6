//! Structured-data transforms.

use serde_json::{Map, Value};

use super::BoxedError;

/// Parses CSV with a header row into a JSON array of objects.
///
/// Each record becomes an object keyed by the header names; all values are
/// kept as strings.
pub fn csv_to_json(input: &[u8]) -> Result<Vec<u8>, BoxedError> {
    let mut reader = csv::Reader::from_reader(input);
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Map<String, Value> = headers
            .iter()
            .zip(record.iter())
            .map(|(key, value)| (key.to_owned(), Value::String(value.to_owned())))
            .collect();
        rows.push(Value::Object(row));
    }

    Ok(serde_json::to_vec(&Value::Array(rows))?)
}

/// Re-encodes a JSON document as YAML.
pub fn json_to_yaml(input: &[u8]) -> Result<Vec<u8>, BoxedError> {
    let value: Value = serde_json::from_slice(input)?;
    Ok(serde_yaml::to_string(&value)?.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_rows_become_objects() {
        let json = csv_to_json(b"name,age\nada,36\ngrace,45\n").unwrap();
        let value: Value = serde_json::from_slice(&json).unwrap();

        assert_eq!(
            value,
            serde_json::json!([
                { "name": "ada", "age": "36" },
                { "name": "grace", "age": "45" },
            ])
        );
    }

    #[test]
    fn csv_with_ragged_rows_fails() {
        assert!(csv_to_json(b"a,b\n1,2,3\n").is_err());
    }

    #[test]
    fn json_becomes_yaml() {
        let yaml = json_to_yaml(br#"{"a":1}"#).unwrap();
        assert!(String::from_utf8(yaml).unwrap().contains("a: 1"));
    }

    #[test]
    fn malformed_json_fails() {
        assert!(json_to_yaml(b"{not json").is_err());
    }
}
