//! JSON rendering for output units.

use crate::error::{Error, Result};
use crate::model::OutputUnit;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON array with indentation
    #[default]
    Pretty,
    /// Compact JSON array without extra whitespace
    Compact,
    /// One compact JSON object per line (JSON Lines)
    Lines,
}

impl std::str::FromStr for JsonFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "lines" | "jsonl" | "ndjson" => Ok(Self::Lines),
            other => Err(Error::Other(format!("unknown JSON format: {}", other))),
        }
    }
}

/// Convert output units to JSON.
pub fn to_json(units: &[OutputUnit], format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(units),
        JsonFormat::Compact => serde_json::to_string(units),
        JsonFormat::Lines => units
            .iter()
            .map(serde_json::to_string)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(|lines| lines.join("\n")),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Parse units back from any of the [`JsonFormat`] outputs.
pub fn from_json(input: &str) -> Result<Vec<OutputUnit>> {
    let trimmed = input.trim_start();
    let result = if trimmed.starts_with('[') {
        serde_json::from_str(trimmed)
    } else {
        trimmed
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(serde_json::from_str)
            .collect()
    };

    result.map_err(|e| Error::Parse(format!("invalid unit JSON: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Metadata;

    fn units() -> Vec<OutputUnit> {
        vec![
            OutputUnit::table("A,B\n1,2\n", None),
            OutputUnit::page("hello world", 1, None),
        ]
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&units(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"table_origin\""));
        assert!(json.contains("\"page_label\": 1"));
        assert!(json.contains('\n')); // Pretty has newlines
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&units(), JsonFormat::Compact).unwrap();
        assert!(json.starts_with('['));
        assert!(!json.contains('\n')); // Compact has no newlines
    }

    #[test]
    fn test_to_json_lines() {
        let json = to_json(&units(), JsonFormat::Lines).unwrap();
        let lines: Vec<&str> = json.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            r#"{"text":"hello world","metadata":{"page_label":1}}"#
        );
        assert_eq!(from_json(&json).unwrap(), units());
    }

    #[test]
    fn test_empty_units() {
        assert_eq!(to_json(&[], JsonFormat::Compact).unwrap(), "[]");
        assert_eq!(to_json(&[], JsonFormat::Lines).unwrap(), "");
        assert!(from_json("").unwrap().is_empty());
    }

    #[test]
    fn test_from_json_array() {
        let unit = OutputUnit::new("x", Metadata::new());
        let json = to_json(std::slice::from_ref(&unit), JsonFormat::Pretty).unwrap();
        assert_eq!(from_json(&json).unwrap(), vec![unit]);
        assert!(from_json("{not json").is_err());
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("pretty".parse::<JsonFormat>().unwrap(), JsonFormat::Pretty);
        assert_eq!("JSONL".parse::<JsonFormat>().unwrap(), JsonFormat::Lines);
        assert!("xml".parse::<JsonFormat>().is_err());
    }
}
