//! Output units handed to indexing pipelines.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Metadata key marking a unit's origin (`"table"` for table units).
pub const KEY_TYPE: &str = "type";

/// Metadata key holding the untrimmed CSV of a table unit.
pub const KEY_TABLE_ORIGIN: &str = "table_origin";

/// Metadata key holding the 1-based page index of a text unit.
pub const KEY_PAGE_LABEL: &str = "page_label";

/// Value stored under [`KEY_TYPE`] for table units.
pub const TYPE_TABLE: &str = "table";

/// Unit metadata. Keys are unique; ordering carries no meaning.
pub type Metadata = BTreeMap<String, MetadataValue>;

/// A scalar metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// Boolean flag
    Bool(bool),
    /// Integer (page labels, counts)
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Text
    Str(String),
}

impl MetadataValue {
    /// Get the value as a string slice, if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer, if it is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            MetadataValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Parse a command-line style value: integers become [`MetadataValue::Int`],
    /// `true`/`false` become booleans, anything else stays text.
    pub fn parse_lossy(raw: &str) -> Self {
        if let Ok(i) = raw.parse::<i64>() {
            MetadataValue::Int(i)
        } else if let Ok(b) = raw.parse::<bool>() {
            MetadataValue::Bool(b)
        } else {
            MetadataValue::Str(raw.to_string())
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::Bool(b) => write!(f, "{}", b),
            MetadataValue::Int(i) => write!(f, "{}", i),
            MetadataValue::Float(x) => write!(f, "{}", x),
            MetadataValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        MetadataValue::Str(s.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        MetadataValue::Str(s)
    }
}

impl From<i64> for MetadataValue {
    fn from(i: i64) -> Self {
        MetadataValue::Int(i)
    }
}

impl From<i32> for MetadataValue {
    fn from(i: i32) -> Self {
        MetadataValue::Int(i as i64)
    }
}

impl From<usize> for MetadataValue {
    fn from(i: usize) -> Self {
        MetadataValue::Int(i as i64)
    }
}

impl From<f64> for MetadataValue {
    fn from(x: f64) -> Self {
        MetadataValue::Float(x)
    }
}

impl From<bool> for MetadataValue {
    fn from(b: bool) -> Self {
        MetadataValue::Bool(b)
    }
}

/// A normalized text unit with metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputUnit {
    /// Unit text
    pub text: String,

    /// Unit metadata
    #[serde(default)]
    pub metadata: Metadata,
}

impl OutputUnit {
    /// Create a unit from text and metadata.
    pub fn new(text: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            text: text.into(),
            metadata,
        }
    }

    /// Create a table unit from its serialized CSV.
    ///
    /// The unit text is the trimmed CSV; the untrimmed CSV is kept under
    /// `table_origin`. Entries in `extra_info` are applied last and win over
    /// the reserved keys.
    pub fn table(csv: impl Into<String>, extra_info: Option<&Metadata>) -> Self {
        let csv = csv.into();
        let mut metadata = Metadata::new();
        metadata.insert(KEY_TABLE_ORIGIN.to_string(), csv.clone().into());
        metadata.insert(KEY_TYPE.to_string(), TYPE_TABLE.into());
        merge_extra(&mut metadata, extra_info);

        Self {
            text: csv.trim().to_string(),
            metadata,
        }
    }

    /// Create a text unit for the 1-based page `label`.
    pub fn page(text: &str, label: usize, extra_info: Option<&Metadata>) -> Self {
        let mut metadata = Metadata::new();
        metadata.insert(KEY_PAGE_LABEL.to_string(), label.into());
        merge_extra(&mut metadata, extra_info);

        Self {
            text: text.trim().to_string(),
            metadata,
        }
    }

    /// Whether this unit was produced from a table.
    pub fn is_table(&self) -> bool {
        self.metadata.get(KEY_TYPE).and_then(MetadataValue::as_str) == Some(TYPE_TABLE)
    }

    /// The page label of a text unit.
    pub fn page_label(&self) -> Option<i64> {
        self.metadata.get(KEY_PAGE_LABEL).and_then(MetadataValue::as_int)
    }

    /// The untrimmed source CSV of a table unit.
    pub fn table_origin(&self) -> Option<&str> {
        self.metadata
            .get(KEY_TABLE_ORIGIN)
            .and_then(MetadataValue::as_str)
    }

    /// Number of whitespace tokens in the text.
    pub fn word_count(&self) -> usize {
        crate::chunk::count_tokens(&self.text)
    }
}

fn merge_extra(metadata: &mut Metadata, extra_info: Option<&Metadata>) {
    if let Some(extra) = extra_info {
        metadata.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_unit() {
        let unit = OutputUnit::table("A,B\n1,2\n", None);
        assert_eq!(unit.text, "A,B\n1,2");
        assert_eq!(unit.table_origin(), Some("A,B\n1,2\n"));
        assert!(unit.is_table());
        assert_eq!(unit.page_label(), None);
    }

    #[test]
    fn test_page_unit() {
        let unit = OutputUnit::page("  hello world \n", 3, None);
        assert_eq!(unit.text, "hello world");
        assert_eq!(unit.page_label(), Some(3));
        assert!(!unit.is_table());
        assert_eq!(unit.word_count(), 2);
    }

    #[test]
    fn test_extra_info_applied_last() {
        let mut extra = Metadata::new();
        extra.insert("file_name".into(), "report.docx".into());
        extra.insert(KEY_PAGE_LABEL.into(), "cover".into());

        let unit = OutputUnit::page("text", 1, Some(&extra));
        assert_eq!(unit.metadata["file_name"], MetadataValue::from("report.docx"));
        assert_eq!(unit.metadata[KEY_PAGE_LABEL], MetadataValue::from("cover"));
    }

    #[test]
    fn test_metadata_serializes_as_scalars() {
        let unit = OutputUnit::page("x", 1, None);
        let json = serde_json::to_string(&unit).unwrap();
        assert_eq!(json, r#"{"text":"x","metadata":{"page_label":1}}"#);

        let back: OutputUnit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, unit);
    }

    #[test]
    fn test_parse_lossy() {
        assert_eq!(MetadataValue::parse_lossy("42"), MetadataValue::Int(42));
        assert_eq!(MetadataValue::parse_lossy("true"), MetadataValue::Bool(true));
        assert_eq!(
            MetadataValue::parse_lossy("q3"),
            MetadataValue::Str("q3".into())
        );
    }
}
