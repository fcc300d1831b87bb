//! Typed output records for parsed tags

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::grammar::TagKind;

/// A single extracted field value.
///
/// Which variants a tag produces is fixed per kind: balance tags carry a
/// `Date`, an `Amount`, and a `Text` currency; statement lines add a `Flag`
/// for reversals; everything else is `Text`. Untagged serde representation,
/// so a serialized field reads as its plain JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Date(NaiveDate),
    Amount(f64),
    Flag(bool),
    Text(String),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(date) => Some(*date),
            _ => None,
        }
    }

    pub fn as_amount(&self) -> Option<f64> {
        match self {
            FieldValue::Amount(amount) => Some(*amount),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(flag) => Some(*flag),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        FieldValue::Text(text.to_string())
    }
}

/// Field name to field value mapping of one parsed tag
pub type Fields = HashMap<String, FieldValue>;

/// The result of parsing one tag's content.
///
/// Owns the kind, the original raw content (patterns match a prefix, so the
/// caller can still inspect what was not consumed), and the kind's fixed
/// field set. Immutable after construction; each parse allocates a fresh
/// record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedTag {
    pub kind: TagKind,
    pub raw: String,
    pub fields: Fields,
}

impl ParsedTag {
    pub(crate) fn new(kind: TagKind, raw: &str, fields: Fields) -> Self {
        ParsedTag {
            kind,
            raw: raw.to_string(),
            fields,
        }
    }

    /// Text field by name, `None` if absent or not text
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(FieldValue::as_text)
    }

    /// Date field by name, `None` if absent or not a date
    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        self.fields.get(name).and_then(FieldValue::as_date)
    }

    /// Amount field by name, `None` if absent or not an amount
    pub fn amount(&self, name: &str) -> Option<f64> {
        self.fields.get(name).and_then(FieldValue::as_amount)
    }

    /// True iff this is a message block that captured sub-block `1`
    /// (the basic header, which opens a SWIFT message).
    pub fn is_starting(&self) -> bool {
        self.kind == TagKind::MessageBlock && self.fields.contains_key("1")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_accessors() {
        assert_eq!(FieldValue::from("abc").as_text(), Some("abc"));
        assert_eq!(FieldValue::Amount(1.5).as_amount(), Some(1.5));
        assert_eq!(FieldValue::Flag(true).as_flag(), Some(true));
        assert_eq!(FieldValue::from("abc").as_amount(), None);
    }

    #[test]
    fn test_is_starting_requires_message_block_kind() {
        let mut fields = Fields::new();
        fields.insert("1".to_string(), FieldValue::from("F01BANKXXXX"));

        let block = ParsedTag::new(TagKind::MessageBlock, "{1:F01BANKXXXX}", fields.clone());
        assert!(block.is_starting());

        // Same field name on a non-block kind must not count
        let other = ParsedTag::new(TagKind::NonSwift, "{1:F01BANKXXXX}", fields);
        assert!(!other.is_starting());
    }

    #[test]
    fn test_untagged_serialization() {
        let value = serde_json::to_value(FieldValue::Amount(-12.5)).unwrap();
        assert_eq!(value, serde_json::json!(-12.5));

        let value = serde_json::to_value(FieldValue::from("USD")).unwrap();
        assert_eq!(value, serde_json::json!("USD"));
    }
}
