// ABOUTME: Output data models: extracted values, per-result records, and the merged table.
// ABOUTME: Mirrors the column ordering of the rule set that produced the records.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::Serialize;

/// A single extracted value. `Missing` stands for "the page had nothing
/// there" and serializes as `null`; it is distinct from a field that was
/// never queried.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Bool(bool),
    Int(i64),
    DateTime(NaiveDateTime),
    /// A duration in whole seconds (video lengths and the like).
    Seconds(i64),
    /// Path of an extracted thumbnail written to disk.
    Path(PathBuf),
    Missing,
}

impl Value {
    /// Returns the text content, if this is a Text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean, if this is a Bool value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer, if this is an Int value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }
}

impl From<Option<Value>> for Value {
    fn from(v: Option<Value>) -> Self {
        v.unwrap_or(Value::Missing)
    }
}

/// One extracted result: field name to value, one per result block.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Record {
    #[serde(flatten)]
    fields: HashMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over (field name, value) pairs in arbitrary order; use the
    /// owning table's `columns` for a stable ordering.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Records merged across pages, with a recorded column order: the rule set's
/// field names followed by `date`, `page`, and `position`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultTable {
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
}

impl ResultTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_serializes_as_null() {
        let mut record = Record::new();
        record.insert("title", Value::Text("hello".into()));
        record.insert("published", Value::Missing);

        let json = serde_json::to_value(&record).expect("serialize");
        assert_eq!(json["title"], serde_json::json!("hello"));
        assert!(json["published"].is_null());
    }

    #[test]
    fn value_accessors() {
        assert_eq!(Value::Text("a".into()).as_text(), Some("a"));
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Int(3).as_int(), Some(3));
        assert!(Value::Missing.is_missing());
        assert!(Value::Bool(false).as_text().is_none());
    }
}
