// ABOUTME: Structured diagnostics emitted during extraction.
// ABOUTME: Warnings are collected and returned with results instead of being logged globally.

use std::fmt;

use serde::Serialize;

/// A non-fatal condition observed while extracting. Extraction always
/// continues past a warning; the affected field is returned as absent or,
/// for multiple matches, taken from the first match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// A Text or Attribute selector matched nothing in a result block.
    SelectorMissed { field: String, selector: String },
    /// A Text or Attribute selector matched more than one element; the
    /// first match was used.
    MultipleMatches { field: String, selector: String },
    /// A merged page disagrees with the first page on engine, query, or
    /// result type.
    InconsistentPages { file: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::SelectorMissed { field, selector } => {
                write!(f, "selector for {field} ({selector:?}) did not match")
            }
            Warning::MultipleMatches { field, selector } => {
                write!(
                    f,
                    "selector for {field} ({selector:?}) matched multiple elements; using the first"
                )
            }
            Warning::InconsistentPages { file } => {
                write!(
                    f,
                    "{file}: engine, query, or result type differs from the first merged page"
                )
            }
        }
    }
}
