// ABOUTME: The directory merger: combines per-page extractions into one ordered table.
// ABOUTME: Rows sort by (page, within-page index); position is the within-page rank.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::ParseError;
use crate::metadata::{PageMetadata, QueryMetadata};
use crate::parser::Parser;
use crate::record::{Record, ResultTable, Value};
use crate::warnings::Warning;

/// A merged directory extraction. `metadata` is `None` only when the
/// directory held no capture files.
#[derive(Debug, Clone, Serialize)]
pub struct DirExtraction {
    pub metadata: Option<QueryMetadata>,
    pub table: ResultTable,
    pub warnings: Vec<Warning>,
}

pub(crate) fn merge_dir(parser: &Parser, dir: &Path) -> Result<DirExtraction, ParseError> {
    let entries = fs::read_dir(dir).map_err(|e| ParseError::io(dir, e))?;
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ParseError::io(dir, e))?;
        let path = entry.path();
        let is_html = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("html"));
        if is_html && path.is_file() {
            files.push(path);
        }
    }
    // Filesystem enumeration order is not guaranteed; filenames embed page
    // number and timestamp, so sorting by name makes the merge deterministic.
    files.sort();

    let mut first: Option<PageMetadata> = None;
    let mut warnings = Vec::new();
    let mut tagged: Vec<(u32, usize, Record)> = Vec::new();

    for file in &files {
        let page = parser.parse_file(file)?;
        warnings.extend(page.warnings);
        let meta = page.metadata;

        match &first {
            None => first = Some(meta.clone()),
            Some(first) if !first.consistent_with(&meta) => {
                warnings.push(Warning::InconsistentPages {
                    file: file
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                });
            }
            Some(_) => {}
        }

        // Pages without an in-page page number sort ahead of numbered pages.
        let page_key = meta.page.unwrap_or(0);
        let page_value = meta
            .page
            .map(|p| Value::Int(i64::from(p)))
            .unwrap_or(Value::Missing);
        for (index, mut record) in page.records.into_iter().enumerate() {
            record.insert("date", Value::DateTime(meta.date));
            record.insert("page", page_value.clone());
            tagged.push((page_key, index, record));
        }
    }

    tagged.sort_by_key(|&(page, index, _)| (page, index));

    let rows = tagged
        .into_iter()
        .map(|(_, index, mut record)| {
            // Rank within its own page, not across the merged set
            record.insert("position", Value::Int(index as i64));
            record
        })
        .collect();

    let mut columns = parser.field_names();
    columns.extend(["date", "page", "position"].map(String::from));

    Ok(DirExtraction {
        metadata: first.as_ref().map(QueryMetadata::from),
        table: ResultTable { columns, rows },
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::{Engine, ResultKind};

    #[test]
    fn empty_directory_merges_to_an_empty_table() {
        let dir = tempfile::tempdir().expect("tempdir");
        let parser = Parser::for_engine(Engine::Google, ResultKind::Text).unwrap();
        let merged = parser.parse_dir(dir.path()).unwrap();
        assert!(merged.metadata.is_none());
        assert!(merged.table.is_empty());
        assert!(merged.warnings.is_empty());
    }

    #[test]
    fn non_html_files_are_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("notes.txt"), "not a capture").unwrap();
        let parser = Parser::for_engine(Engine::Google, ResultKind::Text).unwrap();
        let merged = parser.parse_dir(dir.path()).unwrap();
        assert!(merged.table.is_empty());
    }
}
