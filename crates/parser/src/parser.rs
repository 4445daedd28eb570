// ABOUTME: The Parser type and its builder: construction-time validation and entry points.
// ABOUTME: Handles capture decoding (UTF-8, declared charset, or detection) before extraction.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use serde::Serialize;

use crate::engines::{self, Engine, ResultKind};
use crate::error::ParseError;
use crate::extract;
use crate::images::ImageOptions;
use crate::merge::{self, DirExtraction};
use crate::metadata::{self, MetadataFn, PageMetadata};
use crate::record::Record;
use crate::rules::RuleSet;
use crate::selectors;
use crate::warnings::Warning;

/// Records extracted from one parsed page, with collected diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct RecordSet {
    pub records: Vec<Record>,
    pub warnings: Vec<Warning>,
}

/// A full single-page extraction: page metadata plus its records.
#[derive(Debug, Clone, Serialize)]
pub struct PageExtraction {
    pub metadata: PageMetadata,
    pub records: Vec<Record>,
    pub warnings: Vec<Warning>,
}

/// Extracts structured records from archived search engine result pages.
///
/// Construct with [`Parser::for_engine`] for a builtin engine, or through
/// [`Parser::builder`] for custom rule sets.
#[derive(Debug, Clone)]
pub struct Parser {
    block_selector: String,
    rules: RuleSet,
    metadata_fn: MetadataFn,
    images: ImageOptions,
}

impl Parser {
    pub fn builder() -> ParserBuilder {
        ParserBuilder::new()
    }

    /// A parser for a builtin (engine, result kind) pair.
    pub fn for_engine(engine: Engine, kind: ResultKind) -> Result<Self, ParseError> {
        Self::builder().engine(engine, kind).build()
    }

    /// The CSS selector that discriminates individual result blocks.
    pub fn block_selector(&self) -> &str {
        &self.block_selector
    }

    /// Output field names, in column order.
    pub fn field_names(&self) -> Vec<String> {
        self.rules.field_names()
    }

    /// Extracts records from already-loaded page text.
    pub fn parse_records(&self, html: &str) -> Result<RecordSet, ParseError> {
        let doc = Html::parse_document(html);
        let mut warnings = Vec::new();
        let records = extract::extract_records(
            &doc,
            &self.block_selector,
            &self.rules,
            &self.images,
            &mut warnings,
        )?;
        Ok(RecordSet { records, warnings })
    }

    /// Extracts records and page metadata from one capture file.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<PageExtraction, ParseError> {
        let path = path.as_ref();
        let doc = self.load_page(path)?;
        let mut warnings = Vec::new();
        let records = extract::extract_records(
            &doc,
            &self.block_selector,
            &self.rules,
            &self.images,
            &mut warnings,
        )?;
        let metadata = (self.metadata_fn)(&doc, path)?;
        Ok(PageExtraction {
            metadata,
            records,
            warnings,
        })
    }

    /// Extracts only the page metadata from one capture file.
    pub fn metadata(&self, path: impl AsRef<Path>) -> Result<PageMetadata, ParseError> {
        let path = path.as_ref();
        let doc = self.load_page(path)?;
        (self.metadata_fn)(&doc, path)
    }

    /// Extracts and merges every `*.html` capture in a directory
    /// (non-recursive) into one ordered table. See [`DirExtraction`].
    pub fn parse_dir(&self, dir: impl AsRef<Path>) -> Result<DirExtraction, ParseError> {
        merge::merge_dir(self, dir.as_ref())
    }

    fn load_page(&self, path: &Path) -> Result<Html, ParseError> {
        let bytes = fs::read(path).map_err(|e| ParseError::io(path, e))?;
        Ok(Html::parse_document(&decode_page(&bytes)))
    }
}

/// Fluent construction of a [`Parser`]. Configuration problems surface here,
/// before any page is read.
#[derive(Debug, Default)]
pub struct ParserBuilder {
    engine: Option<(Engine, ResultKind)>,
    rules: Option<RuleSet>,
    block_selector: Option<String>,
    metadata_fn: Option<MetadataFn>,
    images: Option<ImageOptions>,
}

impl ParserBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a builtin engine's selector table and metadata function.
    pub fn engine(mut self, engine: Engine, kind: ResultKind) -> Self {
        self.engine = Some((engine, kind));
        self
    }

    /// Supply a custom rule set instead of a builtin engine.
    pub fn rules(mut self, rules: RuleSet) -> Self {
        self.rules = Some(rules);
        self
    }

    /// The result-block selector for a custom rule set.
    pub fn block_selector(mut self, css: impl Into<String>) -> Self {
        self.block_selector = Some(css.into());
        self
    }

    /// Override the metadata function.
    pub fn metadata_fn(mut self, f: MetadataFn) -> Self {
        self.metadata_fn = Some(f);
        self
    }

    /// Enable inline image extraction. For builtin engines this appends the
    /// engine's image rule as the last output column.
    pub fn extract_images(mut self, opts: ImageOptions) -> Self {
        self.images = Some(opts);
        self
    }

    pub fn build(self) -> Result<Parser, ParseError> {
        let (block_selector, rules, metadata_fn) = match (self.engine, self.rules) {
            // When both an engine and custom rules are given, the engine's
            // registry entry wins.
            (Some((engine, kind)), _) => {
                let spec = engines::lookup(engine, kind)
                    .ok_or(ParseError::UnsupportedEngine { engine, kind })?;
                let mut rules = spec.rules;
                if self.images.is_some() {
                    rules.push(spec.image_rule);
                }
                (
                    spec.block_selector.to_string(),
                    rules,
                    self.metadata_fn.unwrap_or(spec.metadata),
                )
            }
            (None, Some(rules)) => {
                let block = self.block_selector.ok_or_else(|| {
                    ParseError::config(
                        "a result block selector is required to discriminate individual results",
                    )
                })?;
                (
                    block,
                    rules,
                    self.metadata_fn.unwrap_or(metadata::filename_metadata),
                )
            }
            (None, None) => {
                return Err(ParseError::config(
                    "either a builtin engine or a custom rule set is required",
                ))
            }
        };

        if !selectors::is_valid(&block_selector) {
            return Err(ParseError::Selector {
                field: "result block".to_string(),
                selector: block_selector,
            });
        }

        let mut seen = HashSet::new();
        for rule in rules.iter() {
            if !seen.insert(rule.name.clone()) {
                return Err(ParseError::DuplicateField(rule.name.clone()));
            }
            for css in rule.selectors() {
                if !selectors::is_valid(css) {
                    return Err(ParseError::Selector {
                        field: rule.name.clone(),
                        selector: css.to_string(),
                    });
                }
            }
        }

        Ok(Parser {
            block_selector,
            rules,
            metadata_fn,
            images: self.images.unwrap_or_default(),
        })
    }
}

static META_CHARSET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"charset\s*=\s*["']?([A-Za-z0-9_.:-]+)"#).expect("charset regex"));

/// Decodes capture bytes: a declared `<meta charset>` wins, otherwise the
/// encoding is sniffed.
fn decode_page(bytes: &[u8]) -> String {
    if let Some(label) = extract_meta_charset(bytes) {
        if let Some(encoding) = encoding_rs::Encoding::for_label(label.as_bytes()) {
            let (decoded, _, _) = encoding.decode(bytes);
            return decoded.into_owned();
        }
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(bytes);
    decoded.into_owned()
}

/// Scans the head of the document for a charset declaration.
fn extract_meta_charset(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(1024)];
    let text = String::from_utf8_lossy(head);
    META_CHARSET
        .captures(&text)
        .map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Value;
    use crate::rules::FieldRule;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_builtin_pair_constructs() {
        for &(engine, kind) in engines::supported_pairs() {
            let parser = Parser::for_engine(engine, kind)
                .unwrap_or_else(|e| panic!("{engine} {kind}: {e}"));
            assert!(!parser.block_selector().is_empty());
            assert!(!parser.field_names().is_empty());
        }
    }

    #[test]
    fn unsupported_pair_is_a_config_error() {
        let err = Parser::for_engine(Engine::Yahoo, ResultKind::Videos).unwrap_err();
        assert!(err.is_config());
        assert!(matches!(
            err,
            ParseError::UnsupportedEngine {
                engine: Engine::Yahoo,
                kind: ResultKind::Videos
            }
        ));
    }

    #[test]
    fn empty_builder_is_a_config_error() {
        let err = Parser::builder().build().unwrap_err();
        assert!(matches!(err, ParseError::Config(_)));
    }

    #[test]
    fn custom_rules_need_a_block_selector() {
        let err = Parser::builder()
            .rules(RuleSet::new(vec![FieldRule::text("title", "h3")]))
            .build()
            .unwrap_err();
        assert!(matches!(err, ParseError::Config(_)));
    }

    #[test]
    fn duplicate_field_names_are_rejected() {
        let err = Parser::builder()
            .rules(RuleSet::new(vec![
                FieldRule::text("title", "h3"),
                FieldRule::text("title", "h2"),
            ]))
            .block_selector("div.hit")
            .build()
            .unwrap_err();
        assert!(matches!(err, ParseError::DuplicateField(name) if name == "title"));
    }

    #[test]
    fn invalid_selectors_are_rejected_at_construction() {
        let err = Parser::builder()
            .rules(RuleSet::new(vec![FieldRule::text("title", "[[[nope")]))
            .block_selector("div.hit")
            .build()
            .unwrap_err();
        assert!(matches!(err, ParseError::Selector { field, .. } if field == "title"));
    }

    #[test]
    fn image_option_appends_image_column_last() {
        let plain = Parser::for_engine(Engine::Google, ResultKind::News).unwrap();
        let with_images = Parser::builder()
            .engine(Engine::Google, ResultKind::News)
            .extract_images(ImageOptions::default())
            .build()
            .unwrap();

        let mut expected = plain.field_names();
        expected.push("image".to_string());
        assert_eq!(with_images.field_names(), expected);
    }

    #[test]
    fn custom_rules_extract_records() {
        let parser = Parser::builder()
            .rules(RuleSet::new(vec![
                FieldRule::text("title", "h3"),
                FieldRule::exists("has_link", "a"),
            ]))
            .block_selector("li.hit")
            .build()
            .unwrap();

        let set = parser
            .parse_records(
                r##"<ul>
                    <li class="hit"><h3>one</h3><a href="#">x</a></li>
                    <li class="hit"><h3>two</h3></li>
                </ul>"##,
            )
            .unwrap();
        assert_eq!(set.records.len(), 2);
        assert_eq!(set.records[0].get("has_link"), Some(&Value::Bool(true)));
        assert_eq!(set.records[1].get("has_link"), Some(&Value::Bool(false)));
        assert!(set.warnings.is_empty());
    }

    #[test]
    fn decode_page_honors_declared_charset() {
        // ISO-8859-1 "café" with a declared charset
        let mut bytes =
            b"<html><head><meta charset=\"iso-8859-1\"></head><body>caf".to_vec();
        bytes.push(0xe9);
        bytes.extend_from_slice(b"</body></html>");
        let decoded = decode_page(&bytes);
        assert!(decoded.contains("café"), "{decoded}");
    }

    #[test]
    fn decode_page_sniffs_when_undeclared() {
        let bytes = "<html><body>плоский</body></html>".as_bytes();
        let decoded = decode_page(bytes);
        assert!(decoded.contains("плоский"));
    }
}
