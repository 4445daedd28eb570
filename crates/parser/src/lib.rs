// ABOUTME: Library entry point for the serpmill SERP capture parser.
// ABOUTME: Re-exports the public API: Parser, rules, records, metadata, and warnings.

//! serpmill - extracts structured records from archived search engine
//! result pages.
//!
//! Captures are plain HTML files named
//! `<engine>_<query>_..._<resulttype>_..._<YYYY-MM-DD_HH_MM_SS>.html`.
//! A [`Parser`] applies a declarative table of CSS-selector rules to every
//! result block on a page, and can merge a directory of paginated captures
//! into one ordered table.
//!
//! # Example
//!
//! ```no_run
//! use serpmill_parser::{Engine, Parser, ResultKind};
//!
//! fn main() -> Result<(), serpmill_parser::ParseError> {
//!     let parser = Parser::for_engine(Engine::Google, ResultKind::News)?;
//!     let page = parser.parse_file("google_catfacts_1_news_0_2023-04-01_12_00_00.html")?;
//!     for record in &page.records {
//!         println!("{:?}", record.get("title"));
//!     }
//!     Ok(())
//! }
//! ```

pub mod engines;
pub mod error;
mod evaluate;
mod extract;
pub mod images;
pub mod merge;
pub mod metadata;
pub mod parser;
pub mod record;
pub mod rules;
mod selectors;
pub mod warnings;

pub use crate::engines::{supported_pairs, Engine, ResultKind};
pub use crate::error::ParseError;
pub use crate::images::{ImageFormat, ImageOptions};
pub use crate::merge::DirExtraction;
pub use crate::metadata::{
    filename_metadata, MetadataFn, PageMetadata, QueryMetadata, CAPTURE_TIMESTAMP_FORMAT,
};
pub use crate::parser::{PageExtraction, Parser, ParserBuilder, RecordSet};
pub use crate::record::{Record, ResultTable, Value};
pub use crate::rules::{CustomFn, FieldRule, RuleKind, RuleSet, TitleRule};
pub use crate::warnings::Warning;
