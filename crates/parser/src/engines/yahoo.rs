// ABOUTME: Yahoo selector tables for text and news results.
// ABOUTME: Yahoo paginates; the current page number sits in the pagination strip.

use std::path::Path;

use scraper::Html;

use crate::engines::EngineSpec;
use crate::error::ParseError;
use crate::metadata::{self, parse_capture_filename, PageMetadata};
use crate::rules::{FieldRule, RuleSet, TitleRule};

const TEXT_BLOCK: &str = "div.algo-sr";
const NEWS_BLOCK: &str = "div.NewsArticle";

const PAGE_NUMBER: &str = "div.compPagination strong";

pub(crate) fn text() -> EngineSpec {
    EngineSpec {
        block_selector: TEXT_BLOCK,
        rules: RuleSet::new(vec![
            FieldRule::text("title", "h3.title"),
            FieldRule::attribute("link", "h3.title > a", "href"),
            FieldRule::text("text", "div.compText p"),
            FieldRule::exists("has_image", "img"),
        ]),
        image_rule: FieldRule::image(
            "image",
            "img",
            TitleRule::Text {
                selector: "h3.title".into(),
            },
        ),
        metadata,
    }
}

pub(crate) fn news() -> EngineSpec {
    EngineSpec {
        block_selector: NEWS_BLOCK,
        rules: RuleSet::new(vec![
            FieldRule::text("title", "h4.s-title"),
            FieldRule::attribute("link", "h4.s-title a", "href"),
            FieldRule::text("text", "p.s-desc"),
            FieldRule::text("source", "span.s-source"),
            FieldRule::text("published", "span.s-time"),
            FieldRule::exists("has_image", "img.s-img"),
        ]),
        image_rule: FieldRule::image(
            "image",
            "img.s-img",
            TitleRule::Text {
                selector: "h4.s-title".into(),
            },
        ),
        metadata,
    }
}

pub fn metadata(doc: &Html, path: &Path) -> Result<PageMetadata, ParseError> {
    let parts = parse_capture_filename(path)?;
    Ok(PageMetadata {
        result_type: parts.result_type,
        engine: parts.engine,
        query: parts.query,
        date: parts.date,
        page: metadata::page_number(doc, PAGE_NUMBER),
        total_results: None,
    })
}
