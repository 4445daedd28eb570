// ABOUTME: DuckDuckGo selector tables for text and news results.
// ABOUTME: DuckDuckGo captures are single-page; metadata comes from the filename alone.

use std::path::Path;

use scraper::Html;

use crate::engines::EngineSpec;
use crate::error::ParseError;
use crate::metadata::{parse_capture_filename, PageMetadata};
use crate::rules::{FieldRule, RuleSet, TitleRule};

// Some of the other <article> elements are ads
const TEXT_BLOCK: &str = "article[id|='r1']";
const NEWS_BLOCK: &str = "div.result__body";

pub(crate) fn text() -> EngineSpec {
    EngineSpec {
        block_selector: TEXT_BLOCK,
        rules: RuleSet::new(vec![
            FieldRule::text("title", "h2"),
            FieldRule::attribute("link", "h2 > a", "href"),
            // the last <span> skips the leading date
            FieldRule::text("text", "article > div:nth-child(3) span:last-child"),
        ]),
        image_rule: FieldRule::image(
            "image",
            "img",
            TitleRule::Text {
                selector: "h2".into(),
            },
        ),
        metadata,
    }
}

pub(crate) fn news() -> EngineSpec {
    EngineSpec {
        block_selector: NEWS_BLOCK,
        rules: RuleSet::new(vec![
            FieldRule::text("title", "h2.result__title"),
            FieldRule::attribute("link", "a.result__a", "href"),
            FieldRule::text("text", "div.result__snippet"),
            FieldRule::text("source", "a.result__url"),
            FieldRule::exists("has_image", "div.result__image"),
            FieldRule::text("published", "span.result__timestamp"),
        ]),
        image_rule: FieldRule::image(
            "image",
            "div.result__image img",
            TitleRule::Text {
                selector: "h2.result__title".into(),
            },
        ),
        metadata,
    }
}

/// DuckDuckGo serves one continuous page, so there is no page number to
/// read and no total-result counter.
pub fn metadata(_doc: &Html, path: &Path) -> Result<PageMetadata, ParseError> {
    let parts = parse_capture_filename(path)?;
    Ok(PageMetadata {
        result_type: parts.result_type,
        engine: parts.engine,
        query: parts.query,
        date: parts.date,
        page: None,
        total_results: None,
    })
}
