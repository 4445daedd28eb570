// ABOUTME: Baidu selector tables for text and news results.
// ABOUTME: Baidu renders dates as localized calendar text; a custom rule parses them.

use std::path::Path;

use chrono::{Datelike, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};

use crate::engines::EngineSpec;
use crate::error::ParseError;
use crate::metadata::{self, parse_capture_filename, PageMetadata};
use crate::record::Value;
use crate::rules::{FieldRule, RuleSet, TitleRule};
use crate::selectors::get_or_compile;

const TEXT_BLOCK: &str = "div.result.c-container";
const NEWS_BLOCK: &str = "div.result-op.c-container";

const PAGE_NUMBER: &str = "div#page strong";

pub(crate) fn text() -> EngineSpec {
    EngineSpec {
        block_selector: TEXT_BLOCK,
        rules: RuleSet::new(vec![
            FieldRule::text("title", "h3.t"),
            FieldRule::attribute("link", "h3.t > a", "href"),
            FieldRule::text("text", "div.c-abstract"),
            FieldRule::exists("has_image", "img"),
            FieldRule::custom("published", published),
        ]),
        image_rule: FieldRule::image(
            "image",
            "img",
            TitleRule::Text {
                selector: "h3.t".into(),
            },
        ),
        metadata,
    }
}

pub(crate) fn news() -> EngineSpec {
    EngineSpec {
        block_selector: NEWS_BLOCK,
        rules: RuleSet::new(vec![
            FieldRule::text("title", "h3.c-title"),
            FieldRule::attribute("link", "h3.c-title a", "href"),
            FieldRule::text("text", "div.c-summary"),
            FieldRule::text("source", "div.c-author"),
            FieldRule::custom("published", published),
        ]),
        image_rule: FieldRule::image(
            "image",
            "img",
            TitleRule::Text {
                selector: "h3.c-title".into(),
            },
        ),
        metadata,
    }
}

// 2023年4月1日
static CALENDAR_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})年(\d{1,2})月(\d{1,2})日").expect("calendar date regex"));
// 4月1日, rendered without a year for dates in the current year
static YEARLESS_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})月(\d{1,2})日").expect("yearless date regex"));

/// Parses Baidu's localized calendar text. Year-less forms are retried with
/// the current year prefixed; anything else yields None.
fn parse_baidu_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Some(caps) = CALENDAR_DATE.captures(text) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    if YEARLESS_DATE.is_match(text) {
        let retried = format!("{}年{}", Local::now().year(), text);
        if let Some(caps) = CALENDAR_DATE.captures(&retried) {
            let year: i32 = caps[1].parse().ok()?;
            let month: u32 = caps[2].parse().ok()?;
            let day: u32 = caps[3].parse().ok()?;
            return NaiveDate::from_ymd_opt(year, month, day);
        }
    }
    None
}

/// Publication date of a result, when the snippet carries one.
fn published(block: &ElementRef<'_>) -> Value {
    let Some(sel) = get_or_compile("span.c-color-gray2") else {
        return Value::Missing;
    };
    let Some(el) = block.select(&sel).next() else {
        return Value::Missing;
    };
    let text = el.text().collect::<String>();
    parse_baidu_date(&text)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(Value::DateTime)
        .unwrap_or(Value::Missing)
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
