// ABOUTME: Google selector tables for text, news, video, and image results.
// ABOUTME: Carries the video date/duration custom rules and the result-stats metadata fn.

use std::path::Path;

use chrono::NaiveDate;
use scraper::{ElementRef, Html};

use crate::engines::EngineSpec;
use crate::error::ParseError;
use crate::metadata::{self, parse_capture_filename, parse_result_stats, PageMetadata};
use crate::record::Value;
use crate::rules::{FieldRule, RuleSet, TitleRule};
use crate::selectors::get_or_compile;

// div[jscontroller] variants are too deep to check for indentation
const TEXT_BLOCK: &str = "div.g > div";
const NEWS_BLOCK: &str = "div.SoaBEf";
const VIDEOS_BLOCK: &str = "div.MjjYud";
const IMAGES_BLOCK: &str = "div.isv-r";

const PAGE_NUMBER: &str = "td.YyVfkd";
const RESULT_STATS: &str = "#result-stats";

pub(crate) fn text() -> EngineSpec {
    EngineSpec {
        block_selector: TEXT_BLOCK,
        rules: RuleSet::new(vec![
            FieldRule::text("title", "div.yuRUbf > a > h3"),
            FieldRule::attribute("link", "div.yuRUbf > a", "href"),
            // dates and authors are part of the preview text for now
            FieldRule::text("text", "div.VwiC3b"),
            FieldRule::exists("has_image", "img"),
            FieldRule::exists("is_indented", "ul.FxLDp"),
        ]),
        image_rule: FieldRule::image(
            "image",
            "img",
            TitleRule::Text {
                selector: "div.yuRUbf > a > h3".into(),
            },
        ),
        metadata,
    }
}

pub(crate) fn news() -> EngineSpec {
    EngineSpec {
        block_selector: NEWS_BLOCK,
        rules: RuleSet::new(vec![
            FieldRule::text("title", "div.mCBkyc"),
            FieldRule::attribute("link", "a", "href"),
            FieldRule::text("text", "div.GI74Re"),
            FieldRule::text("source", "div.CEMjEf"),
            FieldRule::exists("has_image", "div.FAkayc img"),
            FieldRule::text("published", "div.OSrXXb"),
        ]),
        image_rule: FieldRule::image(
            "image",
            "div.FAkayc img",
            TitleRule::Text {
                selector: "div.mCBkyc".into(),
            },
        ),
        metadata,
    }
}

pub(crate) fn videos() -> EngineSpec {
    EngineSpec {
        block_selector: VIDEOS_BLOCK,
        rules: RuleSet::new(vec![
            FieldRule::text("title", "h3"),
            FieldRule::attribute("link", "div.ct3b9e > a", "href"),
            FieldRule::text("text", "div.Uroaid"),
            FieldRule::text("source", "span.Zg1NU"),
            FieldRule::custom("published", video_published),
            FieldRule::custom("duration", video_duration),
        ]),
        image_rule: FieldRule::image(
            "image",
            "img",
            TitleRule::Text {
                selector: "h3".into(),
            },
        ),
        metadata,
    }
}

pub(crate) fn images() -> EngineSpec {
    EngineSpec {
        block_selector: IMAGES_BLOCK,
        rules: RuleSet::new(vec![
            FieldRule::attribute("title", "a.VFACy", "title"),
            FieldRule::attribute("link", "a.VFACy", "href"),
            FieldRule::text("source", "div.fxgdke"),
        ]),
        image_rule: FieldRule::image(
            "image",
            "img.rg_i",
            TitleRule::Attribute {
                selector: "img.rg_i".into(),
                attribute: "alt".into(),
            },
        ),
        metadata,
    }
}

/// Publication date of a video result. Some dates are relative ("2 days
/// ago"); those yield Missing for now.
fn video_published(block: &ElementRef<'_>) -> Value {
    let Some(sel) = get_or_compile("div.P7xzyf > span:last-child") else {
        return Value::Missing;
    };
    let Some(el) = block.select(&sel).next() else {
        return Value::Missing;
    };
    let text = el.text().collect::<String>();
    NaiveDate::parse_from_str(text.trim(), "%d.%m.%Y")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(Value::DateTime)
        .unwrap_or(Value::Missing)
}

/// Running time of a video result; some videos carry none.
fn video_duration(block: &ElementRef<'_>) -> Value {
    let Some(sel) = get_or_compile("div.J1mWY") else {
        return Value::Missing;
    };
    let Some(el) = block.select(&sel).next() else {
        return Value::Missing;
    };
    let text = el.text().collect::<String>();
    parse_colon_duration(text.trim())
        .map(Value::Seconds)
        .unwrap_or(Value::Missing)
}

/// Parses `MM:SS` or `HH:MM:SS` into seconds.
fn parse_colon_duration(s: &str) -> Option<i64> {
    let parts: Vec<&str> = s.split(':').collect();
    match parts.len() {
        2 => {
            let mins: i64 = parts[0].trim().parse().ok()?;
            let secs: i64 = parts[1].trim().parse().ok()?;
            Some(mins * 60 + secs)
        }
        3 => {
            let hours: i64 = parts[0].trim().parse().ok()?;
            let mins: i64 = parts[1].trim().parse().ok()?;
            let secs: i64 = parts[2].trim().parse().ok()?;
            Some(hours * 3600 + mins * 60 + secs)
        }
        _ => None,
    }
}

/// Google page metadata: filename parts plus the in-page page number and
/// the result-stats total. Both in-page reads are best-effort.
pub fn metadata(doc: &Html, path: &Path) -> Result<PageMetadata, ParseError> {
    let parts = parse_capture_filename(path)?;
    Ok(PageMetadata {
        result_type: parts.result_type,
        engine: parts.engine,
        query: parts.query,
        date: parts.date,
        page: metadata::page_number(doc, PAGE_NUMBER),
        total_results: metadata::first_text(doc, RESULT_STATS)
            .and_then(|t| parse_result_stats(&t)),
    })
}
