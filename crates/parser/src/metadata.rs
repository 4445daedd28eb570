// ABOUTME: Page-level metadata: capture filename parsing and shared in-page helpers.
// ABOUTME: Engine-specific metadata functions live in the engines modules and build on these.

use std::path::Path;

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use serde::Serialize;

use crate::error::ParseError;
use crate::selectors::get_or_compile;

/// Chrono format of the fixed-width timestamp suffix in capture filenames.
pub const CAPTURE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H_%M_%S";

const TIMESTAMP_LEN: usize = 19;

/// Page-level facts derived from a capture's filename and content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageMetadata {
    pub result_type: String,
    pub engine: String,
    pub query: String,
    /// Capture time, from the filename's trailing timestamp.
    pub date: NaiveDateTime,
    /// In-page page number; absent for engines that do not paginate.
    pub page: Option<u32>,
    /// Engine-reported total result count, when the page carries one.
    pub total_results: Option<u64>,
}

/// Metadata shared by a merged set of pages: [`PageMetadata`] minus the
/// per-page date and page number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryMetadata {
    pub result_type: String,
    pub engine: String,
    pub query: String,
    pub total_results: Option<u64>,
}

impl From<&PageMetadata> for QueryMetadata {
    fn from(meta: &PageMetadata) -> Self {
        Self {
            result_type: meta.result_type.clone(),
            engine: meta.engine.clone(),
            query: meta.query.clone(),
            total_results: meta.total_results,
        }
    }
}

impl PageMetadata {
    /// True if the two pages belong to the same capture series.
    pub(crate) fn consistent_with(&self, other: &PageMetadata) -> bool {
        self.engine == other.engine
            && self.query == other.query
            && self.result_type == other.result_type
    }
}

/// Derives page metadata from a parsed page and its source path.
pub type MetadataFn = fn(&Html, &Path) -> Result<PageMetadata, ParseError>;

/// The filename-encoded parts of a capture:
/// `<engine>_<query>_..._<resulttype>_..._<YYYY-MM-DD_HH_MM_SS>.html`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FilenameParts {
    pub engine: String,
    pub query: String,
    pub result_type: String,
    pub date: NaiveDateTime,
}

/// Parses the underscore-delimited capture filename. The final 19 characters
/// of the stem must be the capture timestamp; the result type sits two
/// segments before it.
pub(crate) fn parse_capture_filename(path: &Path) -> Result<FilenameParts, ParseError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ParseError::filename(path.display().to_string(), "not valid UTF-8"))?;
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    let ts_start = stem
        .len()
        .checked_sub(TIMESTAMP_LEN)
        .ok_or_else(|| ParseError::filename(name, "too short for a trailing timestamp"))?;
    let timestamp = stem
        .get(ts_start..)
        .ok_or_else(|| ParseError::filename(name, "timestamp is not at a character boundary"))?;
    let date = NaiveDateTime::parse_from_str(timestamp, CAPTURE_TIMESTAMP_FORMAT)
        .map_err(|e| ParseError::filename(name, format!("bad timestamp {timestamp:?}: {e}")))?;

    let segments: Vec<&str> = stem.split('_').collect();
    // engine, query, result type, one trailing segment, then the timestamp's
    // own four underscore-separated parts
    if segments.len() < 8 {
        return Err(ParseError::filename(name, "too few underscore segments"));
    }
    let result_type = segments[segments.len() - 6];

    Ok(FilenameParts {
        engine: segments[0].to_string(),
        query: segments[1].to_string(),
        result_type: result_type.to_string(),
        date,
    })
}

/// Default metadata function: filename parts only, no in-page lookups.
/// Used for custom rule sets without their own metadata function.
pub fn filename_metadata(_doc: &Html, path: &Path) -> Result<PageMetadata, ParseError> {
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

/// Concatenated text of the first element matching `css`, if any.
pub(crate) fn first_text(doc: &Html, css: &str) -> Option<String> {
    let sel = get_or_compile(css)?;
    let el = doc.select(&sel).next()?;
    let text = el.text().collect::<Vec<_>>().join(" ");
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// The in-page page number, read as the first integer text of `css`.
/// Missing or non-numeric elements are treated as absent, not errors.
pub(crate) fn page_number(doc: &Html, css: &str) -> Option<u32> {
    first_text(doc, css)?.trim().parse().ok()
}

static NUMBER_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:[,.]\d{3})*[,.]?\d*").expect("number run regex"));

/// Parses a free-text result-stats string ("About 1,234,567 results
/// (0.42 seconds)") into a total-result count.
///
/// Every numeric run is taken, `,` and `.` are treated as group separators
/// and stripped, and the largest resulting value wins. Tolerant of
/// locale-varying phrasing by construction.
pub(crate) fn parse_result_stats(text: &str) -> Option<u64> {
    NUMBER_RUN
        .find_iter(text)
        .filter_map(|m| {
            let digits: String = m.as_str().chars().filter(char::is_ascii_digit).collect();
            digits.parse::<u64>().ok()
        })
        .max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn filename_round_trip() {
        let parts = parse_capture_filename(Path::new(
            "google_catfacts_something_organic_something_2023-04-01_12_00_00.html",
        ))
        .unwrap();
        assert_eq!(parts.engine, "google");
        assert_eq!(parts.query, "catfacts");
        assert_eq!(parts.result_type, "organic");
        assert_eq!(
            parts.date,
            NaiveDate::from_ymd_opt(2023, 4, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn filename_with_directory_components() {
        let parts = parse_capture_filename(Path::new(
            "/data/captures/duckduckgo_weather_p1_news_x_2024-01-31_08_15_59.html",
        ))
        .unwrap();
        assert_eq!(parts.engine, "duckduckgo");
        assert_eq!(parts.query, "weather");
        assert_eq!(parts.result_type, "news");
    }

    #[test]
    fn malformed_filenames_are_rejected() {
        assert!(parse_capture_filename(Path::new("short.html")).is_err());
        assert!(parse_capture_filename(Path::new(
            "google_q_a_organic_b_2023-13-01_12_00_00.html"
        ))
        .is_err());
        assert!(parse_capture_filename(Path::new("justonesegment2023-04-01_12_00_00.html"))
            .is_err());
    }

    #[test]
    fn result_stats_returns_largest_number() {
        assert_eq!(
            parse_result_stats("About 1,234,567 results (0.42 seconds)"),
            Some(1_234_567)
        );
    }

    #[test]
    fn result_stats_handles_period_separators() {
        assert_eq!(
            parse_result_stats("Ungefähr 2.345.000 Ergebnisse (0,38 Sekunden)"),
            Some(2_345_000)
        );
    }

    #[test]
    fn result_stats_without_numbers_is_none() {
        assert_eq!(parse_result_stats("no numbers here"), None);
    }

    #[test]
    fn query_metadata_drops_page_and_date() {
        let meta = PageMetadata {
            result_type: "organic".into(),
            engine: "google".into(),
            query: "catfacts".into(),
            date: NaiveDate::from_ymd_opt(2023, 4, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            page: Some(2),
            total_results: Some(99),
        };
        let query = QueryMetadata::from(&meta);
        assert_eq!(query.engine, "google");
        assert_eq!(query.total_results, Some(99));
    }
}
