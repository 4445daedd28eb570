// ABOUTME: The record extractor: enumerates result blocks and builds one record per block.
// ABOUTME: Block document order is preserved; it is the source of result ranking.

use scraper::Html;

use crate::error::ParseError;
use crate::evaluate::evaluate;
use crate::images::ImageOptions;
use crate::record::Record;
use crate::rules::RuleSet;
use crate::selectors::get_or_compile;
use crate::warnings::Warning;

/// Extracts one record per result block matched by `block_selector`, in
/// document order. A page with zero matching blocks yields an empty vec,
/// not an error.
pub(crate) fn extract_records(
    doc: &Html,
    block_selector: &str,
    rules: &RuleSet,
    image_opts: &ImageOptions,
    warnings: &mut Vec<Warning>,
) -> Result<Vec<Record>, ParseError> {
    let Some(sel) = get_or_compile(block_selector) else {
        // Construction already validated the selector; an uncompilable one
        // here behaves like a page with no results.
        return Ok(Vec::new());
    };

    let mut records = Vec::new();
    for block in doc.select(&sel) {
        let mut record = Record::new();
        for rule in rules.iter() {
            let value = evaluate(rule, &block, image_opts, warnings)?;
            record.insert(rule.name.clone(), value);
        }
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Value;
    use crate::rules::FieldRule;
    use pretty_assertions::assert_eq;

    const PAGE_HTML: &str = r#"
        <html><body>
            <div class="hit"><h3>alpha</h3><a href="https://a.example/">a</a></div>
            <div class="hit"><h3>beta</h3><a href="https://b.example/">b</a></div>
            <div class="hit"><h3>gamma</h3></div>
        </body></html>
    "#;

    fn rules() -> RuleSet {
        RuleSet::new(vec![
            FieldRule::text("title", "h3"),
            FieldRule::attribute("link", "a", "href"),
        ])
    }

    #[test]
    fn one_record_per_block_in_document_order() {
        let doc = Html::parse_document(PAGE_HTML);
        let mut warnings = Vec::new();
        let records =
            extract_records(&doc, "div.hit", &rules(), &ImageOptions::default(), &mut warnings)
                .unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].get("title"), Some(&Value::Text("alpha".into())));
        assert_eq!(records[1].get("title"), Some(&Value::Text("beta".into())));
        assert_eq!(records[2].get("title"), Some(&Value::Text("gamma".into())));
        // Third block has no link; the field is still present, as Missing.
        assert_eq!(records[2].get("link"), Some(&Value::Missing));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn zero_blocks_is_empty_not_an_error() {
        let doc = Html::parse_document("<html><body><p>nothing</p></body></html>");
        let mut warnings = Vec::new();
        let records =
            extract_records(&doc, "div.hit", &rules(), &ImageOptions::default(), &mut warnings)
                .unwrap();
        assert!(records.is_empty());
        assert!(warnings.is_empty());
    }
}
