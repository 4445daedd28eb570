// ABOUTME: The query evaluator: applies one field rule to one result block.
// ABOUTME: Zero or ambiguous matches warn and continue; missing attributes are fatal.

use scraper::ElementRef;

use crate::error::ParseError;
use crate::images::{self, ImageOptions};
use crate::record::Value;
use crate::rules::{FieldRule, RuleKind, TitleRule};
use crate::selectors::get_or_compile;
use crate::warnings::Warning;

/// Collapses runs of whitespace into single spaces.
fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn element_text(el: &ElementRef<'_>) -> String {
    normalize_whitespace(&el.text().collect::<Vec<_>>().join(" "))
}

/// Evaluates a single rule against a result block.
///
/// Text and Attribute rules expect exactly one match: zero matches warn and
/// yield Missing, several matches warn and use the first. Exists rules are
/// always a boolean. Image rules are best-effort and never warn.
pub(crate) fn evaluate(
    rule: &FieldRule,
    block: &ElementRef<'_>,
    image_opts: &ImageOptions,
    warnings: &mut Vec<Warning>,
) -> Result<Value, ParseError> {
    match &rule.kind {
        RuleKind::Custom { func } => Ok(func(block)),

        RuleKind::Exists { selector } => {
            let matched = get_or_compile(selector)
                .map(|sel| block.select(&sel).next().is_some())
                .unwrap_or(false);
            Ok(Value::Bool(matched))
        }

        RuleKind::Text { selector } => match single_match(rule, selector, block, warnings) {
            Some(el) => Ok(Value::Text(element_text(&el))),
            None => Ok(Value::Missing),
        },

        RuleKind::Attribute {
            selector,
            attribute,
        } => match single_match(rule, selector, block, warnings) {
            Some(el) => {
                let value =
                    el.value()
                        .attr(attribute)
                        .ok_or_else(|| ParseError::MissingAttribute {
                            field: rule.name.clone(),
                            attribute: attribute.clone(),
                        })?;
                Ok(Value::Text(value.trim().to_string()))
            }
            None => Ok(Value::Missing),
        },

        RuleKind::Image { selector, title } => {
            let Some(sel) = get_or_compile(selector) else {
                return Ok(Value::Missing);
            };
            // Thumbnails are commonly optional; no warning on zero matches.
            let Some(el) = block.select(&sel).next() else {
                return Ok(Value::Missing);
            };
            let Some(payload) = el.value().attr("src") else {
                return Ok(Value::Missing);
            };
            let title = evaluate_title(title, block);
            match images::save_inline_image(payload, &title, image_opts) {
                Some(path) => Ok(Value::Path(path)),
                None => Ok(Value::Missing),
            }
        }
    }
}

/// Runs a selector that should match exactly once, warning on zero or
/// multiple matches. Returns the first match, if any.
fn single_match<'a>(
    rule: &FieldRule,
    selector: &str,
    block: &ElementRef<'a>,
    warnings: &mut Vec<Warning>,
) -> Option<ElementRef<'a>> {
    let Some(sel) = get_or_compile(selector) else {
        warnings.push(Warning::SelectorMissed {
            field: rule.name.clone(),
            selector: selector.to_string(),
        });
        return None;
    };

    let mut matches = block.select(&sel);
    let first = matches.next();
    match first {
        None => warnings.push(Warning::SelectorMissed {
            field: rule.name.clone(),
            selector: selector.to_string(),
        }),
        Some(_) if matches.next().is_some() => warnings.push(Warning::MultipleMatches {
            field: rule.name.clone(),
            selector: selector.to_string(),
        }),
        Some(_) => {}
    }
    first
}

fn evaluate_title(title: &TitleRule, block: &ElementRef<'_>) -> String {
    match title {
        TitleRule::Text { selector } => get_or_compile(selector)
            .and_then(|sel| block.select(&sel).next().map(|el| element_text(&el)))
            .unwrap_or_default(),
        TitleRule::Attribute {
            selector,
            attribute,
        } => get_or_compile(selector)
            .and_then(|sel| {
                block
                    .select(&sel)
                    .next()
                    .and_then(|el| el.value().attr(attribute))
                    .map(|v| v.trim().to_string())
            })
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scraper::{Html, Selector};

    const BLOCK_HTML: &str = r#"
        <div class="hit">
            <h3>  First   Result </h3>
            <a class="main" href="https://example.org/a">go</a>
            <span class="snippet">one</span>
            <span class="snippet">two</span>
            <a class="bare">no href</a>
        </div>
    "#;

    fn with_block<T>(f: impl FnOnce(&ElementRef<'_>) -> T) -> T {
        let doc = Html::parse_fragment(BLOCK_HTML);
        let sel = Selector::parse("div.hit").unwrap();
        let block = doc.select(&sel).next().unwrap();
        f(&block)
    }

    fn eval(rule: &FieldRule, warnings: &mut Vec<Warning>) -> Result<Value, ParseError> {
        with_block(|block| evaluate(rule, block, &ImageOptions::default(), warnings))
    }

    #[test]
    fn text_with_single_match_has_no_warning() {
        let mut warnings = Vec::new();
        let value = eval(&FieldRule::text("title", "h3"), &mut warnings).unwrap();
        assert_eq!(value, Value::Text("First Result".into()));
        assert!(warnings.is_empty());
    }

    #[test]
    fn text_with_zero_matches_warns_and_yields_missing() {
        let mut warnings = Vec::new();
        let value = eval(&FieldRule::text("title", "h1"), &mut warnings).unwrap();
        assert_eq!(value, Value::Missing);
        assert_eq!(
            warnings,
            vec![Warning::SelectorMissed {
                field: "title".into(),
                selector: "h1".into()
            }]
        );
    }

    #[test]
    fn text_with_multiple_matches_warns_and_uses_first() {
        let mut warnings = Vec::new();
        let value = eval(&FieldRule::text("snippet", "span.snippet"), &mut warnings).unwrap();
        assert_eq!(value, Value::Text("one".into()));
        assert_eq!(
            warnings,
            vec![Warning::MultipleMatches {
                field: "snippet".into(),
                selector: "span.snippet".into()
            }]
        );
    }

    #[test]
    fn attribute_returns_trimmed_value() {
        let mut warnings = Vec::new();
        let value = eval(
            &FieldRule::attribute("link", "a.main", "href"),
            &mut warnings,
        )
        .unwrap();
        assert_eq!(value, Value::Text("https://example.org/a".into()));
        assert!(warnings.is_empty());
    }

    #[test]
    fn attribute_missing_on_match_is_fatal() {
        let mut warnings = Vec::new();
        let err = eval(
            &FieldRule::attribute("link", "a.bare", "href"),
            &mut warnings,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ParseError::MissingAttribute { ref field, ref attribute }
                if field == "link" && attribute == "href"
        ));
    }

    #[test]
    fn exists_is_strictly_boolean() {
        let mut warnings = Vec::new();
        assert_eq!(
            eval(&FieldRule::exists("has_link", "a"), &mut warnings).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            eval(&FieldRule::exists("has_img", "img"), &mut warnings).unwrap(),
            Value::Bool(false)
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn image_with_zero_matches_is_silent() {
        let mut warnings = Vec::new();
        let rule = FieldRule::image(
            "image",
            "img",
            TitleRule::Text {
                selector: "h3".into(),
            },
        );
        assert_eq!(eval(&rule, &mut warnings).unwrap(), Value::Missing);
        assert!(warnings.is_empty());
    }

    #[test]
    fn custom_rule_delegates() {
        fn always_five(_: &ElementRef<'_>) -> Value {
            Value::Int(5)
        }
        let mut warnings = Vec::new();
        let value = eval(&FieldRule::custom("n", always_five), &mut warnings).unwrap();
        assert_eq!(value, Value::Int(5));
    }
}
