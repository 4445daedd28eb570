// ABOUTME: Declarative field rule definitions applied to each result block.
// ABOUTME: A closed RuleKind enum enforces per-variant required fields at construction.

use scraper::ElementRef;

use crate::record::Value;

/// A per-result custom computation. Receives the result block and owns its
/// own failure handling; return [`Value::Missing`] when nothing usable is
/// found.
pub type CustomFn = fn(&ElementRef<'_>) -> Value;

/// How to derive the title string used in an extracted image's filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleRule {
    /// Inner text of the first element matching the selector.
    Text { selector: String },
    /// An attribute value on the first element matching the selector.
    Attribute { selector: String, attribute: String },
}

/// What to extract for one output field of a result block.
#[derive(Debug, Clone)]
pub enum RuleKind {
    /// Concatenated visible text of a single matched element.
    Text { selector: String },
    /// A named attribute of a single matched element.
    Attribute { selector: String, attribute: String },
    /// Whether the selector matches at all. Always yields a boolean.
    Exists { selector: String },
    /// An inline (data-URI) image decoded and written to disk; yields the
    /// written path. Best-effort: failures yield Missing.
    Image { selector: String, title: TitleRule },
    /// Delegates entirely to a named function.
    Custom { func: CustomFn },
}

/// A named extraction rule. Names are unique within a rule set and become
/// the output columns.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub name: String,
    pub kind: RuleKind,
}

impl FieldRule {
    pub fn text(name: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: RuleKind::Text {
                selector: selector.into(),
            },
        }
    }

    pub fn attribute(
        name: impl Into<String>,
        selector: impl Into<String>,
        attribute: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: RuleKind::Attribute {
                selector: selector.into(),
                attribute: attribute.into(),
            },
        }
    }

    pub fn exists(name: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: RuleKind::Exists {
                selector: selector.into(),
            },
        }
    }

    pub fn image(name: impl Into<String>, selector: impl Into<String>, title: TitleRule) -> Self {
        Self {
            name: name.into(),
            kind: RuleKind::Image {
                selector: selector.into(),
                title,
            },
        }
    }

    pub fn custom(name: impl Into<String>, func: CustomFn) -> Self {
        Self {
            name: name.into(),
            kind: RuleKind::Custom { func },
        }
    }

    /// Every selector string this rule carries, for up-front validation.
    pub(crate) fn selectors(&self) -> Vec<&str> {
        match &self.kind {
            RuleKind::Text { selector }
            | RuleKind::Attribute { selector, .. }
            | RuleKind::Exists { selector } => vec![selector],
            RuleKind::Image { selector, title } => {
                let title_selector = match title {
                    TitleRule::Text { selector } => selector,
                    TitleRule::Attribute { selector, .. } => selector,
                };
                vec![selector, title_selector]
            }
            RuleKind::Custom { .. } => vec![],
        }
    }
}

/// An ordered sequence of field rules. Declaration order determines both
/// evaluation order and output column order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<FieldRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self { rules }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn field_names(&self) -> Vec<String> {
        self.rules.iter().map(|r| r.name.clone()).collect()
    }

    /// Appends a rule; used to add the image rule when image extraction is
    /// requested, placing the image path last in column order.
    pub fn push(&mut self, rule: FieldRule) {
        self.rules.push(rule);
    }
}

impl FromIterator<FieldRule> for RuleSet {
    fn from_iter<T: IntoIterator<Item = FieldRule>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_set_preserves_declaration_order() {
        let rules = RuleSet::new(vec![
            FieldRule::text("title", "h3"),
            FieldRule::attribute("link", "a", "href"),
            FieldRule::exists("has_image", "img"),
        ]);
        assert_eq!(rules.field_names(), vec!["title", "link", "has_image"]);
    }

    #[test]
    fn image_rule_reports_both_selectors() {
        let rule = FieldRule::image(
            "image",
            "img.thumb",
            TitleRule::Attribute {
                selector: "img.thumb".into(),
                attribute: "alt".into(),
            },
        );
        assert_eq!(rule.selectors(), vec!["img.thumb", "img.thumb"]);
    }

    #[test]
    fn custom_rule_has_no_selectors() {
        fn noop(_: &ElementRef<'_>) -> Value {
            Value::Missing
        }
        let rule = FieldRule::custom("published", noop);
        assert!(rule.selectors().is_empty());
    }
}
