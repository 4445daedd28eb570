// ABOUTME: Pre-compiled CSS selector cache shared across extraction calls.
// ABOUTME: Selectors in rule tables are reused heavily; compile each string once.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use scraper::Selector;

static SELECTOR_CACHE: Lazy<RwLock<HashMap<String, Option<Selector>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Gets or compiles a CSS selector, caching the result.
///
/// Returns `None` for invalid selectors; invalid strings are cached too so
/// they are not re-parsed on every block.
pub(crate) fn get_or_compile(css: &str) -> Option<Selector> {
    {
        let cache = SELECTOR_CACHE.read().unwrap();
        if let Some(cached) = cache.get(css) {
            return cached.clone();
        }
    }

    let compiled = Selector::parse(css).ok();
    let mut cache = SELECTOR_CACHE.write().unwrap();
    // Another thread may have inserted while we compiled
    if let Some(cached) = cache.get(css) {
        return cached.clone();
    }
    cache.insert(css.to_string(), compiled.clone());
    compiled
}

/// Checks that a selector string compiles. Used at parser construction so
/// bad configuration fails before any page is read.
pub(crate) fn is_valid(css: &str) -> bool {
    get_or_compile(css).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_selector_is_cached() {
        assert!(get_or_compile("div.result > h3").is_some());
        assert!(get_or_compile("div.result > h3").is_some());
    }

    #[test]
    fn invalid_selector_returns_none() {
        assert!(get_or_compile("[[[nope").is_none());
        assert!(!is_valid("[[[nope"));
    }
}
