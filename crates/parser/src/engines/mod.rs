// ABOUTME: Engine and result-kind enums plus the builtin selector registry.
// ABOUTME: One data-driven lookup maps (engine, kind) to block selector, rules, and metadata fn.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::metadata::MetadataFn;
use crate::rules::{FieldRule, RuleSet};

pub mod baidu;
pub mod duckduckgo;
pub mod google;
pub mod yahoo;

/// A search provider whose result-page markup this crate knows how to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    Google,
    DuckDuckGo,
    Yahoo,
    Baidu,
}

/// The category of listing captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    /// Organic text results.
    Text,
    News,
    Videos,
    Images,
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Engine::Google => "google",
            Engine::DuckDuckGo => "duckduckgo",
            Engine::Yahoo => "yahoo",
            Engine::Baidu => "baidu",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResultKind::Text => "text",
            ResultKind::News => "news",
            ResultKind::Videos => "videos",
            ResultKind::Images => "images",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Engine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "google" => Ok(Engine::Google),
            "duckduckgo" | "ddg" => Ok(Engine::DuckDuckGo),
            "yahoo" => Ok(Engine::Yahoo),
            "baidu" => Ok(Engine::Baidu),
            other => Err(format!("unknown engine {other:?}")),
        }
    }
}

impl FromStr for ResultKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "organic" => Ok(ResultKind::Text),
            "news" => Ok(ResultKind::News),
            "videos" | "video" => Ok(ResultKind::Videos),
            "images" | "image" => Ok(ResultKind::Images),
            other => Err(format!("unknown result kind {other:?}")),
        }
    }
}

/// One registry entry: everything the parser needs for an (engine, kind)
/// pair. The image rule is appended to `rules` only when image extraction
/// is requested.
pub(crate) struct EngineSpec {
    pub block_selector: &'static str,
    pub rules: RuleSet,
    pub image_rule: FieldRule,
    pub metadata: MetadataFn,
}

/// Looks up the builtin registry. Returns `None` for unsupported pairs.
pub(crate) fn lookup(engine: Engine, kind: ResultKind) -> Option<EngineSpec> {
    match (engine, kind) {
        (Engine::Google, ResultKind::Text) => Some(google::text()),
        (Engine::Google, ResultKind::News) => Some(google::news()),
        (Engine::Google, ResultKind::Videos) => Some(google::videos()),
        (Engine::Google, ResultKind::Images) => Some(google::images()),
        (Engine::DuckDuckGo, ResultKind::Text) => Some(duckduckgo::text()),
        (Engine::DuckDuckGo, ResultKind::News) => Some(duckduckgo::news()),
        (Engine::Yahoo, ResultKind::Text) => Some(yahoo::text()),
        (Engine::Yahoo, ResultKind::News) => Some(yahoo::news()),
        (Engine::Baidu, ResultKind::Text) => Some(baidu::text()),
        (Engine::Baidu, ResultKind::News) => Some(baidu::news()),
        _ => None,
    }
}

/// Every (engine, kind) pair with a registry entry.
pub fn supported_pairs() -> &'static [(Engine, ResultKind)] {
    &[
        (Engine::Google, ResultKind::Text),
        (Engine::Google, ResultKind::News),
        (Engine::Google, ResultKind::Videos),
        (Engine::Google, ResultKind::Images),
        (Engine::DuckDuckGo, ResultKind::Text),
        (Engine::DuckDuckGo, ResultKind::News),
        (Engine::Yahoo, ResultKind::Text),
        (Engine::Yahoo, ResultKind::News),
        (Engine::Baidu, ResultKind::Text),
        (Engine::Baidu, ResultKind::News),
    ]
}
