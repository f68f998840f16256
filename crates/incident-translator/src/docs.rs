//! Public Text Extraction from Policy Documentation
//!
//! Policy documentation is free-form markdown written for on-call engineers.
//! The public-facing texts live inside custom tags, e.g.
//! `<public-name>Checkout unavailable</public-name>`; everything outside the
//! recognised tags is ignored.

use regex::{Regex, RegexBuilder};
use std::sync::OnceLock;

static TAG_PATTERNS: OnceLock<[Regex; 3]> = OnceLock::new();

/// Tags recognised in the documentation blob
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicTag {
    /// Incident title
    Name,
    /// Message posted when the incident opens
    StartInfo,
    /// Message posted when the incident is resolved
    EndInfo,
}

impl PublicTag {
    pub fn tag_name(&self) -> &'static str {
        match self {
            PublicTag::Name => "public-name",
            PublicTag::StartInfo => "public-start-info",
            PublicTag::EndInfo => "public-end-info",
        }
    }

    fn index(&self) -> usize {
        match self {
            PublicTag::Name => 0,
            PublicTag::StartInfo => 1,
            PublicTag::EndInfo => 2,
        }
    }

    fn pattern(&self) -> &'static Regex {
        let patterns = TAG_PATTERNS.get_or_init(|| {
            [PublicTag::Name, PublicTag::StartInfo, PublicTag::EndInfo].map(|tag| {
                let name = regex::escape(tag.tag_name());
                RegexBuilder::new(&format!("<{name}>(.*?)</{name}>"))
                    .case_insensitive(true)
                    .dot_matches_new_line(true)
                    .build()
                    .expect("Invalid tag pattern")
            })
        });
        &patterns[self.index()]
    }
}

/// Extract the text of `tag` from `docs`, falling back to `default`.
///
/// Only the first occurrence is used. The result is always trimmed.
pub fn extract_tag(docs: Option<&str>, tag: PublicTag, default: &str) -> String {
    let docs = match docs {
        Some(docs) if !docs.is_empty() => docs,
        _ => return default.trim().to_string(),
    };

    tag.pattern()
        .captures(docs)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(default)
        .trim()
        .to_string()
}
