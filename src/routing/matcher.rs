//! Route matching logic.
//!
//! # Responsibilities
//! - Match the request method against a route's allowed methods
//! - Match the request path against a route's pattern
//! - Extract named captures as route parameters
//!
//! # Design Decisions
//! - Method matching is case-insensitive; methods are stored uppercase
//! - Path matching is case-sensitive and uses the full pattern as written,
//!   so patterns carry their own `^...$` anchors
//! - Patterns compile once at startup

use regex::Regex;

use crate::params::RouteParams;

/// Compiled path pattern with named capture groups.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    source: &'static str,
    regex: Regex,
}

impl RoutePattern {
    pub fn new(source: &'static str) -> Result<Self, regex::Error> {
        Ok(Self {
            source,
            regex: Regex::new(source)?,
        })
    }

    pub fn as_str(&self) -> &'static str {
        self.source
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Named captures for `path`, or `None` when the pattern does not match.
    pub fn captures(&self, path: &str) -> Option<RouteParams> {
        let caps = self.regex.captures(path)?;
        Some(
            self.regex
                .capture_names()
                .flatten()
                .filter_map(|name| {
                    caps.name(name)
                        .map(|m| (name.to_string(), m.as_str().to_string()))
                })
                .collect(),
        )
    }
}

/// Set of HTTP methods a route accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSet(Vec<String>);

impl MethodSet {
    pub fn new(methods: &[&str]) -> Self {
        let mut normalized: Vec<String> = methods
            .iter()
            .map(|m| m.trim().to_ascii_uppercase())
            .filter(|m| !m.is_empty())
            .collect();
        normalized.sort();
        normalized.dedup();
        Self(normalized)
    }

    pub fn contains(&self, method: &str) -> bool {
        self.0.iter().any(|m| m.eq_ignore_ascii_case(method))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}
