//! Ordered phone-number shapes.
//!
//! Patterns are tried in declaration order and the first one that matches
//! anywhere in the text wins. Lower-priority patterns are never consulted
//! once an earlier one has matched, so the order is part of the behavior.
//! Digits are spelled `[0-9]` so only ASCII digits count, while `\s` keeps
//! its Unicode meaning and accepts no-break spaces copied from web pages.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{CoreError, Result};

pub const DEFAULT_PATTERNS: [&str; 6] = [
    // international, optional separators between digit groups
    r"\+[0-9]{1,3}[-.\s]?[0-9]{1,4}[-.\s]?[0-9]{1,4}[-.\s]?[0-9]{1,4}[-.\s]?[0-9]{1,4}",
    // international, bare
    r"\+[0-9]{1,3}\s?[0-9]{6,14}",
    // plain digit run
    r"[0-9]{10,15}",
    // (xxx) xxx-xxxx
    r"\([0-9]{3}\)\s?[0-9]{3}[-.\s]?[0-9]{4}",
    // xxx-xxx-xxxx, xxx.xxx.xxxx
    r"[0-9]{3}[-.\s][0-9]{3}[-.\s][0-9]{4}",
    // xxx xxx xxxx
    r"[0-9]{3}\s[0-9]{3}\s[0-9]{4}",
];

static DEFAULT_SET: Lazy<PatternSet> = Lazy::new(|| {
    let patterns = DEFAULT_PATTERNS
        .iter()
        .map(|pattern| compile(pattern).expect("default phone pattern compiles"))
        .collect();
    PatternSet { patterns }
});

#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<Regex>,
}

/// The first match found by a [`PatternSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhoneMatch<'t> {
    pub pattern_index: usize,
    pub start: usize,
    pub end: usize,
    pub text: &'t str,
}

impl PatternSet {
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut compiled = Vec::new();
        for (index, pattern) in patterns.into_iter().enumerate() {
            let regex = compile(pattern.as_ref()).map_err(|err| CoreError::InvalidPattern {
                index,
                message: err.to_string(),
            })?;
            compiled.push(regex);
        }
        if compiled.is_empty() {
            return Err(CoreError::EmptyPatternSet);
        }
        Ok(Self { patterns: compiled })
    }

    /// Shared instance built from [`DEFAULT_PATTERNS`].
    pub fn default_set() -> &'static PatternSet {
        &DEFAULT_SET
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn find<'t>(&self, text: &'t str) -> Option<PhoneMatch<'t>> {
        self.patterns
            .iter()
            .enumerate()
            .find_map(|(pattern_index, regex)| {
                regex.find(text).map(|m| PhoneMatch {
                    pattern_index,
                    start: m.start(),
                    end: m.end(),
                    text: m.as_str(),
                })
            })
    }

    pub fn matches_any(&self, text: &str) -> bool {
        self.patterns.iter().any(|regex| regex.is_match(text))
    }
}

fn compile(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    Regex::new(pattern)
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::default_set().clone()
    }
}
