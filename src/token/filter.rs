//! Blocklist filter - compiles plain words into leetspeak-tolerant matchers

use crate::error::{Result, SafeTokenError};
use regex::{Regex, RegexBuilder};

/// Look-alike classes. A class member found in a blocked word is replaced by
/// a bracket expression matching every member of its class.
///
/// No bracket expression contains a member of a later class, so running the
/// substitutions one class at a time gives the same pattern as substituting
/// every character in one pass.
const SUBSTITUTIONS: &[(&[char], &str)] = &[
    (&['1', 'i', 'l'], "[1il]"),
    (&['3', 'e'], "[3e]"),
    (&['4', 'a'], "[4a]"),
    (&['5', 's'], "[5s]"),
    (&['0', 'o'], "[0o]"),
];

/// Pattern text for a single blocked word.
///
/// Only the lowercase members listed in [`SUBSTITUTIONS`] are rewritten.
/// Everything else is escaped and matched literally.
fn word_pattern(word: &str) -> String {
    let mut pattern = String::with_capacity(word.len() * 4);
    let mut buf = [0u8; 4];

    for ch in word.chars() {
        let class = SUBSTITUTIONS
            .iter()
            .find(|(members, _)| members.contains(&ch))
            .map(|(_, replacement)| *replacement);

        match class {
            Some(replacement) => pattern.push_str(replacement),
            None => pattern.push_str(&regex::escape(ch.encode_utf8(&mut buf))),
        }
    }

    pattern
}

/// A compiled, case-insensitive matcher for one blocked word
#[derive(Debug, Clone)]
pub struct Matcher {
    word: String,
    regex: Regex,
}

impl Matcher {
    /// Compile a matcher for `word`
    pub fn new(word: &str) -> Result<Self> {
        let pattern = word_pattern(word);
        if pattern.is_empty() {
            tracing::warn!("Empty blocked word compiles to a pattern that blocks every token");
        }
        tracing::debug!(word = %word, pattern = %pattern, "Generated blocklist pattern");

        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| SafeTokenError::pattern(word, e.to_string()))?;

        Ok(Self {
            word: word.to_string(),
            regex,
        })
    }

    /// The blocked word this matcher was compiled from
    pub fn word(&self) -> &str {
        &self.word
    }

    /// The generated pattern, without the case-insensitivity flag
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Check whether the word (or a look-alike) occurs anywhere in `candidate`
    pub fn is_match(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }
}

/// Ordered collection of matchers, one per blocked word
#[derive(Debug, Clone, Default)]
pub struct BlockFilter {
    matchers: Vec<Matcher>,
}

impl BlockFilter {
    /// Compile a blocklist, keeping the input order
    pub fn new<I, S>(block_list: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let matchers = block_list
            .into_iter()
            .map(|word| Matcher::new(word.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { matchers })
    }

    /// A filter that blocks nothing
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn matchers(&self) -> &[Matcher] {
        &self.matchers
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// First matcher, in blocklist order, that hits `candidate`
    pub fn first_match(&self, candidate: &str) -> Option<&Matcher> {
        self.matchers.iter().find(|m| m.is_match(candidate))
    }

    pub fn is_blocked(&self, candidate: &str) -> bool {
        self.first_match(candidate).is_some()
    }
}
