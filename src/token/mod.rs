//! Token generation module - random URL-safe tokens screened against a blocklist
//!
//! The filter compiles plain words into leetspeak-tolerant matchers, the
//! generator draws candidates and throws away anything a matcher hits.

mod filter;
mod generator;
mod shared;

pub use filter::{BlockFilter, Matcher};
pub use generator::{GeneratorBuilder, SafeTokenGenerator, MAX_ATTEMPTS};
pub use shared::SharedGenerator;

/// Characters allowed in the first position of a token (letters only)
pub const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Characters allowed after the first position
pub const CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ-_";

/// Character set for a token position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    /// Only letters (a-z, A-Z)
    Letters,
    /// Letters, digits, hyphen and underscore
    UrlSafe,
}

impl Charset {
    /// Charset used at a given position of a token
    pub fn for_position(position: usize) -> Self {
        if position == 0 {
            Self::Letters
        } else {
            Self::UrlSafe
        }
    }

    pub fn bytes(&self) -> &'static [u8] {
        match self {
            Charset::Letters => LETTERS,
            Charset::UrlSafe => CHARSET,
        }
    }

    pub fn contains(&self, ch: char) -> bool {
        ch.is_ascii() && self.bytes().contains(&(ch as u8))
    }

    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes().is_empty()
    }
}

/// Check that `token` has the shape generated tokens have: a letter, then
/// URL-safe characters. The empty string counts as well formed.
pub fn is_well_formed(token: &str) -> bool {
    token
        .chars()
        .enumerate()
        .all(|(i, ch)| Charset::for_position(i).contains(ch))
}
