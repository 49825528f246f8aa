//! Token generator - draws random candidates and rejects blocked ones

use super::filter::{BlockFilter, Matcher};
use super::Charset;
use crate::config_error;
use crate::error::{Result, SafeTokenError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Candidates drawn per `generate` call before giving up
pub const MAX_ATTEMPTS: usize = 100;

/// Generator for random URL-safe tokens that avoid a blocklist
///
/// The generator owns its random source. Two generators only share a
/// random sequence if the caller hands both a `&mut` to the same RNG.
#[derive(Debug)]
pub struct SafeTokenGenerator<R = StdRng> {
    filter: BlockFilter,
    rng: R,
}

impl SafeTokenGenerator<StdRng> {
    /// Create a generator with a freshly seeded random source
    pub fn new<I, S>(block_list: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_rng(block_list, StdRng::from_entropy())
    }

    /// Create a reproducible generator from a numeric seed
    pub fn with_seed<I, S>(block_list: I, seed: u64) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_rng(block_list, StdRng::seed_from_u64(seed))
    }

    /// Start a builder; a random source must be supplied before `build`
    pub fn builder() -> GeneratorBuilder<StdRng> {
        GeneratorBuilder::new()
    }
}

impl<R: Rng> SafeTokenGenerator<R> {
    /// Create a generator with an explicit random source
    pub fn with_rng<I, S>(block_list: I, rng: R) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let filter = BlockFilter::new(block_list)?;
        Ok(Self::from_parts(filter, rng))
    }

    /// Create a generator from a random source that may be missing.
    ///
    /// A missing source is rejected here, before the blocklist is compiled
    /// and long before the first `generate` call.
    pub fn try_with_rng<I, S>(block_list: I, rng: Option<R>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rng = rng.ok_or(SafeTokenError::MissingRandomSource)?;
        Self::with_rng(block_list, rng)
    }

    /// Create a generator from an already compiled filter
    pub fn from_parts(filter: BlockFilter, rng: R) -> Self {
        Self { filter, rng }
    }

    /// Generate a token of exactly `length` characters.
    ///
    /// A zero length returns an empty string without touching the random
    /// source. Otherwise up to [`MAX_ATTEMPTS`] candidates are drawn; the
    /// first one no matcher hits is returned.
    pub fn generate(&mut self, length: usize) -> Result<String> {
        if length == 0 {
            return Ok(String::new());
        }

        for attempt in 1..=MAX_ATTEMPTS {
            let candidate = self.candidate(length);

            match self.filter.first_match(&candidate) {
                None => return Ok(candidate),
                Some(matcher) => {
                    tracing::trace!(
                        attempt,
                        length,
                        word = %matcher.word(),
                        "Discarded blocked candidate"
                    );
                }
            }
        }

        tracing::warn!(
            length,
            attempts = MAX_ATTEMPTS,
            blocked_words = self.filter.len(),
            "Blocklist rejected every candidate"
        );
        Err(SafeTokenError::exhausted(length, MAX_ATTEMPTS))
    }

    /// Generate with a signed length; anything not positive yields an
    /// empty string
    pub fn generate_signed(&mut self, length: i64) -> Result<String> {
        if length <= 0 {
            return Ok(String::new());
        }
        let length = usize::try_from(length)
            .map_err(|_| config_error!("token length {} does not fit in usize", length))?;
        self.generate(length)
    }

    /// Draw one candidate: a letter, then `length - 1` URL-safe characters
    fn candidate(&mut self, length: usize) -> String {
        (0..length)
            .map(|position| {
                let chars = Charset::for_position(position).bytes();
                chars[self.rng.gen_range(0..chars.len())] as char
            })
            .collect()
    }
}

impl<R> SafeTokenGenerator<R> {
    /// Check any string against the compiled blocklist
    pub fn contains_blocked_word(&self, candidate: &str) -> bool {
        self.filter.is_blocked(candidate)
    }

    /// The first matcher, in blocklist order, that hits `candidate`
    pub fn blocked_by(&self, candidate: &str) -> Option<&Matcher> {
        self.filter.first_match(candidate)
    }

    pub fn filter(&self) -> &BlockFilter {
        &self.filter
    }
}

/// Builder for [`SafeTokenGenerator`]
#[derive(Debug)]
pub struct GeneratorBuilder<R> {
    block_list: Vec<String>,
    rng: Option<R>,
}

impl<R> Default for GeneratorBuilder<R> {
    fn default() -> Self {
        Self {
            block_list: Vec::new(),
            rng: None,
        }
    }
}

impl<R: Rng> GeneratorBuilder<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add words to the blocklist, keeping their order
    pub fn block_list<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.block_list.extend(words.into_iter().map(Into::into));
        self
    }

    /// Add a single word to the blocklist
    pub fn block_word(mut self, word: impl Into<String>) -> Self {
        self.block_list.push(word.into());
        self
    }

    /// Set the random source, switching the builder to its type
    pub fn rng<T: Rng>(self, rng: T) -> GeneratorBuilder<T> {
        GeneratorBuilder {
            block_list: self.block_list,
            rng: Some(rng),
        }
    }

    pub fn build(self) -> Result<SafeTokenGenerator<R>> {
        SafeTokenGenerator::try_with_rng(self.block_list, self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{is_well_formed, CHARSET, LETTERS};
    use rand::rngs::mock::StepRng;
    use rand::RngCore;

    /// Counts every draw made through it
    struct CountingRng {
        inner: StdRng,
        draws: usize,
    }

    impl CountingRng {
        fn new(seed: u64) -> Self {
            Self {
                inner: StdRng::seed_from_u64(seed),
                draws: 0,
            }
        }
    }

    impl RngCore for CountingRng {
        fn next_u32(&mut self) -> u32 {
            self.draws += 1;
            self.inner.next_u32()
        }

        fn next_u64(&mut self) -> u64 {
            self.draws += 1;
            self.inner.next_u64()
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            self.draws += 1;
            self.inner.fill_bytes(dest)
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
            self.draws += 1;
            self.inner.try_fill_bytes(dest)
        }
    }

    fn every_char() -> Vec<String> {
        CHARSET.iter().map(|&b| (b as char).to_string()).collect()
    }

    #[test]
    fn test_zero_length_draws_nothing() {
        let mut gen = SafeTokenGenerator::with_rng(every_char(), CountingRng::new(7)).unwrap();
        assert_eq!(gen.generate(0).unwrap(), "");
        assert_eq!(gen.generate_signed(0).unwrap(), "");
        assert_eq!(gen.generate_signed(-1).unwrap(), "");
        assert_eq!(gen.generate_signed(i64::MIN).unwrap(), "");
        assert_eq!(gen.rng.draws, 0);
    }

    #[test]
    fn test_length_and_charsets() {
        let mut gen = SafeTokenGenerator::with_seed(Vec::<String>::new(), 42).unwrap();
        for length in [1, 2, 12, 130] {
            let token = gen.generate(length).unwrap();
            assert_eq!(token.len(), length);
            assert!(Charset::Letters.contains(token.chars().next().unwrap()));
            assert!(token.chars().skip(1).all(|ch| Charset::UrlSafe.contains(ch)));
            assert!(is_well_formed(&token));
        }
    }

    #[test]
    fn test_constant_source_gives_literal_token() {
        let mut gen = SafeTokenGenerator::with_rng(Vec::<String>::new(), StepRng::new(0, 0)).unwrap();
        assert_eq!(gen.generate(12).unwrap(), "a00000000000");
        assert_eq!(gen.generate(1).unwrap(), "a");
    }

    #[test]
    fn test_constant_source_blocked_exhausts() {
        // Every attempt redraws the same candidate, so blocking it exhausts.
        let mut gen = SafeTokenGenerator::with_rng(["a0"], StepRng::new(0, 0)).unwrap();
        let err = gen.generate(12).unwrap_err();
        assert_eq!(err, SafeTokenError::exhausted(12, MAX_ATTEMPTS));
    }

    #[test]
    fn test_leet_variant_of_constant_token_is_blocked() {
        // "ao" compiles to [4a][0o], which hits "a0".
        let mut gen = SafeTokenGenerator::with_rng(["ao"], StepRng::new(0, 0)).unwrap();
        assert!(gen.generate(2).is_err());
        assert!(gen.generate(1).is_ok());
    }

    #[test]
    fn test_every_draw_counts_on_discarded_attempts() {
        let mut gen = SafeTokenGenerator::with_rng(every_char(), CountingRng::new(3)).unwrap();
        assert!(gen.generate(5).is_err());
        assert!(gen.rng.draws >= MAX_ATTEMPTS * 5);
    }

    #[test]
    fn test_seed_one_literal() {
        let mut gen = SafeTokenGenerator::with_seed(Vec::<String>::new(), 1).unwrap();
        assert_eq!(gen.generate(12).unwrap(), "YIrbgJxc9VUE");
        assert_eq!(gen.generate(12).unwrap(), "gcDmufZ3cahI");
        assert_eq!(gen.generate(12).unwrap(), "RCI0F0FyOlkE");
    }

    #[test]
    fn test_signed_lengths() {
        let mut gen = SafeTokenGenerator::with_rng(Vec::<String>::new(), StepRng::new(0, 0)).unwrap();
        assert_eq!(gen.generate_signed(1).unwrap(), "a");
        assert_eq!(gen.generate_signed(4).unwrap(), "a000");
        assert_eq!(gen.generate_signed(-4).unwrap(), "");
    }

    #[cfg(target_pointer_width = "32")]
    #[test]
    fn test_signed_length_too_large() {
        let mut gen = SafeTokenGenerator::with_seed(Vec::<String>::new(), 1).unwrap();
        let err = gen.generate_signed(i64::from(u32::MAX) + 1).unwrap_err();
        assert!(matches!(err, SafeTokenError::Config { .. }));
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = SafeTokenGenerator::with_seed(Vec::<String>::new(), 1).unwrap();
        let mut b = SafeTokenGenerator::with_seed(Vec::<String>::new(), 1).unwrap();
        for _ in 0..10 {
            assert_eq!(a.generate(12).unwrap(), b.generate(12).unwrap());
        }
    }

    #[test]
    fn test_blocking_a_seeded_output() {
        let bad = SafeTokenGenerator::with_seed(Vec::<String>::new(), 1)
            .unwrap()
            .generate(12)
            .unwrap();

        let mut gen = SafeTokenGenerator::with_seed([bad.as_str()], 1).unwrap();
        assert!(gen.contains_blocked_word(&bad));
        for _ in 0..10 {
            assert_ne!(gen.generate(12).unwrap(), bad);
        }
    }

    #[test]
    fn test_full_charset_blocklist_exhausts() {
        let mut gen = SafeTokenGenerator::with_seed(every_char(), 9).unwrap();
        for length in [1, 2, 10] {
            assert!(matches!(
                gen.generate(length),
                Err(SafeTokenError::Exhausted { attempts: MAX_ATTEMPTS, .. })
            ));
        }
    }

    #[test]
    fn test_missing_rng_fails_at_construction() {
        let err = SafeTokenGenerator::<StdRng>::try_with_rng(["anything"], None).unwrap_err();
        assert_eq!(err, SafeTokenError::MissingRandomSource);

        let err = SafeTokenGenerator::<StdRng>::try_with_rng(Vec::<String>::new(), None).unwrap_err();
        assert_eq!(err, SafeTokenError::MissingRandomSource);

        let err = SafeTokenGenerator::builder().block_word("x").build().unwrap_err();
        assert_eq!(err, SafeTokenError::MissingRandomSource);
    }

    #[test]
    fn test_builder() {
        let mut gen = SafeTokenGenerator::builder()
            .block_list(["cat", "dog"])
            .block_word("bird")
            .rng(StepRng::new(0, 0))
            .build()
            .unwrap();
        assert_eq!(gen.filter().len(), 3);
        assert_eq!(gen.blocked_by("xxD0Gxx").map(Matcher::word), Some("dog"));
        assert_eq!(gen.generate(3).unwrap(), "a00");
    }

    #[test]
    fn test_shared_rng_by_reference() {
        let mut rng = StdRng::seed_from_u64(5);
        let first = {
            let mut gen = SafeTokenGenerator::with_rng(Vec::<String>::new(), &mut rng).unwrap();
            gen.generate(8).unwrap()
        };
        let second = {
            let mut gen = SafeTokenGenerator::with_rng(Vec::<String>::new(), &mut rng).unwrap();
            gen.generate(8).unwrap()
        };

        let mut replay = SafeTokenGenerator::with_seed(Vec::<String>::new(), 5).unwrap();
        assert_eq!(replay.generate(8).unwrap(), first);
        assert_eq!(replay.generate(8).unwrap(), second);
    }
}
