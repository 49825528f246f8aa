//! Safe Token - random URL-safe tokens that never spell a blocked word
//!
//! Tokens start with a letter and continue with letters, digits, `-` and `_`.
//! Every candidate is screened against a blocklist that also catches common
//! leetspeak look-alikes (1/i/l, 3/e, 4/a, 5/s, 0/o).
//!
//! ```
//! use safe_token::SafeTokenGenerator;
//!
//! let mut generator = SafeTokenGenerator::with_seed(["badword"], 1)?;
//! let token = generator.generate(12)?;
//! assert_eq!(token.len(), 12);
//! assert!(generator.contains_blocked_word("B4DW0RD"));
//! # Ok::<(), safe_token::SafeTokenError>(())
//! ```

pub mod error;
pub mod token;
pub mod types;

// Re-export commonly used types
pub use error::{Result, SafeTokenError};
pub use token::{
    is_well_formed, BlockFilter, Charset, GeneratorBuilder, Matcher, SafeTokenGenerator,
    SharedGenerator, CHARSET, LETTERS, MAX_ATTEMPTS,
};
pub use types::GeneratorConfig;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
pub fn init() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    Ok(())
}
