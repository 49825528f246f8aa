//! Error handling for safe-token

use thiserror::Error;

/// Main error type for safe-token
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SafeTokenError {
    #[error("Configuration error: no random source was provided")]
    MissingRandomSource,

    #[error("Generation error: no unblocked token of length {length} after {attempts} attempts")]
    Exhausted { length: usize, attempts: usize },

    #[error("Pattern error for blocked word '{word}': {message}")]
    Pattern { word: String, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl SafeTokenError {
    /// Create an exhaustion error
    pub fn exhausted(length: usize, attempts: usize) -> Self {
        Self::Exhausted { length, attempts }
    }

    /// Create a pattern compilation error
    pub fn pattern(word: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Pattern {
            word: word.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingRandomSource => {
                "❌ No random source configured\n💡 Pass an RNG to the builder or use SafeTokenGenerator::new".to_string()
            }
            Self::Exhausted { length, attempts } => {
                format!(
                    "❌ Could not generate a safe token of length {} in {} attempts\n💡 The blocklist is too broad for this length",
                    length, attempts
                )
            }
            Self::Pattern { word, message } => {
                format!("❌ Blocked word '{}' could not be compiled: {}\n💡 Try a shorter word", word, message)
            }
            Self::Config { message } => {
                format!("❌ Configuration problem: {}\n💡 Check your .env file or configuration", message)
            }
        }
    }
}

impl From<serde_json::Error> for SafeTokenError {
    fn from(err: serde_json::Error) -> Self {
        Self::config(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, SafeTokenError>;

/// Helper macro for configuration errors
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::SafeTokenError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::SafeTokenError::config(format!($fmt, $($arg)*))
    };
}
