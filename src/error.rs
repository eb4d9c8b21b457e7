//! Error types for linmath configuration.
//!
//! The kernel operations themselves are total and never fail. Errors only
//! arise while turning user-supplied configuration (capability names,
//! environment variables) into dispatch settings.

use std::fmt;

/// Errors that can occur while configuring linmath.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinmathError {
    /// A capability level name could not be parsed.
    UnknownLevel {
        /// The text that failed to parse.
        input: String,
    },
    /// A configuration source held an unusable value.
    Config {
        /// The configuration key (environment variable name).
        key: String,
        /// Human-readable error message.
        message: String,
    },
}

impl fmt::Display for LinmathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinmathError::UnknownLevel { input } => write!(
                f,
                "Unknown capability level: {:?} (expected one of none, sse2, avx, avx2, neon)",
                input
            ),
            LinmathError::Config { key, message } => {
                write!(f, "Invalid configuration for {}: {}", key, message)
            }
        }
    }
}

impl std::error::Error for LinmathError {}

/// Result type alias for linmath operations.
pub type Result<T> = std::result::Result<T, LinmathError>;

/// Creates an unknown-level error.
pub fn unknown_level(input: impl Into<String>) -> LinmathError {
    LinmathError::UnknownLevel {
        input: input.into(),
    }
}

/// Creates a configuration error.
pub fn config_error(key: impl Into<String>, message: impl Into<String>) -> LinmathError {
    LinmathError::Config {
        key: key.into(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_level_display() {
        let error = unknown_level("sse9");
        let display = format!("{}", error);
        assert!(display.contains("Unknown capability level"));
        assert!(display.contains("\"sse9\""));
        assert!(display.contains("avx2"));
    }

    #[test]
    fn test_config_error_display() {
        let error = config_error("LINMATH_SIMD_LEVEL", "value is not valid UTF-8");
        let display = format!("{}", error);
        assert!(display.contains("Invalid configuration"));
        assert!(display.contains("LINMATH_SIMD_LEVEL"));
        assert!(display.contains("not valid UTF-8"));
    }

    #[test]
    fn test_error_equality() {
        let error1 = unknown_level("foo");
        let error2 = unknown_level("foo");
        let error3 = unknown_level("bar");

        assert_eq!(error1, error2);
        assert_ne!(error1, error3);
    }

    #[test]
    fn test_error_trait_implementation() {
        let error = config_error("KEY", "test error");

        let _: &dyn std::error::Error = &error;

        assert!(std::error::Error::source(&error).is_none());
    }
}
