//! Error type for palette mode parsing

use std::fmt;

/// Error type for parsing a palette mode name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseModeError {
    /// The rejected input, trimmed
    pub input: String,
}

impl fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown palette mode '{}' (expected 'dmg' or 'gray')",
            self.input
        )
    }
}

impl std::error::Error for ParseModeError {}
