//! Error types for pattern parsing.

use thiserror::Error;

/// Errors raised while parsing a binding pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum PatternError {
    /// The pattern contains no path elements.
    #[error("pattern '{pattern}' has no path elements")]
    Empty {
        /// Pattern text as supplied.
        pattern: String,
    },

    /// The pattern does not start with a path separator.
    #[error("pattern '{pattern}' must start with '/'")]
    MissingLeadingSeparator {
        /// Pattern text as supplied.
        pattern: String,
    },

    /// Two separators appear with nothing between them.
    #[error("pattern '{pattern}' has an empty segment at position {position}")]
    EmptySegment {
        /// Pattern text as supplied.
        pattern: String,
        /// Zero-based index of the empty segment.
        position: usize,
    },

    /// An identifier name is empty or contains disallowed characters.
    #[error("pattern '{pattern}' has an invalid identifier name '{identifier}'")]
    InvalidIdentifier {
        /// Pattern text as supplied.
        pattern: String,
        /// The offending identifier name.
        identifier: String,
    },

    /// An identifier declares a datatype other than `int`, `number`, or
    /// `string`.
    #[error("pattern '{pattern}' uses unknown datatype '{datatype}'")]
    UnknownDatatype {
        /// Pattern text as supplied.
        pattern: String,
        /// The unrecognised datatype tag.
        datatype: String,
    },

    /// A query entry could not be parsed.
    #[error("pattern '{pattern}' has a malformed query: {message}")]
    MalformedQuery {
        /// Pattern text as supplied.
        pattern: String,
        /// Description of the problem.
        message: String,
    },

    /// A query key is declared more than once.
    #[error("pattern '{pattern}' declares query key '{key}' more than once")]
    DuplicateQueryKey {
        /// Pattern text as supplied.
        pattern: String,
        /// The repeated key.
        key: String,
    },
}

impl PatternError {
    /// Creates an empty pattern error.
    #[must_use]
    pub fn empty(pattern: impl Into<String>) -> Self {
        Self::Empty {
            pattern: pattern.into(),
        }
    }

    /// Creates a missing leading separator error.
    #[must_use]
    pub fn missing_leading_separator(pattern: impl Into<String>) -> Self {
        Self::MissingLeadingSeparator {
            pattern: pattern.into(),
        }
    }

    /// Creates an empty segment error.
    #[must_use]
    pub fn empty_segment(pattern: impl Into<String>, position: usize) -> Self {
        Self::EmptySegment {
            pattern: pattern.into(),
            position,
        }
    }

    /// Creates an invalid identifier error.
    #[must_use]
    pub fn invalid_identifier(pattern: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            pattern: pattern.into(),
            identifier: identifier.into(),
        }
    }

    /// Creates an unknown datatype error.
    #[must_use]
    pub fn unknown_datatype(pattern: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self::UnknownDatatype {
            pattern: pattern.into(),
            datatype: datatype.into(),
        }
    }

    /// Creates a malformed query error.
    #[must_use]
    pub fn malformed_query(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedQuery {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Creates a duplicate query key error.
    #[must_use]
    pub fn duplicate_query_key(pattern: impl Into<String>, key: impl Into<String>) -> Self {
        Self::DuplicateQueryKey {
            pattern: pattern.into(),
            key: key.into(),
        }
    }
}
