//! Error types for tree construction and path resolution.
//!
//! Resolution failures are surfaced through [`ResolveError`], the single error
//! channel of every dispatch operation. Problems found while building the tree
//! are described by [`BuildError`]; they never abort a build, the offending
//! binding is skipped instead.

use std::fmt;

use bindery_pattern::{Datatype, PatternError};
use thiserror::Error;

use crate::action::Action;
use crate::handler::HandlerError;

/// Why a request path could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UnresolvableReason {
    /// No literal or identifier child matched a token.
    NoMatchingNode {
        /// The decoded token that failed to match.
        segment: String,
    },
    /// The matched node carries no binding or resolver.
    NoResolver,
    /// The request path is not a valid URL.
    MalformedPath {
        /// Parser diagnostic.
        message: String,
    },
}

impl fmt::Display for UnresolvableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMatchingNode { segment } => write!(f, "no binding matches '{segment}'"),
            Self::NoResolver => f.write_str("no resolver"),
            Self::MalformedPath { message } => write!(f, "malformed path: {message}"),
        }
    }
}

/// Errors surfaced while resolving and dispatching a request path.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResolveError {
    /// The path does not lead to a bound node.
    #[error("unable to resolve path {path}, {reason}")]
    UnresolvablePath {
        /// Request path as supplied.
        path: String,
        /// What went wrong during the walk.
        reason: UnresolvableReason,
    },

    /// A query key or value is not permitted by the node's schema.
    #[error("{}", illegal_query_message(.key, .value.as_deref()))]
    IllegalQuery {
        /// The offending query key.
        key: String,
        /// The offending value, absent when the key itself is not allowed.
        value: Option<String>,
    },

    /// The resolver has no handler for the action under any protocol.
    #[error("undefined action: {action}")]
    UndefinedAction {
        /// The requested action.
        action: Action,
    },

    /// The resolver handles the action but not under this protocol.
    #[error("undefined protocol: {protocol} for action {action}")]
    UndefinedProtocol {
        /// The requested action.
        action: Action,
        /// The requested protocol or URL scheme.
        protocol: String,
    },

    /// The operation exists but is not available.
    #[error("{operation} is not implemented")]
    NotImplemented {
        /// Name of the operation.
        operation: &'static str,
    },

    /// A handler failed; its error is passed through unchanged.
    #[error(transparent)]
    Handler(#[from] HandlerError),
}

fn illegal_query_message(key: &str, value: Option<&str>) -> String {
    value.map_or_else(
        || format!("query argument {key} is not allowed"),
        |supplied| format!("value {supplied} for query argument {key} is not allowed"),
    )
}

impl ResolveError {
    /// Creates an unresolvable path error.
    #[must_use]
    pub fn unresolvable(path: impl Into<String>, reason: UnresolvableReason) -> Self {
        Self::UnresolvablePath {
            path: path.into(),
            reason,
        }
    }

    /// Creates an unresolvable path error for a token with no matching node.
    #[must_use]
    pub fn no_matching_node(path: impl Into<String>, segment: impl Into<String>) -> Self {
        Self::unresolvable(
            path,
            UnresolvableReason::NoMatchingNode {
                segment: segment.into(),
            },
        )
    }

    /// Creates an unresolvable path error for a node without a resolver.
    #[must_use]
    pub fn no_resolver(path: impl Into<String>) -> Self {
        Self::unresolvable(path, UnresolvableReason::NoResolver)
    }

    /// Creates an error for a query key absent from the schema.
    #[must_use]
    pub fn illegal_query_key(key: impl Into<String>) -> Self {
        Self::IllegalQuery {
            key: key.into(),
            value: None,
        }
    }

    /// Creates an error for a query value the schema rejects.
    #[must_use]
    pub fn illegal_query_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::IllegalQuery {
            key: key.into(),
            value: Some(value.into()),
        }
    }

    /// Creates an undefined action error.
    #[must_use]
    pub const fn undefined_action(action: Action) -> Self {
        Self::UndefinedAction { action }
    }

    /// Creates an undefined protocol error.
    #[must_use]
    pub fn undefined_protocol(action: Action, protocol: impl Into<String>) -> Self {
        Self::UndefinedProtocol {
            action,
            protocol: protocol.into(),
        }
    }

    /// Creates a not implemented error.
    #[must_use]
    pub const fn not_implemented(operation: &'static str) -> Self {
        Self::NotImplemented { operation }
    }

    /// Returns the short name of the failure kind, used in log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnresolvablePath { .. } => "unresolvable_path",
            Self::IllegalQuery { .. } => "illegal_query",
            Self::UndefinedAction { .. } => "undefined_action",
            Self::UndefinedProtocol { .. } => "undefined_protocol",
            Self::NotImplemented { .. } => "not_implemented",
            Self::Handler(_) => "handler",
        }
    }
}

/// Reasons a declared binding is skipped while building the tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum BuildError {
    /// The pattern text could not be parsed.
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// The declaration has a resolver but no pattern.
    #[error("binding has no path")]
    MissingPath,

    /// The declaration has a pattern but no resolver.
    #[error("no resolver for {pattern}")]
    MissingResolver {
        /// Pattern text of the declaration.
        pattern: String,
    },

    /// The terminal node already carries a binding.
    #[error("pattern {pattern} is already bound by {existing}")]
    DuplicateBinding {
        /// Pattern text of the rejected declaration.
        pattern: String,
        /// Pattern text of the binding already in place.
        existing: String,
    },

    /// An identifier slot is already named differently.
    #[error(
        "pattern {pattern} names the {datatype} identifier '{requested}' but it is already bound as '{existing}'"
    )]
    ConflictingIdentifier {
        /// Pattern text of the rejected declaration.
        pattern: String,
        /// Datatype of the shared identifier slot.
        datatype: Datatype,
        /// Name already stamped on the slot.
        existing: String,
        /// Name requested by the rejected declaration.
        requested: String,
    },

    /// A bare resolver appears where a pattern key is required.
    #[error("resolver declared under '{key}' without a '/' pattern key")]
    UnexpectedResolver {
        /// Key the resolver was found under.
        key: String,
    },
}

impl BuildError {
    /// Creates a missing resolver error.
    #[must_use]
    pub fn missing_resolver(pattern: impl Into<String>) -> Self {
        Self::MissingResolver {
            pattern: pattern.into(),
        }
    }

    /// Creates a duplicate binding error.
    #[must_use]
    pub fn duplicate_binding(pattern: impl Into<String>, existing: impl Into<String>) -> Self {
        Self::DuplicateBinding {
            pattern: pattern.into(),
            existing: existing.into(),
        }
    }

    /// Creates a conflicting identifier error.
    #[must_use]
    pub fn conflicting_identifier(
        pattern: impl Into<String>,
        datatype: Datatype,
        existing: impl Into<String>,
        requested: impl Into<String>,
    ) -> Self {
        Self::ConflictingIdentifier {
            pattern: pattern.into(),
            datatype,
            existing: existing.into(),
            requested: requested.into(),
        }
    }

    /// Creates an unexpected resolver error.
    #[must_use]
    pub fn unexpected_resolver(key: impl Into<String>) -> Self {
        Self::UnexpectedResolver { key: key.into() }
    }
}
