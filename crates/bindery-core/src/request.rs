//! Request path parsing.

use std::str::FromStr;

use bindery_pattern::Datatype;
use percent_encoding::percent_decode_str;
use serde_json::Value;
use url::{ParseError, Url};

use crate::action::{Action, Protocol};
use crate::context::Query;
use crate::error::{ResolveError, UnresolvableReason};

/// Base that scheme-less request paths are resolved against.
const RELATIVE_BASE: &str = "bindery:///";

/// One decoded path token with its inferred datatype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    value: String,
    datatype: Datatype,
}

impl Token {
    fn new(value: String) -> Self {
        let datatype = Datatype::classify(&value);
        Self { value, datatype }
    }

    /// Returns the decoded text.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the inferred datatype.
    #[must_use]
    pub const fn datatype(&self) -> Datatype {
        self.datatype
    }

    /// Returns the value bound into the context when the token matches an
    /// identifier: integers for `int` tokens, strings otherwise.
    #[must_use]
    pub fn coerce(&self) -> Value {
        match self.datatype {
            Datatype::Int => self
                .value
                .parse::<i64>()
                .map_or_else(|_| Value::String(self.value.clone()), Value::from),
            Datatype::Number | Datatype::String => Value::String(self.value.clone()),
        }
    }
}

/// A parsed request path.
///
/// Request paths are URLs: an optional scheme naming the protocol, a path
/// split into tokens, and an optional query string. Paths without a scheme
/// are accepted with or without a leading `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPath {
    scheme: Option<String>,
    tokens: Vec<Token>,
    query: Query,
}

impl RequestPath {
    /// Parses request text.
    ///
    /// Empty segments are discarded and each remaining segment is
    /// percent-decoded. Repeated query keys keep their last value.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UnresolvablePath`] when the text is not a
    /// valid URL, has no hierarchical path, or a segment is not valid UTF-8
    /// once decoded.
    ///
    /// # Examples
    ///
    /// ```
    /// use bindery_core::RequestPath;
    ///
    /// let request = RequestPath::parse("buffer:///root/files/logo.png?size=2")?;
    /// assert_eq!(request.scheme(), Some("buffer"));
    /// assert_eq!(request.tokens().len(), 3);
    /// assert_eq!(request.query().get("size").map(String::as_str), Some("2"));
    /// # Ok::<(), bindery_core::ResolveError>(())
    /// ```
    pub fn parse(path: &str) -> Result<Self, ResolveError> {
        let malformed = |message: String| {
            ResolveError::unresolvable(path, UnresolvableReason::MalformedPath { message })
        };

        let (url, scheme) = match Url::parse(path) {
            Ok(absolute) => {
                let named = absolute.scheme().to_owned();
                (absolute, Some(named))
            }
            Err(ParseError::RelativeUrlWithoutBase) => {
                // A leading `//` would otherwise be read as an authority.
                let rooted = format!("/{}", path.trim_start_matches('/'));
                let relative = Url::parse(RELATIVE_BASE)
                    .and_then(|base| base.join(&rooted))
                    .map_err(|err| malformed(err.to_string()))?;
                (relative, None)
            }
            Err(err) => return Err(malformed(err.to_string())),
        };

        let segments = url
            .path_segments()
            .ok_or_else(|| malformed("path is not hierarchical".to_owned()))?;
        let tokens = segments
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                percent_decode_str(segment)
                    .decode_utf8()
                    .map(|decoded| Token::new(decoded.into_owned()))
                    .map_err(|err| malformed(err.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let query = url.query_pairs().into_owned().collect();

        Ok(Self {
            scheme,
            tokens,
            query,
        })
    }

    /// Returns the URL scheme, if the request named one.
    #[must_use]
    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    /// Returns the protocol named by the scheme.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UndefinedProtocol`] for a scheme that names no
    /// known protocol.
    pub fn protocol(&self, action: Action) -> Result<Option<Protocol>, ResolveError> {
        self.scheme
            .as_deref()
            .map(|scheme| {
                Protocol::from_str(scheme)
                    .map_err(|_| ResolveError::undefined_protocol(action, scheme))
            })
            .transpose()
    }

    /// Returns the decoded path tokens.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Returns the parsed query parameters.
    #[must_use]
    pub const fn query(&self) -> &Query {
        &self.query
    }

    pub(crate) fn into_query(self) -> Query {
        self.query
    }
}
