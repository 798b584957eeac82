//! Pattern parsing into path elements and an optional query schema.

use std::fmt;
use std::str::FromStr;

use crate::datatype::Datatype;
use crate::error::PatternError;
use crate::query::{QueryRule, QuerySchema};

const SEPARATOR: char = '/';
const QUERY_START: char = '?';
const TYPE_DELIMITER: char = ':';
const ENTRY_DELIMITER: char = '&';
const VALUE_DELIMITER: char = '=';
const ALTERNATIVE_DELIMITER: char = '|';

/// One element of a parsed pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Element {
    /// A literal segment matched verbatim.
    Segment {
        /// Segment text.
        name: String,
    },
    /// A typed placeholder that binds the matched token as `id`.
    Identifier {
        /// Name the matched value is bound under.
        id: String,
        /// Datatype a request token must have to match.
        datatype: Datatype,
    },
}

impl Element {
    /// Creates a literal segment element.
    #[must_use]
    pub fn segment(name: impl Into<String>) -> Self {
        Self::Segment { name: name.into() }
    }

    /// Creates an identifier element.
    #[must_use]
    pub fn identifier(id: impl Into<String>, datatype: Datatype) -> Self {
        Self::Identifier {
            id: id.into(),
            datatype,
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Segment { name } => f.write_str(name),
            Self::Identifier { id, datatype } => write!(f, "{id}:{datatype}"),
        }
    }
}

/// A parsed binding pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    elements: Vec<Element>,
    query: Option<QuerySchema>,
}

impl Pattern {
    /// Parses pattern text.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] when the text has no elements, does not
    /// start with `/`, contains an empty interior segment, an invalid
    /// identifier or datatype, or a malformed query.
    ///
    /// # Examples
    ///
    /// ```
    /// use bindery_pattern::{Pattern, QueryRule};
    ///
    /// let pattern = Pattern::parse("/root/c?orderBy=id")?;
    /// let schema = pattern.query().expect("schema declared");
    /// assert_eq!(schema.rule("orderBy"), Some(&QueryRule::OneOf(vec!["id".into()])));
    /// # Ok::<(), bindery_pattern::PatternError>(())
    /// ```
    pub fn parse(source: &str) -> Result<Self, PatternError> {
        let (path, query_text) = source
            .split_once(QUERY_START)
            .map_or((source, None), |(path, query)| (path, Some(query)));

        if !path.starts_with(SEPARATOR) {
            return Err(PatternError::missing_leading_separator(source));
        }

        let elements = parse_elements(source, path)?;
        if elements.is_empty() {
            return Err(PatternError::empty(source));
        }

        let query = match query_text {
            Some(text) if !text.is_empty() => Some(parse_query(source, text)?),
            _ => None,
        };

        Ok(Self {
            source: source.to_owned(),
            elements,
            query,
        })
    }

    /// Returns the pattern text as supplied.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the path elements in order.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Returns the declared query schema, if any.
    #[must_use]
    pub const fn query(&self) -> Option<&QuerySchema> {
        self.query.as_ref()
    }

    /// Returns the identifier names in the order they appear.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|element| match element {
            Element::Identifier { id, .. } => Some(id.as_str()),
            Element::Segment { .. } => None,
        })
    }
}

impl FromStr for Pattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn parse_elements(source: &str, path: &str) -> Result<Vec<Element>, PatternError> {
    let raw: Vec<&str> = path.split(SEPARATOR).skip(1).collect();
    let last = raw.len().saturating_sub(1);
    let mut elements = Vec::with_capacity(raw.len());

    for (position, text) in raw.into_iter().enumerate() {
        if text.is_empty() {
            // A single trailing separator is tolerated.
            if position == last {
                continue;
            }
            return Err(PatternError::empty_segment(source, position));
        }
        elements.push(parse_element(source, text)?);
    }

    Ok(elements)
}

fn parse_element(source: &str, text: &str) -> Result<Element, PatternError> {
    let Some((id, tag)) = text.split_once(TYPE_DELIMITER) else {
        return Ok(Element::segment(text));
    };

    if !is_identifier_name(id) {
        return Err(PatternError::invalid_identifier(source, id));
    }

    let datatype =
        Datatype::from_str(tag).map_err(|_| PatternError::unknown_datatype(source, tag))?;
    Ok(Element::identifier(id, datatype))
}

fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

fn parse_query(source: &str, text: &str) -> Result<QuerySchema, PatternError> {
    let mut schema = QuerySchema::new();

    for entry in text.split(ENTRY_DELIMITER) {
        if entry.is_empty() {
            return Err(PatternError::malformed_query(source, "empty query entry"));
        }

        let (key, rule) = match entry.split_once(VALUE_DELIMITER) {
            Some((key, values)) => (key, parse_alternatives(source, key, values)?),
            None => (entry, QueryRule::Any),
        };

        if key.is_empty() {
            return Err(PatternError::malformed_query(
                source,
                format!("query entry '{entry}' has no key"),
            ));
        }

        if !schema.insert_new(key.to_owned(), rule) {
            return Err(PatternError::duplicate_query_key(source, key));
        }
    }

    Ok(schema)
}

fn parse_alternatives(source: &str, key: &str, values: &str) -> Result<QueryRule, PatternError> {
    let alternatives: Vec<String> = values
        .split(ALTERNATIVE_DELIMITER)
        .map(str::to_owned)
        .collect();

    if alternatives.iter().any(String::is_empty) {
        return Err(PatternError::malformed_query(
            source,
            format!("query key '{key}' has an empty allowed value"),
        ));
    }

    Ok(QueryRule::OneOf(alternatives))
}
