//! Query schemas declared by patterns.

use std::collections::BTreeMap;

/// Constraint on the value supplied for one query key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryRule {
    /// The value must equal this string exactly.
    Exact(String),
    /// The value must be one of these strings.
    OneOf(Vec<String>),
    /// Any value is accepted.
    Any,
}

impl QueryRule {
    /// Returns whether `value` satisfies this rule.
    ///
    /// # Examples
    ///
    /// ```
    /// use bindery_pattern::QueryRule;
    ///
    /// let rule = QueryRule::OneOf(vec!["asc".into(), "desc".into()]);
    /// assert!(rule.accepts("asc"));
    /// assert!(!rule.accepts("sideways"));
    /// ```
    #[must_use]
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Self::Exact(expected) => expected == value,
            Self::OneOf(values) => values.iter().any(|allowed| allowed == value),
            Self::Any => true,
        }
    }
}

/// Allowed query keys for a pattern, each with its value rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySchema {
    rules: BTreeMap<String, QueryRule>,
}

impl QuerySchema {
    /// Creates an empty schema that permits no query keys.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the rule for `key`.
    #[must_use]
    pub fn with_rule(mut self, key: impl Into<String>, rule: QueryRule) -> Self {
        self.rules.insert(key.into(), rule);
        self
    }

    /// Permits `key` only with exactly `value`.
    #[must_use]
    pub fn exact(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_rule(key, QueryRule::Exact(value.into()))
    }

    /// Permits `key` with any of `values`.
    #[must_use]
    pub fn one_of<I, S>(self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let allowed = values.into_iter().map(Into::into).collect();
        self.with_rule(key, QueryRule::OneOf(allowed))
    }

    /// Permits `key` with any value.
    #[must_use]
    pub fn any(self, key: impl Into<String>) -> Self {
        self.with_rule(key, QueryRule::Any)
    }

    /// Returns the rule for `key`, if the key is permitted.
    #[must_use]
    pub fn rule(&self, key: &str) -> Option<&QueryRule> {
        self.rules.get(key)
    }

    /// Returns whether `key` is declared.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.rules.contains_key(key)
    }

    /// Iterates over declared keys and their rules in key order.
    pub fn rules(&self) -> impl Iterator<Item = (&str, &QueryRule)> {
        self.rules.iter().map(|(key, rule)| (key.as_str(), rule))
    }

    /// Returns the number of declared keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` when no keys are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub(crate) fn insert_new(&mut self, key: String, rule: QueryRule) -> bool {
        if self.rules.contains_key(&key) {
            return false;
        }
        self.rules.insert(key, rule);
        true
    }
}
