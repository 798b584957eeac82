//! Per-call resolution context.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::action::Protocol;
use crate::payload::Payload;

/// Query parameters keyed by name.
pub type Query = BTreeMap<String, String>;

/// State handed to a handler for one call.
///
/// Callers seed a context with their own entries and query parameters.
/// Resolution works on an owned copy: identifier values matched in the
/// request path are bound as entries, the URL scheme becomes the protocol,
/// request query parameters are merged in, and the result of a deferred
/// ancestor is stored before the leaf handler runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    values: Map<String, Value>,
    protocol: Option<Protocol>,
    query: Query,
    deferred: Option<Payload>,
}

impl Context {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry.
    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Sets an entry, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Returns an entry.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Returns an entry as a string slice, if it is a JSON string.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    /// Returns an entry as an integer, if it is a JSON integer.
    #[must_use]
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.values.get(key).and_then(Value::as_i64)
    }

    /// Returns all entries.
    #[must_use]
    pub const fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Returns the protocol named by the request scheme, or
    /// [`Protocol::Data`] when the request had none.
    #[must_use]
    pub fn protocol(&self) -> Protocol {
        self.protocol.unwrap_or_default()
    }

    /// Returns the protocol named by the request scheme, if any.
    #[must_use]
    pub const fn requested_protocol(&self) -> Option<Protocol> {
        self.protocol
    }

    /// Records the protocol named by the request scheme.
    pub const fn set_protocol(&mut self, protocol: Option<Protocol>) {
        self.protocol = protocol;
    }

    /// Returns the query parameters.
    #[must_use]
    pub const fn query(&self) -> &Query {
        &self.query
    }

    /// Returns one query parameter.
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// Adds query parameters, keeping existing values for keys already
    /// present.
    pub fn merge_query(&mut self, parameters: impl IntoIterator<Item = (String, String)>) {
        for (key, value) in parameters {
            self.query.entry(key).or_insert(value);
        }
    }

    /// Returns the result of the deferred ancestor, if one ran.
    #[must_use]
    pub const fn deferred(&self) -> Option<&Payload> {
        self.deferred.as_ref()
    }

    /// Returns the deferred result as structured data, if it is one.
    #[must_use]
    pub fn deferred_data(&self) -> Option<&Value> {
        self.deferred.as_ref().and_then(Payload::as_data)
    }

    /// Stores the result of the deferred ancestor.
    pub fn set_deferred(&mut self, payload: Payload) {
        self.deferred = Some(payload);
    }
}
