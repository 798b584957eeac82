//! Query validation against declared schemas.

use bindery_pattern::QuerySchema;

use crate::context::Query;
use crate::error::ResolveError;

/// Checks supplied query parameters against a schema.
///
/// An absent schema permits no keys. Every supplied key must be declared and
/// its value must satisfy the key's rule.
///
/// # Errors
///
/// Returns [`ResolveError::IllegalQuery`] naming the first offending key, and
/// its value when the key is declared but the value is not allowed.
pub fn verify(schema: Option<&QuerySchema>, query: &Query) -> Result<(), ResolveError> {
    for (key, value) in query {
        let rule = schema
            .and_then(|declared| declared.rule(key))
            .ok_or_else(|| ResolveError::illegal_query_key(key.as_str()))?;
        if !rule.accepts(value) {
            return Err(ResolveError::illegal_query_value(
                key.as_str(),
                value.as_str(),
            ));
        }
    }
    Ok(())
}
