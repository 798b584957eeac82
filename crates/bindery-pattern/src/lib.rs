//! Pattern grammar for typed path bindings.
//!
//! A pattern is a URL-like template mixing literal segments with typed
//! identifiers, optionally followed by a query schema:
//!
//! ```text
//! /recipients/contact:int/messages?orderBy=id&direction=asc|desc
//! ```
//!
//! Parsing produces an ordered list of [`Element`]s and an optional
//! [`QuerySchema`]. The binding tree in `bindery-core` consumes only this
//! output shape; it never inspects the pattern text itself.
//!
//! # Grammar
//!
//! - `name` - a literal segment matched verbatim
//! - `id:int`, `id:number`, `id:string` - a typed identifier bound as `id`
//! - `?key=a|b` - the query key `key` accepts `a` or `b`
//! - `?key` - the query key `key` accepts any value
//!
//! # Example
//!
//! ```
//! use bindery_pattern::{Datatype, Element, Pattern};
//!
//! let pattern = Pattern::parse("/root/a/id:int")?;
//! assert_eq!(pattern.elements().len(), 3);
//! assert_eq!(
//!     pattern.elements().last(),
//!     Some(&Element::identifier("id", Datatype::Int))
//! );
//! # Ok::<(), bindery_pattern::PatternError>(())
//! ```

mod datatype;
mod error;
mod pattern;
mod query;

pub use datatype::Datatype;
pub use error::PatternError;
pub use pattern::{Element, Pattern};
pub use query::{QueryRule, QuerySchema};

#[cfg(test)]
mod tests;
