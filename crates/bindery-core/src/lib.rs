//! Binding tree construction and path resolution.
//!
//! Declared patterns such as `/root/a/id:int/property:string` are compiled
//! into a [`BindingTree`]. Each terminal node carries a [`Binding`] and a
//! [`Resolver`], an action×protocol matrix of caller-supplied [`Handler`]s.
//!
//! Resolving a request path walks the tree token by token. Literal segments
//! are preferred; otherwise the token's inferred datatype selects an
//! identifier child and the token is bound into the [`Context`] under the
//! identifier's name. The walk also records the nearest ancestor whose
//! binding does not defer the requested action, so a deferring binding can
//! receive that ancestor's result before it runs.
//!
//! The tree is immutable once built and may be shared freely between
//! threads. Every call works on its own context.

mod action;
mod context;
mod declaration;
mod defer;
mod error;
mod handler;
mod lookup;
mod payload;
mod query;
mod request;
mod resolver;
mod tree;

pub use action::{Action, Protocol};
pub use bindery_pattern::{Datatype, Element, Pattern, PatternError, QueryRule, QuerySchema};
pub use context::{Context, Query};
pub use declaration::{BindingDecl, Declaration};
pub use defer::{DeferFlags, DeferSpec};
pub use error::{BuildError, ResolveError, UnresolvableReason};
pub use handler::{Handler, HandlerError, HandlerFuture};
pub use lookup::Resolution;
pub use payload::{ByteChunk, ByteStream, Payload};
pub use query::verify;
pub use request::{RequestPath, Token};
pub use resolver::{Resolver, ResolverSpec};
pub use tree::{Binding, BindingNode, BindingTree, SkippedBinding, TreeBuilder};

/// Tracing target for tree construction.
pub const BUILD_TARGET: &str = concat!(env!("CARGO_CRATE_NAME"), "::build");

/// Tracing target for path resolution.
pub const RESOLVE_TARGET: &str = concat!(env!("CARGO_CRATE_NAME"), "::resolve");

#[cfg(test)]
mod tests;
