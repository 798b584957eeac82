//! Path-addressed dispatch over a tree of typed bindings.
//!
//! Callers declare patterns such as `/users/id:int/name:string` and bind each
//! one to a resolver. A [`Bindery`] then resolves request paths like
//! `/users/42/name` against the tree, binds the typed identifiers into a
//! [`Context`] and invokes the handler registered for the requested action
//! and protocol.
//!
//! The protocol comes from the request's scheme: `buffer:///users/42` selects
//! the buffer protocol and a bare path selects data. Query parameters are
//! validated against the schema declared on the matched pattern.
//!
//! Events are emitted with `tracing` under [`BUILD_TARGET`], [`RESOLVE_TARGET`]
//! and [`DISPATCH_TARGET`]. [`telemetry::initialise`] installs a subscriber
//! configured from [`Config`].

mod dispatcher;
pub mod telemetry;

pub use bindery_config::{Config, LogFormat};
pub use bindery_core::{
    Action, BUILD_TARGET, Binding, BindingDecl, BindingNode, BindingTree, BuildError, ByteChunk,
    ByteStream, Context, Datatype, Declaration, DeferFlags, DeferSpec, Element, Handler,
    HandlerError, HandlerFuture, Pattern, PatternError, Payload, Protocol, Query, QueryRule,
    QuerySchema, RESOLVE_TARGET, RequestPath, Resolution, ResolveError, Resolver, ResolverSpec,
    SkippedBinding, Token, TreeBuilder, UnresolvableReason, verify,
};
pub use dispatcher::{Bindery, BinderyBuilder, DISPATCH_TARGET};

#[cfg(test)]
mod tests;
