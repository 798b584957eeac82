//! Action and protocol dispatch for one binding.

use std::collections::BTreeMap;

use tracing::trace;

use crate::RESOLVE_TARGET;
use crate::action::{Action, Protocol};
use crate::context::Context;
use crate::error::ResolveError;
use crate::handler::Handler;
use crate::payload::Payload;

/// How a binding declares its handlers.
#[derive(Debug, Clone)]
pub enum ResolverSpec {
    /// One handler serving `get` over `data`.
    Single(Handler),
    /// One `data` handler per action.
    PerAction(BTreeMap<Action, Handler>),
    /// Handlers per action and protocol.
    PerActionProtocol(BTreeMap<Action, BTreeMap<Protocol, Handler>>),
}

impl ResolverSpec {
    /// Declares a read-only resolver.
    #[must_use]
    pub const fn single(handler: Handler) -> Self {
        Self::Single(handler)
    }

    /// Declares one `data` handler per action.
    pub fn per_action(handlers: impl IntoIterator<Item = (Action, Handler)>) -> Self {
        Self::PerAction(handlers.into_iter().collect())
    }

    /// Declares handlers per action and protocol.
    pub fn per_action_protocol(
        handlers: impl IntoIterator<Item = (Action, Protocol, Handler)>,
    ) -> Self {
        let mut matrix: BTreeMap<Action, BTreeMap<Protocol, Handler>> = BTreeMap::new();
        for (action, protocol, handler) in handlers {
            matrix.entry(action).or_default().insert(protocol, handler);
        }
        Self::PerActionProtocol(matrix)
    }
}

impl From<Handler> for ResolverSpec {
    fn from(handler: Handler) -> Self {
        Self::Single(handler)
    }
}

/// A compiled action×protocol lookup matrix.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    matrix: BTreeMap<Action, BTreeMap<Protocol, Handler>>,
}

impl Resolver {
    /// Compiles a resolver specification into its matrix.
    ///
    /// A single handler fills the `get`/`data` cell, a per-action map fills
    /// the `data` cell of each action, and a full map is copied cell by cell.
    #[must_use]
    pub fn compile(spec: ResolverSpec) -> Self {
        let matrix = match spec {
            ResolverSpec::Single(handler) => {
                BTreeMap::from([(Action::Get, BTreeMap::from([(Protocol::Data, handler)]))])
            }
            ResolverSpec::PerAction(handlers) => handlers
                .into_iter()
                .map(|(action, handler)| (action, BTreeMap::from([(Protocol::Data, handler)])))
                .collect(),
            ResolverSpec::PerActionProtocol(handlers) => handlers
                .into_iter()
                .filter(|(_, protocols)| !protocols.is_empty())
                .collect(),
        };
        Self { matrix }
    }

    /// Returns `true` when a handler exists for the cell.
    #[must_use]
    pub fn supports(&self, action: Action, protocol: Protocol) -> bool {
        self.handler(action, protocol).is_ok()
    }

    /// Iterates over the populated cells in matrix order.
    pub fn cells(&self) -> impl Iterator<Item = (Action, Protocol)> + '_ {
        self.matrix.iter().flat_map(|(action, protocols)| {
            protocols.keys().map(move |protocol| (*action, *protocol))
        })
    }

    /// Looks up the handler for a cell.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UndefinedAction`] when no protocol handles the
    /// action and [`ResolveError::UndefinedProtocol`] when the action is
    /// handled but not under `protocol`.
    pub fn handler(&self, action: Action, protocol: Protocol) -> Result<&Handler, ResolveError> {
        let protocols = self
            .matrix
            .get(&action)
            .filter(|protocols| !protocols.is_empty())
            .ok_or_else(|| ResolveError::undefined_action(action))?;
        protocols
            .get(&protocol)
            .ok_or_else(|| ResolveError::undefined_protocol(action, protocol.as_str()))
    }

    /// Invokes the handler for `action` under `protocol`, which defaults to
    /// [`Protocol::Data`].
    ///
    /// # Errors
    ///
    /// Returns the lookup errors of [`Resolver::handler`], or
    /// [`ResolveError::Handler`] carrying the handler's own failure.
    pub async fn dispatch(
        &self,
        action: Action,
        protocol: Option<Protocol>,
        context: Context,
        value: Payload,
    ) -> Result<Payload, ResolveError> {
        let selected = protocol.unwrap_or_default();
        let handler = self.handler(action, selected)?.clone();
        trace!(target: RESOLVE_TARGET, %action, protocol = %selected, "invoking handler");
        Ok(handler.call(context, value).await?)
    }
}
