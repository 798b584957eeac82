//! Path resolution against a built tree.

use tracing::debug;

use crate::RESOLVE_TARGET;
use crate::action::Action;
use crate::context::Context;
use crate::error::ResolveError;
use crate::query::verify;
use crate::request::{RequestPath, Token};
use crate::resolver::Resolver;
use crate::tree::{Binding, BindingNode, BindingTree};

/// The outcome of walking a request path through the tree.
#[derive(Debug, Clone)]
pub struct Resolution<'tree> {
    node: &'tree BindingNode,
    deferred: Option<&'tree Resolver>,
    context: Context,
}

impl<'tree> Resolution<'tree> {
    /// Returns the matched node.
    #[must_use]
    pub const fn node(&self) -> &'tree BindingNode {
        self.node
    }

    /// Returns the names of the matched node's literal children.
    #[must_use]
    pub fn items(&self) -> Vec<&'tree str> {
        self.node.item_names()
    }

    /// Returns the matched node's binding.
    #[must_use]
    pub const fn binding(&self) -> Option<&'tree Binding> {
        self.node.binding()
    }

    /// Returns the matched node's resolver.
    #[must_use]
    pub const fn resolver(&self) -> Option<&'tree Resolver> {
        self.node.resolver()
    }

    /// Returns the resolver of the nearest node on the path whose binding
    /// does not defer the requested action.
    #[must_use]
    pub const fn deferred(&self) -> Option<&'tree Resolver> {
        self.deferred
    }

    /// Returns the resolution context.
    #[must_use]
    pub const fn context(&self) -> &Context {
        &self.context
    }

    /// Consumes the resolution and returns its context.
    #[must_use]
    pub fn into_context(self) -> Context {
        self.context
    }
}

impl BindingTree {
    /// Resolves `path` for `action` without dispatching.
    ///
    /// The walk starts at the root. Each token follows the literal child of
    /// the same name, or failing that the identifier child for the token's
    /// datatype, whose value is bound into the context. There is no
    /// backtracking. Query parameters from the request are merged into the
    /// caller's, with the caller's values kept on conflict, and validated
    /// against the matched node's schema.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UnresolvablePath`] when the path is malformed
    /// or a token matches no child, [`ResolveError::UndefinedProtocol`] for an
    /// unknown scheme, and [`ResolveError::IllegalQuery`] for a rejected query.
    ///
    /// # Examples
    ///
    /// ```
    /// use bindery_core::{Action, BindingTree, Context, Declaration, Handler, Payload};
    ///
    /// let mut builder = BindingTree::builder();
    /// builder.add(Declaration::binding(
    ///     "/root/a/id:int",
    ///     Handler::sync(|_, _| Ok(Payload::Empty)),
    /// ));
    /// let tree = builder.build();
    ///
    /// let resolution = tree.resolve("/root/a/1", Action::Get, &Context::new())?;
    /// assert_eq!(resolution.context().get_i64("id"), Some(1));
    /// # Ok::<(), bindery_core::ResolveError>(())
    /// ```
    pub fn resolve(
        &self,
        path: &str,
        action: Action,
        context: &Context,
    ) -> Result<Resolution<'_>, ResolveError> {
        let request = RequestPath::parse(path)?;
        let protocol = request.protocol(action)?;

        let mut resolved = context.clone();
        resolved.set_protocol(protocol);

        let mut node = self.root();
        let mut deferred = None;
        for token in request.tokens() {
            node = descend(node, token, &mut resolved)
                .ok_or_else(|| ResolveError::no_matching_node(path, token.value()))?;
            if node.binding().is_some_and(|binding| !binding.defers(action)) {
                deferred = node.resolver().or(deferred);
            }
        }

        resolved.merge_query(request.into_query());
        if !resolved.query().is_empty() {
            verify(node.query(), resolved.query())?;
        }

        debug!(
            target: RESOLVE_TARGET,
            path,
            %action,
            bound = node.is_bound(),
            deferred = deferred.is_some(),
            "resolved path"
        );
        Ok(Resolution {
            node,
            deferred,
            context: resolved,
        })
    }
}

fn descend<'tree>(
    node: &'tree BindingNode,
    token: &Token,
    context: &mut Context,
) -> Option<&'tree BindingNode> {
    if let Some(child) = node.child(token.value()) {
        return Some(child);
    }
    let slot = node.identifier(token.datatype())?;
    if let Some(id) = slot.id_name() {
        context.insert(id, token.coerce());
    }
    Some(slot)
}
