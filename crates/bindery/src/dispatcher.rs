//! The dispatcher facade.
//!
//! A [`Bindery`] owns an immutable binding tree and turns each operation into
//! a resolution followed by a handler call. When the matched binding defers
//! the action, the nearest non-deferring ancestor runs first and its result is
//! stored in the context before the leaf handler runs.

use std::future;
use std::sync::Arc;

use bindery_config::Config;
use bindery_core::{
    Action, BindingNode, BindingTree, Context, Declaration, Payload, Resolution, ResolveError,
    SkippedBinding, TreeBuilder,
};
use tracing::debug;

/// Tracing target for dispatch operations.
pub const DISPATCH_TARGET: &str = concat!(env!("CARGO_CRATE_NAME"), "::dispatch");

/// Collects declarations for a [`Bindery`].
#[derive(Debug, Default)]
pub struct BinderyBuilder {
    declarations: Vec<Declaration>,
    strict_identifiers: bool,
}

impl BinderyBuilder {
    /// Adds a declaration.
    #[must_use]
    pub fn bind(mut self, declaration: impl Into<Declaration>) -> Self {
        self.declarations.push(declaration.into());
        self
    }

    /// Rejects bindings that would rename an existing identifier slot.
    #[must_use]
    pub const fn strict_identifiers(mut self, strict: bool) -> Self {
        self.strict_identifiers = strict;
        self
    }

    /// Builds the tree.
    ///
    /// Declarations that cannot be bound are logged and reported by
    /// [`Bindery::skipped`].
    #[must_use]
    pub fn build(self) -> Bindery {
        let mut builder = TreeBuilder::new().strict_identifiers(self.strict_identifiers);
        for declaration in self.declarations {
            builder.add(declaration);
        }
        let tree = builder.build();
        debug!(
            target: DISPATCH_TARGET,
            skipped = tree.skipped().len(),
            "binding tree built"
        );
        Bindery {
            tree: Arc::new(tree),
        }
    }
}

/// Resolves request paths against declared bindings and dispatches them.
///
/// Cloning is cheap; clones share the same tree.
///
/// # Examples
///
/// ```
/// use bindery::{Bindery, Context, Declaration, Handler, Payload};
///
/// let bindery = Bindery::builder()
///     .bind(Declaration::binding(
///         "/users/id:int",
///         Handler::sync(|context: Context, _| {
///             Ok(Payload::data(context.get_i64("id").unwrap_or_default()))
///         }),
///     ))
///     .build();
///
/// let result = futures::executor::block_on(bindery.get("/users/42", &Context::new()))?;
/// assert_eq!(result, Payload::data(42));
/// # Ok::<(), bindery::ResolveError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Bindery {
    tree: Arc<BindingTree>,
}

impl Bindery {
    /// Starts declaring bindings.
    #[must_use]
    pub fn builder() -> BinderyBuilder {
        BinderyBuilder::default()
    }

    /// Starts declaring bindings with settings taken from `config`.
    #[must_use]
    pub fn from_config(config: &Config) -> BinderyBuilder {
        Self::builder().strict_identifiers(config.strict_identifiers())
    }

    /// Returns the root of the binding tree.
    #[must_use]
    pub fn hierarchy(&self) -> &BindingNode {
        self.tree.root()
    }

    /// Returns the declarations dropped while building the tree.
    #[must_use]
    pub fn skipped(&self) -> &[SkippedBinding] {
        self.tree.skipped()
    }

    /// Resolves `path` for `action` without dispatching.
    ///
    /// # Errors
    ///
    /// See [`BindingTree::resolve`].
    pub fn get_path(
        &self,
        path: &str,
        action: Action,
        context: &Context,
    ) -> Result<Resolution<'_>, ResolveError> {
        self.tree.resolve(path, action, context)
    }

    /// Reads the value at `path`.
    ///
    /// # Errors
    ///
    /// Returns any resolution failure or the handler's own error.
    pub async fn get(&self, path: &str, context: &Context) -> Result<Payload, ResolveError> {
        self.resolve_path(path, Action::Get, context, Payload::Empty)
            .await
    }

    /// Replaces the value at `path`.
    ///
    /// # Errors
    ///
    /// Returns any resolution failure or the handler's own error.
    pub async fn set(
        &self,
        path: &str,
        value: Payload,
        context: &Context,
    ) -> Result<Payload, ResolveError> {
        self.resolve_path(path, Action::Set, context, value).await
    }

    /// Adds `value` to the collection at `path`.
    ///
    /// # Errors
    ///
    /// Returns any resolution failure or the handler's own error.
    pub async fn add(
        &self,
        path: &str,
        value: Payload,
        context: &Context,
    ) -> Result<Payload, ResolveError> {
        self.resolve_path(path, Action::Add, context, value).await
    }

    /// Deletes the value at `path`.
    ///
    /// # Errors
    ///
    /// Returns any resolution failure or the handler's own error.
    pub async fn del(&self, path: &str, context: &Context) -> Result<Payload, ResolveError> {
        self.resolve_path(path, Action::Del, context, Payload::Empty)
            .await
    }

    /// Increases the value at `path` by `value`.
    ///
    /// # Errors
    ///
    /// Returns any resolution failure or the handler's own error.
    pub async fn inc(
        &self,
        path: &str,
        value: Payload,
        context: &Context,
    ) -> Result<Payload, ResolveError> {
        self.resolve_path(path, Action::Inc, context, value).await
    }

    /// Decreases the value at `path` by `value`.
    ///
    /// # Errors
    ///
    /// Returns any resolution failure or the handler's own error.
    pub async fn dec(
        &self,
        path: &str,
        value: Payload,
        context: &Context,
    ) -> Result<Payload, ResolveError> {
        self.resolve_path(path, Action::Dec, context, value).await
    }

    /// Runs the function bound at `path` with `args`.
    ///
    /// # Errors
    ///
    /// Returns any resolution failure or the handler's own error.
    pub async fn run(
        &self,
        path: &str,
        args: Payload,
        context: &Context,
    ) -> Result<Payload, ResolveError> {
        self.resolve_path(path, Action::Run, context, args).await
    }

    /// Copies the value at `path` to `dest` and returns the copied value.
    ///
    /// A streamed value is shared with the destination handler, which
    /// consumes it.
    ///
    /// # Errors
    ///
    /// Returns the first failure of the read or the write.
    pub async fn cpy(
        &self,
        path: &str,
        dest: &str,
        context: &Context,
    ) -> Result<Payload, ResolveError> {
        let value = self.get(path, context).await?;
        self.set(dest, value.clone(), context).await?;
        Ok(value)
    }

    /// Moves the value at `path` to `dest` and returns the outcome of the
    /// delete.
    ///
    /// # Errors
    ///
    /// Returns the first failure of the copy or the delete. A failed delete
    /// leaves the copy in place.
    pub async fn mov(
        &self,
        path: &str,
        dest: &str,
        context: &Context,
    ) -> Result<Payload, ResolveError> {
        self.cpy(path, dest, context).await?;
        self.del(path, context).await
    }

    /// Links `path` to `dest`.
    ///
    /// # Errors
    ///
    /// Always returns [`ResolveError::NotImplemented`].
    #[expect(clippy::unused_self, reason = "linking will read the tree once supported")]
    pub fn lnk(
        &self,
        path: &str,
        dest: &str,
        _context: &Context,
    ) -> impl Future<Output = Result<Payload, ResolveError>> + Send + use<> {
        debug!(target: DISPATCH_TARGET, path, dest, "link requested");
        future::ready(Err(ResolveError::not_implemented("lnk")))
    }

    async fn resolve_path(
        &self,
        path: &str,
        action: Action,
        context: &Context,
        value: Payload,
    ) -> Result<Payload, ResolveError> {
        debug!(target: DISPATCH_TARGET, path, %action, state = "resolving");
        let resolution = self
            .get_path(path, action, context)
            .inspect_err(|error| log_failure(path, action, error))?;

        let (Some(binding), Some(resolver)) = (resolution.binding(), resolution.resolver()) else {
            let error = ResolveError::no_resolver(path);
            log_failure(path, action, &error);
            return Err(error);
        };
        let deferred = resolution
            .deferred()
            .filter(|_| binding.defers(action));
        let mut resolved = resolution.into_context();
        let protocol = resolved.requested_protocol();

        if let Some(ancestor) = deferred {
            debug!(
                target: DISPATCH_TARGET,
                path,
                %action,
                state = "waiting_on_deferred"
            );
            let result = ancestor
                .dispatch(action, protocol, resolved.clone(), value.clone())
                .await
                .inspect_err(|error| log_failure(path, action, error))?;
            resolved.set_deferred(result);
        }

        debug!(target: DISPATCH_TARGET, path, %action, state = "dispatching");
        let outcome = resolver
            .dispatch(action, protocol, resolved, value)
            .await
            .inspect_err(|error| log_failure(path, action, error))?;
        debug!(target: DISPATCH_TARGET, path, %action, state = "done");
        Ok(outcome)
    }
}

fn log_failure(path: &str, action: Action, error: &ResolveError) {
    debug!(
        target: DISPATCH_TARGET,
        path,
        %action,
        kind = error.kind(),
        %error,
        "dispatch failed"
    );
}
