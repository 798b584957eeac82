//! Caller-supplied handler functions.

use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::io;
use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};
use thiserror::Error;

use crate::context::Context;
use crate::payload::Payload;

/// Future returned by a handler.
pub type HandlerFuture = BoxFuture<'static, Result<Payload, HandlerError>>;

/// Failure reported by a handler.
///
/// The wrapped error is surfaced to callers unchanged through
/// [`ResolveError::Handler`](crate::ResolveError::Handler).
#[derive(Debug, Error)]
#[error(transparent)]
pub struct HandlerError(Box<dyn StdError + Send + Sync + 'static>);

impl HandlerError {
    /// Wraps an error value.
    pub fn new<E>(source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self(Box::new(source))
    }

    /// Creates an error carrying only a message.
    #[must_use]
    pub fn msg(message: impl Into<String>) -> Self {
        let text: String = message.into();
        Self(text.into())
    }

    /// Returns the wrapped error when it has type `E`.
    #[must_use]
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: StdError + 'static,
    {
        self.0.downcast_ref::<E>()
    }

    /// Consumes the wrapper and returns the boxed error.
    #[must_use]
    pub fn into_inner(self) -> Box<dyn StdError + Send + Sync + 'static> {
        self.0
    }
}

impl From<io::Error> for HandlerError {
    fn from(source: io::Error) -> Self {
        Self::new(source)
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(source: serde_json::Error) -> Self {
        Self::new(source)
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self::msg(message)
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self::msg(message)
    }
}

type HandlerFn = dyn Fn(Context, Payload) -> HandlerFuture + Send + Sync;

/// A shareable function `(context, value) -> future of result`.
#[derive(Clone)]
pub struct Handler(Arc<HandlerFn>);

impl Handler {
    /// Wraps an asynchronous function.
    ///
    /// # Examples
    ///
    /// ```
    /// use bindery_core::{Context, Handler, Payload};
    ///
    /// let handler = Handler::new(|context: Context, _value| async move {
    ///     Ok(Payload::data(context.get_i64("id").unwrap_or_default()))
    /// });
    /// let result = futures::executor::block_on(
    ///     handler.call(Context::new().with_value("id", 7), Payload::Empty),
    /// );
    /// assert!(matches!(result, Ok(Payload::Data(_))));
    /// ```
    pub fn new<F, Fut>(function: F) -> Self
    where
        F: Fn(Context, Payload) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Payload, HandlerError>> + Send + 'static,
    {
        Self(Arc::new(move |context: Context, value: Payload| {
            function(context, value).boxed()
        }))
    }

    /// Wraps a synchronous function whose result is returned immediately.
    pub fn sync<F>(function: F) -> Self
    where
        F: Fn(Context, Payload) -> Result<Payload, HandlerError> + Send + Sync + 'static,
    {
        Self(Arc::new(move |context: Context, value: Payload| {
            future::ready(function(context, value)).boxed()
        }))
    }

    /// Invokes the handler.
    #[must_use]
    pub fn call(&self, context: Context, value: Payload) -> HandlerFuture {
        (self.0)(context, value)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handler(..)")
    }
}
