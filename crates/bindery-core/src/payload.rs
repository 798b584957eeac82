//! Values exchanged with handlers.

use std::fmt;
use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use futures::stream::{self, BoxStream, Stream, StreamExt, TryStreamExt};
use serde_json::Value;

/// One chunk read from a [`ByteStream`].
pub type ByteChunk = Result<Vec<u8>, io::Error>;

/// A shareable handle to a byte stream that can be consumed once.
///
/// Cloning the handle shares the underlying stream; the first call to
/// [`ByteStream::take`] receives it and later calls receive `None`.
#[derive(Clone)]
pub struct ByteStream {
    inner: Arc<Mutex<Option<BoxStream<'static, ByteChunk>>>>,
}

impl ByteStream {
    /// Wraps a stream of byte chunks.
    pub fn new<S>(source: S) -> Self
    where
        S: Stream<Item = ByteChunk> + Send + 'static,
    {
        Self {
            inner: Arc::new(Mutex::new(Some(source.boxed()))),
        }
    }

    /// Creates a stream that yields the given chunks in order.
    #[must_use]
    pub fn from_chunks(chunks: Vec<Vec<u8>>) -> Self {
        Self::new(stream::iter(chunks.into_iter().map(Ok)))
    }

    /// Takes the underlying stream, leaving the handle consumed.
    #[must_use]
    pub fn take(&self) -> Option<BoxStream<'static, ByteChunk>> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Returns `true` once the stream has been taken.
    #[must_use]
    pub fn is_consumed(&self) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    /// Reads the remaining chunks into one buffer.
    ///
    /// # Errors
    ///
    /// Returns the first chunk error, or an error of kind
    /// [`io::ErrorKind::Other`] when the stream was already consumed.
    pub async fn read_to_end(&self) -> io::Result<Vec<u8>> {
        let source = self
            .take()
            .ok_or_else(|| io::Error::other("byte stream already consumed"))?;
        source.try_concat().await
    }
}

impl fmt::Debug for ByteStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteStream")
            .field("consumed", &self.is_consumed())
            .finish()
    }
}

/// A value passed to or returned from a handler.
#[derive(Debug, Clone, Default)]
pub enum Payload {
    /// No value.
    #[default]
    Empty,
    /// Structured data.
    Data(Value),
    /// Raw bytes.
    Buffer(Vec<u8>),
    /// Bytes delivered incrementally.
    Stream(ByteStream),
}

impl Payload {
    /// Creates a data payload from anything convertible to JSON.
    pub fn data(value: impl Into<Value>) -> Self {
        Self::Data(value.into())
    }

    /// Returns `true` for [`Payload::Empty`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the structured value, if this is a data payload.
    #[must_use]
    pub const fn as_data(&self) -> Option<&Value> {
        match self {
            Self::Data(value) => Some(value),
            _ => None,
        }
    }

    /// Consumes the payload and returns the structured value, if any.
    #[must_use]
    pub fn into_data(self) -> Option<Value> {
        match self {
            Self::Data(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the bytes, if this is a buffer payload.
    #[must_use]
    pub fn as_buffer(&self) -> Option<&[u8]> {
        match self {
            Self::Buffer(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Returns the stream handle, if this is a stream payload.
    #[must_use]
    pub const fn as_stream(&self) -> Option<&ByteStream> {
        match self {
            Self::Stream(handle) => Some(handle),
            _ => None,
        }
    }
}

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Empty, Self::Empty) => true,
            (Self::Data(left), Self::Data(right)) => left == right,
            (Self::Buffer(left), Self::Buffer(right)) => left == right,
            (Self::Stream(left), Self::Stream(right)) => Arc::ptr_eq(&left.inner, &right.inner),
            _ => false,
        }
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::Data(value)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Buffer(bytes)
    }
}

impl From<ByteStream> for Payload {
    fn from(handle: ByteStream) -> Self {
        Self::Stream(handle)
    }
}
