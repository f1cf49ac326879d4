//! Lazily consumed synthesized audio.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};
use tokio::io::AsyncRead;
use tokio_util::io::StreamReader;
use tokio_util::sync::DropGuard;

use crate::error::{Error, Result};

type BoxStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Stream of synthesized audio chunks.
///
/// Chunks are pulled from the transport as the caller polls. A transport
/// failure is delivered as the final `Err` item. Dropping the stream stops
/// any background work feeding it.
pub struct AudioStream {
    inner: BoxStream,
    _guard: Option<DropGuard>,
}

impl AudioStream {
    /// Wraps a chunk stream.
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes>> + Send + 'static,
    {
        Self {
            inner: Box::pin(stream),
            _guard: None,
        }
    }

    /// Wraps a chunk stream whose producer is cancelled when the stream is dropped.
    pub(crate) fn with_guard<S>(stream: S, guard: DropGuard) -> Self
    where
        S: Stream<Item = Result<Bytes>> + Send + 'static,
    {
        Self {
            inner: Box::pin(stream),
            _guard: Some(guard),
        }
    }

    /// Reads the whole stream into memory.
    pub async fn collect_bytes(mut self) -> Result<Bytes> {
        let mut buf = BytesMut::new();
        while let Some(chunk) = self.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(buf.freeze())
    }

    /// Converts the stream into an [`AsyncRead`].
    ///
    /// Errors surface as `std::io::Error`; non-IO errors are wrapped.
    pub fn into_async_read(self) -> impl AsyncRead + Send + Unpin {
        StreamReader::new(self.map(|chunk| {
            chunk.map_err(|e| match e {
                Error::Io(io) => io,
                other => std::io::Error::other(other),
            })
        }))
    }
}

impl Stream for AudioStream {
    type Item = Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl std::fmt::Debug for AudioStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioStream").finish_non_exhaustive()
    }
}
