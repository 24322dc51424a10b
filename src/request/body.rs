//! Request body buffering
//!
//! A streamed body can be drained only once. The first read buffers it and
//! replaces the stream with the buffered bytes, so every later reader in
//! the same validation call (or a second call on the same request) sees an
//! unconsumed-equivalent body.

use std::fmt;
use std::io::{Cursor, Read};

use bytes::Bytes;
use thiserror::Error;

use crate::schema::ValidationError;

/// Failure to buffer a request body
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BodyError {
    #[error("request body exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("request body could not be read: {0}")]
    Read(String),
}

impl From<BodyError> for ValidationError {
    fn from(err: BodyError) -> Self {
        ValidationError::malformed_body(err.to_string())
    }
}

/// Body of an inbound request
#[derive(Default)]
pub enum RequestBody {
    /// No body
    #[default]
    Empty,
    /// Not yet read; drained once on first access
    Stream(Box<dyn Read + Send>),
    /// Fully buffered
    Buffered(Bytes),
    /// The stream failed while draining; every later read reports the same error
    Failed(BodyError),
}

impl RequestBody {
    /// Wrap a readable stream
    pub fn stream(reader: impl Read + Send + 'static) -> Self {
        RequestBody::Stream(Box::new(reader))
    }

    /// Whether the stream has already been drained
    pub fn is_buffered(&self) -> bool {
        !matches!(self, RequestBody::Stream(_))
    }

    /// Returns the full body, draining the stream on first use.
    ///
    /// A body larger than `limit` is rejected. An oversized stream keeps
    /// the bytes already read in front of the unread remainder. A stream
    /// that fails mid-read stays failed, so the body never looks empty.
    pub fn buffer(&mut self, limit: usize) -> Result<Bytes, BodyError> {
        match std::mem::take(self) {
            RequestBody::Empty => Ok(Bytes::new()),
            RequestBody::Buffered(bytes) => {
                *self = RequestBody::Buffered(bytes.clone());
                if bytes.len() > limit {
                    return Err(BodyError::TooLarge { limit });
                }
                Ok(bytes)
            }
            RequestBody::Failed(err) => {
                *self = RequestBody::Failed(err.clone());
                Err(err)
            }
            RequestBody::Stream(mut stream) => {
                let mut buf = Vec::new();
                let read = stream.by_ref().take((limit as u64).saturating_add(1)).read_to_end(&mut buf);
                match read {
                    Err(err) => {
                        tracing::debug!(error = %err, read = buf.len(), "request body stream failed");
                        let err = BodyError::Read(err.to_string());
                        *self = RequestBody::Failed(err.clone());
                        Err(err)
                    }
                    Ok(_) if buf.len() > limit => {
                        *self = RequestBody::Stream(Box::new(Cursor::new(buf).chain(stream)));
                        Err(BodyError::TooLarge { limit })
                    }
                    Ok(len) => {
                        tracing::trace!(bytes = len, "buffered request body");
                        let bytes = Bytes::from(buf);
                        *self = RequestBody::Buffered(bytes.clone());
                        Ok(bytes)
                    }
                }
            }
        }
    }

    /// A fresh reader over the buffered body
    pub fn reader(&mut self, limit: usize) -> Result<Cursor<Bytes>, BodyError> {
        Ok(Cursor::new(self.buffer(limit)?))
    }
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestBody::Empty => f.write_str("Empty"),
            RequestBody::Stream(_) => f.write_str("Stream(..)"),
            RequestBody::Buffered(bytes) => f.debug_tuple("Buffered").field(&bytes.len()).finish(),
            RequestBody::Failed(err) => f.debug_tuple("Failed").field(err).finish(),
        }
    }
}

impl From<Bytes> for RequestBody {
    fn from(bytes: Bytes) -> Self {
        RequestBody::Buffered(bytes)
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(bytes: Vec<u8>) -> Self {
        RequestBody::Buffered(Bytes::from(bytes))
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        RequestBody::Buffered(Bytes::from(text))
    }
}

impl From<&'static str> for RequestBody {
    fn from(text: &'static str) -> Self {
        RequestBody::Buffered(Bytes::from_static(text.as_bytes()))
    }
}

impl From<()> for RequestBody {
    fn from(_: ()) -> Self {
        RequestBody::Empty
    }
}
