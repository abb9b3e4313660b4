//! Edge response body supporting buffered and empty modes.
//!
//! [`EdgeResponseBody`] is the body type for every response the edge
//! serves:
//!
//! - **Buffered**: site objects, the fallback document, and error text.
//!   Cached objects are [`Bytes`], so buffering shares the stored buffer
//!   rather than copying it.
//! - **Empty**: HEAD responses, which keep their headers but carry no
//!   payload.
//!
//! Streaming for large objects would slot in as a third variant; today the
//! origin hands the edge whole objects.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use http_body_util::Full;

/// Response body for the edge HTTP service.
///
/// Implements [`http_body::Body`] so it plugs directly into hyper
/// responses.
#[derive(Debug, Default)]
pub enum EdgeResponseBody {
    /// Buffered body: site objects and error text.
    Buffered(Full<Bytes>),
    /// No payload, as on HEAD responses.
    #[default]
    Empty,
}

impl EdgeResponseBody {
    /// Buffered body from bytes. A [`Bytes`] argument shares its buffer.
    #[must_use]
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        Self::Buffered(Full::new(data.into()))
    }

    /// Buffered body from a UTF-8 string.
    #[must_use]
    pub fn from_string(s: impl Into<String>) -> Self {
        Self::Buffered(Full::new(Bytes::from(s.into())))
    }

    /// An empty body.
    #[must_use]
    pub fn empty() -> Self {
        Self::Empty
    }
}

impl http_body::Body for EdgeResponseBody {
    type Data = Bytes;
    type Error = std::io::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<http_body::Frame<Self::Data>, Self::Error>>> {
        match self.get_mut() {
            Self::Buffered(full) => Pin::new(full)
                .poll_frame(cx)
                .map_err(|never| match never {}),
            Self::Empty => Poll::Ready(None),
        }
    }

    fn is_end_stream(&self) -> bool {
        match self {
            Self::Buffered(full) => full.is_end_stream(),
            Self::Empty => true,
        }
    }

    fn size_hint(&self) -> http_body::SizeHint {
        match self {
            Self::Buffered(full) => full.size_hint(),
            Self::Empty => http_body::SizeHint::with_exact(0),
        }
    }
}
