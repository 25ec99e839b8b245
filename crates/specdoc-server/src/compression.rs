//! Compression negotiation.
//!
//! Picks a content encoding from the request's `accept-encoding` header and
//! streams the response body through the matching encoder. Matching is a
//! case-insensitive substring test in a fixed preference order; quality values
//! are not interpreted.

use std::fmt;
use std::io::Cursor;
use std::pin::Pin;
use std::str::FromStr;

use async_compression::tokio::bufread::{GzipEncoder, ZlibEncoder};
use axum::body::Body;
use axum::http::header::{ACCEPT_ENCODING, CONTENT_ENCODING};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use tokio::io::{AsyncBufRead, BufReader};
use tokio_util::io::ReaderStream;

/// Content encoding the server can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// zlib-wrapped deflate stream.
    Deflate,
    Gzip,
}

impl Encoding {
    /// Preference order used when none is configured.
    pub const DEFAULT_ORDER: [Self; 2] = [Self::Deflate, Self::Gzip];

    /// Token used in `accept-encoding` and `content-encoding`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deflate => "deflate",
            Self::Gzip => "gzip",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized encoding name.
#[derive(Debug, thiserror::Error)]
#[error("Unsupported encoding: {0}")]
pub struct UnknownEncoding(String);

impl FromStr for Encoding {
    type Err = UnknownEncoding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "deflate" => Ok(Self::Deflate),
            "gzip" => Ok(Self::Gzip),
            _ => Err(UnknownEncoding(s.to_owned())),
        }
    }
}

/// Response content, either in memory or streamed from a file.
pub(crate) enum Content {
    Bytes(Bytes),
    File(tokio::fs::File),
}

/// Choose the first encoding in `preference` the client accepts.
pub(crate) fn negotiate(request_headers: &HeaderMap, preference: &[Encoding]) -> Option<Encoding> {
    let accepted = request_headers
        .get_all(ACCEPT_ENCODING)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect::<Vec<_>>()
        .join(",")
        .to_ascii_lowercase();

    preference
        .iter()
        .copied()
        .find(|encoding| accepted.contains(encoding.as_str()))
}

/// Build the one response for `content`.
///
/// `headers` are sent as given, plus `content-encoding` when an encoding was
/// negotiated.
pub(crate) fn respond(
    content: Content,
    request_headers: &HeaderMap,
    mut headers: HeaderMap,
    preference: &[Encoding],
) -> Response {
    let body = match negotiate(request_headers, preference) {
        Some(encoding) => {
            headers.insert(CONTENT_ENCODING, HeaderValue::from_static(encoding.as_str()));
            compressed(content, encoding)
        }
        None => match content {
            Content::Bytes(bytes) => Body::from(bytes),
            Content::File(file) => Body::from_stream(ReaderStream::new(file)),
        },
    };

    (headers, body).into_response()
}

fn compressed(content: Content, encoding: Encoding) -> Body {
    let reader: Pin<Box<dyn AsyncBufRead + Send>> = match content {
        Content::Bytes(bytes) => Box::pin(Cursor::new(bytes)),
        Content::File(file) => Box::pin(BufReader::new(file)),
    };

    match encoding {
        Encoding::Deflate => Body::from_stream(ReaderStream::new(ZlibEncoder::new(reader))),
        Encoding::Gzip => Body::from_stream(ReaderStream::new(GzipEncoder::new(reader))),
    }
}
