//! Parsed HTTP request types.
//!
//! A [`Request`] is only constructed once the request decoder has consumed a
//! complete message, so a value of this type always represents a finished
//! parse. It lives for a single request/response cycle and is dropped when
//! the connection closes.

use bytes::Bytes;

use crate::protocol::Headers;

/// The first line of an HTTP/1.1 request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    method: String,
    target: String,
    version: String,
}

impl RequestLine {
    pub(crate) fn new(method: String, target: String, version: String) -> Self {
        Self { method, target, version }
    }

    /// The request method, guaranteed upper-case.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The request target as it appeared on the wire.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The HTTP version without the `HTTP/` prefix, e.g. `1.1`.
    pub fn version(&self) -> &str {
        &self.version
    }
}

/// A fully parsed request: request line, header fields and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    request_line: RequestLine,
    headers: Headers,
    body: Bytes,
}

impl Request {
    pub(crate) fn new(request_line: RequestLine, headers: Headers, body: Bytes) -> Self {
        Self { request_line, headers, body }
    }

    pub fn request_line(&self) -> &RequestLine {
        &self.request_line
    }

    pub fn method(&self) -> &str {
        self.request_line.method()
    }

    pub fn target(&self) -> &str {
        self.request_line.target()
    }

    pub fn version(&self) -> &str {
        self.request_line.version()
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}
