use std::io;
use thiserror::Error;

use crate::protocol::WriterState;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: ParseError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: SendError,
    },
}

/// Errors raised while parsing an inbound request.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("malformed request line: {reason}")]
    MalformedRequestLine { reason: String },

    #[error("unsupported http version: {version}")]
    UnsupportedVersion { version: String },

    #[error("malformed header: {reason}")]
    MalformedHeader { reason: String },

    #[error("invalid character {found:?} at index {index} in header name {name:?}")]
    InvalidHeaderChar { name: String, found: char, index: usize },

    #[error("invalid content-length header: {reason}")]
    InvalidContentLength { reason: String },

    #[error("body is longer than content-length, declared {declared}, received {received}")]
    BodyOverflow { declared: usize, received: usize },

    #[error("body shorter than content-length, expected {expected}, received {received}")]
    IncompleteBody { expected: usize, received: usize },

    #[error("unexpected end of stream before message was complete")]
    UnexpectedEof,

    #[error("trying to read data in a done state")]
    DoneState,

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn malformed_request_line<S: ToString>(reason: S) -> Self {
        Self::MalformedRequestLine { reason: reason.to_string() }
    }

    pub fn unsupported_version<S: ToString>(version: S) -> Self {
        Self::UnsupportedVersion { version: version.to_string() }
    }

    pub fn malformed_header<S: ToString>(reason: S) -> Self {
        Self::MalformedHeader { reason: reason.to_string() }
    }

    pub fn invalid_content_length<S: ToString>(reason: S) -> Self {
        Self::InvalidContentLength { reason: reason.to_string() }
    }
}

/// Errors raised while writing an outbound response.
#[derive(Error, Debug)]
pub enum SendError {
    #[error("{operation} is not valid in write state {state:?}")]
    InvalidSequence { operation: &'static str, state: WriterState },

    #[error("trailers were not declared with a trailer header")]
    UndeclaredTrailers,

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn invalid_sequence(operation: &'static str, state: WriterState) -> Self {
        Self::InvalidSequence { operation, state }
    }
}
