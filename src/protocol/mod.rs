//! Core HTTP protocol types.
//!
//! This module holds the data model shared by the decoding and encoding
//! halves of the crate:
//!
//! - [`RequestLine`] / [`Request`]: the product of a completed parse
//! - [`Headers`]: lower-cased header map with merge-on-duplicate semantics
//! - [`StatusCode`] / [`WriterState`]: response-side wire state
//! - [`HttpError`] / [`ParseError`] / [`SendError`]: the error taxonomy,
//!   split between the inbound and outbound paths

mod headers;
pub use headers::Headers;

mod request;
pub use request::Request;
pub use request::RequestLine;

mod response;
pub use response::StatusCode;
pub use response::WriterState;

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;
