//! Connection handling and response serialization.
//!
//! [`HttpConnection`] is the glue between a byte transport and the codec:
//! it reads into the accumulation buffer, drives the request decoder to
//! completion, then hands a [`ResponseWriter`] to the handler.

mod http_connection;
pub use http_connection::HttpConnection;

mod response_writer;
pub use response_writer::ResponseWriter;
pub use response_writer::default_headers;
