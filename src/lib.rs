//! An asynchronous HTTP/1.1 server built directly on TCP.
//!
//! This crate implements the HTTP/1.1 message layer from raw bytes up: an
//! incremental request parser that tolerates arbitrarily fragmented reads,
//! and a write-ordered response writer supporting fixed-length and chunked
//! bodies with trailers. It is built on tokio and deliberately small: one
//! request per connection, no keep-alive, no TLS, no inbound chunked bodies.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use tokio::io::AsyncWrite;
//!
//! use nano_http::connection::{ResponseWriter, default_headers};
//! use nano_http::handler::{Handler, HandlerError};
//! use nano_http::protocol::{Request, StatusCode};
//! use nano_http::server::Server;
//!
//! struct HelloWorld;
//!
//! #[async_trait]
//! impl<W> Handler<W> for HelloWorld
//! where
//!     W: AsyncWrite + Unpin + Send,
//! {
//!     async fn call(&self, writer: &mut ResponseWriter<W>, request: &Request) -> Result<(), HandlerError> {
//!         let body = format!("Hello, {}!\n", request.target());
//!         writer.write_status_line(StatusCode::OK).await?;
//!         writer.write_headers(&default_headers(body.len())).await?;
//!         writer.write_body(body.as_bytes()).await?;
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let server = Server::serve("127.0.0.1:8080", Arc::new(HelloWorld)).await.unwrap();
//!     tokio::signal::ctrl_c().await.unwrap();
//!     server.close();
//! }
//! ```
//!
//! # Architecture
//!
//! - [`codec`]: incremental request decoding over an accumulation buffer
//! - [`connection`]: per-connection driver and the response writer
//! - [`handler`]: the request handler seam
//! - [`protocol`]: request/header/status types and the error taxonomy
//! - [`server`]: accept loop and graceful close
//!
//! # Parsing model
//!
//! Bytes read from the transport are appended to a growable buffer; the
//! decoders consume complete syntactic elements from its front and report
//! "need more data" otherwise. Parsing the same message one byte at a time
//! or in a single read produces identical results, which is the property
//! the test suite leans on hardest.

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;
pub mod server;

mod utils;
pub(crate) use utils::ensure;
