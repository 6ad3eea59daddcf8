//! Request handler traits and utilities.
//!
//! A handler receives the parsed [`Request`] together with a
//! [`ResponseWriter`] positioned at the status line, and is responsible for
//! driving the writer through a complete response. Returning a
//! [`HandlerError`] before anything was written produces an error response
//! with the given status and message.

use async_trait::async_trait;
use futures::future::BoxFuture;
use thiserror::Error;
use tokio::io::AsyncWrite;

use crate::connection::ResponseWriter;
use crate::protocol::{Request, SendError, StatusCode};

/// A failed handler invocation, reported as a status code and message.
#[derive(Debug, Error)]
#[error("{status}: {message}")]
pub struct HandlerError {
    status: StatusCode,
    message: String,
}

impl HandlerError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Write failures inside a handler become plain 500s.
impl From<SendError> for HandlerError {
    fn from(e: SendError) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    }
}

#[async_trait]
pub trait Handler<W>: Send + Sync
where
    W: AsyncWrite + Unpin + Send,
{
    async fn call(&self, writer: &mut ResponseWriter<W>, request: &Request) -> Result<(), HandlerError>;
}

/// Adapter turning a plain function into a [`Handler`].
#[derive(Debug)]
pub struct HandlerFn<F> {
    f: F,
}

#[async_trait]
impl<W, F> Handler<W> for HandlerFn<F>
where
    W: AsyncWrite + Unpin + Send,
    F: for<'a> Fn(&'a mut ResponseWriter<W>, &'a Request) -> BoxFuture<'a, Result<(), HandlerError>>
        + Send
        + Sync,
{
    async fn call(&self, writer: &mut ResponseWriter<W>, request: &Request) -> Result<(), HandlerError> {
        (self.f)(writer, request).await
    }
}

pub fn make_handler<W, F>(f: F) -> HandlerFn<F>
where
    W: AsyncWrite + Unpin + Send,
    F: for<'a> Fn(&'a mut ResponseWriter<W>, &'a Request) -> BoxFuture<'a, Result<(), HandlerError>>
        + Send
        + Sync,
{
    HandlerFn { f }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::RequestDecoder;
    use crate::connection::default_headers;
    use bytes::BytesMut;
    use std::io::Cursor;
    use tokio_util::codec::Decoder;

    fn parsed_request(message: &str) -> Request {
        RequestDecoder::new().decode(&mut BytesMut::from(message)).unwrap().unwrap()
    }

    fn hello_handler<'a>(
        writer: &'a mut ResponseWriter<Cursor<Vec<u8>>>,
        _request: &'a Request,
    ) -> BoxFuture<'a, Result<(), HandlerError>> {
        Box::pin(async move {
            let body = "Hello World!\n";
            writer.write_status_line(StatusCode::OK).await?;
            writer.write_headers(&default_headers(body.len())).await?;
            writer.write_body(body.as_bytes()).await?;
            Ok(())
        })
    }

    #[tokio::test]
    async fn handler_fn_adapts_plain_functions() {
        let handler = make_handler(hello_handler);
        let request = parsed_request("GET / HTTP/1.1\r\nHost: x\r\n\r\n");

        let mut writer = ResponseWriter::new(Cursor::new(Vec::new()));
        handler.call(&mut writer, &request).await.unwrap();

        let output = String::from_utf8(writer.into_inner().into_inner()).unwrap();
        assert!(output.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(output.ends_with("\r\n\r\nHello World!\n"));
    }

    #[test]
    fn send_errors_convert_to_internal_errors() {
        let error = HandlerError::from(SendError::UndeclaredTrailers);

        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(error.message().contains("trailer"));
    }
}
