//! Connection lifecycle: read one request, run the handler, close.
//!
//! `HttpConnection` owns the accumulation buffer between the transport and
//! the request decoder. The read loop appends whatever fragment the
//! transport delivers, down to a single byte, and lets the decoder consume
//! the parsed prefix, so the unconsumed remainder is compacted to the front
//! of the buffer for the next read. A connection serves exactly one
//! request/response cycle; there is no keep-alive.

use std::sync::Arc;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio_util::codec::Decoder;
use tracing::{error, info, warn};

use crate::codec::RequestDecoder;
use crate::connection::response_writer::{ResponseWriter, default_headers};
use crate::handler::Handler;
use crate::protocol::{HttpError, ParseError, Request, SendError, StatusCode, WriterState};

const INIT_BUFFER_SIZE: usize = 4 * 1024;

/// One accepted connection, split into its read and write halves.
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    reader: R,
    writer: W,
    buffer: BytesMut,
    decoder: RequestDecoder,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            buffer: BytesMut::with_capacity(INIT_BUFFER_SIZE),
            decoder: RequestDecoder::new(),
        }
    }

    /// Runs the full request/response cycle.
    ///
    /// A parse failure gets a best-effort `400` before the error propagates;
    /// it never takes down anything beyond this connection. A handler error
    /// turns into an error response only while the status line is still
    /// unwritten; bytes already sent stay untouched.
    pub async fn process<H>(mut self, handler: Arc<H>) -> Result<(), HttpError>
    where
        H: Handler<W>,
    {
        let request = match self.read_request().await {
            Ok(request) => request,
            Err(e) => {
                warn!(cause = %e, "can't parse request");
                let mut writer = ResponseWriter::new(self.writer);
                if let Err(send_error) = send_error_response(&mut writer, StatusCode::BAD_REQUEST, &e.to_string()).await
                {
                    warn!(cause = %send_error, "can't send error response");
                }
                let _ = writer.shutdown().await;
                return Err(e.into());
            }
        };

        info!(method = request.method(), target = request.target(), "request parsed");

        let mut writer = ResponseWriter::new(self.writer);
        if let Err(handler_error) = handler.call(&mut writer, &request).await {
            if writer.state() == WriterState::PendingStatusLine {
                send_error_response(&mut writer, handler_error.status(), handler_error.message()).await?;
            } else {
                error!(cause = %handler_error, "handler failed after response started");
            }
        }

        writer.shutdown().await?;
        Ok(())
    }

    /// Reads from the transport until the decoder produces a request.
    ///
    /// Fragment sizes are whatever the transport delivers; the buffer grows
    /// as needed and never drops unconsumed bytes. A zero-length read hands
    /// end-of-stream resolution to the decoder.
    async fn read_request(&mut self) -> Result<Request, ParseError> {
        loop {
            if !self.buffer.is_empty() {
                if let Some(request) = self.decoder.decode(&mut self.buffer)? {
                    return Ok(request);
                }
            }

            let read = self.reader.read_buf(&mut self.buffer).await?;
            if read == 0 {
                return match self.decoder.decode_eof(&mut self.buffer)? {
                    Some(request) => Ok(request),
                    None => Err(ParseError::UnexpectedEof),
                };
            }
        }
    }
}

/// Best-effort error response: status line, default headers, plain-text body.
async fn send_error_response<W>(
    writer: &mut ResponseWriter<W>,
    status: StatusCode,
    message: &str,
) -> Result<(), SendError>
where
    W: AsyncWrite + Unpin,
{
    writer.write_status_line(status).await?;
    writer.write_headers(&default_headers(message.len())).await?;
    writer.write_body(message.as_bytes()).await?;
    Ok(())
}
