//! Write-ordered response serialization.
//!
//! [`ResponseWriter`] enforces HTTP/1.1 framing order at runtime: status
//! line, then headers, then either one fixed-length body or a chunk stream
//! terminated by a zero chunk and optional trailers. Every operation checks
//! the current [`WriterState`] before emitting anything, so an out-of-order
//! call fails without corrupting bytes already on the wire.

use std::io;
use std::io::Write;

use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::ensure;
use crate::protocol::{Headers, SendError, StatusCode, WriterState};

/// Baseline response headers for a fixed-length plain-text body.
///
/// Callers adjust the map before [`ResponseWriter::write_headers`], e.g.
/// swapping the content type or trading `content-length` for
/// `transfer-encoding: chunked`.
pub fn default_headers(content_len: usize) -> Headers {
    let mut headers = Headers::new();
    headers.set("content-length", content_len.to_string());
    headers.set("connection", "close");
    headers.set("content-type", "text/plain");
    headers
}

/// Serializes one response onto an [`AsyncWrite`] sink.
#[derive(Debug)]
pub struct ResponseWriter<W> {
    writer: W,
    buffer: BytesMut,
    state: WriterState,
    trailers_declared: bool,
}

impl<W> ResponseWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            buffer: BytesMut::with_capacity(1024),
            state: WriterState::PendingStatusLine,
            trailers_declared: false,
        }
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Writes `HTTP/1.1 <code> <reason>\r\n`.
    ///
    /// Valid once, before anything else.
    pub async fn write_status_line(&mut self, status: StatusCode) -> Result<(), SendError> {
        ensure!(
            self.state == WriterState::PendingStatusLine,
            SendError::invalid_sequence("write_status_line", self.state)
        );

        write!(BufWriter(&mut self.buffer), "HTTP/1.1 {} {}\r\n", status.as_u16(), status.reason_phrase())?;
        self.flush_buffer().await?;

        self.state = WriterState::PendingHeaders;
        Ok(())
    }

    /// Writes every header field followed by the blank terminator line.
    pub async fn write_headers(&mut self, headers: &Headers) -> Result<(), SendError> {
        ensure!(
            self.state == WriterState::PendingHeaders,
            SendError::invalid_sequence("write_headers", self.state)
        );

        for (name, value) in headers.iter() {
            self.buffer.put_slice(name.as_bytes());
            self.buffer.put_slice(b": ");
            self.buffer.put_slice(value.as_bytes());
            self.buffer.put_slice(b"\r\n");
        }
        self.buffer.put_slice(b"\r\n");
        self.flush_buffer().await?;

        self.trailers_declared = headers.contains("trailer");
        self.state = WriterState::PendingBody;
        Ok(())
    }

    /// Writes a complete fixed-length body and finishes the response.
    pub async fn write_body(&mut self, body: &[u8]) -> Result<(), SendError> {
        ensure!(self.state == WriterState::PendingBody, SendError::invalid_sequence("write_body", self.state));

        self.writer.write_all(body).await?;
        self.writer.flush().await?;

        self.state = WriterState::Done;
        Ok(())
    }

    /// Writes one chunk as `<hex-size>\r\n<data>\r\n`.
    ///
    /// Empty input writes nothing; a zero-size chunk would terminate the
    /// stream, which is [`write_chunked_body_done`]'s job.
    ///
    /// [`write_chunked_body_done`]: Self::write_chunked_body_done
    pub async fn write_chunked_body(&mut self, data: &[u8]) -> Result<(), SendError> {
        ensure!(
            matches!(self.state, WriterState::PendingBody | WriterState::PendingChunkedBody),
            SendError::invalid_sequence("write_chunked_body", self.state)
        );

        if !data.is_empty() {
            write!(BufWriter(&mut self.buffer), "{:X}\r\n", data.len())?;
            self.buffer.put_slice(data);
            self.buffer.put_slice(b"\r\n");
            self.flush_buffer().await?;
        }

        self.state = WriterState::PendingChunkedBody;
        Ok(())
    }

    /// Terminates the chunk stream with the zero chunk `0\r\n`.
    pub async fn write_chunked_body_done(&mut self) -> Result<(), SendError> {
        ensure!(
            matches!(self.state, WriterState::PendingBody | WriterState::PendingChunkedBody),
            SendError::invalid_sequence("write_chunked_body_done", self.state)
        );

        self.buffer.put_slice(b"0\r\n");
        self.flush_buffer().await?;

        self.state = WriterState::PendingTrailers;
        Ok(())
    }

    /// Writes the trailer fields and the final blank line.
    ///
    /// Only valid after the zero chunk, and only when the headers declared
    /// the trailer names with a `trailer` header.
    pub async fn write_trailers(&mut self, trailers: &Headers) -> Result<(), SendError> {
        ensure!(
            self.state == WriterState::PendingTrailers,
            SendError::invalid_sequence("write_trailers", self.state)
        );
        ensure!(self.trailers_declared, SendError::UndeclaredTrailers);

        for (name, value) in trailers.iter() {
            self.buffer.put_slice(name.as_bytes());
            self.buffer.put_slice(b": ");
            self.buffer.put_slice(value.as_bytes());
            self.buffer.put_slice(b"\r\n");
        }
        self.buffer.put_slice(b"\r\n");
        self.flush_buffer().await?;

        self.state = WriterState::Done;
        Ok(())
    }

    /// Shuts down the underlying sink, flushing buffered transport data.
    pub async fn shutdown(&mut self) -> Result<(), SendError> {
        self.writer.shutdown().await?;
        Ok(())
    }

    async fn flush_buffer(&mut self) -> Result<(), SendError> {
        self.writer.write_all(&self.buffer).await?;
        self.writer.flush().await?;
        self.buffer.clear();
        Ok(())
    }
}

/// `io::Write` adapter so `write!` can format straight into the buffer.
struct BufWriter<'a>(&'a mut BytesMut);

impl Write for BufWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
