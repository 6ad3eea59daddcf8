//! Incremental HTTP/1.1 request decoding.
//!
//! Every decoder here implements [`tokio_util::codec::Decoder`] over a
//! `BytesMut` accumulation buffer: a call either consumes exactly the bytes
//! of a complete syntactic element and returns it, or consumes nothing and
//! returns `Ok(None)` to signal that more data is needed. Short reads are
//! therefore never an error, no matter where the stream happens to split.
//!
//! [`RequestDecoder`] sequences the three sub-decoders (request line,
//! header block, fixed-length body) into a single [`Request`] value.
//!
//! [`Request`]: crate::protocol::Request

mod request_line_decoder;
mod header_decoder;
mod body_decoder;

mod request_decoder;
pub use request_decoder::RequestDecoder;

/// Offset of the first CRLF in `buf`, if one is fully buffered.
pub(crate) fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|window| window == b"\r\n")
}
