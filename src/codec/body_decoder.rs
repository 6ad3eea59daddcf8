//! Collector for fixed-length request bodies.

use bytes::{Bytes, BytesMut};
use tokio_util::codec::Decoder;

use crate::ensure;
use crate::protocol::ParseError;

/// Collects exactly `content-length` body bytes.
///
/// Every call greedily absorbs whatever the buffer holds. Receiving more
/// than the declared length is a protocol violation, not a framing boundary:
/// with no inbound chunked decoding, a peer that keeps sending past the
/// declared length is broken.
#[derive(Debug)]
pub struct BodyDecoder {
    expected: usize,
    collected: BytesMut,
}

impl BodyDecoder {
    pub fn new(expected: usize) -> Self {
        Self { expected, collected: BytesMut::new() }
    }

    pub fn expected(&self) -> usize {
        self.expected
    }

    pub fn collected(&self) -> usize {
        self.collected.len()
    }
}

impl Decoder for BodyDecoder {
    type Item = Bytes;
    type Error = ParseError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        self.collected.extend_from_slice(src);
        src.clear();

        ensure!(
            self.collected.len() <= self.expected,
            ParseError::BodyOverflow { declared: self.expected, received: self.collected.len() }
        );

        if self.collected.len() == self.expected {
            return Ok(Some(self.collected.split().freeze()));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yields_body_at_exact_length() {
        let mut decoder = BodyDecoder::new(5);
        let mut buffer = BytesMut::from("hello");

        let body = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(&body[..], b"hello");
        assert!(buffer.is_empty());
    }

    #[test]
    fn absorbs_partial_reads_until_complete() {
        let mut decoder = BodyDecoder::new(5);

        assert!(decoder.decode(&mut BytesMut::from("he")).unwrap().is_none());
        assert!(decoder.decode(&mut BytesMut::from("ll")).unwrap().is_none());

        let body = decoder.decode(&mut BytesMut::from("o")).unwrap().unwrap();
        assert_eq!(&body[..], b"hello");
    }

    #[test]
    fn rejects_more_bytes_than_declared() {
        let mut decoder = BodyDecoder::new(5);
        let result = decoder.decode(&mut BytesMut::from("hello world"));

        assert!(matches!(result, Err(ParseError::BodyOverflow { declared: 5, received: 11 })));
    }

    #[test]
    fn zero_length_body_completes_immediately() {
        let mut decoder = BodyDecoder::new(0);
        let body = decoder.decode(&mut BytesMut::new()).unwrap().unwrap();

        assert!(body.is_empty());
    }
}
