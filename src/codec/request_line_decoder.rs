//! Decoder for the HTTP/1.1 request line.

use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::codec::find_crlf;
use crate::ensure;
use crate::protocol::{ParseError, RequestLine};

const SUPPORTED_VERSION: &str = "HTTP/1.1";

/// Decodes `METHOD SP TARGET SP HTTP/1.1 CRLF`.
///
/// The method must equal its own upper-cased form and the version token must
/// be the exact literal `HTTP/1.1`; the stored version drops the `HTTP/`
/// prefix.
#[derive(Debug, Default)]
pub struct RequestLineDecoder;

impl Decoder for RequestLineDecoder {
    type Item = RequestLine;
    type Error = ParseError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let Some(line_end) = find_crlf(src) else {
            return Ok(None);
        };

        let line = src.split_to(line_end + 2);
        let line = str::from_utf8(&line[..line_end])
            .map_err(|_| ParseError::malformed_request_line("request line is not valid utf-8"))?;
        trace!(line, "parsing request line");

        let tokens: Vec<&str> = line.split(' ').collect();
        ensure!(
            tokens.len() == 3,
            ParseError::malformed_request_line(format!("expected 3 parts, found {}", tokens.len()))
        );

        let (method, target, version) = (tokens[0], tokens[1], tokens[2]);

        ensure!(
            !method.bytes().any(|b| b.is_ascii_lowercase()),
            ParseError::malformed_request_line("request method must be upper-case")
        );
        ensure!(version == SUPPORTED_VERSION, ParseError::unsupported_version(version));

        let version = &version["HTTP/".len()..];
        Ok(Some(RequestLine::new(method.to_string(), target.to_string(), version.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(input: &str) -> Result<Option<RequestLine>, ParseError> {
        RequestLineDecoder.decode(&mut BytesMut::from(input))
    }

    #[test]
    fn decodes_get_request_line() {
        let line = decode("GET / HTTP/1.1\r\n").unwrap().unwrap();

        assert_eq!(line.method(), "GET");
        assert_eq!(line.target(), "/");
        assert_eq!(line.version(), "1.1");
    }

    #[test]
    fn decodes_post_request_line_with_path() {
        let line = decode("POST /coffee HTTP/1.1\r\n").unwrap().unwrap();

        assert_eq!(line.method(), "POST");
        assert_eq!(line.target(), "/coffee");
        assert_eq!(line.version(), "1.1");
    }

    #[test]
    fn consumes_exactly_the_line_and_terminator() {
        let mut buffer = BytesMut::from("GET /coffee HTTP/1.1\r\nHost: x\r\n");
        let line = RequestLineDecoder.decode(&mut buffer).unwrap().unwrap();

        assert_eq!(line.target(), "/coffee");
        assert_eq!(&buffer[..], b"Host: x\r\n");
    }

    #[test]
    fn needs_more_data_without_crlf() {
        let mut buffer = BytesMut::from("GET / HTTP/1.1");
        let result = RequestLineDecoder.decode(&mut buffer).unwrap();

        assert!(result.is_none());
        // nothing consumed while waiting
        assert_eq!(buffer.len(), 14);
    }

    #[test]
    fn rejects_wrong_number_of_parts() {
        assert!(matches!(
            decode("/coffee HTTP/1.1\r\n"),
            Err(ParseError::MalformedRequestLine { .. })
        ));
        assert!(matches!(
            decode("GET /coffee extra HTTP/1.1\r\n"),
            Err(ParseError::MalformedRequestLine { .. })
        ));
    }

    #[test]
    fn rejects_lower_case_method() {
        assert!(matches!(
            decode("/coffee POST HTTP/1.1\r\n"),
            Err(ParseError::MalformedRequestLine { .. })
        ));
        assert!(matches!(decode("get / HTTP/1.1\r\n"), Err(ParseError::MalformedRequestLine { .. })));
    }

    #[test]
    fn rejects_unsupported_version() {
        assert!(matches!(
            decode("OPTIONS /prime/rib TCP/1.1\r\n"),
            Err(ParseError::UnsupportedVersion { .. })
        ));
        assert!(matches!(decode("GET / HTTP/1.0\r\n"), Err(ParseError::UnsupportedVersion { .. })));
        assert!(matches!(decode("GET / http/1.1\r\n"), Err(ParseError::UnsupportedVersion { .. })));
    }
}
