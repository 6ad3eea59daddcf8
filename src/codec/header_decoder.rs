//! Decoder for the HTTP/1.1 header block.

use bytes::{Buf, BytesMut};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::codec::find_crlf;
use crate::ensure;
use crate::protocol::{Headers, ParseError};

/// Accumulates header lines until the blank line that ends the section.
///
/// Each call consumes as many complete `name:value CRLF` lines as the buffer
/// holds and returns `Ok(None)` once the next line is incomplete. The blank
/// line is consumed and yields the accumulated [`Headers`].
///
/// Grammar rules enforced per line: the name must not be empty, must not end
/// in whitespace before the colon, and after trimming and lower-casing must
/// consist solely of token characters. Values are trimmed of surrounding
/// whitespace. Repeated names merge via [`Headers::set`].
#[derive(Debug, Default)]
pub struct HeaderDecoder {
    headers: Headers,
}

impl HeaderDecoder {
    /// Hands out whatever has been parsed so far, for end-of-stream handling.
    pub fn take_partial(&mut self) -> Headers {
        std::mem::take(&mut self.headers)
    }

    fn parse_field_line(&mut self, line: &[u8]) -> Result<(), ParseError> {
        let line = str::from_utf8(line)
            .map_err(|_| ParseError::malformed_header("header line is not valid utf-8"))?;

        let colon = line
            .find(':')
            .ok_or_else(|| ParseError::malformed_header(format!("no colon in line {line:?}")))?;
        ensure!(colon > 0, ParseError::malformed_header(format!("empty header name in line {line:?}")));

        let (name, value) = (&line[..colon], &line[colon + 1..]);
        ensure!(
            !name.ends_with(|c: char| c.is_whitespace()),
            ParseError::malformed_header(format!("header name ends in whitespace: {name:?}"))
        );

        let name = name.trim().to_ascii_lowercase();
        if let Some((index, found)) = name.chars().enumerate().find(|(_, c)| !is_token_char(*c)) {
            return Err(ParseError::InvalidHeaderChar { name, found, index });
        }

        trace!(name = %name, "parsed header field");
        self.headers.set(&name, value.trim());
        Ok(())
    }
}

impl Decoder for HeaderDecoder {
    type Item = Headers;
    type Error = ParseError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            let Some(line_end) = find_crlf(src) else {
                return Ok(None);
            };

            if line_end == 0 {
                // blank line, the header section is complete
                src.advance(2);
                return Ok(Some(std::mem::take(&mut self.headers)));
            }

            let line = src.split_to(line_end + 2);
            self.parse_field_line(&line[..line_end])?;
        }
    }
}

/// Characters permitted in a header field name.
fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c, '!' | '#' | '$' | '%' | '\'' | '*' | '+' | '-' | '.' | '^' | '_' | '`' | '|' | '~')
}
