//! The request parsing state machine.
//!
//! [`RequestDecoder`] sequences the sub-decoders in strict order:
//!
//! ```text
//! Initialized -> ParsingHeaders -> ParsingBody -> Done
//! ```
//!
//! Each state carries the partial product of the phases before it, so a
//! [`Request`] can only be assembled by walking the machine all the way to
//! `Done`. One `decode` call keeps stepping until either a sub-decoder needs
//! more data or the request is complete; feeding bytes after completion is
//! an error.

use std::mem;

use bytes::{Bytes, BytesMut};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::codec::body_decoder::BodyDecoder;
use crate::codec::header_decoder::HeaderDecoder;
use crate::codec::request_line_decoder::RequestLineDecoder;
use crate::ensure;
use crate::protocol::{Headers, ParseError, Request, RequestLine};

/// Parsing phase, tagged with everything parsed so far.
#[derive(Debug)]
enum ParserState {
    Initialized,
    ParsingHeaders { request_line: RequestLine },
    ParsingBody { request_line: RequestLine, headers: Headers, collector: Option<BodyDecoder> },
    Done,
}

/// Outcome of driving the current state once.
enum Step {
    /// State advanced, keep stepping.
    Next(ParserState),
    /// The sub-decoder needs more data; resume here on the next call.
    Pending(ParserState),
    /// The message is complete.
    Complete(Request),
}

/// Incremental decoder producing one [`Request`] per connection.
#[derive(Debug)]
pub struct RequestDecoder {
    state: ParserState,
    line_decoder: RequestLineDecoder,
    header_decoder: HeaderDecoder,
}

impl RequestDecoder {
    pub fn new() -> Self {
        Default::default()
    }

    fn step(&mut self, state: ParserState, src: &mut BytesMut) -> Result<Step, ParseError> {
        match state {
            ParserState::Initialized => match self.line_decoder.decode(src)? {
                Some(request_line) => {
                    trace!(method = request_line.method(), target = request_line.target(), "request line parsed");
                    Ok(Step::Next(ParserState::ParsingHeaders { request_line }))
                }
                None => Ok(Step::Pending(ParserState::Initialized)),
            },

            ParserState::ParsingHeaders { request_line } => match self.header_decoder.decode(src)? {
                Some(headers) => {
                    let collector = content_length(&headers)?.map(BodyDecoder::new);
                    Ok(Step::Next(ParserState::ParsingBody { request_line, headers, collector }))
                }
                None => Ok(Step::Pending(ParserState::ParsingHeaders { request_line })),
            },

            ParserState::ParsingBody { request_line, headers, collector } => match collector {
                // without content-length there is no body to read, even if
                // the peer streams more bytes before closing
                None => Ok(Step::Complete(Request::new(request_line, headers, Bytes::new()))),
                Some(mut collector) => match collector.decode(src)? {
                    Some(body) => Ok(Step::Complete(Request::new(request_line, headers, body))),
                    None => Ok(Step::Pending(ParserState::ParsingBody {
                        request_line,
                        headers,
                        collector: Some(collector),
                    })),
                },
            },

            ParserState::Done => Err(ParseError::DoneState),
        }
    }
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self {
            state: ParserState::Initialized,
            line_decoder: RequestLineDecoder,
            header_decoder: HeaderDecoder::default(),
        }
    }
}

impl Decoder for RequestDecoder {
    type Item = Request;
    type Error = ParseError;

    /// Steps the state machine as far as the buffered bytes allow.
    ///
    /// Returns `Ok(None)` when more data is needed, `Ok(Some(request))` once
    /// the message is complete, and an error for protocol violations or for
    /// feeding data in the done state.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            let state = mem::replace(&mut self.state, ParserState::Done);
            match self.step(state, src)? {
                Step::Next(next) => self.state = next,
                Step::Pending(next) => {
                    self.state = next;
                    return Ok(None);
                }
                Step::Complete(request) => {
                    self.state = ParserState::Done;
                    return Ok(Some(request));
                }
            }
        }
    }

    /// Resolves the end of the stream.
    ///
    /// A peer may legitimately end a message by closing the connection, but
    /// only when it never declared a `content-length`; a declared length
    /// that was not satisfied, or a stream that ends before the request
    /// line, is an incomplete message.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if !matches!(self.state, ParserState::Done) {
            if let Some(request) = self.decode(src)? {
                return Ok(Some(request));
            }
        }

        let state = mem::replace(&mut self.state, ParserState::Done);
        match state {
            ParserState::Done => Ok(None),

            ParserState::Initialized => Err(ParseError::UnexpectedEof),

            ParserState::ParsingHeaders { request_line } => {
                let headers = self.header_decoder.take_partial();
                ensure!(headers.get("content-length").is_none(), ParseError::UnexpectedEof);
                Ok(Some(Request::new(request_line, headers, Bytes::new())))
            }

            ParserState::ParsingBody { collector: Some(collector), .. } => Err(ParseError::IncompleteBody {
                expected: collector.expected(),
                received: collector.collected(),
            }),

            ParserState::ParsingBody { request_line, headers, collector: None } => {
                Ok(Some(Request::new(request_line, headers, Bytes::new())))
            }
        }
    }
}

/// Case-insensitive `content-length` lookup; absence means "no body".
fn content_length(headers: &Headers) -> Result<Option<usize>, ParseError> {
    match headers.get("content-length") {
        Some(value) => value
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|_| ParseError::invalid_content_length(format!("value {value:?} is not a valid length"))),
        None => Ok(None),
    }
}
