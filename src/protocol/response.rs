//! Response-side protocol types.

use std::fmt;

/// An HTTP response status code.
///
/// Any numeric code can be written; only the codes this server actually
/// produces carry a canonical reason phrase, every other code is written
/// with an empty reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCode(u16);

impl StatusCode {
    pub const OK: StatusCode = StatusCode(200);
    pub const BAD_REQUEST: StatusCode = StatusCode(400);
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode(500);

    pub fn as_u16(self) -> u16 {
        self.0
    }

    /// The fixed reason phrase for the closed set of known codes, empty for
    /// everything else.
    pub fn reason_phrase(self) -> &'static str {
        match self.0 {
            200 => "OK",
            400 => "Bad Request",
            500 => "Internal Server Error",
            _ => "",
        }
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The write-ordering state of a [`ResponseWriter`].
///
/// States advance strictly forward; an operation invoked in any other state
/// fails without emitting bytes.
///
/// [`ResponseWriter`]: crate::connection::ResponseWriter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    PendingStatusLine,
    PendingHeaders,
    PendingBody,
    PendingChunkedBody,
    PendingTrailers,
    Done,
}
