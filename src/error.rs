//! Error types for the wraith crate.

use crate::frame::ErrorCode;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the codecs and the stream state machine.
///
/// Three kinds, with different blast radii:
///
/// - [`Error::Compression`]: HPACK or frame serialization failure.
///   Fatal to the connection; the driver answers with
///   GOAWAY(COMPRESSION_ERROR).
/// - [`Error::Protocol`]: a framing violation (wrong stream id for a
///   connection-scope frame, bad SETTINGS length, illegal frame for the
///   current stream state). Fatal to the connection on receive; on send
///   it is a programmer error.
/// - [`Error::Stream`]: a violation confined to one stream. The stream
///   is reset and closed; the connection survives.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HPACK or frame serialization failure.
    #[error("compression error: {0}")]
    Compression(String),

    /// HTTP/2 framing violation, fatal to the connection.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Violation confined to a single stream.
    #[error("stream error on stream {stream}: {code:?}")]
    Stream { stream: u32, code: ErrorCode },
}

impl Error {
    /// Create a compression error.
    pub fn compression(message: impl Into<String>) -> Self {
        Self::Compression(message.into())
    }

    /// Create a protocol error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    /// Create a stream error.
    pub fn stream(stream: u32, code: ErrorCode) -> Self {
        Self::Stream { stream, code }
    }
}
