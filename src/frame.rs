//! HTTP/2 frame types and binary serialization.
//!
//! Implements the draft-16 frame format: an 8-byte common header
//! (length:16, type:8, flags:8, stream:32 with the top bit reserved)
//! followed by a type-specific payload. Frames are modeled as a tagged
//! variant with one arm per type so the per-type flag/field matrix is
//! checked at compile time.

use bytes::{BufMut, Bytes, BytesMut};

use crate::buffer::Buffer;
use crate::error::{Error, Result};

/// Frame header size (8 bytes in this draft).
pub const FRAME_HEADER_SIZE: usize = 8;

/// Maximum frame payload size. DATA frames are chunked to this bound.
pub const MAX_PAYLOAD_SIZE: usize = 1 << 14;

/// Largest legal stream identifier (31 bits).
pub const MAX_STREAM_ID: u32 = 0x7fff_ffff;

/// Largest legal window increment (31 bits).
pub const MAX_WINDOW_INCREMENT: u32 = 0x7fff_ffff;

/// HTTP/2 connection preface (client must send this first).
pub const CONNECTION_PREFACE: &[u8] = b"PRI * HTTP/2.0\r\n\r\nSM\r\n\r\n";

/// Frame type identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FrameKind {
    Data = 0x0,
    Headers = 0x1,
    Priority = 0x2,
    RstStream = 0x3,
    Settings = 0x4,
    PushPromise = 0x5,
    Ping = 0x6,
    GoAway = 0x7,
    WindowUpdate = 0x8,
    Continuation = 0x9,
    AltSvc = 0xa,
    Blocked = 0xb,
}

impl FrameKind {
    /// Map a wire type octet to a kind. Unknown types are a
    /// serialization error at this draft.
    pub fn from_wire(v: u8) -> Result<Self> {
        Ok(match v {
            0x0 => Self::Data,
            0x1 => Self::Headers,
            0x2 => Self::Priority,
            0x3 => Self::RstStream,
            0x4 => Self::Settings,
            0x5 => Self::PushPromise,
            0x6 => Self::Ping,
            0x7 => Self::GoAway,
            0x8 => Self::WindowUpdate,
            0x9 => Self::Continuation,
            0xa => Self::AltSvc,
            0xb => Self::Blocked,
            other => return Err(Error::compression(format!("unknown frame type 0x{other:x}"))),
        })
    }

    /// Flag bits a frame of this type may legally carry.
    pub fn allowed_flags(self) -> u8 {
        match self {
            Self::Data => flags::END_STREAM | flags::PADDED | flags::COMPRESSED,
            Self::Headers => {
                flags::END_STREAM | flags::END_HEADERS | flags::PADDED | flags::PRIORITY
            }
            Self::Settings | Self::Ping => flags::ACK,
            Self::PushPromise => flags::END_HEADERS | flags::PADDED,
            Self::Continuation => flags::END_STREAM | flags::END_HEADERS,
            _ => 0,
        }
    }

    /// Frames that must ride on stream 0.
    pub fn is_connection_scope(self) -> bool {
        matches!(self, Self::Settings | Self::Ping | Self::GoAway)
    }

    /// Frames that must name a stream.
    pub fn is_stream_scope(self) -> bool {
        matches!(
            self,
            Self::Data
                | Self::Headers
                | Self::Priority
                | Self::RstStream
                | Self::PushPromise
                | Self::Continuation
        )
    }

    /// Only DATA, HEADERS and PUSH_PROMISE may carry padding.
    pub fn may_pad(self) -> bool {
        matches!(self, Self::Data | Self::Headers | Self::PushPromise)
    }
}

/// Frame flags. ACK shares the END_STREAM bit (SETTINGS/PING context);
/// COMPRESSED shares the PRIORITY bit (DATA context).
pub mod flags {
    pub const END_STREAM: u8 = 0x1;
    pub const ACK: u8 = 0x1;
    pub const END_HEADERS: u8 = 0x4;
    pub const PADDED: u8 = 0x8;
    pub const PRIORITY: u8 = 0x20;
    pub const COMPRESSED: u8 = 0x20;
}

/// SETTINGS parameter identifiers at this draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Setting {
    HeaderTableSize = 0x1,
    EnablePush = 0x2,
    MaxConcurrentStreams = 0x3,
    InitialWindowSize = 0x4,
    CompressData = 0x5,
}

impl Setting {
    /// Map a wire identifier. Unknown identifiers are ignored on
    /// receive, so this is an Option rather than an error.
    pub fn from_wire(v: u16) -> Option<Self> {
        match v {
            0x1 => Some(Self::HeaderTableSize),
            0x2 => Some(Self::EnablePush),
            0x3 => Some(Self::MaxConcurrentStreams),
            0x4 => Some(Self::InitialWindowSize),
            0x5 => Some(Self::CompressData),
            _ => None,
        }
    }
}

/// HTTP/2 error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    NoError = 0x0,
    ProtocolError = 0x1,
    InternalError = 0x2,
    FlowControlError = 0x3,
    SettingsTimeout = 0x4,
    StreamClosed = 0x5,
    FrameSizeError = 0x6,
    RefusedStream = 0x7,
    Cancel = 0x8,
    CompressionError = 0x9,
    ConnectError = 0xa,
    EnhanceYourCalm = 0xb,
    InadequateSecurity = 0xc,
}

impl ErrorCode {
    /// Map a wire code, falling back to INTERNAL_ERROR for values this
    /// draft does not define.
    pub fn from_wire(v: u32) -> Self {
        match v {
            0x0 => Self::NoError,
            0x1 => Self::ProtocolError,
            0x2 => Self::InternalError,
            0x3 => Self::FlowControlError,
            0x4 => Self::SettingsTimeout,
            0x5 => Self::StreamClosed,
            0x6 => Self::FrameSizeError,
            0x7 => Self::RefusedStream,
            0x8 => Self::Cancel,
            0x9 => Self::CompressionError,
            0xa => Self::ConnectError,
            0xb => Self::EnhanceYourCalm,
            0xc => Self::InadequateSecurity,
            _ => Self::InternalError,
        }
    }
}

/// Priority data: a HEADERS prefix or the PRIORITY payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Priority {
    pub exclusive: bool,
    /// Stream this one depends on.
    pub dependency: u32,
    /// Effective weight, 1..=256. On the wire it is stored minus one.
    pub weight: u16,
}

impl Priority {
    fn serialize(&self, buf: &mut BytesMut) {
        let dep = if self.exclusive {
            self.dependency | 0x8000_0000
        } else {
            self.dependency
        };
        buf.put_u32(dep);
        buf.put_u8((self.weight.clamp(1, 256) - 1) as u8);
    }

    fn parse(payload: &mut Buffer) -> Result<Self> {
        let raw = payload.read_uint32()?;
        let weight = payload.getbyte()? as u16 + 1;
        Ok(Self {
            exclusive: raw & 0x8000_0000 != 0,
            dependency: raw & MAX_STREAM_ID,
            weight,
        })
    }
}

/// Type-specific frame payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Data {
        data: Bytes,
    },
    Headers {
        priority: Option<Priority>,
        /// Header block fragment, already HPACK-encoded.
        fragment: Bytes,
    },
    Priority(Priority),
    RstStream(ErrorCode),
    Settings(Vec<(Setting, u32)>),
    PushPromise {
        promised: u32,
        fragment: Bytes,
    },
    Ping([u8; 8]),
    GoAway {
        last_stream: u32,
        error: ErrorCode,
        debug: Bytes,
    },
    WindowUpdate(u32),
    Continuation {
        fragment: Bytes,
    },
    AltSvc {
        max_age: u32,
        port: u16,
        proto: Bytes,
        host: Bytes,
        origin: Bytes,
    },
    Blocked,
}

impl Payload {
    /// The frame type this payload belongs to.
    pub fn kind(&self) -> FrameKind {
        match self {
            Self::Data { .. } => FrameKind::Data,
            Self::Headers { .. } => FrameKind::Headers,
            Self::Priority(_) => FrameKind::Priority,
            Self::RstStream(_) => FrameKind::RstStream,
            Self::Settings(_) => FrameKind::Settings,
            Self::PushPromise { .. } => FrameKind::PushPromise,
            Self::Ping(_) => FrameKind::Ping,
            Self::GoAway { .. } => FrameKind::GoAway,
            Self::WindowUpdate(_) => FrameKind::WindowUpdate,
            Self::Continuation { .. } => FrameKind::Continuation,
            Self::AltSvc { .. } => FrameKind::AltSvc,
            Self::Blocked => FrameKind::Blocked,
        }
    }
}

/// A single HTTP/2 frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Stream identifier (0 for connection-scope frames).
    pub stream: u32,
    /// Raw flag bits; must stay within the type's allowed set.
    pub flags: u8,
    /// Requested padding in octets (1..=256 adds a pad-length byte plus
    /// padding minus one zero octets). Zero means unpadded.
    pub padding: usize,
    pub payload: Payload,
}

impl Frame {
    /// Create a frame with no flags and no padding.
    pub fn new(stream: u32, payload: Payload) -> Self {
        Self {
            stream,
            flags: 0,
            padding: 0,
            payload,
        }
    }

    /// The frame type.
    pub fn kind(&self) -> FrameKind {
        self.payload.kind()
    }

    /// Set a flag bit.
    pub fn with_flag(mut self, flag: u8) -> Self {
        self.flags |= flag;
        self
    }

    /// Set the padding amount.
    pub fn with_padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    /// DATA frame.
    pub fn data(stream: u32, data: impl Into<Bytes>, end_stream: bool) -> Self {
        let frame = Self::new(stream, Payload::Data { data: data.into() });
        if end_stream {
            frame.with_flag(flags::END_STREAM)
        } else {
            frame
        }
    }

    /// HEADERS frame carrying an encoded header block fragment.
    pub fn headers(
        stream: u32,
        fragment: impl Into<Bytes>,
        end_headers: bool,
        end_stream: bool,
    ) -> Self {
        let mut frame = Self::new(
            stream,
            Payload::Headers {
                priority: None,
                fragment: fragment.into(),
            },
        );
        if end_headers {
            frame.flags |= flags::END_HEADERS;
        }
        if end_stream {
            frame.flags |= flags::END_STREAM;
        }
        frame
    }

    /// CONTINUATION frame.
    pub fn continuation(stream: u32, fragment: impl Into<Bytes>, end_headers: bool) -> Self {
        let frame = Self::new(
            stream,
            Payload::Continuation {
                fragment: fragment.into(),
            },
        );
        if end_headers {
            frame.with_flag(flags::END_HEADERS)
        } else {
            frame
        }
    }

    /// PRIORITY frame.
    pub fn priority(stream: u32, priority: Priority) -> Self {
        Self::new(stream, Payload::Priority(priority))
    }

    /// RST_STREAM frame.
    pub fn rst_stream(stream: u32, error: ErrorCode) -> Self {
        Self::new(stream, Payload::RstStream(error))
    }

    /// SETTINGS frame.
    pub fn settings(settings: Vec<(Setting, u32)>) -> Self {
        Self::new(0, Payload::Settings(settings))
    }

    /// SETTINGS acknowledgement.
    pub fn settings_ack() -> Self {
        Self::new(0, Payload::Settings(Vec::new())).with_flag(flags::ACK)
    }

    /// PUSH_PROMISE frame.
    pub fn push_promise(
        stream: u32,
        promised: u32,
        fragment: impl Into<Bytes>,
        end_headers: bool,
    ) -> Self {
        let frame = Self::new(
            stream,
            Payload::PushPromise {
                promised,
                fragment: fragment.into(),
            },
        );
        if end_headers {
            frame.with_flag(flags::END_HEADERS)
        } else {
            frame
        }
    }

    /// PING frame.
    pub fn ping(data: [u8; 8]) -> Self {
        Self::new(0, Payload::Ping(data))
    }

    /// PING acknowledgement echoing the peer's payload.
    pub fn pong(data: [u8; 8]) -> Self {
        Self::ping(data).with_flag(flags::ACK)
    }

    /// GOAWAY frame.
    pub fn goaway(last_stream: u32, error: ErrorCode, debug: impl Into<Bytes>) -> Self {
        Self::new(
            0,
            Payload::GoAway {
                last_stream,
                error,
                debug: debug.into(),
            },
        )
    }

    /// WINDOW_UPDATE frame.
    pub fn window_update(stream: u32, increment: u32) -> Self {
        Self::new(stream, Payload::WindowUpdate(increment))
    }

    /// True when the END_STREAM flag is set on a frame type that
    /// carries it (DATA, HEADERS, CONTINUATION).
    pub fn end_stream(&self) -> bool {
        matches!(
            self.kind(),
            FrameKind::Data | FrameKind::Headers | FrameKind::Continuation
        ) && self.flags & flags::END_STREAM != 0
    }

    /// True when the END_HEADERS flag is set.
    pub fn end_headers(&self) -> bool {
        self.flags & flags::END_HEADERS != 0
    }

    /// True when this is a SETTINGS or PING acknowledgement.
    pub fn ack(&self) -> bool {
        matches!(self.kind(), FrameKind::Settings | FrameKind::Ping)
            && self.flags & flags::ACK != 0
    }
}

/// Serializer and parser for the draft frame format.
///
/// The codec is stateless; [`FrameCodec::parse`] is non-destructive
/// while a frame is still arriving (it returns `None` and leaves the
/// buffer cursor alone until the header and the declared payload are
/// both present).
#[derive(Debug, Default, Clone, Copy)]
pub struct FrameCodec;

impl FrameCodec {
    pub fn new() -> Self {
        Self
    }

    /// Serialize a frame to wire bytes.
    pub fn generate(&self, frame: &Frame) -> Result<Bytes> {
        let kind = frame.kind();

        if frame.stream > MAX_STREAM_ID {
            return Err(Error::compression(format!(
                "stream id {} out of range",
                frame.stream
            )));
        }
        if kind.is_connection_scope() && frame.stream != 0 {
            return Err(Error::protocol(format!(
                "{kind:?} frame must be on stream 0"
            )));
        }
        if kind.is_stream_scope() && frame.stream == 0 {
            return Err(Error::protocol(format!(
                "{kind:?} frame must name a stream"
            )));
        }
        if frame.flags & !kind.allowed_flags() != 0 {
            return Err(Error::compression(format!(
                "invalid flags 0x{:x} for {kind:?}",
                frame.flags
            )));
        }

        let mut body = BytesMut::new();
        self.serialize_payload(frame, &mut body)?;

        let mut flags = frame.flags;
        if frame.padding > 0 {
            if !kind.may_pad() {
                return Err(Error::compression(format!("{kind:?} cannot be padded")));
            }
            if frame.padding > 256 {
                return Err(Error::compression(format!(
                    "padding {} exceeds 256",
                    frame.padding
                )));
            }
            if frame.padding + body.len() > MAX_PAYLOAD_SIZE {
                return Err(Error::compression("padding overflows frame size"));
            }
            let pad = frame.padding - 1;
            let mut padded = BytesMut::with_capacity(body.len() + frame.padding);
            padded.put_u8(pad as u8);
            padded.extend_from_slice(&body);
            padded.extend_from_slice(&vec![0u8; pad]);
            body = padded;
            flags |= flags::PADDED;
        }

        if body.len() > MAX_PAYLOAD_SIZE {
            return Err(Error::compression(format!(
                "frame payload {} exceeds maximum {}",
                body.len(),
                MAX_PAYLOAD_SIZE
            )));
        }

        let mut out = BytesMut::with_capacity(FRAME_HEADER_SIZE + body.len());
        out.put_u16(body.len() as u16);
        out.put_u8(kind as u8);
        out.put_u8(flags);
        out.put_u32(frame.stream & MAX_STREAM_ID);
        out.extend_from_slice(&body);
        Ok(out.freeze())
    }

    fn serialize_payload(&self, frame: &Frame, buf: &mut BytesMut) -> Result<()> {
        match &frame.payload {
            Payload::Data { data } => buf.extend_from_slice(data),
            Payload::Headers { priority, fragment } => {
                if let Some(priority) = priority {
                    if frame.flags & flags::PRIORITY == 0 {
                        return Err(Error::compression(
                            "priority data requires the PRIORITY flag",
                        ));
                    }
                    priority.serialize(buf);
                } else if frame.flags & flags::PRIORITY != 0 {
                    return Err(Error::compression("PRIORITY flag without priority data"));
                }
                buf.extend_from_slice(fragment);
            }
            Payload::Priority(priority) => priority.serialize(buf),
            Payload::RstStream(code) => buf.put_u32(*code as u32),
            Payload::Settings(settings) => {
                for (id, value) in settings {
                    buf.put_u16(*id as u16);
                    buf.put_u32(*value);
                }
            }
            Payload::PushPromise { promised, fragment } => {
                buf.put_u32(promised & MAX_STREAM_ID);
                buf.extend_from_slice(fragment);
            }
            Payload::Ping(data) => buf.extend_from_slice(data),
            Payload::GoAway {
                last_stream,
                error,
                debug,
            } => {
                buf.put_u32(last_stream & MAX_STREAM_ID);
                buf.put_u32(*error as u32);
                buf.extend_from_slice(debug);
            }
            Payload::WindowUpdate(increment) => {
                if *increment > MAX_WINDOW_INCREMENT {
                    return Err(Error::compression("window increment out of range"));
                }
                buf.put_u32(*increment);
            }
            Payload::Continuation { fragment } => buf.extend_from_slice(fragment),
            Payload::AltSvc {
                max_age,
                port,
                proto,
                host,
                origin,
            } => {
                if proto.len() > 255 || host.len() > 255 {
                    return Err(Error::compression("altsvc field too long"));
                }
                buf.put_u32(*max_age);
                buf.put_u16(*port);
                buf.put_u8(proto.len() as u8);
                buf.extend_from_slice(proto);
                buf.put_u8(host.len() as u8);
                buf.extend_from_slice(host);
                buf.extend_from_slice(origin);
            }
            Payload::Blocked => {}
        }
        Ok(())
    }

    /// Parse one frame from the buffer.
    ///
    /// Returns `Ok(None)` without consuming anything until the 8-byte
    /// header and the full declared payload are buffered.
    pub fn parse(&self, buf: &mut Buffer) -> Result<Option<Frame>> {
        let header = match buf.peek(FRAME_HEADER_SIZE) {
            Some(h) => h,
            None => return Ok(None),
        };
        let length = u16::from_be_bytes([header[0], header[1]]) as usize;
        if buf.len() < FRAME_HEADER_SIZE + length {
            return Ok(None);
        }

        if length > MAX_PAYLOAD_SIZE {
            return Err(Error::compression(format!(
                "frame payload {length} exceeds maximum {MAX_PAYLOAD_SIZE}"
            )));
        }

        buf.skip(2)?;
        let kind = FrameKind::from_wire(buf.getbyte()?)?;
        // Keep only the bits this type defines; peers may grease.
        let mut flags = buf.getbyte()? & kind.allowed_flags();
        let stream = buf.read_uint32()? & MAX_STREAM_ID;
        let mut payload = Buffer::from_bytes(&buf.read(length)?);

        if kind.is_connection_scope() && stream != 0 {
            return Err(Error::protocol(format!(
                "{kind:?} frame on stream {stream}"
            )));
        }
        if kind.is_stream_scope() && stream == 0 {
            return Err(Error::protocol(format!("{kind:?} frame on stream 0")));
        }

        // Strip padding before interpreting the payload.
        if flags & flags::PADDED != 0 {
            let pad = payload.getbyte()? as usize;
            if pad >= payload.len() + 1 {
                return Err(Error::protocol("padding exceeds payload"));
            }
            let kept = payload.len() - pad;
            payload = Buffer::from_bytes(&payload.slice(0, kept)?);
            flags &= !flags::PADDED;
        }

        let payload = self.parse_payload(kind, flags, stream, &mut payload)?;
        Ok(Some(Frame {
            stream,
            flags,
            padding: 0,
            payload,
        }))
    }

    fn parse_payload(
        &self,
        kind: FrameKind,
        flags: u8,
        stream: u32,
        payload: &mut Buffer,
    ) -> Result<Payload> {
        Ok(match kind {
            FrameKind::Data => Payload::Data {
                data: payload.take_all(),
            },
            FrameKind::Headers => {
                let priority = if flags & flags::PRIORITY != 0 {
                    Some(Priority::parse(payload)?)
                } else {
                    None
                };
                Payload::Headers {
                    priority,
                    fragment: payload.take_all(),
                }
            }
            FrameKind::Priority => {
                if payload.len() != 5 {
                    return Err(Error::protocol("PRIORITY frame must be 5 bytes"));
                }
                Payload::Priority(Priority::parse(payload)?)
            }
            FrameKind::RstStream => {
                if payload.len() != 4 {
                    return Err(Error::protocol("RST_STREAM frame must be 4 bytes"));
                }
                Payload::RstStream(ErrorCode::from_wire(payload.read_uint32()?))
            }
            FrameKind::Settings => {
                if flags & flags::ACK != 0 && !payload.is_empty() {
                    return Err(Error::protocol("SETTINGS ack must be empty"));
                }
                if payload.len() % 6 != 0 {
                    return Err(Error::protocol("SETTINGS payload not a multiple of 6"));
                }
                let mut settings = Vec::with_capacity(payload.len() / 6);
                while !payload.is_empty() {
                    let id = payload.read_uint16()?;
                    let value = payload.read_uint32()?;
                    // Unknown identifiers are silently ignored.
                    if let Some(setting) = Setting::from_wire(id) {
                        settings.push((setting, value));
                    }
                }
                Payload::Settings(settings)
            }
            FrameKind::PushPromise => {
                let promised = payload.read_uint32()? & MAX_STREAM_ID;
                Payload::PushPromise {
                    promised,
                    fragment: payload.take_all(),
                }
            }
            FrameKind::Ping => {
                if payload.len() != 8 {
                    return Err(Error::protocol("PING payload must be 8 bytes"));
                }
                let bytes = payload.read(8)?;
                let mut data = [0u8; 8];
                data.copy_from_slice(&bytes);
                Payload::Ping(data)
            }
            FrameKind::GoAway => {
                let last_stream = payload.read_uint32()? & MAX_STREAM_ID;
                let error = ErrorCode::from_wire(payload.read_uint32()?);
                Payload::GoAway {
                    last_stream,
                    error,
                    debug: payload.take_all(),
                }
            }
            FrameKind::WindowUpdate => {
                if payload.len() != 4 {
                    return Err(Error::protocol("WINDOW_UPDATE frame must be 4 bytes"));
                }
                let increment = payload.read_uint32()? & MAX_WINDOW_INCREMENT;
                if increment == 0 {
                    return Err(Error::protocol(format!(
                        "zero window increment on stream {stream}"
                    )));
                }
                Payload::WindowUpdate(increment)
            }
            FrameKind::Continuation => Payload::Continuation {
                fragment: payload.take_all(),
            },
            FrameKind::AltSvc => {
                let max_age = payload.read_uint32()?;
                let port = payload.read_uint16()?;
                let proto_len = payload.getbyte()? as usize;
                let proto = payload.read(proto_len)?;
                let host_len = payload.getbyte()? as usize;
                let host = payload.read(host_len)?;
                Payload::AltSvc {
                    max_age,
                    port,
                    proto,
                    host,
                    origin: payload.take_all(),
                }
            }
            FrameKind::Blocked => {
                if !payload.is_empty() {
                    return Err(Error::protocol("BLOCKED frame must be empty"));
                }
                Payload::Blocked
            }
        })
    }
}
