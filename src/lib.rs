//! # Wraith
//!
//! Sans-I/O HTTP/2 endpoint core.
//!
//! Wraith turns a bidirectional byte stream into multiplexed
//! request/response streams and back, without owning any I/O. It covers
//! the three subsystems a connection driver cannot do without:
//!
//! - **Frame codec**: parse and serialize the draft HTTP/2 frame types
//!   with bit-exact length/type/flags/stream encoding and padding.
//! - **HPACK**: Huffman coding plus the indexed/literal representation
//!   machinery with a dynamic header table and reference set.
//! - **Streams and flow control**: per-stream lifecycle transitions and
//!   window accounting, driven by sent and received frames.
//!
//! Everything here is synchronous and event-driven: the driver feeds
//! bytes or frames in, drains events out, and decides connection-level
//! disposition when a subsystem reports an error. The core never spawns
//! tasks, never awaits, and never blocks.
//!
//! Out of scope (the driver's job): sockets, TLS/ALPN, the connection
//! orchestrator that owns the stream table, and HTTP semantics above the
//! framing layer.

// Core modules
pub mod buffer;
pub mod error;
pub mod settings;

// Wire codecs
pub mod frame;
pub mod hpack;

// Stream layer
pub mod flow;
pub mod stream;

// Re-exports for convenient access
pub use buffer::Buffer;
pub use error::{Error, Result};
pub use flow::FlowController;
pub use frame::{ErrorCode, Frame, FrameCodec, FrameKind, Payload, Priority, Setting};
pub use hpack::{CompressionOptions, Decoder, Direction, Encoder};
pub use settings::Settings;
pub use stream::{ClosedReason, State, Stream, StreamEvent};

/// ALPN protocol token for the draft this crate implements.
pub const DRAFT_TOKEN: &str = "h2-16";
