//! HPACK header compression for the draft wire format.
//!
//! This module implements the stateful half of the codec: a dynamic
//! header table shared between encoder and decoder, the reference set
//! with its toggle semantics, Huffman-coded string literals, and the
//! representation grammar. Encoder and decoder instances are
//! per-direction and must see every header block for that direction in
//! order, or the two tables fall out of sync.

mod decoder;
mod encoder;
mod huffman;
mod huffman_table;
mod integer;
mod static_table;
mod table;

pub use decoder::Decoder;
pub use encoder::Encoder;
pub use integer::{decode_integer, encode_integer};
pub use table::{Command, EncodingContext, Entry, Mark, Name, RefEntry};

pub use huffman::{
    decode as huffman_decode, encode as huffman_encode, encoded_len as huffman_encoded_len,
};

/// A decoded header field.
pub type Header = (Vec<u8>, Vec<u8>);

/// Which static Huffman table a codec pair uses. Request headers and
/// response headers carry different code tables at this draft: a
/// client encodes with `Request` and decodes with `Response`, a server
/// the other way around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Request,
    Response,
}

/// When to Huffman-code string literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HuffmanMode {
    Always,
    Never,
    /// Code the string only when that is strictly shorter.
    Shorter,
}

/// How aggressively to index header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexMode {
    /// Incremental indexing for every header.
    All,
    /// Incremental indexing only for names the static table knows.
    Header,
    /// Static-table name references only; the dynamic table stays
    /// untouched.
    Static,
    /// Fully literal representations.
    Never,
}

/// How to use the reference set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefsetMode {
    /// Difference each block against the reference set.
    Always,
    /// Empty the reference set and relist every header.
    Never,
    /// Try both strategies and keep the shorter wire form.
    Shorter,
}

/// Encoder tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionOptions {
    pub huffman: HuffmanMode,
    pub index: IndexMode,
    pub refset: RefsetMode,
    pub table_size: usize,
}

impl Default for CompressionOptions {
    fn default() -> Self {
        Self {
            huffman: HuffmanMode::Shorter,
            index: IndexMode::All,
            refset: RefsetMode::Shorter,
            table_size: crate::settings::DEFAULT_HEADER_TABLE_SIZE as usize,
        }
    }
}

impl CompressionOptions {
    const PLAIN: Self = Self {
        huffman: HuffmanMode::Never,
        index: IndexMode::All,
        refset: RefsetMode::Never,
        table_size: crate::settings::DEFAULT_HEADER_TABLE_SIZE as usize,
    };

    /// Fully literal, no state at all.
    pub const NAIVE: Self = Self {
        index: IndexMode::Never,
        ..Self::PLAIN
    };

    /// Incremental indexing, reference set cleared each block.
    pub const LINEAR: Self = Self::PLAIN;

    /// Static-table name references only.
    pub const STATIC: Self = Self {
        index: IndexMode::Static,
        ..Self::PLAIN
    };

    /// Reference-set differencing.
    pub const DIFF: Self = Self {
        refset: RefsetMode::Always,
        ..Self::PLAIN
    };

    /// Speculative: shorter of LINEAR and DIFF per block.
    pub const SHORTER: Self = Self {
        refset: RefsetMode::Shorter,
        ..Self::PLAIN
    };

    /// Huffman variants of the presets above.
    pub const NAIVE_H: Self = Self {
        huffman: HuffmanMode::Shorter,
        ..Self::NAIVE
    };
    pub const LINEAR_H: Self = Self {
        huffman: HuffmanMode::Shorter,
        ..Self::LINEAR
    };
    pub const STATIC_H: Self = Self {
        huffman: HuffmanMode::Shorter,
        ..Self::STATIC
    };
    pub const DIFF_H: Self = Self {
        huffman: HuffmanMode::Shorter,
        ..Self::DIFF
    };
    pub const SHORTER_H: Self = Self {
        huffman: HuffmanMode::Shorter,
        ..Self::SHORTER
    };
}
