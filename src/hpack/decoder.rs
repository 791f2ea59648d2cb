//! HPACK decoder.
//!
//! Reads representations off the wire, feeds them through the shared
//! encoding context, and finishes each block by emitting the reference
//! set entries the block itself did not touch (headers carried over
//! from the previous block).

use crate::buffer::Buffer;
use crate::error::{Error, Result};

use super::huffman;
use super::integer::decode_integer;
use super::table::{Command, EncodingContext, Mark, Name};
use super::{Direction, Header};

/// HPACK decoder for one direction of a connection.
pub struct Decoder {
    context: EncodingContext,
    direction: Direction,
}

impl Decoder {
    /// Create a decoder with the default table size limit.
    pub fn new(direction: Direction) -> Self {
        Self::with_table_size(direction, crate::settings::DEFAULT_HEADER_TABLE_SIZE as usize)
    }

    /// Create a decoder with an explicit table size limit.
    pub fn with_table_size(direction: Direction, table_size: usize) -> Self {
        Self {
            context: EncodingContext::new(table_size),
            direction,
        }
    }

    /// Change the table size limit immediately.
    pub fn set_table_size(&mut self, size: usize) {
        self.context.set_limit(size);
    }

    /// The shared compression state (mainly for inspection in tests).
    pub fn context(&self) -> &EncodingContext {
        &self.context
    }

    /// Decode one header block.
    pub fn decode(&mut self, buf: &mut Buffer) -> Result<Vec<Header>> {
        self.context.unmark();
        let mut headers = Vec::new();

        while !buf.is_empty() {
            let command = self.read_command(buf)?;
            if let Some(header) = self.context.process(&command)? {
                headers.push(header);
            }
        }

        // Reference-set entries untouched by this block are implicitly
        // part of it.
        let carried: Vec<usize> = self
            .context
            .refset()
            .iter()
            .filter(|r| r.mark != Mark::Emitted)
            .map(|r| r.index)
            .collect();
        for index in carried {
            let (name, value, _) = self.context.dereference(index)?;
            headers.push((name, value));
        }

        Ok(headers)
    }

    fn read_command(&mut self, buf: &mut Buffer) -> Result<Command> {
        let first = match buf.peek(1) {
            Some(bytes) => bytes[0],
            None => return Err(Error::compression("too short")),
        };

        if first & 0x80 != 0 {
            // Indexed: 1xxxxxxx, 7-bit index.
            let index = decode_integer(buf, 7)?;
            if index == 0 {
                return Err(Error::compression("indexed representation with index 0"));
            }
            return Ok(Command::Indexed(index as usize - 1));
        }

        if first & 0xc0 == 0x40 {
            // Incremental indexing: 01xxxxxx, 6-bit name index.
            let (name, value) = self.read_literal(buf, 6)?;
            return Ok(Command::Incremental { name, value });
        }

        if first & 0xf0 == 0x20 {
            // Table size change: 0010xxxx, 4-bit size.
            let size = decode_integer(buf, 4)?;
            return Ok(Command::ChangeTableSize(size as usize));
        }

        if first == 0x30 {
            // Reference set emptying: the fixed octet 00110000.
            buf.getbyte()?;
            return Ok(Command::RefsetEmpty);
        }

        if first & 0xf0 == 0x00 {
            // Without indexing: 0000xxxx, 4-bit name index.
            let (name, value) = self.read_literal(buf, 4)?;
            return Ok(Command::NoIndex { name, value });
        }

        if first & 0xf0 == 0x10 {
            // Never indexed: 0001xxxx, 4-bit name index.
            let (name, value) = self.read_literal(buf, 4)?;
            return Ok(Command::NeverIndexed { name, value });
        }

        Err(Error::compression(format!(
            "unknown representation 0x{first:02x}"
        )))
    }

    fn read_literal(&mut self, buf: &mut Buffer, prefix: u8) -> Result<(Name, Vec<u8>)> {
        let index = decode_integer(buf, prefix)?;
        let name = if index == 0 {
            Name::Literal(self.read_string(buf)?)
        } else {
            Name::Index(index as usize - 1)
        };
        let value = self.read_string(buf)?;
        Ok((name, value))
    }

    fn read_string(&mut self, buf: &mut Buffer) -> Result<Vec<u8>> {
        let coded = match buf.peek(1) {
            Some(bytes) => bytes[0] & 0x80 != 0,
            None => return Err(Error::compression("too short")),
        };
        let length = decode_integer(buf, 7)? as usize;
        let raw = buf.read(length)?;
        if coded {
            huffman::decode(&raw, self.direction)
        } else {
            Ok(raw.to_vec())
        }
    }
}
