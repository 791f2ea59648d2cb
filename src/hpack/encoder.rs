//! HPACK encoder.
//!
//! Turns a header list into a sequence of representations and their
//! wire bytes. Three reference-set strategies are available through
//! [`CompressionOptions::refset`]: clear-and-relist, full differencing
//! against the reference set, or a speculative run of both that keeps
//! whichever serialization is shorter.

use tracing::trace;

use crate::error::Result;

use super::huffman;
use super::integer::encode_integer;
use super::static_table;
use super::table::{Command, EncodingContext, Entry, Mark, Name};
use super::{CompressionOptions, Direction, Header, HuffmanMode, IndexMode, RefsetMode};

/// HPACK encoder for one direction of a connection.
pub struct Encoder {
    context: EncodingContext,
    options: CompressionOptions,
    direction: Direction,
}

impl Encoder {
    /// Create an encoder with default options.
    pub fn new(direction: Direction) -> Self {
        Self::with_options(direction, CompressionOptions::default())
    }

    /// Create an encoder with explicit options.
    pub fn with_options(direction: Direction, options: CompressionOptions) -> Self {
        Self {
            context: EncodingContext::new(options.table_size),
            options,
            direction,
        }
    }

    /// Change the table size limit; takes effect at the next `encode`
    /// via a table-size-change representation.
    pub fn set_table_size(&mut self, size: usize) {
        self.options.table_size = size;
    }

    /// The shared compression state (mainly for inspection in tests).
    pub fn context(&self) -> &EncodingContext {
        &self.context
    }

    /// Encode a header block. Names are lowercased first.
    pub fn encode(&mut self, headers: &[(&[u8], &[u8])]) -> Result<Vec<u8>> {
        let headers: Vec<Header> = headers
            .iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value.to_vec()))
            .collect();

        match self.options.refset {
            RefsetMode::Never => {
                let mut ctx = self.context.clone();
                let commands = self.plan_literal(&mut ctx, &headers)?;
                let bytes = self.serialize(&commands)?;
                self.context = ctx;
                Ok(bytes)
            }
            RefsetMode::Always => {
                let mut ctx = self.context.clone();
                let commands = self.plan_differential(&mut ctx, &headers)?;
                let bytes = self.serialize(&commands)?;
                self.context = ctx;
                Ok(bytes)
            }
            RefsetMode::Shorter => {
                // Run both strategies on copies of the state and keep
                // whichever wire form is shorter; ties go to the
                // differential form.
                let mut literal_ctx = self.context.clone();
                let literal = self.plan_literal(&mut literal_ctx, &headers)?;
                let literal_bytes = self.serialize(&literal)?;

                let mut diff_ctx = self.context.clone();
                let differential = self.plan_differential(&mut diff_ctx, &headers)?;
                let differential_bytes = self.serialize(&differential)?;

                trace!(
                    literal = literal_bytes.len(),
                    differential = differential_bytes.len(),
                    "speculative refset encode"
                );
                if literal_bytes.len() < differential_bytes.len() {
                    self.context = literal_ctx;
                    Ok(literal_bytes)
                } else {
                    self.context = diff_ctx;
                    Ok(differential_bytes)
                }
            }
        }
    }

    /// Clear-and-relist strategy: empty the reference set, then emit
    /// every header as a no-index or incremental representation.
    fn plan_literal(
        &self,
        ctx: &mut EncodingContext,
        headers: &[Header],
    ) -> Result<Vec<Command>> {
        let mut commands = Vec::new();
        self.adjust_table_size(ctx, &mut commands)?;

        if !ctx.refset().is_empty() {
            Self::apply(ctx, Command::RefsetEmpty, &mut commands)?;
        }

        for (name, value) in headers {
            let command = match self.options.index {
                IndexMode::All => Command::Incremental {
                    name: name_reference(ctx, name),
                    value: value.clone(),
                },
                IndexMode::Header => {
                    if static_table::find_by_name(name).is_some() {
                        Command::Incremental {
                            name: name_reference(ctx, name),
                            value: value.clone(),
                        }
                    } else {
                        Command::NoIndex {
                            name: Name::Literal(name.clone()),
                            value: value.clone(),
                        }
                    }
                }
                IndexMode::Static => Command::NoIndex {
                    name: match static_table::find_by_name(name) {
                        Some(pos) => Name::Index(ctx.len() + pos),
                        None => Name::Literal(name.clone()),
                    },
                    value: value.clone(),
                },
                IndexMode::Never => Command::NoIndex {
                    name: Name::Literal(name.clone()),
                    value: value.clone(),
                },
            };
            Self::apply(ctx, command, &mut commands)?;
        }
        Ok(commands)
    }

    /// Reference-set differencing: toggle only what changed since the
    /// previous block, then peel off entries the block did not use.
    fn plan_differential(
        &self,
        ctx: &mut EncodingContext,
        headers: &[Header],
    ) -> Result<Vec<Command>> {
        let mut commands = Vec::new();
        self.adjust_table_size(ctx, &mut commands)?;
        ctx.unmark();

        for (name, value) in headers {
            match ctx.refset_position(name, value) {
                Some(position) => {
                    let (index, mark) = {
                        let r = &ctx.refset()[position];
                        (r.index, r.mark)
                    };
                    match mark {
                        // First occurrence of an entry carried over
                        // from the previous block: the end-of-block
                        // emission covers it, so emit nothing yet.
                        Mark::Unmarked => ctx.set_mark(position, Mark::Common),
                        // Second occurrence: pay for the deferred copy
                        // and this one with two toggle pairs.
                        Mark::Common => {
                            for _ in 0..4 {
                                Self::apply(ctx, Command::Indexed(index), &mut commands)?;
                            }
                        }
                        // Further occurrences cost one toggle pair.
                        Mark::Emitted => {
                            for _ in 0..2 {
                                Self::apply(ctx, Command::Indexed(index), &mut commands)?;
                            }
                        }
                    }
                }
                None => {
                    if let Some(index) = ctx.find(name, value) {
                        if index >= ctx.len() {
                            // Referencing a static entry inserts a copy
                            // into the dynamic table.
                            let cost = Entry::new(name.clone(), value.clone()).cost();
                            self.resurrect_commons(ctx, cost, &mut commands)?;
                        }
                        Self::apply(ctx, Command::Indexed(index), &mut commands)?;
                    } else {
                        let cost = Entry::new(name.clone(), value.clone()).cost();
                        self.resurrect_commons(ctx, cost, &mut commands)?;
                        let command = Command::Incremental {
                            name: name_reference(ctx, name),
                            value: value.clone(),
                        };
                        Self::apply(ctx, command, &mut commands)?;
                    }
                }
            }
        }

        // Entries the block never touched no longer belong to it.
        let stale: Vec<usize> = ctx
            .refset()
            .iter()
            .filter(|r| r.mark == Mark::Unmarked)
            .map(|r| r.index)
            .collect();
        for index in stale {
            Self::apply(ctx, Command::Indexed(index), &mut commands)?;
        }
        Ok(commands)
    }

    /// Emit a table-size-change representation when the configured
    /// limit moved since the last block.
    fn adjust_table_size(
        &self,
        ctx: &mut EncodingContext,
        commands: &mut Vec<Command>,
    ) -> Result<()> {
        if ctx.limit() == self.options.table_size {
            return Ok(());
        }
        let evicted = ctx.pending_evictions_for_limit(self.options.table_size);
        self.resurrect_indices(ctx, &evicted, commands)?;
        Self::apply(ctx, Command::ChangeTableSize(self.options.table_size), commands)
    }

    /// Before an insertion evicts entries, restore the decoder's view
    /// of any evicted entry whose emission is still deferred (mark
    /// `common`): one toggle pair delivers the pending copy.
    fn resurrect_commons(
        &self,
        ctx: &mut EncodingContext,
        cost: usize,
        commands: &mut Vec<Command>,
    ) -> Result<()> {
        let evicted = ctx.pending_evictions(cost);
        self.resurrect_indices(ctx, &evicted, commands)
    }

    fn resurrect_indices(
        &self,
        ctx: &mut EncodingContext,
        evicted: &[usize],
        commands: &mut Vec<Command>,
    ) -> Result<()> {
        for &index in evicted {
            let is_common = ctx
                .refset()
                .iter()
                .any(|r| r.index == index && r.mark == Mark::Common);
            if is_common {
                Self::apply(ctx, Command::Indexed(index), commands)?;
                Self::apply(ctx, Command::Indexed(index), commands)?;
            }
        }
        Ok(())
    }

    fn apply(
        ctx: &mut EncodingContext,
        command: Command,
        commands: &mut Vec<Command>,
    ) -> Result<()> {
        ctx.process(&command)?;
        commands.push(command);
        Ok(())
    }

    /// Serialize a command list to wire bytes.
    fn serialize(&self, commands: &[Command]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        for command in commands {
            self.write_command(command, &mut out)?;
        }
        Ok(out)
    }

    fn write_command(&self, command: &Command, out: &mut Vec<u8>) -> Result<()> {
        match command {
            Command::Indexed(index) => {
                out.push(0x80);
                encode_integer(*index as u64 + 1, 7, out)?;
            }
            Command::Incremental { name, value } => {
                out.push(0x40);
                self.write_name(name, 6, out)?;
                self.write_string(value, out)?;
            }
            Command::NoIndex { name, value } => {
                out.push(0x00);
                self.write_name(name, 4, out)?;
                self.write_string(value, out)?;
            }
            Command::NeverIndexed { name, value } => {
                out.push(0x10);
                self.write_name(name, 4, out)?;
                self.write_string(value, out)?;
            }
            Command::ChangeTableSize(size) => {
                out.push(0x20);
                encode_integer(*size as u64, 4, out)?;
            }
            Command::RefsetEmpty => out.push(0x30),
        }
        Ok(())
    }

    fn write_name(&self, name: &Name, prefix: u8, out: &mut Vec<u8>) -> Result<()> {
        match name {
            // Indices are one-based on the wire; zero announces a
            // literal name.
            Name::Index(index) => encode_integer(*index as u64 + 1, prefix, out),
            Name::Literal(bytes) => {
                encode_integer(0, prefix, out)?;
                self.write_string(bytes, out)
            }
        }
    }

    fn write_string(&self, bytes: &[u8], out: &mut Vec<u8>) -> Result<()> {
        let coded = match self.options.huffman {
            HuffmanMode::Always => true,
            HuffmanMode::Never => false,
            // Prefer the plain form on a tie.
            HuffmanMode::Shorter => huffman::encoded_len(bytes, self.direction) < bytes.len(),
        };
        if coded {
            let encoded = huffman::encode(bytes, self.direction);
            out.push(0x80);
            encode_integer(encoded.len() as u64, 7, out)?;
            out.extend_from_slice(&encoded);
        } else {
            out.push(0x00);
            encode_integer(bytes.len() as u64, 7, out)?;
            out.extend_from_slice(bytes);
        }
        Ok(())
    }
}

/// Best name reference for a literal representation.
fn name_reference(ctx: &EncodingContext, name: &[u8]) -> Name {
    match ctx.find_name(name) {
        Some(index) => Name::Index(index),
        None => Name::Literal(name.to_vec()),
    }
}
