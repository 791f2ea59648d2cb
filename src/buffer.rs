//! Growable byte buffer with a read cursor.
//!
//! All multi-byte integers are big-endian. The buffer treats its
//! contents as raw octets; character-encoding concerns live with the
//! HPACK string representation, not here.

use bytes::Bytes;

use crate::error::{Error, Result};

/// A byte sequence that grows at the tail and is consumed from the head.
///
/// Reads advance an internal cursor; the storage is compacted lazily so
/// repeated small reads do not shift memory.
#[derive(Debug, Default, Clone)]
pub struct Buffer {
    data: Vec<u8>,
    pos: usize,
}

impl Buffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer holding a copy of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            data: bytes.to_vec(),
            pos: 0,
        }
    }

    /// Number of unread bytes.
    pub fn len(&self) -> usize {
        self.data.len() - self.pos
    }

    /// True when no unread bytes remain.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Unread bytes as a slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.data[self.pos..]
    }

    /// Append bytes at the tail.
    pub fn append(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Insert bytes at the head, ahead of all unread data.
    pub fn prepend(&mut self, bytes: &[u8]) {
        if self.pos >= bytes.len() {
            // Reuse consumed space.
            self.pos -= bytes.len();
            self.data[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        } else {
            self.compact();
            self.data.splice(0..0, bytes.iter().copied());
        }
    }

    /// Read `n` bytes, advancing the cursor. Fails if fewer are buffered.
    pub fn read(&mut self, n: usize) -> Result<Bytes> {
        if self.len() < n {
            return Err(Error::compression("too short"));
        }
        let out = Bytes::copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        self.maybe_compact();
        Ok(out)
    }

    /// Read a single byte.
    pub fn getbyte(&mut self) -> Result<u8> {
        if self.is_empty() {
            return Err(Error::compression("too short"));
        }
        let b = self.data[self.pos];
        self.pos += 1;
        self.maybe_compact();
        Ok(b)
    }

    /// Look at the next `n` bytes without advancing.
    pub fn peek(&self, n: usize) -> Option<&[u8]> {
        if self.len() < n {
            return None;
        }
        Some(&self.data[self.pos..self.pos + n])
    }

    /// Read a big-endian u16, advancing the cursor.
    pub fn read_uint16(&mut self) -> Result<u16> {
        let b = self.read(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    /// Read a big-endian u32, advancing the cursor.
    pub fn read_uint32(&mut self) -> Result<u32> {
        let b = self.read(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Copy of `n` unread bytes starting at offset `off` from the cursor.
    pub fn slice(&self, off: usize, n: usize) -> Result<Bytes> {
        if off + n > self.len() {
            return Err(Error::compression("too short"));
        }
        Ok(Bytes::copy_from_slice(
            &self.data[self.pos + off..self.pos + off + n],
        ))
    }

    /// Drop `n` unread bytes.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        if self.len() < n {
            return Err(Error::compression("too short"));
        }
        self.pos += n;
        self.maybe_compact();
        Ok(())
    }

    /// Consume everything, returning the unread bytes.
    pub fn take_all(&mut self) -> Bytes {
        let out = Bytes::copy_from_slice(self.as_slice());
        self.data.clear();
        self.pos = 0;
        out
    }

    fn compact(&mut self) {
        self.data.drain(..self.pos);
        self.pos = 0;
    }

    fn maybe_compact(&mut self) {
        // Shift only once half the storage is dead weight.
        if self.pos > 4096 && self.pos * 2 > self.data.len() {
            self.compact();
        }
    }
}

impl From<Vec<u8>> for Buffer {
    fn from(data: Vec<u8>) -> Self {
        Self { data, pos: 0 }
    }
}

impl From<&[u8]> for Buffer {
    fn from(data: &[u8]) -> Self {
        Self::from_bytes(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_advances_cursor() {
        let mut buf = Buffer::from_bytes(b"hello world");
        assert_eq!(&buf.read(5).unwrap()[..], b"hello");
        assert_eq!(buf.len(), 6);
        assert_eq!(&buf.read(6).unwrap()[..], b" world");
        assert!(buf.is_empty());
    }

    #[test]
    fn test_short_read_fails() {
        let mut buf = Buffer::from_bytes(b"ab");
        assert!(buf.read(3).is_err());
        // A failed read must not consume anything.
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn test_read_uint32_big_endian() {
        let mut buf = Buffer::from_bytes(&[0x01, 0x02, 0x03, 0x04]);
        assert_eq!(buf.read_uint32().unwrap(), 0x01020304);
    }

    #[test]
    fn test_prepend_after_read() {
        let mut buf = Buffer::from_bytes(b"world");
        buf.prepend(b"hello ");
        assert_eq!(buf.as_slice(), b"hello world");

        let mut buf = Buffer::from_bytes(b"xxworld");
        buf.read(2).unwrap();
        buf.prepend(b"he");
        assert_eq!(buf.as_slice(), b"heworld");
    }

    #[test]
    fn test_peek_does_not_advance() {
        let buf = Buffer::from_bytes(b"abc");
        assert_eq!(buf.peek(2), Some(&b"ab"[..]));
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.peek(4), None);
    }

    #[test]
    fn test_slice_with_offset() {
        let buf = Buffer::from_bytes(b"abcdef");
        assert_eq!(&buf.slice(2, 3).unwrap()[..], b"cde");
        assert!(buf.slice(4, 3).is_err());
    }
}
