use crate::{Error, Result};
use bytes::{Buf, Bytes};

/// A bounds-checked reader over an immutable byte buffer.
///
/// Every read either returns exactly the requested number of bytes and advances the cursor, or
/// fails with [Error::OutOfBounds] and leaves the cursor where it was.
#[derive(Debug, Clone)]
pub struct ByteCursor {
    buffer: Bytes,
    position: usize,
}

impl ByteCursor {
    pub fn new(buffer: impl Into<Bytes>) -> ByteCursor {
        ByteCursor {
            buffer: buffer.into(),
            position: 0,
        }
    }

    /// Offset of the next byte to be read.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.buffer.remaining()
    }

    pub fn is_exhausted(&self) -> bool {
        !self.buffer.has_remaining()
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        if self.buffer.remaining() < needed {
            Err(Error::OutOfBounds {
                needed,
                remaining: self.buffer.remaining(),
            })
        } else {
            Ok(())
        }
    }

    /// Return the next `n` bytes.
    pub fn take(&mut self, n: usize) -> Result<Bytes> {
        self.ensure(n)?;
        self.position += n;
        Ok(self.buffer.copy_to_bytes(n))
    }

    /// Return the next `N` bytes as a fixed size array.
    pub fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.ensure(N)?;
        let mut out = [0u8; N];
        self.buffer.copy_to_slice(&mut out);
        self.position += N;
        Ok(out)
    }

    pub fn take_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        self.position += 1;
        Ok(self.buffer.get_u8())
    }

    /// Read a single length byte `L` and return the `L` bytes that follow it.
    ///
    /// If the length byte is readable but the body is not, the cursor is still rewound to the
    /// length byte.
    pub fn take_length_prefixed(&mut self) -> Result<Bytes> {
        self.ensure(1)?;
        let len = self.buffer[0] as usize;
        self.ensure(1 + len)?;
        self.take_u8()?;
        self.take(len)
    }
}
