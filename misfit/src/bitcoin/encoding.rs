use crate::bitcoin::ByteCursor;
use crate::Result;
use bytes::BufMut;

/// Read & write transaction parts to and from binary in Bitcoin encoding format.
///
/// Parts are read from a [ByteCursor] so that a short buffer surfaces as an error instead of a
/// panic, and written to any [BufMut].
pub trait Encodable {
    /// Read the data structure from a cursor.
    fn from_binary(cursor: &mut ByteCursor) -> Result<Self>
    where
        Self: Sized;

    /// Write the data structure to a buffer.
    fn to_binary(&self, buffer: &mut dyn BufMut) -> Result<()>;

    /// Return the size of the encoded form.
    // Implementations must count field widths rather than encode and measure, the result is used
    // to size buffers before encoding.
    fn encoded_size(&self) -> u64;
}
