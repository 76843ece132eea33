//! Binary reader/writer pair used by every wire type.
//!
//! ## Var-int framing
//!
//! ```text
//! value < 0xFD          [value: u8]
//! value <= 0xFFFF       [0xFD][value: u16-le]
//! value <= 0xFFFF_FFFF  [0xFE][value: u32-le]
//! otherwise             [0xFF][value: u64-le]
//! ```
//!
//! Variable-length byte buffers are a var-int length followed by the bytes.

use crate::error::{CodecError, Result};

/// Types with a fixed, deterministic wire encoding.
pub trait Serializable {
    /// Exact number of bytes [`Serializable::serialize`] writes.
    fn size(&self) -> usize;

    /// Append the wire encoding to `writer`.
    fn serialize(&self, writer: &mut BinaryWriter);

    /// Encode into a freshly allocated buffer.
    fn to_array(&self) -> Vec<u8> {
        let mut writer = BinaryWriter::with_capacity(self.size());
        self.serialize(&mut writer);
        writer.into_inner()
    }
}

/// Types that can be decoded without outside context.
pub trait Deserializable: Sized {
    /// Decode one value, advancing `reader` past it.
    fn deserialize(reader: &mut BinaryReader<'_>) -> Result<Self>;

    /// Decode one value from the start of `data`.
    fn deserialize_from_bytes(data: &[u8]) -> Result<Self> {
        Self::deserialize(&mut BinaryReader::new(data))
    }
}

/// Encoded size of a var-int holding `value`.
pub const fn var_int_size(value: u64) -> usize {
    if value < 0xFD {
        1
    } else if value <= 0xFFFF {
        3
    } else if value <= 0xFFFF_FFFF {
        5
    } else {
        9
    }
}

/// Encoded size of a var-int length prefix plus `len` payload bytes.
pub const fn var_size(len: usize) -> usize {
    var_int_size(len as u64).saturating_add(len)
}

/// Append-only little-endian writer.
#[derive(Debug, Default, Clone)]
pub struct BinaryWriter {
    buf: Vec<u8>,
}

impl BinaryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Raw bytes with no length prefix.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_var_int(&mut self, value: u64) {
        if value < 0xFD {
            self.write_u8(value as u8);
        } else if value <= 0xFFFF {
            self.write_u8(0xFD);
            self.write_u16(value as u16);
        } else if value <= 0xFFFF_FFFF {
            self.write_u8(0xFE);
            self.write_u32(value as u32);
        } else {
            self.write_u8(0xFF);
            self.write_u64(value);
        }
    }

    /// Var-int length prefix followed by `bytes`.
    pub fn write_var_bytes(&mut self, bytes: &[u8]) {
        self.write_var_int(bytes.len() as u64);
        self.write_bytes(bytes);
    }

    pub fn write_serializable<T: Serializable + ?Sized>(&mut self, value: &T) {
        value.serialize(self);
    }
}

/// Cursor over a borrowed buffer. Every read fails cleanly on truncation.
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BinaryReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Borrow the next `len` bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        let end = match self.pos.checked_add(len) {
            Some(end) if end <= self.data.len() => end,
            _ => {
                return Err(CodecError::UnexpectedEof {
                    needed: len,
                    remaining,
                })
            }
        };
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.read_array().map(u16::from_le_bytes)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        self.read_array().map(u64::from_le_bytes)
    }

    /// Read a var-int, rejecting values above `max`.
    pub fn read_var_int(&mut self, max: u64) -> Result<u64> {
        let value = match self.read_u8()? {
            0xFD => u64::from(self.read_u16()?),
            0xFE => u64::from(self.read_u32()?),
            0xFF => self.read_u64()?,
            small => u64::from(small),
        };
        if value > max {
            return Err(CodecError::LengthExceeded { length: value, max });
        }
        Ok(value)
    }

    /// Read a var-int length prefix (at most `max`) and that many bytes.
    pub fn read_var_bytes(&mut self, max: usize) -> Result<Vec<u8>> {
        let max = max as u64;
        let len = self.read_var_int(max)?;
        let len = usize::try_from(len).map_err(|_| CodecError::LengthExceeded { length: len, max })?;
        Ok(self.read_bytes(len)?.to_vec())
    }

    pub fn read_serializable<T: Deserializable>(&mut self) -> Result<T> {
        T::deserialize(self)
    }
}
