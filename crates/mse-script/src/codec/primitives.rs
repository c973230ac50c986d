//! Primitive encoding/decoding for the script container.
//!
//! Little-endian fixed-width integers, raw byte ranges and UTF-16LE text.

use log::trace;

use crate::error::DecodeError;
use crate::limits::UTF16_NUL_SIZE;

// =============================================================================
// DECODING
// =============================================================================

/// Reader for decoding binary data.
///
/// Wraps a byte slice and provides bounds-checked, seekable reads. Cloning a
/// reader is cheap and gives an independent cursor for lookahead.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader from a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the current position in the data.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the total length of the underlying buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns the number of remaining bytes.
    pub fn remaining_len(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Returns true if all data has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Moves the cursor to an absolute position.
    ///
    /// Seeking to the very end is allowed; seeking past it is not.
    pub fn seek(&mut self, pos: usize, context: &'static str) -> Result<(), DecodeError> {
        if pos > self.data.len() {
            return Err(DecodeError::TruncatedInput {
                context,
                offset: pos,
                needed: 0,
            });
        }
        self.pos = pos;
        Ok(())
    }

    /// Reads exactly n bytes.
    #[inline]
    pub fn read_bytes(&mut self, n: usize, context: &'static str) -> Result<&'a [u8], DecodeError> {
        if n > self.remaining_len() {
            return Err(DecodeError::TruncatedInput {
                context,
                offset: self.pos,
                needed: n,
            });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    #[inline]
    fn read_array<const N: usize>(&mut self, context: &'static str) -> Result<[u8; N], DecodeError> {
        let bytes = self.read_bytes(N, context)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Reads a little-endian u16.
    #[inline]
    pub fn read_u16(&mut self, context: &'static str) -> Result<u16, DecodeError> {
        self.read_array(context).map(u16::from_le_bytes)
    }

    /// Reads a little-endian u32.
    #[inline]
    pub fn read_u32(&mut self, context: &'static str) -> Result<u32, DecodeError> {
        self.read_array(context).map(u32::from_le_bytes)
    }

    /// Reads a little-endian i32.
    #[inline]
    pub fn read_i32(&mut self, context: &'static str) -> Result<i32, DecodeError> {
        self.read_array(context).map(i32::from_le_bytes)
    }

    /// Reads an i32 that must not be negative and returns it as a length.
    pub fn read_len_i32(&mut self, field: &'static str) -> Result<usize, DecodeError> {
        let offset = self.pos;
        let value = self.read_i32(field)?;
        usize::try_from(value).map_err(|_| DecodeError::NegativeLength {
            field,
            value,
            offset,
        })
    }

    /// Reads `len` bytes as UTF-16LE text, keeping any NUL code units.
    ///
    /// All `len` bytes are consumed. An odd final byte is not half of a code
    /// unit and is dropped from the text.
    pub fn read_utf16(&mut self, len: usize, field: &'static str) -> Result<String, DecodeError> {
        let offset = self.pos;
        let bytes = self.read_bytes(len, field)?;
        if len % 2 != 0 {
            trace!("{} at {:#x} has odd byte length {}; dropping last byte", field, offset, len);
        }
        decode_utf16(&bytes[..len - len % 2], field, offset)
    }

    /// Reads UTF-16LE code units up to and including a NUL terminator.
    ///
    /// The terminator is consumed but not part of the returned text.
    pub fn read_utf16_until_null(&mut self, field: &'static str) -> Result<String, DecodeError> {
        let offset = self.pos;
        let mut units = Vec::new();
        loop {
            let unit = self.read_u16(field)?;
            if unit == 0 {
                break;
            }
            units.push(unit);
        }
        units_to_string(&units, field, offset)
    }
}

/// Decodes UTF-16LE bytes.
pub fn decode_utf16(bytes: &[u8], field: &'static str, offset: usize) -> Result<String, DecodeError> {
    if bytes.len() % 2 != 0 {
        return Err(DecodeError::OddUtf16Length {
            field,
            offset,
            len: bytes.len(),
        });
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    units_to_string(&units, field, offset)
}

/// Converts UTF-16 code units to a string, rejecting unpaired surrogates.
pub fn units_to_string(units: &[u16], field: &'static str, offset: usize) -> Result<String, DecodeError> {
    String::from_utf16(units).map_err(|_| DecodeError::InvalidUtf16 { field, offset })
}

/// Drops exactly one trailing NUL character, if present.
pub fn trim_single_nul(mut text: String) -> String {
    if text.ends_with('\0') {
        text.pop();
    }
    text
}

/// Byte length of `text` encoded as UTF-16, without terminator.
#[inline]
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count() * 2
}

/// Byte length of `text` encoded as UTF-16 including its NUL terminator.
#[inline]
pub fn utf16_len_with_nul(text: &str) -> usize {
    utf16_len(text) + UTF16_NUL_SIZE
}

// =============================================================================
// ENCODING
// =============================================================================

/// Writer for encoding binary data.
///
/// Appends to a growable buffer; fields whose value is only known later are
/// reserved and patched in place.
#[derive(Debug, Clone, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Creates a new writer.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Creates a new writer with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Returns the written bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Returns a reference to the written bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Returns the number of bytes written, which is also the write position.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if no bytes have been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Writes raw bytes.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Writes a little-endian u16.
    #[inline]
    pub fn write_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a little-endian u32.
    #[inline]
    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a little-endian i32.
    #[inline]
    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes text as UTF-16LE without a terminator.
    pub fn write_utf16(&mut self, text: &str) {
        for unit in text.encode_utf16() {
            self.write_u16(unit);
        }
    }

    /// Writes text as UTF-16LE followed by a NUL code unit.
    pub fn write_utf16_with_nul(&mut self, text: &str) {
        self.write_utf16(text);
        self.write_u16(0);
    }

    /// Writes a zero u32 placeholder and returns its position.
    pub fn reserve_u32(&mut self) -> usize {
        let at = self.buf.len();
        self.write_u32(0);
        at
    }

    /// Overwrites four already-written bytes at `at`.
    ///
    /// # Panics
    ///
    /// Panics if `at` was not returned by [`Writer::reserve_u32`] on this writer.
    pub fn patch_u32(&mut self, at: usize, value: u32) {
        self.buf[at..at + 4].copy_from_slice(&value.to_le_bytes());
    }
}
