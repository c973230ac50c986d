//! Indexed string table encoding/decoding.
//!
//! ```text
//! i32  count
//! (i32 offset, i32 length) x count   relative to the blob origin
//! i32  blob length
//! blob: UTF-16 strings
//! ```
//!
//! Stored lengths exclude the NUL terminator each string carries in the blob.
//! Offsets are recomputed on every encode.

use log::debug;

use crate::codec::primitives::{utf16_len_with_nul, Reader, Writer};
use crate::codec::source_offset;
use crate::error::{DecodeError, EncodeError};
use crate::limits::{TABLE_RANGE_SIZE, UTF16_NUL_SIZE};
use crate::model::TableString;

/// A decoded string table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSection {
    /// Strings in index order.
    pub strings: Vec<TableString>,
    /// Blob length as stored in the source.
    pub declared_len: usize,
    /// Position just past the table data.
    pub end: usize,
}

// =============================================================================
// DECODING
// =============================================================================

/// Decodes the string table.
///
/// Each range is read as-is; a NUL inside the range stays in the text.
/// On return the reader is positioned at [`TableSection::end`].
pub fn decode_table(reader: &mut Reader<'_>, max_strings: usize) -> Result<TableSection, DecodeError> {
    let count = reader.read_len_i32("string count")?;
    if count > max_strings {
        return Err(DecodeError::LengthExceedsLimit {
            field: "table strings",
            len: count,
            max: max_strings,
        });
    }
    let needed = count.saturating_mul(TABLE_RANGE_SIZE);
    if needed > reader.remaining_len() {
        return Err(DecodeError::TruncatedInput {
            context: "string ranges",
            offset: reader.position(),
            needed,
        });
    }

    let mut ranges = Vec::with_capacity(count);
    for _ in 0..count {
        let start = reader.read_len_i32("string offset")?;
        let len = reader.read_len_i32("string length")?;
        ranges.push((start, len));
    }
    let declared_len = reader.read_len_i32("string table length")?;
    let origin = reader.position();

    let mut end = origin.saturating_add(declared_len);
    let mut strings = Vec::with_capacity(count);
    for (start, len) in ranges {
        let at = origin.saturating_add(start);
        reader.seek(at, "table string")?;
        let text = reader.read_utf16(len, "table string")?;
        end = end.max(reader.position());
        strings.push(TableString::at(source_offset(at), text));
    }

    let end = end.min(reader.len());
    reader.seek(end, "string table end")?;
    debug!("decoded {} table strings from {:#x}", strings.len(), origin);

    Ok(TableSection {
        strings,
        declared_len,
        end,
    })
}

// =============================================================================
// ENCODING
// =============================================================================

fn wire_i32(value: usize, field: &'static str) -> Result<i32, EncodeError> {
    i32::try_from(value).map_err(|_| EncodeError::LengthExceedsLimit {
        field,
        len: value,
        max: i32::MAX as usize,
    })
}

/// Encodes the string table with freshly computed offsets.
pub fn encode_table(writer: &mut Writer, strings: &[TableString]) -> Result<(), EncodeError> {
    writer.write_i32(wire_i32(strings.len(), "table strings")?);

    let mut offset = 0usize;
    for string in strings {
        let full = utf16_len_with_nul(string.text());
        writer.write_i32(wire_i32(offset, "string table offset")?);
        writer.write_i32(wire_i32(full - UTF16_NUL_SIZE, "table string")?);
        offset += full;
    }
    writer.write_i32(wire_i32(offset, "string table")?);

    for string in strings {
        writer.write_utf16_with_nul(string.text());
    }
    Ok(())
}
