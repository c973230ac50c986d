//! Title table encoding/decoding.
//!
//! Each entry is `u16 byte length, u16 key (0x8000), UTF-16 label + NUL`
//! followed by an unprefixed run of i32 parameters. The run length is not
//! stored; it ends where the next entry header or the content section begins.

use log::{debug, trace};

use crate::codec::primitives::{trim_single_nul, utf16_len_with_nul, Reader, Writer};
use crate::codec::source_offset;
use crate::error::{DecodeError, EncodeError};
use crate::limits::{BLOCK_MARKER, TITLE_HEADER_TOP_BYTE, TITLE_KEY};
use crate::model::TitleEntry;

// =============================================================================
// DECODING
// =============================================================================

/// Result of looking ahead over a title entry's parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleScan {
    /// Number of i32 parameters that follow the label.
    pub parameter_count: usize,
    /// True if the content section starts right after these parameters.
    pub is_last: bool,
}

/// Returns true if `word`, read where a parameter may appear, ends the
/// parameter run: either the next entry's header or the block marker that
/// follows the content section length.
pub fn is_boundary_word(word: u32) -> bool {
    (word >> 24) as u8 == TITLE_HEADER_TOP_BYTE || word & 0xFFFF == u32::from(BLOCK_MARKER)
}

/// Returns true if a content section length would be misread by
/// [`decode_titles`].
///
/// After at least one entry the length is scanned as a parameter word.
/// Without entries its high half is read as a title key.
pub fn is_ambiguous_content_len(len: u32, has_titles: bool) -> bool {
    if has_titles {
        is_boundary_word(len)
    } else {
        (len >> 16) as u16 == TITLE_KEY
    }
}

/// Counts the parameters following a label without moving `reader`.
///
/// Words are inspected one at a time. A word whose top byte is `0x80` is the
/// next entry's header. A word whose low half is the block marker straddles
/// the content section header: the word before it is the section length, so
/// it is not counted as a parameter.
pub fn scan_title_parameters(reader: &Reader<'_>) -> Result<TitleScan, DecodeError> {
    let mut probe = reader.clone();
    let start = probe.position();
    let mut words = 0usize;

    loop {
        if probe.remaining_len() < 4 {
            return Err(DecodeError::MalformedTitleSection {
                offset: start,
                reason: "parameters run past end of input",
            });
        }
        let word_at = probe.position();
        let word = probe.read_u32("title parameter")?;

        if (word >> 24) as u8 == TITLE_HEADER_TOP_BYTE {
            return Ok(TitleScan {
                parameter_count: words,
                is_last: false,
            });
        }
        if word & 0xFFFF == u32::from(BLOCK_MARKER) {
            let parameter_count =
                words
                    .checked_sub(1)
                    .ok_or(DecodeError::MalformedTitleSection {
                        offset: word_at,
                        reason: "block marker where the content section length belongs",
                    })?;
            return Ok(TitleScan {
                parameter_count,
                is_last: true,
            });
        }
        words += 1;
    }
}

/// Decodes title entries until a header without the title key or the entry
/// that borders the content section.
///
/// On return the reader is positioned at the content section length.
pub fn decode_titles(reader: &mut Reader<'_>, max_entries: usize) -> Result<Vec<TitleEntry>, DecodeError> {
    let mut entries = Vec::new();

    loop {
        let header_at = reader.position();
        let len = reader.read_u16("title length")?;
        let key = reader.read_u16("title key")?;
        if key != TITLE_KEY {
            reader.seek(header_at, "title header")?;
            break;
        }
        if entries.len() >= max_entries {
            return Err(DecodeError::LengthExceedsLimit {
                field: "title entries",
                len: entries.len() + 1,
                max: max_entries,
            });
        }

        let label = trim_single_nul(reader.read_utf16(usize::from(len), "title label")?);
        let scan = scan_title_parameters(reader)?;

        let byte_offset = source_offset(reader.position());
        let mut parameters = Vec::with_capacity(scan.parameter_count);
        for _ in 0..scan.parameter_count {
            parameters.push(reader.read_i32("title parameter")?);
        }

        trace!(
            "title {:?} at {:#x}: {} parameters",
            label,
            header_at,
            parameters.len()
        );
        entries.push(TitleEntry {
            byte_offset,
            label,
            parameters,
        });

        if scan.is_last {
            break;
        }
    }

    debug!("decoded {} title entries", entries.len());
    Ok(entries)
}

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes title entries in order.
///
/// Parameters that [`is_boundary_word`] would stop on are rejected, since the
/// run length is not stored.
pub fn encode_titles(writer: &mut Writer, titles: &[TitleEntry]) -> Result<(), EncodeError> {
    for (entry_index, entry) in titles.iter().enumerate() {
        if let Some((index, value)) = entry
            .parameters
            .iter()
            .enumerate()
            .find(|(_, p)| is_boundary_word(**p as u32))
        {
            return Err(EncodeError::AmbiguousParameter {
                entry: entry_index,
                index,
                value: *value,
            });
        }

        let len = utf16_len_with_nul(&entry.label);
        let len = u16::try_from(len).map_err(|_| EncodeError::LengthExceedsLimit {
            field: "title label",
            len,
            max: usize::from(u16::MAX),
        })?;
        writer.write_u16(len);
        writer.write_u16(TITLE_KEY);
        writer.write_utf16_with_nul(&entry.label);
        for parameter in &entry.parameters {
            writer.write_i32(*parameter);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Content section header: length, block marker, first title string.
    fn write_content_head(writer: &mut Writer) {
        writer.write_u32(0x40);
        writer.write_u16(BLOCK_MARKER);
        writer.write_utf16_with_nul("B");
    }

    fn encoded(titles: &[TitleEntry]) -> Writer {
        let mut writer = Writer::new();
        encode_titles(&mut writer, titles).unwrap();
        writer
    }

    #[test]
    fn test_encode_layout() {
        let writer = encoded(&[TitleEntry::new("AB", vec![-1, 2])]);
        assert_eq!(
            writer.as_bytes(),
            &[
                6, 0, 0x00, 0x80, // length, key
                b'A', 0, b'B', 0, 0, 0, // label + NUL
                0xFF, 0xFF, 0xFF, 0xFF, // -1
                2, 0, 0, 0, // 2
            ]
        );
    }

    #[test]
    fn test_scan_stops_at_next_header() {
        let mut writer = encoded(&[
            TitleEntry::new("first", vec![1, 2, 3]),
            TitleEntry::new("second", vec![]),
        ]);
        write_content_head(&mut writer);

        let mut reader = Reader::new(writer.as_bytes());
        reader.read_bytes(4 + 12, "header").unwrap();
        let scan = scan_title_parameters(&reader).unwrap();
        assert_eq!(
            scan,
            TitleScan {
                parameter_count: 3,
                is_last: false
            }
        );
        // Lookahead leaves the cursor alone.
        assert_eq!(reader.position(), 16);
    }

    #[test]
    fn test_decode_entries_until_content() {
        let titles = vec![
            TitleEntry::new("first", vec![1, -2, 3]),
            TitleEntry::new("second", vec![7]),
        ];
        let mut writer = encoded(&titles);
        let content_at = writer.len();
        write_content_head(&mut writer);

        let mut reader = Reader::new(writer.as_bytes());
        let decoded = decode_titles(&mut reader, 16).unwrap();
        assert_eq!(decoded, titles);
        assert_eq!(reader.position(), content_at);
        assert_eq!(decoded[0].byte_offset, 16);
    }

    #[test]
    fn test_zero_parameters_at_content_boundary() {
        let titles = vec![TitleEntry::new("Start", vec![])];
        let mut writer = encoded(&titles);
        let content_at = writer.len();
        write_content_head(&mut writer);

        let mut reader = Reader::new(writer.as_bytes());
        let decoded = decode_titles(&mut reader, 16).unwrap();
        assert_eq!(decoded, titles);
        assert!(decoded[0].parameters.is_empty());
        assert_eq!(reader.position(), content_at);
    }

    #[test]
    fn test_no_title_entries_rewinds() {
        let mut writer = Writer::new();
        write_content_head(&mut writer);

        let mut reader = Reader::new(writer.as_bytes());
        let decoded = decode_titles(&mut reader, 16).unwrap();
        assert!(decoded.is_empty());
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_marker_right_after_label_is_malformed() {
        let mut writer = encoded(&[TitleEntry::new("x", vec![])]);
        writer.write_u16(BLOCK_MARKER);
        writer.write_u16(0x41);

        let mut reader = Reader::new(writer.as_bytes());
        let result = decode_titles(&mut reader, 16);
        assert!(matches!(
            result,
            Err(DecodeError::MalformedTitleSection { offset: 8, .. })
        ));
    }

    #[test]
    fn test_parameters_past_end_is_malformed() {
        let writer = encoded(&[TitleEntry::new("x", vec![1, 2])]);
        let mut reader = Reader::new(writer.as_bytes());
        let result = decode_titles(&mut reader, 16);
        assert!(matches!(result, Err(DecodeError::MalformedTitleSection { .. })));
    }

    #[test]
    fn test_entry_limit() {
        let mut writer = encoded(&[TitleEntry::new("a", vec![]), TitleEntry::new("b", vec![])]);
        write_content_head(&mut writer);
        let mut reader = Reader::new(writer.as_bytes());
        let result = decode_titles(&mut reader, 1);
        assert!(matches!(
            result,
            Err(DecodeError::LengthExceedsLimit { max: 1, .. })
        ));
    }

    #[test]
    fn test_marker_parameter_rejected() {
        let mut writer = Writer::new();
        let result = encode_titles(
            &mut writer,
            &[
                TitleEntry::new("A", vec![0x25A0, 5]),
                TitleEntry::new("B", vec![1]),
            ],
        );
        assert_eq!(
            result,
            Err(EncodeError::AmbiguousParameter { entry: 0, index: 0, value: 0x25A0 })
        );
    }

    #[test]
    fn test_header_like_parameter_rejected() {
        let mut writer = Writer::new();
        let result = encode_titles(
            &mut writer,
            &[
                TitleEntry::new("A", vec![1]),
                TitleEntry::new("B", vec![7, i32::MIN]),
            ],
        );
        assert_eq!(
            result,
            Err(EncodeError::AmbiguousParameter { entry: 1, index: 1, value: i32::MIN })
        );
    }

    #[test]
    fn test_marker_in_high_half_is_a_parameter() {
        let titles = vec![TitleEntry::new("A", vec![0x25A0_0000, 0x0080_0000])];
        let mut writer = encoded(&titles);
        write_content_head(&mut writer);

        let mut reader = Reader::new(writer.as_bytes());
        assert_eq!(decode_titles(&mut reader, 16).unwrap(), titles);
    }

    #[test]
    fn test_boundary_words() {
        assert!(is_boundary_word(0x8000_000C));
        assert!(is_boundary_word(0x0001_25A0));
        assert!(!is_boundary_word(0x25A0_0000));
        assert!(!is_boundary_word(0x7FFF_FFFF));

        assert!(is_ambiguous_content_len(0x25A0, true));
        assert!(!is_ambiguous_content_len(0x25A0, false));
        assert!(is_ambiguous_content_len(0x8000_0010, false));
        assert!(!is_ambiguous_content_len(0x25A2, true));
    }

    #[test]
    fn test_odd_label_length_drops_last_byte() {
        let mut writer = Writer::new();
        writer.write_u16(13);
        writer.write_u16(TITLE_KEY);
        writer.write_utf16_with_nul("Start");
        writer.write_bytes(&[0xEE]);
        let content_at = writer.len();
        write_content_head(&mut writer);

        let mut reader = Reader::new(writer.as_bytes());
        let decoded = decode_titles(&mut reader, 16).unwrap();
        assert_eq!(decoded, vec![TitleEntry::new("Start", vec![])]);
        assert_eq!(reader.position(), content_at);
    }

    #[test]
    fn test_label_too_long() {
        let label = "x".repeat(40_000);
        let mut writer = Writer::new();
        let result = encode_titles(&mut writer, &[TitleEntry::new(label, vec![])]);
        assert!(matches!(
            result,
            Err(EncodeError::LengthExceedsLimit { len: 80_002, .. })
        ));
    }
}
