//! Content section encoding/decoding.
//!
//! ```text
//! u32  section byte length (from the first block marker to the end)
//! for each block:
//!     u16  0x25A0
//!     UTF-16 strings, each NUL-terminated (title first)
//! "シナリオ終了\n" NUL
//! ```
//!
//! Block boundaries and the end of the section are found by scanning; the
//! length field is written but never trusted on read.

use log::{debug, trace, warn};

use crate::codec::primitives::{units_to_string, Reader, Writer};
use crate::codec::source_offset;
use crate::error::{DecodeError, EncodeError};
use crate::limits::{BLOCK_MARKER, END_OF_SCENARIO};
use crate::model::{ContentBlock, ScenarioEnd, TextLine};

/// A decoded content section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSection {
    /// Dialogue blocks, without the end-of-scenario string.
    pub blocks: Vec<ContentBlock>,
    /// Placement of the end-of-scenario string.
    pub scenario_end: ScenarioEnd,
    /// Length field as stored in the source.
    pub declared_len: u32,
}

// =============================================================================
// DECODING
// =============================================================================

/// Reads one code unit; running out of input means the section never ended.
fn read_unit(reader: &mut Reader<'_>, section_at: usize) -> Result<u16, DecodeError> {
    reader.read_u16("content string").map_err(|err| match err {
        DecodeError::TruncatedInput { .. } => DecodeError::MissingEndSentinel { offset: section_at },
        other => other,
    })
}

/// Builds a block from its strings, the first one being the title, and
/// appends it within the block limit.
fn push_block(
    blocks: &mut Vec<ContentBlock>,
    mut strings: Vec<TextLine>,
    block_at: usize,
    max_blocks: usize,
) -> Result<(), DecodeError> {
    if blocks.len() >= max_blocks {
        return Err(DecodeError::LengthExceedsLimit {
            field: "content blocks",
            len: blocks.len() + 1,
            max: max_blocks,
        });
    }
    if strings.is_empty() {
        return Err(DecodeError::EmptyContentBlock { offset: block_at });
    }
    let lines = strings.split_off(1);
    let title = strings.remove(0);
    blocks.push(ContentBlock {
        offset: title.offset,
        title,
        lines,
    });
    Ok(())
}

/// Decodes the content section up to and including the end-of-scenario string.
pub fn decode_content(reader: &mut Reader<'_>, max_blocks: usize) -> Result<ContentSection, DecodeError> {
    let section_at = reader.position();
    let declared_len = reader.read_u32("content length")?;
    let body_at = reader.position();
    let first_marker = reader.read_u16("block marker")?;
    if first_marker != BLOCK_MARKER {
        trace!("content section opens with {:#06x} instead of a block marker", first_marker);
    }

    let mut blocks = Vec::new();
    let scenario_end = 'blocks: loop {
        let block_at = reader.position();
        let mut strings: Vec<TextLine> = Vec::new();

        loop {
            let string_at = reader.position();
            let first = read_unit(reader, section_at)?;
            if first == BLOCK_MARKER {
                break;
            }

            let mut units = Vec::new();
            let mut unit = first;
            while unit != 0 {
                units.push(unit);
                unit = read_unit(reader, section_at)?;
            }
            let text = units_to_string(&units, "content string", string_at)?;

            if text == END_OF_SCENARIO {
                if strings.is_empty() {
                    break 'blocks ScenarioEnd::OwnBlock;
                }
                push_block(&mut blocks, strings, block_at, max_blocks)?;
                break 'blocks ScenarioEnd::AfterLastLine;
            }
            strings.push(TextLine::at(source_offset(string_at), text));
        }

        push_block(&mut blocks, strings, block_at, max_blocks)?;
    };

    let measured = reader.position() - body_at;
    if measured != declared_len as usize {
        warn!(
            "content section declares {} bytes but spans {}",
            declared_len, measured
        );
    }
    debug!(
        "decoded {} content blocks ({:?}) from {:#x}",
        blocks.len(),
        scenario_end,
        section_at
    );

    Ok(ContentSection {
        blocks,
        scenario_end,
        declared_len,
    })
}

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes the content section and returns the length written to its header.
///
/// The length field is reserved first and patched once the blocks, whose
/// size depends on the current text, have been written.
pub fn encode_content(
    writer: &mut Writer,
    blocks: &[ContentBlock],
    scenario_end: ScenarioEnd,
) -> Result<u32, EncodeError> {
    let len_at = writer.reserve_u32();
    let body_at = writer.len();

    for (block_index, block) in blocks.iter().enumerate() {
        writer.write_u16(BLOCK_MARKER);
        for (index, line) in block.strings().enumerate() {
            let text = line.text();
            if text.encode_utf16().next() == Some(BLOCK_MARKER) {
                return Err(EncodeError::AmbiguousLineStart {
                    block: block_index,
                    index,
                });
            }
            if text.contains('\0') {
                return Err(EncodeError::EmbeddedNul {
                    block: block_index,
                    index,
                });
            }
            if text == END_OF_SCENARIO {
                return Err(EncodeError::EmbeddedEndOfScenario {
                    block: block_index,
                    index,
                });
            }
            writer.write_utf16_with_nul(text);
        }
    }

    if scenario_end == ScenarioEnd::OwnBlock || blocks.is_empty() {
        writer.write_u16(BLOCK_MARKER);
    }
    writer.write_utf16_with_nul(END_OF_SCENARIO);

    let len = writer.len() - body_at;
    let len = u32::try_from(len).map_err(|_| EncodeError::LengthExceedsLimit {
        field: "content section",
        len,
        max: u32::MAX as usize,
    })?;
    writer.patch_u32(len_at, len);
    Ok(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(title: &str, lines: &[&str]) -> ContentBlock {
        ContentBlock::new(title, lines.iter().map(|l| TextLine::new(*l)).collect())
    }

    fn encoded(blocks: &[ContentBlock], end: ScenarioEnd) -> Vec<u8> {
        let mut writer = Writer::new();
        encode_content(&mut writer, blocks, end).unwrap();
        writer.into_bytes()
    }

    #[test]
    fn test_section_length() {
        let bytes = encoded(&[block("Block1", &["Hello", "World"])], ScenarioEnd::AfterLastLine);
        // marker + "Block1\0" + "Hello\0" + "World\0" + end-of-scenario
        let expected = 2 + 14 + 12 + 12 + 16;
        let mut writer = Writer::new();
        let written = encode_content(
            &mut writer,
            &[block("Block1", &["Hello", "World"])],
            ScenarioEnd::AfterLastLine,
        );
        assert_eq!(written, Ok(expected as u32));
        assert_eq!(&bytes[..4], &(expected as u32).to_le_bytes());
        assert_eq!(bytes.len(), 4 + expected);
    }

    #[test]
    fn test_decode_blocks() {
        let blocks = vec![
            block("Narrator", &["Line one\n", ""]),
            block("Alice", &[]),
            block("Bob", &["\u{3000}"]),
        ];
        let bytes = encoded(&blocks, ScenarioEnd::AfterLastLine);

        let mut reader = Reader::new(&bytes);
        let section = decode_content(&mut reader, 16).unwrap();
        assert_eq!(section.blocks, blocks);
        assert_eq!(section.scenario_end, ScenarioEnd::AfterLastLine);
        assert_eq!(section.declared_len as usize, bytes.len() - 4);
        assert!(reader.is_empty());

        assert_eq!(section.blocks[0].offset, 6);
        assert_eq!(section.blocks[0].title.offset, 6);
        assert_eq!(section.blocks[0].lines[0].offset, 6 + 18);
    }

    #[test]
    fn test_end_marker_never_a_line() {
        let bytes = encoded(&[block("Block1", &["Hello"])], ScenarioEnd::AfterLastLine);
        let mut reader = Reader::new(&bytes);
        let section = decode_content(&mut reader, 16).unwrap();
        assert!(section.blocks.iter().flat_map(ContentBlock::strings).all(|l| l.text() != END_OF_SCENARIO));
    }

    #[test]
    fn test_end_marker_in_own_block() {
        let blocks = vec![block("Block1", &["Hello"])];
        let bytes = encoded(&blocks, ScenarioEnd::OwnBlock);

        let mut reader = Reader::new(&bytes);
        let section = decode_content(&mut reader, 16).unwrap();
        assert_eq!(section.blocks, blocks);
        assert_eq!(section.scenario_end, ScenarioEnd::OwnBlock);
    }

    #[test]
    fn test_no_blocks() {
        let bytes = encoded(&[], ScenarioEnd::AfterLastLine);
        let mut reader = Reader::new(&bytes);
        let section = decode_content(&mut reader, 16).unwrap();
        assert!(section.blocks.is_empty());
        assert_eq!(section.scenario_end, ScenarioEnd::OwnBlock);
    }

    #[test]
    fn test_marker_inside_string_is_text() {
        let blocks = vec![block("A\u{25A0}B", &["x\u{25A0}"])];
        let bytes = encoded(&blocks, ScenarioEnd::AfterLastLine);
        let mut reader = Reader::new(&bytes);
        assert_eq!(decode_content(&mut reader, 16).unwrap().blocks, blocks);
    }

    #[test]
    fn test_missing_end_sentinel() {
        let mut writer = Writer::new();
        writer.write_u32(0);
        writer.write_u16(BLOCK_MARKER);
        writer.write_utf16_with_nul("Block1");
        writer.write_utf16("unterminated");

        let mut reader = Reader::new(writer.as_bytes());
        let result = decode_content(&mut reader, 16);
        assert_eq!(result, Err(DecodeError::MissingEndSentinel { offset: 0 }));
    }

    #[test]
    fn test_empty_block() {
        let mut writer = Writer::new();
        writer.write_u32(0);
        writer.write_u16(BLOCK_MARKER);
        writer.write_u16(BLOCK_MARKER);
        writer.write_utf16_with_nul(END_OF_SCENARIO);

        let mut reader = Reader::new(writer.as_bytes());
        let result = decode_content(&mut reader, 16);
        assert_eq!(result, Err(DecodeError::EmptyContentBlock { offset: 6 }));
    }

    #[test]
    fn test_block_limit() {
        let bytes = encoded(&[block("a", &[]), block("b", &[])], ScenarioEnd::OwnBlock);
        let mut reader = Reader::new(&bytes);
        let result = decode_content(&mut reader, 1);
        assert!(matches!(result, Err(DecodeError::LengthExceedsLimit { max: 1, .. })));
    }

    #[test]
    fn test_block_limit_counts_final_block() {
        let blocks = [block("a", &["x"]), block("b", &["y"])];
        let bytes = encoded(&blocks, ScenarioEnd::AfterLastLine);

        let mut reader = Reader::new(&bytes);
        let result = decode_content(&mut reader, 1);
        assert!(matches!(
            result,
            Err(DecodeError::LengthExceedsLimit { len: 2, max: 1, .. })
        ));

        let mut reader = Reader::new(&bytes);
        assert_eq!(decode_content(&mut reader, 2).unwrap().blocks.len(), 2);
    }

    #[test]
    fn test_ambiguous_line_start_rejected() {
        let mut writer = Writer::new();
        let result = encode_content(
            &mut writer,
            &[block("ok", &["fine", "\u{25A0}starts with marker"])],
            ScenarioEnd::AfterLastLine,
        );
        assert_eq!(result, Err(EncodeError::AmbiguousLineStart { block: 0, index: 2 }));
    }

    #[test]
    fn test_embedded_end_of_scenario_rejected() {
        let mut writer = Writer::new();
        let result = encode_content(
            &mut writer,
            &[block("ok", &[END_OF_SCENARIO, "after"])],
            ScenarioEnd::AfterLastLine,
        );
        assert_eq!(result, Err(EncodeError::EmbeddedEndOfScenario { block: 0, index: 1 }));
    }

    #[test]
    fn test_embedded_nul_rejected() {
        let mut writer = Writer::new();
        let result = encode_content(&mut writer, &[block("a\0b", &[])], ScenarioEnd::OwnBlock);
        assert_eq!(result, Err(EncodeError::EmbeddedNul { block: 0, index: 0 }));
    }

    #[test]
    fn test_edited_text_changes_length() {
        let mut blocks = vec![block("Block1", &["Hello"])];
        let before = encoded(&blocks, ScenarioEnd::AfterLastLine);
        blocks[0].lines[0].set_text("Hello, world");
        let after = encoded(&blocks, ScenarioEnd::AfterLastLine);

        let len = |bytes: &[u8]| u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        assert_eq!(len(&after) - len(&before), 14);

        let mut reader = Reader::new(&after);
        assert_eq!(decode_content(&mut reader, 16).unwrap().blocks, blocks);
    }
}
