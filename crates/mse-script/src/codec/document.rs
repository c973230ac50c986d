//! Whole-container encoding/decoding.
//!
//! Regions are read and written in a fixed order over one cursor:
//! magic, title table, content section, raw payload, string table.

use log::{debug, warn};

use crate::codec::content::{decode_content, encode_content};
use crate::codec::primitives::{Reader, Writer};
use crate::codec::raw::{decode_raw, encode_raw};
use crate::codec::table::{decode_table, encode_table};
use crate::codec::title::{decode_titles, encode_titles, is_ambiguous_content_len};
use crate::error::{DecodeError, EncodeError};
use crate::limits::{MAX_CONTENT_BLOCKS, MAX_TABLE_STRINGS, MAX_TITLE_ENTRIES};
use crate::model::Document;

// =============================================================================
// OPTIONS
// =============================================================================

/// Options for decoding scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Maximum number of title entries.
    pub max_title_entries: usize,
    /// Maximum number of content blocks.
    pub max_content_blocks: usize,
    /// Maximum number of string table entries.
    pub max_table_strings: usize,
    /// Fail with [`DecodeError::TrailingData`] instead of ignoring bytes
    /// after the string table.
    pub reject_trailing_data: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_title_entries: MAX_TITLE_ENTRIES,
            max_content_blocks: MAX_CONTENT_BLOCKS,
            max_table_strings: MAX_TABLE_STRINGS,
            reject_trailing_data: false,
        }
    }
}

impl DecodeOptions {
    /// Creates default decoding options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options that reject trailing data.
    pub fn strict() -> Self {
        Self {
            reject_trailing_data: true,
            ..Self::default()
        }
    }

    /// Sets the maximum number of title entries.
    pub fn with_max_title_entries(mut self, max: usize) -> Self {
        self.max_title_entries = max;
        self
    }

    /// Sets the maximum number of content blocks.
    pub fn with_max_content_blocks(mut self, max: usize) -> Self {
        self.max_content_blocks = max;
        self
    }

    /// Sets the maximum number of string table entries.
    pub fn with_max_table_strings(mut self, max: usize) -> Self {
        self.max_table_strings = max;
        self
    }
}

// =============================================================================
// DECODING
// =============================================================================

/// Decodes a script with default options.
pub fn decode_document(input: &[u8]) -> Result<Document, DecodeError> {
    decode_document_with_options(input, &DecodeOptions::default())
}

/// Decodes a script.
///
/// Fails on the first region that cannot be decoded; later regions are only
/// located by decoding the earlier ones.
pub fn decode_document_with_options(
    input: &[u8],
    options: &DecodeOptions,
) -> Result<Document, DecodeError> {
    let mut reader = Reader::new(input);

    let magic = reader.read_i32("magic")?;
    let titles = decode_titles(&mut reader, options.max_title_entries)?;
    let content = decode_content(&mut reader, options.max_content_blocks)?;
    let raw = decode_raw(&mut reader)?;
    let table = decode_table(&mut reader, options.max_table_strings)?;

    let trailing = reader.remaining_len();
    if trailing > 0 {
        if options.reject_trailing_data {
            return Err(DecodeError::TrailingData {
                offset: table.end,
                len: trailing,
            });
        }
        warn!("ignoring {} bytes after the string table", trailing);
    }
    debug!(
        "decoded script {:#x}: {} titles, {} blocks, {} raw bytes, {} strings",
        magic,
        titles.len(),
        content.blocks.len(),
        raw.len(),
        table.strings.len()
    );

    Ok(Document {
        magic,
        titles,
        blocks: content.blocks,
        scenario_end: content.scenario_end,
        raw,
        strings: table.strings,
    })
}

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes a script into a fresh buffer.
pub fn encode_document(document: &Document) -> Result<Vec<u8>, EncodeError> {
    let mut writer = Writer::with_capacity(estimated_size(document));

    writer.write_i32(document.magic);
    encode_titles(&mut writer, &document.titles)?;
    let content_len = encode_content(&mut writer, &document.blocks, document.scenario_end)?;
    if is_ambiguous_content_len(content_len, !document.titles.is_empty()) {
        return Err(EncodeError::AmbiguousContentLength { len: content_len });
    }
    encode_raw(&mut writer, &document.raw)?;
    encode_table(&mut writer, &document.strings)?;

    debug!("encoded script {:#x}: {} bytes", document.magic, writer.len());
    Ok(writer.into_bytes())
}

fn estimated_size(document: &Document) -> usize {
    let text: usize = document.texts().map(|line| line.text().len() * 2 + 2).sum();
    let titles: usize = document
        .titles
        .iter()
        .map(|t| 4 + t.label.len() * 2 + 2 + t.parameters.len() * 4)
        .sum();
    64 + text + titles + document.raw.len() + document.strings.len() * 8
}
