//! Binary encoding/decoding for script containers.
//!
//! One module per region, composed by [`document`].

pub mod content;
pub mod document;
pub mod primitives;
pub mod raw;
pub mod table;
pub mod title;

pub use content::{decode_content, encode_content, ContentSection};
pub use document::{decode_document, decode_document_with_options, encode_document, DecodeOptions};
pub use primitives::{Reader, Writer};
pub use raw::{decode_raw, encode_raw};
pub use table::{decode_table, encode_table, TableSection};
pub use title::{
    decode_titles, encode_titles, is_ambiguous_content_len, is_boundary_word, scan_title_parameters,
    TitleScan,
};

/// Converts a buffer position to the informational offset stored on entries.
pub(crate) fn source_offset(pos: usize) -> u32 {
    u32::try_from(pos).unwrap_or(u32::MAX)
}
