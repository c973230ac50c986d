//! Error types for script decoding, encoding and text import.

use thiserror::Error;

/// Error categories reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// E001: Read past the end of the buffer
    TruncatedInput,
    /// E002: Title entries could not be delimited
    MalformedTitleSection,
    /// E003: Content section ended without the end-of-scenario string
    MissingEndSentinel,
    /// E004: Text is not valid UTF-16
    EncodingError,
    /// E005: Structurally invalid region
    MalformedStructure,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::TruncatedInput => "E001",
            ErrorCode::MalformedTitleSection => "E002",
            ErrorCode::MissingEndSentinel => "E003",
            ErrorCode::EncodingError => "E004",
            ErrorCode::MalformedStructure => "E005",
        }
    }
}

/// Error during binary decoding.
///
/// Any of these aborts the whole decode; no partial document is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    // === E001 ===
    #[error("[E001] unexpected end of input at offset {offset} while reading {context} ({needed} bytes needed)")]
    TruncatedInput {
        context: &'static str,
        offset: usize,
        needed: usize,
    },

    // === E002 ===
    #[error("[E002] malformed title section at offset {offset}: {reason}")]
    MalformedTitleSection { offset: usize, reason: &'static str },

    // === E003 ===
    #[error("[E003] content section starting at offset {offset} has no end-of-scenario string")]
    MissingEndSentinel { offset: usize },

    // === E004 ===
    #[error("[E004] unpaired surrogate in {field} at offset {offset}")]
    InvalidUtf16 { field: &'static str, offset: usize },

    #[error("[E004] {field} at offset {offset} has odd byte length {len}")]
    OddUtf16Length {
        field: &'static str,
        offset: usize,
        len: usize,
    },

    // === E005 ===
    #[error("[E005] content block at offset {offset} has no title string")]
    EmptyContentBlock { offset: usize },

    #[error("[E005] negative {field} {value} at offset {offset}")]
    NegativeLength {
        field: &'static str,
        value: i32,
        offset: usize,
    },

    #[error("[E005] {field} count {len} exceeds maximum {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("[E005] {len} bytes of trailing data after offset {offset}")]
    TrailingData { offset: usize, len: usize },
}

impl DecodeError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DecodeError::TruncatedInput { .. } => ErrorCode::TruncatedInput,
            DecodeError::MalformedTitleSection { .. } => ErrorCode::MalformedTitleSection,
            DecodeError::MissingEndSentinel { .. } => ErrorCode::MissingEndSentinel,
            DecodeError::InvalidUtf16 { .. } | DecodeError::OddUtf16Length { .. } => {
                ErrorCode::EncodingError
            }
            _ => ErrorCode::MalformedStructure,
        }
    }
}

/// Error during binary encoding.
///
/// Encoding either produces the complete buffer or fails with one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("{field} length {len} exceeds maximum {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("string {index} of content block {block} starts with U+25A0 and would be read back as a block marker")]
    AmbiguousLineStart { block: usize, index: usize },

    #[error("string {index} of content block {block} is the end-of-scenario string and would end the section early")]
    EmbeddedEndOfScenario { block: usize, index: usize },

    #[error("string {index} of content block {block} contains NUL and would be split on read")]
    EmbeddedNul { block: usize, index: usize },

    #[error("parameter {index} of title entry {entry} ({value:#010x}) would be read back as a section boundary")]
    AmbiguousParameter { entry: usize, index: usize, value: i32 },

    #[error("content section length {len:#x} would be read back as a title boundary")]
    AmbiguousContentLength { len: u32 },
}

/// Error while applying edited texts to a document.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImportError {
    #[error("expected {expected} texts, got {found}")]
    CountMismatch { expected: usize, found: usize },
}

/// Error from the store-backed load/save helpers.
#[derive(Debug, Error)]
pub enum Error {
    #[error("could not access script bytes: {0}")]
    Io(#[from] std::io::Error),

    #[error("script could not be read: {0}")]
    Decode(#[from] DecodeError),

    #[error("script could not be written: {0}")]
    Encode(#[from] EncodeError),
}
