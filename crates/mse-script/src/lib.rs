//! Codec for MSE visual-novel script containers.
//!
//! Decodes a script into editable dialogue text and metadata and encodes it
//! back, keeping jump tables, parameter blocks and bytecode intact.
//!
//! # Quick Start
//!
//! ```rust
//! use mse_script::{ContentBlock, Document, TableString, TextLine, TitleEntry};
//!
//! let mut doc = Document::new(1);
//! doc.titles.push(TitleEntry::new("Start", vec![]));
//! doc.blocks.push(ContentBlock::new("Narrator", vec![TextLine::new("Hello\n")]));
//! doc.strings.push(TableString::new("voice_001"));
//!
//! let bytes = doc.encode().unwrap();
//! let mut decoded = Document::decode(&bytes).unwrap();
//! assert_eq!(decoded, doc);
//!
//! // Editors work on the escaped view.
//! assert_eq!(decoded.blocks[0].lines[0].display(), "Hello\\n");
//! decoded.blocks[0].lines[0].set_display("Bonjour\\n");
//! assert_eq!(decoded.blocks[0].lines[0].text(), "Bonjour\n");
//! ```
//!
//! # Modules
//!
//! - [`model`]: Document and its entries
//! - [`codec`]: Region codecs and the byte cursor
//! - [`escape`]: Control-character escaping for display
//! - [`store`]: Loading and saving buffers
//! - [`error`]: Error types
//! - [`limits`]: Wire constants and decode limits
//!
//! # Wire Format
//!
//! All integers are little-endian, all text UTF-16LE:
//!
//! ```text
//! i32 magic
//! title entries      u16 len, u16 0x8000, label, i32 parameters...
//! content section    u32 len, blocks opened by 0x25A0, NUL-terminated strings,
//!                    ended by "シナリオ終了\n"
//! raw payload        i32 len, bytes
//! string table       i32 count, (i32 offset, i32 len) x count, i32 blob len, blob
//! ```
//!
//! Two region boundaries are not length-prefixed and are found by scanning
//! for marker values; see [`codec::title`] and [`codec::content`].

pub mod codec;
pub mod error;
pub mod escape;
pub mod limits;
pub mod model;
pub mod store;

// Re-export commonly used types at crate root
pub use codec::{decode_document, decode_document_with_options, encode_document, DecodeOptions};
pub use error::{DecodeError, EncodeError, Error, ErrorCode, ImportError};
pub use escape::{escape, unescape, EscapeTable, STANDARD_TABLE};
pub use model::{
    Argument, ContentBlock, Document, RawPayload, ScenarioEnd, TableString, TextLine,
    TextObserver, TitleEntry,
};
pub use store::{ByteStore, FileStore, MemoryStore};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
