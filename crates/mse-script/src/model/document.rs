//! The decoded script container.

use std::path::Path;

use crate::codec::{decode_document, encode_document};
use crate::error::{DecodeError, EncodeError, Error, ImportError};
use crate::model::{ContentBlock, ScenarioEnd, TableString, TextLine, TitleEntry};
use crate::store::ByteStore;

/// Opaque bytecode between the content section and the string table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPayload(pub Vec<u8>);

impl RawPayload {
    /// Returns the payload bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the payload length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for RawPayload {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// A decoded script.
///
/// Regions are kept in wire order: title table, content blocks, raw payload,
/// string table. Equality is structural; source offsets are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Signature/version tag.
    pub magic: i32,
    /// Title table entries.
    pub titles: Vec<TitleEntry>,
    /// Dialogue blocks, without the end-of-scenario string.
    pub blocks: Vec<ContentBlock>,
    /// Placement of the end-of-scenario string.
    pub scenario_end: ScenarioEnd,
    /// Opaque bytecode.
    pub raw: RawPayload,
    /// Indexed string table.
    pub strings: Vec<TableString>,
}

impl Document {
    /// Creates an empty document with the given magic.
    pub fn new(magic: i32) -> Self {
        Self {
            magic,
            ..Self::default()
        }
    }

    /// Decodes a document from a complete script buffer.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        decode_document(bytes)
    }

    /// Encodes the document into a fresh buffer.
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        encode_document(self)
    }

    /// Loads and decodes the script at `path`.
    pub fn load<S: ByteStore + ?Sized>(store: &S, path: &Path) -> Result<Self, Error> {
        let bytes = store.load_bytes(path)?;
        Ok(Self::decode(&bytes)?)
    }

    /// Encodes the document and stores it at `path`.
    ///
    /// Nothing is written if encoding fails.
    pub fn save<S: ByteStore + ?Sized>(&self, store: &mut S, path: &Path) -> Result<(), Error> {
        let bytes = self.encode()?;
        store.save_bytes(path, &bytes)?;
        Ok(())
    }

    /// Iterates every editable text: block titles and lines, then table strings.
    pub fn texts(&self) -> impl Iterator<Item = &TextLine> {
        self.blocks
            .iter()
            .flat_map(ContentBlock::strings)
            .chain(self.strings.iter())
    }

    /// Mutable variant of [`Document::texts`].
    pub fn texts_mut(&mut self) -> impl Iterator<Item = &mut TextLine> {
        self.blocks
            .iter_mut()
            .flat_map(ContentBlock::strings_mut)
            .chain(self.strings.iter_mut())
    }

    /// Returns the number of editable texts.
    pub fn text_count(&self) -> usize {
        self.blocks.iter().map(|b| 1 + b.lines.len()).sum::<usize>() + self.strings.len()
    }

    /// Returns the display view of every editable text, in [`Document::texts`] order.
    pub fn export_texts(&self) -> Vec<String> {
        self.texts().map(TextLine::display).collect()
    }

    /// Stores edited display texts, in [`Document::texts`] order.
    ///
    /// The document is left untouched if the count does not match.
    pub fn import_texts<S: AsRef<str>>(&mut self, shown: &[S]) -> Result<(), ImportError> {
        let expected = self.text_count();
        if shown.len() != expected {
            return Err(ImportError::CountMismatch {
                expected,
                found: shown.len(),
            });
        }
        for (line, text) in self.texts_mut().zip(shown) {
            line.set_display(text.as_ref());
        }
        Ok(())
    }
}
