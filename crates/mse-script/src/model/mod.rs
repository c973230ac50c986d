//! Data model types for decoded scripts.
//!
//! - Title table entries
//! - Content blocks and their text lines
//! - Raw payload and indexed table strings
//! - The owning document

pub mod content;
pub mod document;
pub mod text;
pub mod title;

pub use content::{ContentBlock, ScenarioEnd};
pub use document::{Document, RawPayload};
pub use text::{Argument, TableString, TextLine, TextObserver};
pub use title::TitleEntry;
