//! Editable text shared by content blocks and the string table.

use std::fmt;
use std::sync::Arc;

use crate::escape::{escape, unescape, EscapeTable, STANDARD_TABLE};

/// Receives a notification whenever a [`TextLine`] is changed.
///
/// Editors attach one to keep views in sync. The codec itself never needs it.
pub trait TextObserver: Send + Sync {
    /// Called after the stored text changed from `previous` to `current`.
    fn text_changed(&self, previous: &str, current: &str);
}

/// An inline parameter marker inside a line of text.
///
/// Not produced by decoding; callers may attach markers while editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argument {
    /// Character position in the text.
    pub position: usize,
    /// Marker value.
    pub value: i32,
}

/// One line of dialogue (or one table string).
///
/// Holds the exact decoded text. [`TextLine::display`] is the escaped view
/// editors show; [`TextLine::set_display`] stores an edited display string.
#[derive(Clone, Default)]
pub struct TextLine {
    text: String,
    /// Inline parameter markers.
    pub arguments: Vec<Argument>,
    /// Byte offset of the string in the source buffer (informational).
    pub offset: u32,
    observer: Option<Arc<dyn TextObserver>>,
}

/// A string addressed through the indexed string table.
pub type TableString = TextLine;

impl TextLine {
    /// Creates a line from stored text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Creates a line from stored text found at `offset`.
    pub fn at(offset: u32, text: impl Into<String>) -> Self {
        Self {
            offset,
            ..Self::new(text)
        }
    }

    /// Returns the stored text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the stored text and notifies the observer.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let previous = std::mem::replace(&mut self.text, text.into());
        if let Some(observer) = &self.observer {
            observer.text_changed(&previous, &self.text);
        }
    }

    /// Returns the escaped view of the text.
    pub fn display(&self) -> String {
        self.display_with(&STANDARD_TABLE)
    }

    /// Returns the view of the text escaped with `table`.
    pub fn display_with(&self, table: &EscapeTable) -> String {
        escape(&self.text, table)
    }

    /// Stores an edited escaped view.
    pub fn set_display(&mut self, shown: &str) {
        self.set_display_with(shown, &STANDARD_TABLE);
    }

    /// Stores an edited view escaped with `table`.
    pub fn set_display_with(&mut self, shown: &str, table: &EscapeTable) {
        self.set_text(unescape(shown, table));
    }

    /// Attaches a change observer, replacing any previous one.
    pub fn observe(&mut self, observer: Arc<dyn TextObserver>) {
        self.observer = Some(observer);
    }

    /// Detaches the change observer.
    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    /// Returns true if an observer is attached.
    pub fn is_observed(&self) -> bool {
        self.observer.is_some()
    }
}

impl From<&str> for TextLine {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for TextLine {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// Compares text and arguments; offsets and observers are ignored.
impl PartialEq for TextLine {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text && self.arguments == other.arguments
    }
}

impl Eq for TextLine {}

impl fmt::Debug for TextLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextLine")
            .field("text", &self.text)
            .field("arguments", &self.arguments)
            .field("offset", &self.offset)
            .field("observed", &self.observer.is_some())
            .finish()
    }
}
