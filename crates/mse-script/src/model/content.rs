//! Dialogue content blocks.

use crate::model::TextLine;

/// One unit of dialogue: a title line and zero or more text lines.
#[derive(Debug, Clone, Default, Eq)]
pub struct ContentBlock {
    /// First string of the block.
    pub title: TextLine,
    /// Remaining strings of the block.
    pub lines: Vec<TextLine>,
    /// Position of the title string in the source buffer (informational).
    pub offset: u32,
}

impl ContentBlock {
    /// Creates a block from a title and its lines.
    pub fn new(title: impl Into<TextLine>, lines: Vec<TextLine>) -> Self {
        Self {
            title: title.into(),
            lines,
            offset: 0,
        }
    }

    /// Iterates the title followed by the lines, in wire order.
    pub fn strings(&self) -> impl Iterator<Item = &TextLine> {
        std::iter::once(&self.title).chain(self.lines.iter())
    }

    /// Mutable variant of [`ContentBlock::strings`].
    pub fn strings_mut(&mut self) -> impl Iterator<Item = &mut TextLine> {
        std::iter::once(&mut self.title).chain(self.lines.iter_mut())
    }
}

/// Compares title and lines; the source offset is ignored.
impl PartialEq for ContentBlock {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title && self.lines == other.lines
    }
}

/// Where the end-of-scenario string sits in the content section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScenarioEnd {
    /// Written after the last line of the final block.
    #[default]
    AfterLastLine,
    /// Written as the title of a block of its own.
    OwnBlock,
}
