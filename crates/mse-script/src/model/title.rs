//! Title table entries.

/// A labeled parameter block from the header of the script.
///
/// Each entry names an engine-side command and carries its raw 32-bit
/// parameters.
#[derive(Debug, Clone, Default, Eq)]
pub struct TitleEntry {
    /// Position of the first parameter in the source buffer (informational).
    pub byte_offset: u32,
    /// Entry label.
    pub label: String,
    /// Parameters in wire order.
    pub parameters: Vec<i32>,
}

impl TitleEntry {
    /// Creates an entry with the given label and parameters.
    pub fn new(label: impl Into<String>, parameters: Vec<i32>) -> Self {
        Self {
            byte_offset: 0,
            label: label.into(),
            parameters,
        }
    }
}

/// Compares label and parameters; the source offset is ignored.
impl PartialEq for TitleEntry {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label && self.parameters == other.parameters
    }
}
