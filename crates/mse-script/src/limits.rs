//! Wire constants and decode limits.

/// Key half of every title entry header (`u16 length, u16 key`).
pub const TITLE_KEY: u16 = 0x8000;

/// Top byte of a title header when read as a little-endian u32.
pub const TITLE_HEADER_TOP_BYTE: u8 = 0x80;

/// Code unit that opens every content block.
pub const BLOCK_MARKER: u16 = 0x25A0;

/// Last string of the content section.
pub const END_OF_SCENARIO: &str = "シナリオ終了\n";

/// Full-width space used by the engine for a blank dialogue line.
pub const EMPTY_LINE: char = '\u{3000}';

/// Display token for an empty string.
pub const EMPTY_TOKEN: &str = "[EMPTY]";

/// Display token for a line holding only [`EMPTY_LINE`].
pub const EMPTY_LINE_TOKEN: &str = "[EMPTY_LINE]";

/// Default maximum number of title entries.
pub const MAX_TITLE_ENTRIES: usize = 1 << 16;

/// Default maximum number of content blocks.
pub const MAX_CONTENT_BLOCKS: usize = 1 << 20;

/// Default maximum number of indexed table strings.
pub const MAX_TABLE_STRINGS: usize = 1 << 20;

/// Size in bytes of one `(offset, length)` pair in the string table index.
pub const TABLE_RANGE_SIZE: usize = 8;

/// Size in bytes of a UTF-16 terminator.
pub const UTF16_NUL_SIZE: usize = 2;
