//! Reversible escaping of control characters for editing.
//!
//! Dialogue strings embed control characters (line feeds, engine codes in
//! `\u{1}`..`\u{6}`) that editors cannot show. [`escape`] turns them into
//! printable tokens and [`unescape`] turns the tokens back.
//!
//! The backslash itself is not escaped, so a text that already contains a
//! token such as `\n` as two literal characters does not survive
//! `unescape(escape(x))`.

use lazy_static::lazy_static;
use rustc_hash::FxHashMap;

use crate::limits::{EMPTY_LINE, EMPTY_LINE_TOKEN, EMPTY_TOKEN};

/// Control characters and their tokens, in replacement order.
pub const STANDARD_ESCAPES: &[(char, &str)] = &[
    ('\t', "\\t"),
    ('\r', "\\r"),
    ('\u{7}', "\\a"),
    ('\u{8}', "\\b"),
    ('\n', "\\n"),
    ('\0', "\\0"),
    ('\u{1}', "\\1"),
    ('\u{2}', "\\2"),
    ('\u{3}', "\\3"),
    ('\u{4}', "\\4"),
    ('\u{5}', "\\5"),
    ('\u{6}', "\\6"),
];

lazy_static! {
    /// The engine's escape table.
    pub static ref STANDARD_TABLE: EscapeTable = EscapeTable::new(STANDARD_ESCAPES);
}

/// An immutable character-to-token mapping.
#[derive(Debug, Clone)]
pub struct EscapeTable {
    entries: &'static [(char, &'static str)],
    by_char: FxHashMap<char, &'static str>,
}

impl EscapeTable {
    /// Builds a table; `entries` order is the order [`unescape`] applies tokens.
    pub fn new(entries: &'static [(char, &'static str)]) -> Self {
        let by_char = entries.iter().copied().collect();
        Self { entries, by_char }
    }

    /// Returns the table entries in replacement order.
    pub fn entries(&self) -> &'static [(char, &'static str)] {
        self.entries
    }

    /// Returns the token for a character, if it is escaped.
    pub fn token(&self, c: char) -> Option<&'static str> {
        self.by_char.get(&c).copied()
    }
}

/// Converts stored text to its display form.
pub fn escape(text: &str, table: &EscapeTable) -> String {
    if text.is_empty() {
        return EMPTY_TOKEN.to_string();
    }
    if is_empty_line(text) {
        return EMPTY_LINE_TOKEN.to_string();
    }
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match table.token(c) {
            Some(token) => out.push_str(token),
            None => out.push(c),
        }
    }
    out
}

/// Converts display text back to its stored form.
pub fn unescape(text: &str, table: &EscapeTable) -> String {
    if text == EMPTY_TOKEN {
        return String::new();
    }
    if text == EMPTY_LINE_TOKEN {
        return EMPTY_LINE.to_string();
    }
    let mut out = text.to_string();
    for (c, token) in table.entries() {
        if out.contains(token) {
            out = out.replace(token, c.encode_utf8(&mut [0u8; 4]));
        }
    }
    out
}

fn is_empty_line(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next() == Some(EMPTY_LINE) && chars.next().is_none()
}
