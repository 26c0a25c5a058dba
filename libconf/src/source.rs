//! Source files and the cursor that walks them.
//!
//! A [`SourceFile`] is the immutable, line-split text of one document. A
//! [`Cursor`] borrows a source file and holds a [`Position`] within it; every
//! scanning operation in the lexer and parser is expressed as cursor movement
//! and queries.
//!
//! Positions have two sentinels, [`Position::BeforeStart`] and
//! [`Position::AfterEnd`]. Movement saturates at a sentinel instead of
//! failing, and read accessors return `None` there.

use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{Location, ParseError, Result};

/// Label used for documents parsed from text without a filename.
pub const ANONYMOUS: &str = "<input>";

/// The immutable text of one document, split into lines.
#[derive(Clone, Debug)]
pub struct SourceFile {
    path: String,
    lines: Vec<String>,
}

impl SourceFile {
    /// Split `text` into lines. Every line ends with `\n`; `\r\n` becomes `\n`
    /// and a missing final newline is supplied.
    pub fn new(path: impl Into<String>, text: &str) -> Self {
        let normalized;
        let text = if text.contains("\r\n") {
            normalized = text.replace("\r\n", "\n");
            normalized.as_str()
        } else {
            text
        };

        let mut lines: Vec<String> = text.split_inclusive('\n').map(String::from).collect();
        if let Some(last) = lines.last_mut() {
            if !last.ends_with('\n') {
                last.push('\n');
            }
        }

        Self {
            path: path.into(),
            lines,
        }
    }

    /// Read a file from disk. The path doubles as the diagnostic label.
    pub fn open(path: &Path) -> Result<Self> {
        let label = path.display().to_string();
        debug!(target: "libconf::source", path = %label, "Reading source file");
        let text = fs::read_to_string(path).map_err(|e| ParseError::io(label.clone(), e))?;
        Ok(Self::new(label, &text))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Position of the first character, or `AfterEnd` for an empty file.
    pub fn start(&self) -> Position {
        if self.lines.is_empty() {
            Position::AfterEnd
        } else {
            Position::At { line: 0, column: 0 }
        }
    }

    /// Position of the last character (the final newline).
    fn last(&self) -> Position {
        match self.lines.last() {
            Some(text) => Position::At {
                line: self.lines.len() - 1,
                column: prev_boundary(text, text.len()),
            },
            None => Position::BeforeStart,
        }
    }
}

/// A coordinate within one source file.
///
/// `line` is zero-based; `column` is a zero-based byte offset that always
/// sits on a character boundary of an existing character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Position {
    BeforeStart,
    At { line: usize, column: usize },
    AfterEnd,
}

/// A movable position bound to one [`SourceFile`].
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    source: &'a SourceFile,
    position: Position,
}

impl<'a> Cursor<'a> {
    /// A cursor on the first character of `source`.
    pub fn new(source: &'a SourceFile) -> Self {
        Self {
            source,
            position: source.start(),
        }
    }

    pub fn source(&self) -> &'a SourceFile {
        self.source
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_before_start(&self) -> bool {
        self.position == Position::BeforeStart
    }

    pub fn is_after_end(&self) -> bool {
        self.position == Position::AfterEnd
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    /// The whole line the cursor is on.
    pub fn line_text(&self) -> Option<&'a str> {
        match self.position {
            Position::At { line, .. } => Some(self.source.lines[line].as_str()),
            _ => None,
        }
    }

    /// Text from the cursor to the end of its line, newline included.
    pub fn rest_of_line(&self) -> Option<&'a str> {
        match self.position {
            Position::At { line, column } => Some(&self.source.lines[line][column..]),
            _ => None,
        }
    }

    /// The character under the cursor.
    pub fn peek(&self) -> Option<char> {
        self.rest_of_line().and_then(|rest| rest.chars().next())
    }

    /// True if the cursor sits at the start of `needle`.
    pub fn at(&self, needle: &str) -> bool {
        self.rest_of_line()
            .map_or(false, |rest| rest.starts_with(needle))
    }

    pub fn at_char(&self, c: char) -> bool {
        self.peek() == Some(c)
    }

    /// True if the cursor sits at `needle` and the run of `escape`
    /// characters directly before it has even length.
    pub fn at_unescaped(&self, needle: &str, escape: char) -> bool {
        if !self.at(needle) {
            return false;
        }
        let (line, column) = match self.position {
            Position::At { line, column } => (line, column),
            _ => return false,
        };
        let before = &self.source.lines[line][..column];
        let run = before.chars().rev().take_while(|&c| c == escape).count();
        run % 2 == 0
    }

    /// Diagnostic location. `BeforeStart` maps to the start of the file and
    /// `AfterEnd` to the final newline.
    pub fn location(&self) -> Location {
        let position = match self.position {
            Position::AfterEnd => self.source.last(),
            other => other,
        };
        match position {
            Position::At { line, column } => {
                let text = &self.source.lines[line];
                Location::new(
                    self.source.path.clone(),
                    line + 1,
                    text[..column].chars().count() + 1,
                )
            }
            _ => Location::new(self.source.path.clone(), 1, 1),
        }
    }

    /// Text between this cursor and a later cursor on the same line.
    pub fn text_until(&self, end: &Cursor<'a>) -> &'a str {
        match (self.position, end.position) {
            (Position::At { line, column }, Position::At { line: l2, column: c2 })
                if line == l2 && c2 >= column =>
            {
                &self.source.lines[line][column..c2]
            }
            (Position::At { line, column }, _) => {
                let text = &self.source.lines[line][column..];
                text.strip_suffix('\n').unwrap_or(text)
            }
            _ => "",
        }
    }

    // ------------------------------------------------------------------------
    // Movement
    // ------------------------------------------------------------------------

    /// Step forward `n` characters, crossing lines and saturating at
    /// `AfterEnd`.
    pub fn advance_chars(&mut self, n: usize) {
        for _ in 0..n {
            self.position = match self.position {
                Position::BeforeStart => self.source.start(),
                Position::At { line, column } => {
                    let text = &self.source.lines[line];
                    let next = next_boundary(text, column);
                    if next < text.len() {
                        Position::At { line, column: next }
                    } else {
                        self.line_start(line + 1)
                    }
                }
                Position::AfterEnd => return,
            };
        }
    }

    /// Step back `n` characters, crossing lines and saturating at
    /// `BeforeStart`.
    pub fn retreat_chars(&mut self, n: usize) {
        for _ in 0..n {
            self.position = match self.position {
                Position::BeforeStart => return,
                Position::At { line, column } if column > 0 => Position::At {
                    line,
                    column: prev_boundary(&self.source.lines[line], column),
                },
                Position::At { line, .. } if line > 0 => {
                    let text = &self.source.lines[line - 1];
                    Position::At {
                        line: line - 1,
                        column: prev_boundary(text, text.len()),
                    }
                }
                Position::At { .. } => Position::BeforeStart,
                Position::AfterEnd => self.source.last(),
            };
        }
    }

    /// Move to column 0 of the `n`th following line.
    pub fn advance_lines(&mut self, n: usize) {
        if n == 0 {
            return;
        }
        self.position = match self.position {
            Position::BeforeStart => self.line_start(n - 1),
            Position::At { line, .. } => self.line_start(line + n),
            Position::AfterEnd => Position::AfterEnd,
        };
    }

    /// Move to column 0 of the `n`th preceding line.
    pub fn retreat_lines(&mut self, n: usize) {
        if n == 0 {
            return;
        }
        let current = match self.position {
            Position::BeforeStart => return,
            Position::At { line, .. } => line,
            Position::AfterEnd => self.source.lines.len(),
        };
        self.position = match current.checked_sub(n) {
            Some(line) => Position::At { line, column: 0 },
            None => Position::BeforeStart,
        };
    }

    /// Move to the first occurrence of `needle` at or after the cursor.
    /// On failure the cursor rests at `AfterEnd`.
    pub fn seek_to_first(&mut self, needle: &str) -> bool {
        if self.position == Position::BeforeStart {
            self.position = self.source.start();
        }
        while let Position::At { line, column } = self.position {
            if let Some(offset) = self.source.lines[line][column..].find(needle) {
                self.position = Position::At {
                    line,
                    column: column + offset,
                };
                return true;
            }
            self.position = self.line_start(line + 1);
        }
        false
    }

    /// Move to the last occurrence of `needle` starting at or before the
    /// cursor. On failure the cursor rests at `BeforeStart`.
    pub fn seek_to_last(&mut self, needle: &str) -> bool {
        let (mut line, mut limit) = match self.position {
            Position::BeforeStart => return false,
            Position::At { line, column } => (line, Some(column)),
            Position::AfterEnd => match self.source.lines.len() {
                0 => {
                    self.position = Position::BeforeStart;
                    return false;
                }
                len => (len - 1, None),
            },
        };
        loop {
            let text = &self.source.lines[line];
            let end = limit.map_or(text.len(), |max| (max + 1).min(text.len()));
            let found = (0..end)
                .rev()
                .filter(|&start| text.is_char_boundary(start))
                .find(|&start| text[start..].starts_with(needle));
            if let Some(column) = found {
                self.position = Position::At { line, column };
                return true;
            }
            if line == 0 {
                self.position = Position::BeforeStart;
                return false;
            }
            line -= 1;
            limit = None;
        }
    }

    /// Skip forward over characters in `charset`. Returns how many were
    /// skipped.
    pub fn skip_forward(&mut self, charset: &str) -> usize {
        let mut skipped = 0;
        while let Some(c) = self.peek() {
            if !charset.contains(c) {
                break;
            }
            self.advance_chars(1);
            skipped += 1;
        }
        skipped
    }

    /// Skip backward over characters in `charset`, stopping on the first
    /// character outside it (or at `BeforeStart`).
    pub fn skip_backward(&mut self, charset: &str) -> usize {
        let mut skipped = 0;
        while let Some(c) = self.peek() {
            if !charset.contains(c) {
                break;
            }
            self.retreat_chars(1);
            skipped += 1;
        }
        skipped
    }

    fn line_start(&self, line: usize) -> Position {
        if line < self.source.lines.len() {
            Position::At { line, column: 0 }
        } else {
            Position::AfterEnd
        }
    }
}

impl PartialEq for Cursor<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.source, other.source) && self.position == other.position
    }
}

/// Cursors over different source files are unordered.
impl PartialOrd for Cursor<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if std::ptr::eq(self.source, other.source) {
            Some(self.position.cmp(&other.position))
        } else {
            None
        }
    }
}

fn next_boundary(text: &str, column: usize) -> usize {
    text[column..]
        .chars()
        .next()
        .map_or(text.len(), |c| column + c.len_utf8())
}

fn prev_boundary(text: &str, column: usize) -> usize {
    text[..column]
        .chars()
        .next_back()
        .map_or(0, |c| column - c.len_utf8())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(text: &str) -> SourceFile {
        SourceFile::new("test.conf", text)
    }

    #[test]
    fn test_lines_end_with_newline() {
        let src = source("a = 1;\r\nb = 2;");
        assert_eq!(src.lines(), &["a = 1;\n".to_string(), "b = 2;\n".to_string()]);
        assert!(source("").is_empty());
    }

    #[test]
    fn test_advance_crosses_lines() {
        let src = source("ab\ncd\n");
        let mut cursor = Cursor::new(&src);
        cursor.advance_chars(2);
        assert_eq!(cursor.peek(), Some('\n'));
        cursor.advance_chars(1);
        assert_eq!(cursor.position(), Position::At { line: 1, column: 0 });
        assert_eq!(cursor.peek(), Some('c'));
        cursor.advance_chars(10);
        assert!(cursor.is_after_end());
        assert_eq!(cursor.peek(), None);
    }

    #[test]
    fn test_retreat_saturates() {
        let src = source("ab\ncd");
        let mut cursor = Cursor::new(&src);
        cursor.advance_lines(1);
        cursor.retreat_chars(1);
        assert_eq!(cursor.peek(), Some('\n'));
        cursor.retreat_chars(5);
        assert!(cursor.is_before_start());
        cursor.advance_chars(1);
        assert_eq!(cursor.peek(), Some('a'));
    }

    #[test]
    fn test_from_after_end() {
        let src = source("ab");
        let mut cursor = Cursor::new(&src);
        cursor.advance_lines(1);
        assert!(cursor.is_after_end());
        cursor.retreat_chars(1);
        assert_eq!(cursor.peek(), Some('\n'));
        cursor.advance_lines(3);
        cursor.retreat_lines(1);
        assert_eq!(cursor.position(), Position::At { line: 0, column: 0 });
        cursor.retreat_lines(1);
        assert!(cursor.is_before_start());
    }

    #[test]
    fn test_multibyte_steps() {
        let src = source("é=\"ü\"");
        let mut cursor = Cursor::new(&src);
        cursor.advance_chars(1);
        assert_eq!(cursor.peek(), Some('='));
        assert_eq!(cursor.location().column, 2);
        cursor.advance_chars(2);
        assert_eq!(cursor.peek(), Some('ü'));
        cursor.retreat_chars(2);
        assert_eq!(cursor.peek(), Some('='));
    }

    #[test]
    fn test_seek_to_first() {
        let src = source("a /* x\ny */ b");
        let mut cursor = Cursor::new(&src);
        assert!(cursor.seek_to_first("*/"));
        assert_eq!(cursor.position(), Position::At { line: 1, column: 2 });
        cursor.advance_chars(1);
        assert!(!cursor.seek_to_first("*/"));
        assert!(cursor.is_after_end());
    }

    #[test]
    fn test_seek_to_last() {
        let src = source("x = 1;\ny = 2; z = 3;");
        let mut cursor = Cursor::new(&src);
        cursor.advance_lines(1);
        cursor.advance_chars(5);
        assert!(cursor.seek_to_last(";"));
        assert_eq!(cursor.position(), Position::At { line: 1, column: 5 });
        cursor.retreat_chars(1);
        assert!(cursor.seek_to_last(";"));
        assert_eq!(cursor.position(), Position::At { line: 0, column: 5 });
        cursor.retreat_chars(1);
        assert!(!cursor.seek_to_last(";"));
        assert!(cursor.is_before_start());
    }

    #[test]
    fn test_seek_to_last_overlapping_needle() {
        let src = source("aaa\naaaa");
        let mut cursor = Cursor::new(&src);
        cursor.advance_chars(1);
        assert!(cursor.seek_to_last("aa"));
        assert_eq!(cursor.position(), Position::At { line: 0, column: 1 });

        let mut cursor = Cursor::new(&src);
        cursor.advance_lines(2);
        assert!(cursor.is_after_end());
        assert!(cursor.seek_to_last("aa"));
        assert_eq!(cursor.position(), Position::At { line: 1, column: 2 });
    }

    #[test]
    fn test_skip_whitespace_both_ways() {
        let src = source("a   b");
        let mut cursor = Cursor::new(&src);
        cursor.advance_chars(1);
        assert_eq!(cursor.skip_forward(" \t"), 3);
        assert_eq!(cursor.peek(), Some('b'));
        cursor.retreat_chars(1);
        assert_eq!(cursor.skip_backward(" \t"), 3);
        assert_eq!(cursor.peek(), Some('a'));
    }

    #[test]
    fn test_at_unescaped() {
        let src = source(r#""a\"b\\""#);
        let mut cursor = Cursor::new(&src);
        cursor.advance_chars(3);
        assert!(cursor.at("\""));
        assert!(!cursor.at_unescaped("\"", '\\'));
        cursor.advance_chars(4);
        assert!(cursor.at_unescaped("\"", '\\'));
    }

    #[test]
    fn test_location_is_one_based() {
        let src = source("ab\ncd");
        let mut cursor = Cursor::new(&src);
        assert_eq!(cursor.location(), Location::new("test.conf", 1, 1));
        cursor.advance_chars(4);
        assert_eq!(cursor.location(), Location::new("test.conf", 2, 2));
        cursor.advance_lines(1);
        assert_eq!(cursor.location(), Location::new("test.conf", 2, 3));
    }

    #[test]
    fn test_cursor_ordering_requires_same_source() {
        let src = source("abc");
        let other = source("abc");
        let a = Cursor::new(&src);
        let mut b = a;
        b.advance_chars(1);
        assert!(a < b);
        assert_eq!(a.partial_cmp(&Cursor::new(&other)), None);
        assert!(a != Cursor::new(&other));
    }

    #[test]
    fn test_text_until() {
        let src = source("key = value;");
        let start = Cursor::new(&src);
        let mut end = start;
        end.advance_chars(3);
        assert_eq!(start.text_until(&end), "key");
    }
}
