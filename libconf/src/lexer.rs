//! Lexical primitives over a [`Cursor`].
//!
//! Comments, whitespace gaps, and quoted strings with escape decoding. Number
//! literals live in [`crate::numeral`].

use crate::error::{CommentError, MiscError, ParseError, Result, StringError};
use crate::source::{Cursor, Position};

/// Characters skipped between tokens.
pub(crate) const WHITESPACE: &str = " \t\r\n";

/// Whitespace that does not end a line.
pub(crate) const INLINE_WHITESPACE: &str = " \t\r";

pub(crate) const QUOTE: char = '"';
pub(crate) const ESCAPE: char = '\\';

/// Single-character escapes: the letter after the backslash and the
/// character it stands for.
pub(crate) static ESCAPES: &[(char, char)] = &[
    ('"', '"'),
    ('\\', '\\'),
    ('/', '/'),
    ('b', '\u{8}'),
    ('f', '\u{c}'),
    ('n', '\n'),
    ('r', '\r'),
    ('t', '\t'),
];

// ============================================================================
// Comments
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CommentKind {
    /// `#` (configurable) or `//` up to the end of the line.
    Line,
    /// `/* ... */`, possibly spanning lines.
    Block,
}

/// The comment starting at the cursor, if any.
pub(crate) fn comment_at(cursor: &Cursor<'_>, comment_char: char) -> Option<CommentKind> {
    if cursor.at_char(comment_char) || cursor.at("//") {
        Some(CommentKind::Line)
    } else if cursor.at("/*") {
        Some(CommentKind::Block)
    } else {
        None
    }
}

/// Skip the comment at the cursor. Line comments leave the cursor at the
/// start of the next line, block comments just past `*/`.
pub(crate) fn skip_comment(
    cursor: &mut Cursor<'_>,
    comment_char: char,
) -> Result<Option<CommentKind>> {
    let kind = match comment_at(cursor, comment_char) {
        Some(kind) => kind,
        None => return Ok(None),
    };
    match kind {
        CommentKind::Line => cursor.advance_lines(1),
        CommentKind::Block => {
            let open = cursor.location();
            cursor.advance_chars(2);
            if !cursor.seek_to_first("*/") {
                return Err(ParseError::syntax(CommentError::UnterminatedBlock, open));
            }
            cursor.advance_chars(2);
        }
    }
    Ok(Some(kind))
}

// ============================================================================
// Gaps
// ============================================================================

/// What lay between two tokens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Gap {
    pub whitespace: bool,
    pub newline: bool,
    pub comment: bool,
}

impl Gap {
    pub fn is_empty(&self) -> bool {
        !(self.whitespace || self.newline || self.comment)
    }
}

/// Skip whitespace and comments, recording what was crossed.
pub(crate) fn skip_gap(cursor: &mut Cursor<'_>, comment_char: char) -> Result<Gap> {
    let mut gap = Gap::default();
    loop {
        match cursor.peek() {
            Some('\n') => {
                gap.newline = true;
                cursor.advance_chars(1);
            }
            Some(c) if WHITESPACE.contains(c) => {
                gap.whitespace = true;
                cursor.advance_chars(1);
            }
            Some(_) => {
                let before = cursor.position();
                if skip_comment(cursor, comment_char)?.is_none() {
                    break;
                }
                gap.comment = true;
                gap.newline |= match (before, cursor.position()) {
                    (Position::At { line: a, .. }, Position::At { line: b, .. }) => b > a,
                    (_, Position::AfterEnd) => true,
                    _ => false,
                };
            }
            None => break,
        }
    }
    Ok(gap)
}

// ============================================================================
// Strings
// ============================================================================

/// Scan the quoted string at the cursor and decode its escapes. The cursor
/// ends just past the closing quote.
pub(crate) fn scan_string(cursor: &mut Cursor<'_>) -> Result<String> {
    let open = *cursor;
    cursor.advance_chars(1);
    let content = *cursor;

    loop {
        match cursor.peek() {
            Some('\n') | None => return Err(unclosed_string(&open, cursor)),
            Some(QUOTE) if cursor.at_unescaped("\"", ESCAPE) => break,
            Some(_) => cursor.advance_chars(1),
        }
    }

    let raw = content.text_until(cursor);
    cursor.advance_chars(1);
    decode_escapes(raw, &content)
}

/// Classify a string whose line ended before its closing quote.
fn unclosed_string(open: &Cursor<'_>, line_end: &Cursor<'_>) -> ParseError {
    let mut probe = *line_end;
    while probe.seek_to_first("\"") {
        if probe.at_unescaped("\"", ESCAPE) {
            return ParseError::syntax(StringError::SplitByNewline, line_end.location());
        }
        probe.advance_chars(1);
    }
    ParseError::syntax(StringError::Unterminated, open.location())
}

/// Decode escape sequences in the raw text of a string. `start` is the
/// cursor of the first raw character, used to locate bad escapes.
pub(crate) fn decode_escapes(raw: &str, start: &Cursor<'_>) -> Result<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().enumerate().peekable();

    while let Some((index, c)) = chars.next() {
        if c != ESCAPE {
            out.push(c);
            continue;
        }
        let at = || {
            let mut here = *start;
            here.advance_chars(index);
            here.location()
        };
        let letter = match chars.next() {
            Some((_, letter)) => letter,
            None => return Err(ParseError::syntax(MiscError::UnknownEscape(ESCAPE), at())),
        };
        if let Some(&(_, decoded)) = ESCAPES.iter().find(|(l, _)| *l == letter) {
            out.push(decoded);
            continue;
        }
        if letter != 'x' {
            return Err(ParseError::syntax(MiscError::UnknownEscape(letter), at()));
        }

        let mut hex = String::with_capacity(2);
        while hex.len() < 2 {
            match chars.peek() {
                Some(&(_, h)) if h.is_ascii_hexdigit() => {
                    hex.push(h);
                    chars.next();
                }
                _ => return Err(ParseError::syntax(MiscError::IncompleteHexEscape, at())),
            }
        }
        let code = u8::from_str_radix(&hex, 16)
            .map_err(|_| ParseError::syntax(MiscError::IncompleteHexEscape, at()))?;
        if code > 0x7f {
            return Err(ParseError::syntax(MiscError::NonAsciiHexEscape(hex), at()));
        }
        out.push(char::from(code));
    }

    Ok(out)
}
