//! Parser and data model for the *conf* configuration language.
//!
//! A conf document is a list of `name = value;` statements. Values are
//! quoted strings, integers in binary, octal, decimal or hexadecimal,
//! floats (including `inf` and `nan`), arrays, and nested `{ ... }` maps.
//! Comments come in three styles: `#` (configurable), `//`, and `/* */`.
//! Two directives act on the document itself: `@version "1.0"` and
//! `@include "other.conf"`.
//!
//! # Parsing Pipeline
//!
//! 1. **Source**: The text is split into lines and walked with a [`Cursor`]
//!    that knows its line and column and saturates at either end.
//!
//! 2. **Lexer**: Comments, whitespace gaps, strings and number literals are
//!    recognized at the cursor. Every gap records whether it crossed a
//!    comment or a newline so that split tokens can be reported.
//!
//! 3. **Parser**: Recursive descent builds the [`Node`] tree, applies
//!    directives, and checks names for duplicates per scope.
//!
//! The first error aborts the parse. Every error carries the file, line and
//! column it was detected at.
//!
//! Serializing a parsed tree with [`Map::serialize`] yields a document that
//! parses back to an equal tree.

mod encode;
mod error;
mod lexer;
mod numeral;
mod options;
mod parser;
mod source;
mod value;

use std::path::Path;

pub use encode::{encode, Style};
pub use error::{
    ArrayError, Category, CommentError, DirectiveError, FloatError, IntegerError, KeyValueError,
    Location, MapError, MiscError, ParseError, Result, SemanticError, SemanticErrorKind,
    StringError, SyntaxError, SyntaxErrorKind,
};
pub use numeral::{NumeralSystem, BINARY, DECIMAL, HEXADECIMAL, OCTAL};
pub use options::{ParseOptions, Version, VersionPolicy, SUPPORTED_VERSION};
pub use parser::Parser;
pub use source::{Cursor, Position, SourceFile};
pub use value::{is_valid_name, Integer, Map, MapInsertError, Node};

/// Parse a conf document from a string.
///
/// # Example
///
/// ```
/// use libconf::parse;
///
/// let root = parse("port = 0x1F90;").unwrap();
/// assert_eq!(root.get("port").unwrap().as_integer(), Some(8080));
/// ```
pub fn parse(input: &str) -> Result<Map> {
    parse_with_filename(input, None)
}

/// Parse a conf document from a string with a filename for error messages.
pub fn parse_with_filename(input: &str, filename: Option<&str>) -> Result<Map> {
    Parser::default().parse_str(input, filename)
}

/// Parse a conf file with default options.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Map> {
    Parser::default().parse_file(path)
}
