//! Error types for conf parsing.
//!
//! Every failure carries the file label, line and column it was detected at.
//! Messages come from the per-category kind enums below and never contain
//! location text; `Display` on the outer types prefixes `path:line:column: `.

use std::fmt;
use std::io;

use thiserror::Error;

/// Result type for conf parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Where an error was detected. Lines and columns are 1-based, columns are
/// counted in characters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(path: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            path: path.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path, self.line, self.column)
    }
}

/// Error type for conf parsing.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Lexical or structural violation.
    #[error("{0}")]
    Syntax(#[from] SyntaxError),

    /// Meaning-level violation in an otherwise well-formed document.
    #[error("{0}")]
    Semantic(#[from] SemanticError),

    /// A source file could not be read. `included_at` is the `@include`
    /// that named it, if any.
    #[error("{}", io_message(.path, .included_at.as_ref(), .source))]
    Io {
        path: String,
        included_at: Option<Location>,
        #[source]
        source: io::Error,
    },
}

fn io_message(path: &str, included_at: Option<&Location>, source: &io::Error) -> String {
    match included_at {
        Some(location) => format!("{}: cannot include {}: {}", location, path, source),
        None => format!("{}: {}", path, source),
    }
}

impl ParseError {
    /// Create a syntax error at a location.
    pub fn syntax(kind: impl Into<SyntaxErrorKind>, location: Location) -> Self {
        ParseError::Syntax(SyntaxError {
            kind: kind.into(),
            location,
        })
    }

    /// Create a semantic error at a location.
    pub fn semantic(kind: SemanticErrorKind, location: Location) -> Self {
        ParseError::Semantic(SemanticError { kind, location })
    }

    pub fn io(path: impl Into<String>, source: io::Error) -> Self {
        ParseError::Io {
            path: path.into(),
            included_at: None,
            source,
        }
    }

    /// Attach the `@include` site to an I/O failure that has none yet.
    pub fn included_at(self, location: Location) -> Self {
        match self {
            ParseError::Io {
                path,
                included_at: None,
                source,
            } => ParseError::Io {
                path,
                included_at: Some(location),
                source,
            },
            other => other,
        }
    }

    /// Location of the error. I/O failures have one only when an
    /// `@include` named the unreadable file.
    pub fn location(&self) -> Option<&Location> {
        match self {
            ParseError::Syntax(e) => Some(&e.location),
            ParseError::Semantic(e) => Some(&e.location),
            ParseError::Io { included_at, .. } => included_at.as_ref(),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            ParseError::Io {
                path,
                included_at: None,
                ..
            } => path,
            _ => self.location().map_or("", |loc| loc.path.as_str()),
        }
    }

    pub fn line(&self) -> Option<usize> {
        self.location().map(|loc| loc.line)
    }

    pub fn column(&self) -> Option<usize> {
        self.location().map(|loc| loc.column)
    }

    /// The location-free message.
    pub fn message(&self) -> String {
        match self {
            ParseError::Syntax(e) => e.kind.to_string(),
            ParseError::Semantic(e) => e.kind.to_string(),
            ParseError::Io { source, .. } => source.to_string(),
        }
    }

    /// Syntax category, if this is a syntax error.
    pub fn category(&self) -> Option<Category> {
        match self {
            ParseError::Syntax(e) => Some(e.kind.category()),
            _ => None,
        }
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, ParseError::Syntax(_))
    }

    pub fn is_semantic(&self) -> bool {
        matches!(self, ParseError::Semantic(_))
    }
}

// ============================================================================
// Syntax Errors
// ============================================================================

/// A lexical or structural violation.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("{location}: {kind}")]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub location: Location,
}

/// Syntax error categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Comment,
    KeyValue,
    String,
    Integer,
    Float,
    Array,
    Map,
    Directive,
    Misc,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Comment => "comment",
            Category::KeyValue => "key-value",
            Category::String => "string",
            Category::Integer => "integer",
            Category::Float => "float",
            Category::Array => "array",
            Category::Map => "map",
            Category::Directive => "directive",
            Category::Misc => "misc",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A syntax error condition, grouped by category.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    #[error(transparent)]
    Comment(#[from] CommentError),
    #[error(transparent)]
    KeyValue(#[from] KeyValueError),
    #[error(transparent)]
    String(#[from] StringError),
    #[error(transparent)]
    Integer(#[from] IntegerError),
    #[error(transparent)]
    Float(#[from] FloatError),
    #[error(transparent)]
    Array(#[from] ArrayError),
    #[error(transparent)]
    Map(#[from] MapError),
    #[error(transparent)]
    Directive(#[from] DirectiveError),
    #[error(transparent)]
    Misc(#[from] MiscError),
}

impl SyntaxErrorKind {
    pub fn category(&self) -> Category {
        match self {
            SyntaxErrorKind::Comment(_) => Category::Comment,
            SyntaxErrorKind::KeyValue(_) => Category::KeyValue,
            SyntaxErrorKind::String(_) => Category::String,
            SyntaxErrorKind::Integer(_) => Category::Integer,
            SyntaxErrorKind::Float(_) => Category::Float,
            SyntaxErrorKind::Array(_) => Category::Array,
            SyntaxErrorKind::Map(_) => Category::Map,
            SyntaxErrorKind::Directive(_) => Category::Directive,
            SyntaxErrorKind::Misc(_) => Category::Misc,
        }
    }
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum CommentError {
    /// Block comment without its closing marker.
    #[error("block comment is never closed")]
    UnterminatedBlock,
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum KeyValueError {
    /// Assignment with nothing before it.
    #[error("name is empty")]
    EmptyName,

    /// Character outside `[A-Za-z0-9_-]` where a name was expected.
    #[error("invalid character {0:?} in name")]
    InvalidNameCharacter(char),

    #[error("name is split by a comment")]
    NameSplitByComment,

    #[error("name is split by a newline")]
    NameSplitByNewline,

    #[error("name is split by whitespace")]
    NameSplitByWhitespace,

    #[error("expected '=' after name")]
    MissingAssignment,

    /// Nothing usable where a value was expected.
    #[error("value is missing")]
    ValueMissing,

    #[error("expected ';' after value")]
    MissingTerminator,
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum StringError {
    #[error("string is never closed")]
    Unterminated,

    /// The closing quote exists, but on a later line.
    #[error("string is split by a newline")]
    SplitByNewline,
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum IntegerError {
    #[error("invalid character {0:?} in integer")]
    InvalidCharacter(char),

    #[error("digit separator must sit between two digits")]
    MisplacedSeparator,

    #[error("integer is split by a comment")]
    SplitByComment,

    #[error("integer is split by a newline")]
    SplitByNewline,

    #[error("integer does not fit in 64 bits")]
    TooLarge,

    #[error("sign must be the first character of an integer")]
    MisplacedSign,

    #[error("radix prefix must directly follow the leading zero")]
    MisplacedPrefix,

    #[error("unknown radix prefix {0:?}")]
    UnknownPrefix(char),

    #[error("integer has no digits")]
    MissingDigits,

    #[error("extraneous characters after integer")]
    ExtraneousCharacters,
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum FloatError {
    #[error("invalid character {0:?} in float")]
    InvalidCharacter(char),

    #[error("digit separator must sit between two digits")]
    MisplacedSeparator,

    #[error("float is split by a comment")]
    SplitByComment,

    #[error("float is split by a newline")]
    SplitByNewline,

    #[error("float has more than one decimal point")]
    MultipleDecimalPoints,

    #[error("float has more than one exponent")]
    MultipleExponents,

    #[error("decimal point inside exponent")]
    DecimalPointInExponent,

    #[error("sign must start the float or its exponent")]
    MisplacedSign,

    /// A `.` without a digit on both sides.
    #[error("decimal point needs a digit on both sides")]
    BareDecimalPoint,

    #[error("exponent has no digits")]
    MissingExponentDigits,

    #[error("float has no digits")]
    MissingDigits,

    #[error("float is out of range")]
    OutOfRange,

    #[error("extraneous characters after float")]
    ExtraneousCharacters,
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ArrayError {
    #[error("array is never closed")]
    MissingClosingBracket,

    #[error("trailing comma in array")]
    TrailingComma,

    #[error("expected ',' or ']' after array element")]
    MissingSeparator,
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum MapError {
    #[error("map is never closed")]
    MissingClosingBrace,

    #[error("closing brace without matching opening brace")]
    UnbalancedClosingBrace,
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum DirectiveError {
    #[error("directive is not alone on its line")]
    NotAloneOnLine,

    #[error("directive is not in the root map")]
    NotInRoot,

    #[error("directive name is missing")]
    MissingName,

    #[error("unknown directive {0:?}")]
    Unknown(String),

    #[error("directive argument is missing")]
    MissingArgument,

    #[error("directive argument is empty")]
    EmptyArgument,

    #[error("directive argument must be quoted")]
    UnquotedArgument,

    #[error("directive has excess arguments")]
    ExcessArguments,

    #[error("malformed version {0:?}")]
    MalformedVersion(String),
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum MiscError {
    #[error("unknown escape sequence \"\\{0}\"")]
    UnknownEscape(char),

    #[error("escape \"\\x\" needs two hex digits")]
    IncompleteHexEscape,

    #[error("escape \"\\x{0}\" is outside ASCII")]
    NonAsciiHexEscape(String),
}

// ============================================================================
// Semantic Errors
// ============================================================================

/// A meaning-level violation.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("{location}: {kind}")]
pub struct SemanticError {
    pub kind: SemanticErrorKind,
    pub location: Location,
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum SemanticErrorKind {
    #[error("incompatible version {found}, supported version is {supported}")]
    IncompatibleVersion { found: String, supported: String },

    #[error("duplicate name {0:?} in scope")]
    DuplicateName(String),

    #[error("include cycle through {0:?}")]
    IncludeCycle(String),
}
