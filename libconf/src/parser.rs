//! Parser engine.
//!
//! Recursive descent over a [`Cursor`]. The document root is a sequence of
//! `name = value;` statements and directives; values are strings, numbers,
//! arrays and nested maps. Parsing is fail-fast: the first error aborts the
//! whole parse and no partial tree is returned.
//!
//! Token boundaries are strict. A name or number literal that continues after
//! a comment or a newline is reported as split rather than read as two
//! tokens, and strings never span lines.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{
    ArrayError, DirectiveError, FloatError, IntegerError, KeyValueError, MapError, ParseError,
    Result, SemanticErrorKind, SyntaxErrorKind,
};
use crate::lexer::{
    comment_at, scan_string, skip_comment, skip_gap, Gap, INLINE_WHITESPACE, WHITESPACE,
};
use crate::numeral::{
    continues_literal, is_float_literal, is_literal_char, is_special_float, scan_float,
    scan_integer,
};
use crate::options::{ParseOptions, Version};
use crate::source::{Cursor, Position, SourceFile, ANONYMOUS};
use crate::value::{is_name_char, Map, MapInsertError, Node};

const DIRECTIVE_LEADER: char = '@';

/// A configured conf parser.
#[derive(Clone, Debug, Default)]
pub struct Parser {
    options: ParseOptions,
}

impl Parser {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse document text. `filename` labels diagnostics; relative includes
    /// resolve against [`ParseOptions::base_dir`].
    pub fn parse_str(&self, text: &str, filename: Option<&str>) -> Result<Map> {
        let source = SourceFile::new(filename.unwrap_or(ANONYMOUS), text);
        let ctx = ParseContext::new(&self.options, self.options.base_dir.clone());
        parse_document(&source, &ctx)
    }

    /// Parse a file. Relative includes resolve against its directory.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Map> {
        let path = path.as_ref();
        let canonical = canonicalize(path)?;
        let source = SourceFile::open(path)?;
        let base_dir = canonical.parent().map(Path::to_path_buf);
        let mut ctx = ParseContext::new(&self.options, base_dir);
        ctx.includes.push(canonical);
        parse_document(&source, &ctx)
    }
}

/// State shared by every scope of one parse.
pub(crate) struct ParseContext<'o> {
    options: &'o ParseOptions,
    /// Directory relative include paths resolve against.
    base_dir: Option<PathBuf>,
    /// Canonical paths of the files being parsed, outermost first.
    includes: Vec<PathBuf>,
}

impl<'o> ParseContext<'o> {
    fn new(options: &'o ParseOptions, base_dir: Option<PathBuf>) -> Self {
        Self {
            options,
            base_dir,
            includes: Vec::new(),
        }
    }

    fn comment_char(&self) -> char {
        self.options.comment_char
    }

    /// Context for parsing the included file at `canonical`.
    fn enter(&self, canonical: PathBuf) -> Self {
        let mut includes = self.includes.clone();
        let base_dir = canonical.parent().map(Path::to_path_buf);
        includes.push(canonical);
        Self {
            options: self.options,
            base_dir,
            includes,
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        match &self.base_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }
}

fn canonicalize(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).map_err(|e| ParseError::io(path.display().to_string(), e))
}

// ============================================================================
// Document
// ============================================================================

/// Parse one source file into a root map.
fn parse_document(source: &SourceFile, ctx: &ParseContext<'_>) -> Result<Map> {
    debug!(
        target: "libconf::parser",
        path = source.path(),
        lines = source.line_count(),
        "Parsing document"
    );
    let mut cursor = Cursor::new(source);
    let mut root = Map::root();

    loop {
        skip_gap(&mut cursor, ctx.comment_char())?;
        match cursor.peek() {
            None => break,
            Some(DIRECTIVE_LEADER) => parse_directive(&mut cursor, ctx, &mut root)?,
            Some('}') => {
                return Err(ParseError::syntax(
                    MapError::UnbalancedClosingBrace,
                    cursor.location(),
                ))
            }
            Some(_) => parse_statement(&mut cursor, ctx, &mut root)?,
        }
    }

    Ok(root)
}

// ============================================================================
// Statements
// ============================================================================

/// Parse `name = value;` into `map`.
fn parse_statement(cursor: &mut Cursor<'_>, ctx: &ParseContext<'_>, map: &mut Map) -> Result<()> {
    let name_at = *cursor;
    let name = scan_name(cursor, ctx)?;
    cursor.advance_chars(1);

    skip_gap(cursor, ctx.comment_char())?;
    let value = parse_value(cursor, ctx)?;

    skip_gap(cursor, ctx.comment_char())?;
    if !cursor.at_char(';') {
        return Err(ParseError::syntax(
            KeyValueError::MissingTerminator,
            cursor.location(),
        ));
    }
    cursor.advance_chars(1);

    trace!(target: "libconf::parser", name = %name, kind = value.kind(), "Parsed entry");
    insert_entry(map, name, value, &name_at)
}

/// Scan a name and the gap after it. Leaves the cursor on the `=`.
fn scan_name(cursor: &mut Cursor<'_>, ctx: &ParseContext<'_>) -> Result<String> {
    let start = *cursor;
    while cursor.peek().map_or(false, is_name_char) {
        cursor.advance_chars(1);
    }
    let name = start.text_until(cursor).to_string();

    if name.is_empty() {
        let kind = match cursor.peek() {
            Some(c) if c != '=' => KeyValueError::InvalidNameCharacter(c),
            _ => KeyValueError::EmptyName,
        };
        return Err(ParseError::syntax(kind, cursor.location()));
    }

    let end = *cursor;
    let gap = skip_gap(cursor, ctx.comment_char())?;
    match cursor.peek() {
        Some('=') => Ok(name),
        Some(c) if is_name_char(c) && !gap.is_empty() => {
            let kind = if gap.comment {
                KeyValueError::NameSplitByComment
            } else if gap.newline {
                KeyValueError::NameSplitByNewline
            } else {
                KeyValueError::NameSplitByWhitespace
            };
            Err(ParseError::syntax(kind, end.location()))
        }
        Some(c) if gap.is_empty() => Err(ParseError::syntax(
            KeyValueError::InvalidNameCharacter(c),
            cursor.location(),
        )),
        _ => Err(ParseError::syntax(
            KeyValueError::MissingAssignment,
            cursor.location(),
        )),
    }
}

/// Insert into a scope, turning refusals into located errors.
fn insert_entry(map: &mut Map, name: String, value: Node, at: &Cursor<'_>) -> Result<()> {
    match map.try_insert(name, value) {
        Ok(()) => Ok(()),
        Err(MapInsertError::Duplicate(name)) => Err(ParseError::semantic(
            SemanticErrorKind::DuplicateName(name),
            at.location(),
        )),
        Err(MapInsertError::InvalidName(name)) => {
            let kind = match name.chars().find(|&c| !is_name_char(c)) {
                Some(c) => KeyValueError::InvalidNameCharacter(c),
                None => KeyValueError::EmptyName,
            };
            Err(ParseError::syntax(kind, at.location()))
        }
    }
}

// ============================================================================
// Values
// ============================================================================

/// Parse one value, dispatching on its first character.
fn parse_value(cursor: &mut Cursor<'_>, ctx: &ParseContext<'_>) -> Result<Node> {
    match cursor.peek() {
        Some('"') => Ok(Node::String(scan_string(cursor)?)),
        Some('[') => parse_array(cursor, ctx),
        Some('{') => parse_map(cursor, ctx),
        Some(DIRECTIVE_LEADER) => Err(ParseError::syntax(
            DirectiveError::NotInRoot,
            cursor.location(),
        )),
        Some(c) if c.is_ascii_digit() || c == '+' || c == '-' => parse_number(cursor, ctx),
        Some('i' | 'n') if is_special_float(literal_at(cursor)) => parse_number(cursor, ctx),
        _ => Err(ParseError::syntax(
            KeyValueError::ValueMissing,
            cursor.location(),
        )),
    }
}

/// Parse `[a, b, ...]`. Trailing commas are refused.
fn parse_array(cursor: &mut Cursor<'_>, ctx: &ParseContext<'_>) -> Result<Node> {
    let open = *cursor;
    cursor.advance_chars(1);
    let mut items = Vec::new();

    skip_gap(cursor, ctx.comment_char())?;
    if cursor.at_char(']') {
        cursor.advance_chars(1);
        return Ok(Node::Array(items));
    }

    loop {
        if cursor.is_after_end() {
            return Err(ParseError::syntax(
                ArrayError::MissingClosingBracket,
                open.location(),
            ));
        }
        items.push(parse_value(cursor, ctx)?);

        skip_gap(cursor, ctx.comment_char())?;
        match cursor.peek() {
            Some(',') => {
                let comma = *cursor;
                cursor.advance_chars(1);
                skip_gap(cursor, ctx.comment_char())?;
                if cursor.at_char(']') {
                    return Err(ParseError::syntax(
                        ArrayError::TrailingComma,
                        comma.location(),
                    ));
                }
            }
            Some(']') => {
                cursor.advance_chars(1);
                return Ok(Node::Array(items));
            }
            Some(_) => {
                return Err(ParseError::syntax(
                    ArrayError::MissingSeparator,
                    cursor.location(),
                ))
            }
            None => {
                return Err(ParseError::syntax(
                    ArrayError::MissingClosingBracket,
                    open.location(),
                ))
            }
        }
    }
}

/// Parse a nested `{ name = value; ... }` scope.
fn parse_map(cursor: &mut Cursor<'_>, ctx: &ParseContext<'_>) -> Result<Node> {
    let open = *cursor;
    cursor.advance_chars(1);
    let mut map = Map::new();

    loop {
        skip_gap(cursor, ctx.comment_char())?;
        match cursor.peek() {
            Some('}') => {
                cursor.advance_chars(1);
                return Ok(Node::Map(map));
            }
            Some(DIRECTIVE_LEADER) => {
                return Err(ParseError::syntax(
                    DirectiveError::NotInRoot,
                    cursor.location(),
                ))
            }
            Some(_) => parse_statement(cursor, ctx, &mut map)?,
            None => {
                return Err(ParseError::syntax(
                    MapError::MissingClosingBrace,
                    open.location(),
                ))
            }
        }
    }
}

// ============================================================================
// Numbers
// ============================================================================

/// The number literal starting at the cursor.
fn literal_at<'a>(cursor: &Cursor<'a>) -> &'a str {
    match cursor.rest_of_line() {
        Some(rest) => {
            let end = rest.find(|c| !is_literal_char(c)).unwrap_or(rest.len());
            &rest[..end]
        }
        None => "",
    }
}

/// Parse an integer or float literal.
fn parse_number(cursor: &mut Cursor<'_>, ctx: &ParseContext<'_>) -> Result<Node> {
    let start = *cursor;
    let text = literal_at(cursor);
    cursor.advance_chars(text.chars().count());
    let float = is_float_literal(text);

    check_literal_end(cursor, ctx, float)?;

    let locate = |offset: usize| {
        let mut at = start;
        at.advance_chars(offset);
        at.location()
    };
    if float {
        scan_float(text)
            .map(Node::Float)
            .map_err(|(kind, offset)| ParseError::syntax(kind, locate(offset)))
    } else {
        scan_integer(text)
            .map(Node::Integer)
            .map_err(|(kind, offset)| ParseError::syntax(kind, locate(offset)))
    }
}

/// A literal must be followed by a separator or terminator. Digits resuming
/// after a gap mean the literal was split.
fn check_literal_end(cursor: &Cursor<'_>, ctx: &ParseContext<'_>, float: bool) -> Result<()> {
    let mut probe = *cursor;
    let gap = skip_gap(&mut probe, ctx.comment_char())?;
    match probe.peek() {
        Some(c) if !gap.is_empty() && continues_literal(c) => {
            let at = if gap.comment || gap.newline {
                cursor
            } else {
                &probe
            };
            Err(ParseError::syntax(literal_end_error(float, &gap), at.location()))
        }
        Some(c) if gap.is_empty() && !matches!(c, ';' | ',' | ']' | '}') => Err(
            ParseError::syntax(literal_end_error(float, &gap), cursor.location()),
        ),
        _ => Ok(()),
    }
}

fn literal_end_error(float: bool, gap: &Gap) -> SyntaxErrorKind {
    match (float, gap.comment, gap.newline) {
        (false, true, _) => IntegerError::SplitByComment.into(),
        (false, false, true) => IntegerError::SplitByNewline.into(),
        (false, false, false) => IntegerError::ExtraneousCharacters.into(),
        (true, true, _) => FloatError::SplitByComment.into(),
        (true, false, true) => FloatError::SplitByNewline.into(),
        (true, false, false) => FloatError::ExtraneousCharacters.into(),
    }
}

// ============================================================================
// Directives
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Directive {
    Version,
    Include,
}

/// One whitespace-separated directive argument.
struct Argument<'a> {
    at: Cursor<'a>,
    quoted: bool,
    text: String,
}

/// Parse a directive line and apply it to the root map.
fn parse_directive(cursor: &mut Cursor<'_>, ctx: &ParseContext<'_>, root: &mut Map) -> Result<()> {
    let leader = *cursor;
    if !alone_before(cursor) {
        return Err(ParseError::syntax(
            DirectiveError::NotAloneOnLine,
            leader.location(),
        ));
    }
    cursor.advance_chars(1);

    let name_at = *cursor;
    while cursor.peek().map_or(false, |c| c.is_ascii_alphabetic()) {
        cursor.advance_chars(1);
    }
    let directive = match name_at.text_until(cursor) {
        "" => {
            return Err(ParseError::syntax(
                DirectiveError::MissingName,
                name_at.location(),
            ))
        }
        "version" => Directive::Version,
        "include" => Directive::Include,
        other => {
            return Err(ParseError::syntax(
                DirectiveError::Unknown(other.to_string()),
                name_at.location(),
            ))
        }
    };

    let name_end = *cursor;
    let args = scan_arguments(cursor, ctx)?;
    debug!(target: "libconf::parser", directive = ?directive, args = args.len(), "Directive");
    let arg = single_argument(&args, &name_end)?;

    match directive {
        Directive::Version => apply_version(arg, &leader, ctx),
        Directive::Include => apply_include(arg, &leader, ctx, root),
    }
}

/// True if only spaces and tabs precede the cursor on its line.
fn alone_before(cursor: &Cursor<'_>) -> bool {
    let mut back = *cursor;
    back.retreat_chars(1);
    back.skip_backward(INLINE_WHITESPACE);
    back.is_before_start() || back.at_char('\n')
}

/// Collect arguments up to the end of the directive's line. A trailing
/// comment ends the argument list.
fn scan_arguments<'a>(
    cursor: &mut Cursor<'a>,
    ctx: &ParseContext<'_>,
) -> Result<Vec<Argument<'a>>> {
    let mut args = Vec::new();
    loop {
        cursor.skip_forward(INLINE_WHITESPACE);
        match cursor.peek() {
            None => break,
            Some('\n') => {
                cursor.advance_chars(1);
                break;
            }
            Some('"') => {
                let at = *cursor;
                let text = scan_string(cursor)?;
                args.push(Argument {
                    at,
                    quoted: true,
                    text,
                });
            }
            Some(_) if comment_at(cursor, ctx.comment_char()).is_some() => {
                let line = line_of(cursor.position());
                skip_comment(cursor, ctx.comment_char())?;
                if line_of(cursor.position()) != line {
                    break;
                }
            }
            Some(_) => {
                let at = *cursor;
                while cursor.peek().map_or(false, |c| !WHITESPACE.contains(c)) {
                    cursor.advance_chars(1);
                }
                args.push(Argument {
                    at,
                    quoted: false,
                    text: at.text_until(cursor).to_string(),
                });
            }
        }
    }
    Ok(args)
}

fn line_of(position: Position) -> Option<usize> {
    match position {
        Position::At { line, .. } => Some(line),
        _ => None,
    }
}

/// The one quoted, non-empty argument a directive takes. Unquoted text after
/// it means the directive shares its line with other tokens.
fn single_argument<'b, 'a>(
    args: &'b [Argument<'a>],
    end: &Cursor<'_>,
) -> Result<&'b Argument<'a>> {
    let arg = match args {
        [] => {
            return Err(ParseError::syntax(
                DirectiveError::MissingArgument,
                end.location(),
            ))
        }
        [arg] => arg,
        [first, extra, ..] => {
            let kind = if first.quoted && !extra.quoted {
                DirectiveError::NotAloneOnLine
            } else {
                DirectiveError::ExcessArguments
            };
            return Err(ParseError::syntax(kind, extra.at.location()));
        }
    };
    if !arg.quoted {
        return Err(ParseError::syntax(
            DirectiveError::UnquotedArgument,
            arg.at.location(),
        ));
    }
    if arg.text.is_empty() {
        return Err(ParseError::syntax(
            DirectiveError::EmptyArgument,
            arg.at.location(),
        ));
    }
    Ok(arg)
}

/// `@version "<major[.minor]>"`
fn apply_version(arg: &Argument<'_>, leader: &Cursor<'_>, ctx: &ParseContext<'_>) -> Result<()> {
    let requested = Version::parse(&arg.text).ok_or_else(|| {
        ParseError::syntax(
            DirectiveError::MalformedVersion(arg.text.clone()),
            arg.at.location(),
        )
    })?;
    let supported = ctx.options.supported_version;
    if !ctx.options.version_policy.accepts(requested, supported) {
        return Err(ParseError::semantic(
            SemanticErrorKind::IncompatibleVersion {
                found: arg.text.clone(),
                supported: supported.to_string(),
            },
            leader.location(),
        ));
    }
    debug!(target: "libconf::parser", %requested, %supported, "Version accepted");
    Ok(())
}

/// `@include "<path>"`: parse the file on its own and merge its entries into
/// the root map.
fn apply_include(
    arg: &Argument<'_>,
    leader: &Cursor<'_>,
    ctx: &ParseContext<'_>,
    root: &mut Map,
) -> Result<()> {
    let path = ctx.resolve(&arg.text);
    let canonical = canonicalize(&path).map_err(|e| e.included_at(leader.location()))?;
    if ctx.includes.contains(&canonical) {
        return Err(ParseError::semantic(
            SemanticErrorKind::IncludeCycle(arg.text.clone()),
            leader.location(),
        ));
    }

    let source = SourceFile::open(&path).map_err(|e| e.included_at(leader.location()))?;
    let child = ctx.enter(canonical);
    let included = parse_document(&source, &child)?;

    debug!(
        target: "libconf::parser",
        path = %path.display(),
        entries = included.len(),
        "Merging include"
    );
    for (name, value) in included {
        insert_entry(root, name, value, leader)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Category, Location};
    use crate::numeral::{BINARY, HEXADECIMAL};
    use crate::options::VersionPolicy;
    use crate::value::Integer;

    fn parse(text: &str) -> Result<Map> {
        Parser::default().parse_str(text, Some("t.conf"))
    }

    fn error(text: &str) -> (Category, String, usize, usize) {
        let err = parse(text).unwrap_err();
        let category = err.category().expect("syntax error");
        (
            category,
            err.message(),
            err.line().unwrap(),
            err.column().unwrap(),
        )
    }

    fn semantic(text: &str) -> String {
        let err = parse(text).unwrap_err();
        assert!(err.is_semantic(), "expected semantic error, got {}", err);
        err.to_string()
    }

    #[test]
    fn test_scalars() {
        let root = parse("s = \"hi\"; i = 0x1A; f = 2.5; n = -7;").unwrap();
        assert_eq!(root.get("s"), Some(&Node::from("hi")));
        assert_eq!(root.get("i"), Some(&Node::Integer(Integer::new(26, &HEXADECIMAL))));
        assert_eq!(root.get("f"), Some(&Node::from(2.5)));
        assert_eq!(root.get("n"), Some(&Node::from(-7)));
        assert!(root.is_root());
    }

    #[test]
    fn test_special_floats() {
        let root = parse("a = inf; b = -inf; c = nan; d = +inf;").unwrap();
        assert_eq!(root.get("a").unwrap().as_float(), Some(f64::INFINITY));
        assert_eq!(root.get("b").unwrap().as_float(), Some(f64::NEG_INFINITY));
        assert!(root.get("c").unwrap().as_float().unwrap().is_nan());
        assert_eq!(root.get("d").unwrap().as_float(), Some(f64::INFINITY));
    }

    #[test]
    fn test_arrays_and_maps() {
        let text = "list = [1, \"two\", [0b11], { k = 1.5; }];\n\
                    server = {\n  host = \"h\";\n  inner = {};\n};\n";
        let root = parse(text).unwrap();
        let list = root.get("list").unwrap().as_array().unwrap();
        assert_eq!(list.len(), 4);
        assert_eq!(list[2], Node::Array(vec![Node::Integer(Integer::new(3, &BINARY))]));
        assert_eq!(list[3].get("k"), Some(&Node::from(1.5)));
        let server = root.get("server").unwrap();
        assert_eq!(server.get("host"), Some(&Node::from("h")));
        assert!(server.get("inner").unwrap().as_map().unwrap().is_empty());
        assert!(!server.as_map().unwrap().is_root());
    }

    #[test]
    fn test_comments_between_tokens() {
        let text = "# head\na /* x */ = // y\n  1 /* z */ ;\nb = [1, # c\n 2];";
        let root = parse(text).unwrap();
        assert_eq!(root.get("a"), Some(&Node::from(1)));
        assert_eq!(root.get("b").unwrap().as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_name_errors() {
        assert_eq!(error("= 1;"), (Category::KeyValue, "name is empty".into(), 1, 1));
        assert_eq!(
            error("a$b = 1;"),
            (Category::KeyValue, "invalid character '$' in name".into(), 1, 2)
        );
        assert_eq!(
            error("ab /* c */ cd = 1;"),
            (Category::KeyValue, "name is split by a comment".into(), 1, 3)
        );
        assert_eq!(
            error("ab\ncd = 1;"),
            (Category::KeyValue, "name is split by a newline".into(), 1, 3)
        );
        assert_eq!(
            error("ab cd = 1;"),
            (Category::KeyValue, "name is split by whitespace".into(), 1, 3)
        );
        assert_eq!(
            error("a : 1;"),
            (Category::KeyValue, "expected '=' after name".into(), 1, 3)
        );
    }

    #[test]
    fn test_statement_errors() {
        assert_eq!(error("a = ;"), (Category::KeyValue, "value is missing".into(), 1, 5));
        assert_eq!(error("a = true;"), (Category::KeyValue, "value is missing".into(), 1, 5));
        assert_eq!(
            error("a = 1\nb = 2;"),
            (Category::KeyValue, "expected ';' after value".into(), 2, 1)
        );
        assert_eq!(
            error("a = \"x\""),
            (Category::KeyValue, "expected ';' after value".into(), 1, 8)
        );
    }

    #[test]
    fn test_integer_boundaries() {
        assert_eq!(
            error("a = 1 /* c */ 0;"),
            (Category::Integer, "integer is split by a comment".into(), 1, 6)
        );
        assert_eq!(
            error("a = 12\n34;"),
            (Category::Integer, "integer is split by a newline".into(), 1, 7)
        );
        assert_eq!(
            error("a = 1 0;"),
            (Category::Integer, "extraneous characters after integer".into(), 1, 7)
        );
        assert_eq!(
            error("a = 12$;"),
            (Category::Integer, "extraneous characters after integer".into(), 1, 7)
        );
        assert_eq!(
            error("a = 1.5 // c\n 5;"),
            (Category::Float, "float is split by a comment".into(), 1, 8)
        );
    }

    #[test]
    fn test_integer_errors_are_located() {
        assert_eq!(
            error("a = 0b102;"),
            (Category::Integer, "invalid character '2' in integer".into(), 1, 9)
        );
        assert_eq!(
            error("a = 1__2;"),
            (Category::Integer, "digit separator must sit between two digits".into(), 1, 6)
        );
        assert_eq!(
            error("a = 99999999999999999999;"),
            (Category::Integer, "integer does not fit in 64 bits".into(), 1, 5)
        );
    }

    #[test]
    fn test_string_errors() {
        assert_eq!(
            error("a = \"abc\ndef\";"),
            (Category::String, "string is split by a newline".into(), 1, 9)
        );
        assert_eq!(
            error("a = \"abc;"),
            (Category::String, "string is never closed".into(), 1, 5)
        );
    }

    #[test]
    fn test_array_errors() {
        assert_eq!(
            error("a = [1, 2,];"),
            (Category::Array, "trailing comma in array".into(), 1, 10)
        );
        assert_eq!(
            error("a = [1 ; 2];"),
            (Category::Array, "expected ',' or ']' after array element".into(), 1, 8)
        );
        assert_eq!(
            error("a = [1, 2"),
            (Category::Array, "array is never closed".into(), 1, 5)
        );
        assert_eq!(
            error("a = [1, , 2];"),
            (Category::KeyValue, "value is missing".into(), 1, 9)
        );
    }

    #[test]
    fn test_map_errors() {
        assert_eq!(
            error("a = { b = 1;\n"),
            (Category::Map, "map is never closed".into(), 1, 5)
        );
        assert_eq!(
            error("a = 1;\n}"),
            (Category::Map, "closing brace without matching opening brace".into(), 2, 1)
        );
    }

    #[test]
    fn test_unterminated_block_comment() {
        assert_eq!(
            error("a = 1; /* never"),
            (Category::Comment, "block comment is never closed".into(), 1, 8)
        );
    }

    #[test]
    fn test_duplicate_names() {
        assert_eq!(semantic("a=1;a=2;"), "t.conf:1:5: duplicate name \"a\" in scope");
        assert_eq!(
            semantic("m = { x = 1;\n  x = 2; };"),
            "t.conf:2:3: duplicate name \"x\" in scope"
        );
        assert!(parse("x = 1; m = { x = 2; };").is_ok());
    }

    #[test]
    fn test_directive_placement() {
        assert_eq!(
            error("x = [ @include \"a.conf\" ];"),
            (Category::Directive, "directive is not in the root map".into(), 1, 7)
        );
        assert_eq!(
            error("m = {\n@version \"1\"\n};"),
            (Category::Directive, "directive is not in the root map".into(), 2, 1)
        );
        assert_eq!(
            error("a=1; @version \"1\";"),
            (Category::Directive, "directive is not alone on its line".into(), 1, 6)
        );
    }

    #[test]
    fn test_version_directive() {
        assert!(parse("@version \"1\"\na = 1;").is_ok());
        assert!(parse("  @version \"1.0\" # trailing\n").is_ok());
        assert_eq!(
            semantic("@version \"2\"\n"),
            "t.conf:1:1: incompatible version 2, supported version is 1.0"
        );

        let lenient = Parser::new(ParseOptions::new().with_version_policy(VersionPolicy::Any));
        assert!(lenient.parse_str("@version \"7.3\"\n", None).is_ok());
    }

    #[test]
    fn test_directive_argument_errors() {
        assert_eq!(
            error("@version\n"),
            (Category::Directive, "directive argument is missing".into(), 1, 9)
        );
        assert_eq!(
            error("@version \"\"\n"),
            (Category::Directive, "directive argument is empty".into(), 1, 10)
        );
        assert_eq!(
            error("@version 1\n"),
            (Category::Directive, "directive argument must be quoted".into(), 1, 10)
        );
        assert_eq!(
            error("@version \"1\" \"2\"\n"),
            (Category::Directive, "directive has excess arguments".into(), 1, 14)
        );
        assert_eq!(
            error("@version \"1.0\" a = 1;\n"),
            (Category::Directive, "directive is not alone on its line".into(), 1, 16)
        );
        assert_eq!(
            error("@version \"1.0\";\n"),
            (Category::Directive, "directive is not alone on its line".into(), 1, 15)
        );
        assert_eq!(
            error("@version \"one\"\n"),
            (Category::Directive, "malformed version \"one\"".into(), 1, 10)
        );
        assert_eq!(
            error("@frobnicate \"x\"\n"),
            (Category::Directive, "unknown directive \"frobnicate\"".into(), 1, 2)
        );
        assert_eq!(
            error("@ \"x\"\n"),
            (Category::Directive, "directive name is missing".into(), 1, 2)
        );
    }

    #[test]
    fn test_missing_include_is_io_error_at_directive() {
        let err = parse("a = 1;\n  @include \"definitely/not/here.conf\"\n").unwrap_err();
        assert!(matches!(err, ParseError::Io { .. }));
        assert_eq!(err.location(), Some(&Location::new("t.conf", 2, 3)));
        assert!(err
            .to_string()
            .starts_with("t.conf:2:3: cannot include definitely/not/here.conf: "));
    }

    #[test]
    fn test_custom_comment_char() {
        let parser = Parser::new(ParseOptions::new().with_comment_char('%'));
        let root = parser.parse_str("% note\na = 1; // also\n", None).unwrap();
        assert_eq!(root.get("a"), Some(&Node::from(1)));
        assert!(parser.parse_str("# not a comment\n", None).is_err());
    }

    #[test]
    fn test_anonymous_label() {
        let err = Parser::default().parse_str("a = ;", None).unwrap_err();
        assert_eq!(err.to_string(), "<input>:1:5: value is missing");
    }
}
