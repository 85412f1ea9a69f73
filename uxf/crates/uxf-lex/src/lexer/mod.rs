//! Core lexer implementation.
//!
//! The entry point is [`tokenize`], which scans the header line, an
//! optional document comment, and then dispatches on the first character of
//! each token until the input is exhausted. Number, date, string, bytes,
//! and name lexing live in sibling modules.

mod name;
mod number;
mod string;

use std::path::Path;

use uxf_util::report::{emit, emit_fatal};
use uxf_util::{codes, text, Error, Reporter, Result, UXF_VERSION};

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

/// Everything the lexer learned about one input.
#[derive(Debug)]
pub struct LexOutput {
    /// The token stream, ending with [`TokenKind::Eof`].
    pub tokens: Vec<Token>,
    /// Free-form text after the version in the header line.
    pub custom: String,
}

/// Tokenizes `text`, reporting diagnostics against `filename`.
///
/// Fatal diagnostics abort lexing and return the error; non-fatal ones are
/// reported and lexing continues.
pub fn tokenize(
    source: &str,
    filename: &str,
    reporter: &mut dyn Reporter,
) -> Result<LexOutput> {
    let mut lexer = Lexer::new(source, filename, reporter);
    lexer.tokenize()
}

/// Lexer for UXF text.
pub struct Lexer<'a> {
    /// Character cursor for source traversal.
    cursor: Cursor<'a>,

    /// The filename as given, used to detect self-imports.
    filename: String,

    /// Base name used in diagnostics.
    short_filename: String,

    /// Error sink for reporting lexical errors.
    reporter: &'a mut dyn Reporter,

    /// Tokens lexed so far.
    tokens: Vec<Token>,

    /// Custom header text, if any.
    custom: String,

    /// Whether the lexer is inside a tclass definition body.
    in_tclass: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over `source`.
    pub fn new(source: &'a str, filename: &str, reporter: &'a mut dyn Reporter) -> Self {
        Self {
            cursor: Cursor::new(source),
            filename: filename.to_string(),
            short_filename: basename(filename),
            reporter,
            tokens: Vec::new(),
            custom: String::new(),
            in_tclass: false,
        }
    }

    /// Lexes the whole input.
    pub fn tokenize(mut self) -> Result<LexOutput> {
        self.scan_header()?;
        self.maybe_read_file_comment()?;
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.is_at_end() {
                break;
            }
            self.scan_next()?;
        }
        if self.in_tclass {
            self.add_token(TokenKind::TClassEnd);
        }
        self.add_token(TokenKind::Eof);
        Ok(LexOutput {
            tokens: self.tokens,
            custom: self.custom,
        })
    }

    /// Scans the mandatory `uxf <version>[ <custom>]` header line.
    fn scan_header(&mut self) -> Result<()> {
        let Some(line) = self.cursor.take_until("\n") else {
            return Err(self.fatal(codes::MISSING_HEADER, "missing UXF file header or empty file"));
        };
        let mut words = line.split_whitespace();
        let (Some(magic), Some(version)) = (words.next(), words.next()) else {
            return Err(self.fatal(codes::INVALID_HEADER, "invalid UXF file header"));
        };
        if magic != "uxf" {
            return Err(self.fatal(codes::NOT_UXF, "not a UXF file"));
        }
        match version.parse::<f64>() {
            Ok(version) if version > UXF_VERSION => self.error(
                codes::VERSION_TOO_NEW,
                format!("version ({version}) > current ({UXF_VERSION})"),
            ),
            Ok(_) => {}
            Err(_) => self.error(codes::BAD_VERSION, "failed to read UXF file version number"),
        }
        // version is a subslice of line, so offset arithmetic is exact
        let offset = version.as_ptr() as usize - line.as_ptr() as usize;
        self.custom = line[offset + version.len()..].trim().to_string();
        Ok(())
    }

    /// Reads the optional `#<…>` document comment directly after the
    /// header.
    fn maybe_read_file_comment(&mut self) -> Result<()> {
        self.cursor.skip_whitespace();
        if self.cursor.is_at_end() || self.cursor.current_char() != '#' {
            return Ok(());
        }
        self.cursor.advance();
        if self.cursor.current_char() != '<' {
            let got = self.cursor.current_char();
            self.error(
                codes::BAD_FILE_COMMENT,
                format!("invalid comment syntax: expected '<', got {got:?}"),
            );
            return Ok(());
        }
        self.cursor.advance();
        let lino = self.cursor.line();
        let Some(value) = self.cursor.take_until(">") else {
            return Err(self.fatal(codes::UNTERMINATED, "unterminated comment string"));
        };
        self.tokens
            .push(Token::new(TokenKind::Comment(text::unescape(value)), lino));
        Ok(())
    }

    /// Lexes one token, dispatching on the current character.
    fn scan_next(&mut self) -> Result<()> {
        match self.cursor.current_char() {
            '(' => {
                if self.cursor.char_at(1) == ':' {
                    self.cursor.advance();
                    self.cursor.advance();
                    self.read_bytes()?;
                } else {
                    self.cursor.advance();
                    self.check_in_tclass();
                    self.add_token(TokenKind::TableBegin);
                }
            }
            ')' => {
                self.cursor.advance();
                self.add_token(TokenKind::TableEnd);
            }
            '[' => {
                self.cursor.advance();
                self.check_in_tclass();
                self.add_token(TokenKind::ListBegin);
            }
            ']' => {
                self.cursor.advance();
                self.add_token(TokenKind::ListEnd);
            }
            '{' => {
                self.cursor.advance();
                self.check_in_tclass();
                self.add_token(TokenKind::MapBegin);
            }
            '}' => {
                self.cursor.advance();
                self.in_tclass = false;
                self.add_token(TokenKind::MapEnd);
            }
            '=' => {
                self.cursor.advance();
                // a '=' also closes a prior, possibly fieldless, tclass
                self.check_in_tclass();
                self.add_token(TokenKind::TClassBegin);
                self.in_tclass = true;
            }
            '?' => {
                self.cursor.advance();
                self.add_token(TokenKind::Null);
            }
            '!' => {
                self.cursor.advance();
                self.read_imports()?;
            }
            '#' => {
                self.cursor.advance();
                self.read_comment()?;
            }
            '<' => {
                self.cursor.advance();
                self.read_string()?;
            }
            ':' => {
                self.cursor.advance();
                self.read_field_vtype();
            }
            '-' if self.cursor.char_at(1).is_ascii_digit() => {
                self.read_negative_number();
            }
            c if c.is_ascii_digit() => {
                self.read_number_or_date();
            }
            c if c.is_alphabetic() || c == '_' => {
                self.read_name();
            }
            c => {
                self.error(
                    codes::INVALID_CHARACTER,
                    format!("invalid character encountered: {c:?}"),
                );
                self.cursor.advance();
            }
        }
        Ok(())
    }

    /// Emits the implicit TCLASS_END when a new construct interrupts a
    /// tclass definition body.
    fn check_in_tclass(&mut self) {
        if self.in_tclass {
            self.in_tclass = false;
            self.add_token(TokenKind::TClassEnd);
        }
    }

    /// Reads one or more `!target` import lines.
    fn read_imports(&mut self) -> Result<()> {
        let this_file = full_filename(&self.filename, None);
        let base = this_file.parent().map(Path::to_path_buf);
        loop {
            let lino = self.cursor.line();
            let value = match self.cursor.take_until("\n") {
                Some(value) => value.trim().to_string(),
                None => {
                    // last line of the file with no trailing newline
                    let start = self.cursor.position();
                    while !self.cursor.is_at_end() {
                        self.cursor.advance();
                    }
                    self.cursor.slice_from(start).trim().to_string()
                }
            };
            if this_file == full_filename(&value, base.as_deref()) {
                return Err(self.fatal(codes::CIRCULAR_IMPORT, "a UXF file cannot import itself"));
            }
            self.tokens.push(Token::new(TokenKind::Import(value), lino));
            if self.cursor.current_char() == '!' {
                self.cursor.advance();
            } else {
                break;
            }
        }
        Ok(())
    }

    /// Reads a `#<…>` comment; only valid directly after a collection
    /// opener or a tclass `=`.
    fn read_comment(&mut self) -> Result<()> {
        let after_opener = matches!(
            self.tokens.last().map(|t| &t.kind),
            Some(
                TokenKind::ListBegin
                    | TokenKind::MapBegin
                    | TokenKind::TableBegin
                    | TokenKind::TClassBegin
            )
        );
        if !after_opener {
            return Err(self.fatal(
                codes::MISPLACED_COMMENT,
                "comments may only occur at the start of lists, maps, tables, and tclasses",
            ));
        }
        if self.cursor.current_char() != '<' {
            let got = self.cursor.current_char();
            self.error(
                codes::COMMENT_EXPECTS_STRING,
                format!("a str must follow the # comment introducer, got {got:?}"),
            );
            return Ok(());
        }
        self.cursor.advance();
        let lino = self.cursor.line();
        let Some(value) = self.cursor.take_until(">") else {
            return Err(self.fatal(codes::UNTERMINATED, "unterminated comment string"));
        };
        if !value.is_empty() {
            self.tokens
                .push(Token::new(TokenKind::Comment(text::unescape(value)), lino));
        }
        Ok(())
    }

    /// Reads the identifier after `:` as a field vtype.
    fn read_field_vtype(&mut self) {
        self.cursor.skip_whitespace();
        let lino = self.cursor.line();
        match self.match_identifier() {
            Some(identifier) => self
                .tokens
                .push(Token::new(TokenKind::Type(identifier), lino)),
            None => self.error(codes::EXPECTED_IDENTIFIER, "expected field vtype"),
        }
    }

    /// Consumes an identifier run, bounded to the maximum identifier
    /// length. Returns `None` when no identifier characters are present.
    fn match_identifier(&mut self) -> Option<String> {
        let start = self.cursor.position();
        while !self.cursor.is_at_end() {
            let c = self.cursor.current_char();
            if c != '_' && !c.is_alphanumeric() {
                break;
            }
            self.cursor.advance();
        }
        let identifier = self.cursor.slice_from(start);
        if identifier.is_empty() {
            return None;
        }
        Some(
            identifier
                .chars()
                .take(uxf_util::MAX_IDENTIFIER_LEN)
                .collect(),
        )
    }

    pub(crate) fn add_token(&mut self, kind: TokenKind) {
        let lino = self.cursor.line();
        self.tokens.push(Token::new(kind, lino));
    }

    pub(crate) fn error(&mut self, code: u16, message: impl Into<String>) {
        emit(
            self.reporter,
            &self.short_filename,
            self.cursor.line(),
            code,
            message,
        );
    }

    pub(crate) fn fatal(&mut self, code: u16, message: impl Into<String>) -> Error {
        emit_fatal(
            self.reporter,
            &self.short_filename,
            self.cursor.line(),
            code,
            message,
        )
    }
}

/// The base name of `filename`, used in diagnostics.
fn basename(filename: &str) -> String {
    Path::new(filename)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(filename)
        .to_string()
}

/// Resolves `filename` to a normalized absolute path, against `base` when
/// given, else against the current directory.
pub fn full_filename(filename: &str, base: Option<&Path>) -> std::path::PathBuf {
    use std::path::{Component, PathBuf};

    let path = Path::new(filename);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        let base = match base {
            Some(base) => base.to_path_buf(),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        };
        base.join(path)
    };
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}
