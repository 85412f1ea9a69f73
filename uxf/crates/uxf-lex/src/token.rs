//! Tokens produced by the UXF lexer.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

/// One lexed token with its payload.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    /// `!target` import line.
    Import(String),
    /// `=` starting a tclass definition.
    TClassBegin,
    /// Implicit end of a tclass definition.
    TClassEnd,
    /// `(` opening a table.
    TableBegin,
    /// `)` closing a table.
    TableEnd,
    /// `[` opening a list.
    ListBegin,
    /// `]` closing a list.
    ListEnd,
    /// `{` opening a map.
    MapBegin,
    /// `}` closing a map.
    MapEnd,
    /// `#<…>` comment, already unescaped.
    Comment(String),
    /// `?`.
    Null,
    /// `yes` or `no`.
    Bool(bool),
    /// An integer literal.
    Int(i64),
    /// A real literal.
    Real(f64),
    /// A date literal.
    Date(NaiveDate),
    /// A datetime literal.
    DateTime(NaiveDateTime),
    /// `<…>` string, already unescaped.
    Str(String),
    /// `(:…:)` byte string.
    Bytes(Vec<u8>),
    /// A built-in type name, or the identifier after `:` in a field.
    Type(String),
    /// A ttype or field identifier.
    Identifier(String),
    /// End of input.
    Eof,
}

impl TokenKind {
    /// Returns true for null and the seven scalar literal kinds.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            TokenKind::Null
                | TokenKind::Bool(_)
                | TokenKind::Int(_)
                | TokenKind::Real(_)
                | TokenKind::Date(_)
                | TokenKind::DateTime(_)
                | TokenKind::Str(_)
                | TokenKind::Bytes(_)
        )
    }

    /// Returns true for `[`, `{`, and `(`.
    pub fn is_collection_begin(&self) -> bool {
        matches!(
            self,
            TokenKind::ListBegin | TokenKind::MapBegin | TokenKind::TableBegin
        )
    }

    /// Returns true for `]`, `}`, and `)`.
    pub fn is_collection_end(&self) -> bool {
        matches!(
            self,
            TokenKind::ListEnd | TokenKind::MapEnd | TokenKind::TableEnd
        )
    }

    /// The kind's name, for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Import(_) => "IMPORT",
            TokenKind::TClassBegin => "TCLASS_BEGIN",
            TokenKind::TClassEnd => "TCLASS_END",
            TokenKind::TableBegin => "TABLE_BEGIN",
            TokenKind::TableEnd => "TABLE_END",
            TokenKind::ListBegin => "LIST_BEGIN",
            TokenKind::ListEnd => "LIST_END",
            TokenKind::MapBegin => "MAP_BEGIN",
            TokenKind::MapEnd => "MAP_END",
            TokenKind::Comment(_) => "COMMENT",
            TokenKind::Null => "NULL",
            TokenKind::Bool(_) => "BOOL",
            TokenKind::Int(_) => "INT",
            TokenKind::Real(_) => "REAL",
            TokenKind::Date(_) => "DATE",
            TokenKind::DateTime(_) => "DATE_TIME",
            TokenKind::Str(_) => "STR",
            TokenKind::Bytes(_) => "BYTES",
            TokenKind::Type(_) => "TYPE",
            TokenKind::Identifier(_) => "IDENTIFIER",
            TokenKind::Eof => "EOF",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Import(s)
            | TokenKind::Comment(s)
            | TokenKind::Type(s)
            | TokenKind::Identifier(s) => write!(f, "{}={s}", self.name()),
            TokenKind::Bool(b) => write!(f, "{}={}", self.name(), if *b { "yes" } else { "no" }),
            TokenKind::Int(i) => write!(f, "{}={i}", self.name()),
            TokenKind::Real(r) => write!(f, "{}={r}", self.name()),
            TokenKind::Date(d) => write!(f, "{}={}", self.name(), d.format("%Y-%m-%d")),
            TokenKind::DateTime(dt) => {
                write!(f, "{}={}", self.name(), dt.format("%Y-%m-%dT%H:%M:%S"))
            }
            TokenKind::Str(s) => write!(f, "{}=<{s}>", self.name()),
            TokenKind::Bytes(b) => write!(f, "{}={} bytes", self.name(), b.len()),
            _ => write!(f, "{}", self.name()),
        }
    }
}

/// A token and the line it started on.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// What was lexed.
    pub kind: TokenKind,
    /// 1-based source line of the token's first character.
    pub lino: u32,
}

impl Token {
    /// Creates a token.
    pub fn new(kind: TokenKind, lino: u32) -> Self {
        Self { kind, lino }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.lino, self.kind)
    }
}
