//! uxf-util - Foundation types for the UXF library.
//!
//! This crate provides the pieces every other UXF crate builds on: the
//! error type, the numeric diagnostic codes, the pluggable error reporter,
//! identifier validation, UXF string escaping, and gzip-transparent I/O.

pub mod codes;
pub mod error;
pub mod ident;
pub mod io;
pub mod report;
pub mod text;

pub use error::{Error, Result};
pub use report::{ConsoleReporter, ErrorEvent, MemoryReporter, QuietReporter, Reporter};

/// The UXF file format version this library reads and writes.
pub const UXF_VERSION: f64 = 1.0;

/// Maximum length of a ttype, field, or other identifier.
pub const MAX_IDENTIFIER_LEN: usize = 60;

/// Longest list the writer will put on a single line.
pub const MAX_LIST_IN_LINE: usize = 10;

/// Longest str or bytes value the writer still counts as "short".
pub const MAX_SHORT_LEN: usize = 32;

/// Default writer indent width.
pub const DEFAULT_INDENT: usize = 2;

/// Default limit on collection nesting depth while parsing.
pub const MAX_DEPTH: usize = 512;
