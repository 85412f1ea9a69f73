//! uxf-drv - The UXF driver: the library's public entry points.
//!
//! This crate ties the phases together: gzip-transparent reading, lexing
//! and parsing (with import resolution), and writing. Most users only need
//! [`load`]/[`loads`] and [`dump`]/[`dumps`] plus the re-exported model
//! types.
//!
//! ```no_run
//! use uxf_drv::{loads, ParseOptions, QuietReporter};
//!
//! let mut reporter = QuietReporter;
//! let uxo = loads("uxf 1.0\n[int 1 2 3]\n", "-", &ParseOptions::default(),
//!                 &mut reporter)?;
//! assert_eq!(uxo.value().as_list().map(|l| l.len()), Some(3));
//! # Ok::<(), uxf_drv::Error>(())
//! ```

use std::io::Read;
use std::path::Path;

pub use uxf_gen::{write_document, write_document_with, WriteOptions};
pub use uxf_model::{
    compare, eq_uxf, eq_value, CompareOptions, Field, Key, List, Map, TClass, Table, Uxf, Value,
};
pub use uxf_par::{parse, ImportTracker, ParseOptions};
pub use uxf_util::{
    codes, ConsoleReporter, Error, ErrorEvent, MemoryReporter, QuietReporter, Reporter, Result,
    UXF_VERSION,
};

/// Loads a UXF document from `path`, decompressing gzipped input
/// transparently.
pub fn load(path: &Path, options: &ParseOptions, reporter: &mut dyn Reporter) -> Result<Uxf> {
    let text = uxf_util::io::read_text(path)?;
    let filename = path.to_string_lossy();
    uxf_par::parse(&text, &filename, options, reporter)
}

/// Loads a UXF document from an open byte stream.
///
/// Relative imports in streamed text resolve against the current
/// directory.
pub fn load_from<R: Read>(
    reader: R,
    options: &ParseOptions,
    reporter: &mut dyn Reporter,
) -> Result<Uxf> {
    let text = uxf_util::io::read_text_from(reader)?;
    uxf_par::parse(&text, "-", options, reporter)
}

/// Parses UXF text into a document.
///
/// `filename` is used for diagnostics and to resolve relative imports;
/// pass `-` for purely in-memory text.
pub fn loads(
    text: &str,
    filename: &str,
    options: &ParseOptions,
    reporter: &mut dyn Reporter,
) -> Result<Uxf> {
    uxf_par::parse(text, filename, options, reporter)
}

/// Serializes `uxo` to UXF text.
pub fn dumps(uxo: &Uxf, options: &WriteOptions) -> String {
    uxf_gen::write_document_with(uxo, options)
}

/// Writes `uxo` to `path`, gzip-compressing when the name ends `.gz`.
pub fn dump(path: &Path, uxo: &Uxf, options: &WriteOptions) -> Result<()> {
    let text = dumps(uxo, options);
    uxf_util::io::write_text(path, &text)
}
