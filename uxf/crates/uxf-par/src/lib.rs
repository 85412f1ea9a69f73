//! uxf-par - Parser for UXF token streams.
//!
//! The parser consumes the lexer's token stream in five phases: the
//! optional document comment, the imports, the tclass definitions, the
//! value tree, and finally the registry cleanup that reports unused and
//! undefined ttypes. Imports are resolved here too, recursively and
//! synchronously, with a tracker that distinguishes harmless duplicate
//! imports from fatal cycles.

mod edge_cases;
pub mod imports;
pub mod parser;

use uxf_model::Uxf;
use uxf_util::{Reporter, Result, MAX_DEPTH};

pub use imports::ImportTracker;

/// Flags controlling a parse.
#[derive(Clone, Debug)]
pub struct ParseOptions {
    /// Drop tclasses (and then-empty imports) no data refers to.
    pub drop_unused: bool,
    /// Replace imports with the definitions they supplied, making the
    /// document standalone.
    pub replace_imports: bool,
    /// Maximum collection nesting depth before parsing fails.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            drop_unused: false,
            replace_imports: false,
            max_depth: MAX_DEPTH,
        }
    }
}

/// Parses UXF text into a document.
///
/// `filename` is used to resolve relative imports and in diagnostics; pass
/// `-` for in-memory text. Fatal diagnostics abort the parse and return
/// the error; non-fatal ones are reported through `reporter` and parsing
/// continues with best-effort recovery.
pub fn parse(
    text: &str,
    filename: &str,
    options: &ParseOptions,
    reporter: &mut dyn Reporter,
) -> Result<Uxf> {
    let mut tracker = ImportTracker::new();
    parse_inner(text, filename, options, reporter, &mut tracker, false)
}

/// The recursion point shared by [`parse`] and import resolution.
pub(crate) fn parse_inner(
    text: &str,
    filename: &str,
    options: &ParseOptions,
    reporter: &mut dyn Reporter,
    tracker: &mut ImportTracker,
    is_import: bool,
) -> Result<Uxf> {
    let output = uxf_lex::tokenize(text, filename, reporter)?;
    let parser = parser::Parser::new(filename, options, reporter, tracker, is_import);
    parser.parse(output.tokens, output.custom)
}
