//! Import resolution: local files, system definition files, and HTTP(S)
//! URLs.
//!
//! Every import source is tracked by the outermost load. A source that
//! finished loading is silently skipped when imported again (diamond
//! imports are fine); a source that is still being parsed means the
//! imports form a cycle, which is fatal.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;

use uxf_lex::full_filename;
use uxf_model::Uxf;
use uxf_util::{codes, ErrorEvent, Reporter, Result};

use crate::parser::Parser;
use crate::{parse_inner, ParseOptions};

/// Tracks which import sources are in flight and which are complete.
///
/// Sources are keyed by their resolved identity: a normalized absolute
/// path for files, the URL text for HTTP imports.
#[derive(Debug, Default)]
pub struct ImportTracker {
    active: FxHashSet<String>,
    done: FxHashSet<String>,
}

impl ImportTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `source` is currently being parsed.
    pub fn is_active(&self, source: &str) -> bool {
        self.active.contains(source)
    }

    /// Returns true if `source` finished loading (or failed and must not
    /// be retried).
    pub fn is_done(&self, source: &str) -> bool {
        self.done.contains(source)
    }

    /// Marks `source` as being parsed.
    pub fn activate(&mut self, source: &str) {
        self.active.insert(source.to_string());
    }

    /// Moves `source` from active to done.
    pub fn finish(&mut self, source: &str) {
        self.active.remove(source);
        self.done.insert(source.to_string());
    }
}

/// Drops the unused-ttype chatter every imported document produces; its
/// ttypes are expected to be unused there.
struct ImportReporter<'r> {
    inner: &'r mut dyn Reporter,
}

impl Reporter for ImportReporter<'_> {
    fn report(&mut self, event: &ErrorEvent) {
        if event.code == codes::UNUSED_TTYPE || event.code == codes::UNUSED_TTYPES {
            return;
        }
        self.inner.report(event);
    }
}

impl<'a> Parser<'a> {
    /// Resolves and merges one `!target` import.
    pub(crate) fn handle_import(&mut self, value: &str) -> Result<()> {
        let imported = if value.starts_with("http://") || value.starts_with("https://") {
            self.url_import(value)?
        } else if !value.contains('.') {
            match self.system_import_filename(value) {
                Some(filename) => self.load_import(&filename)?,
                None => None,
            }
        } else {
            self.load_import(value)?
        };
        let Some(uxo) = imported else {
            return Ok(());
        };
        for (_, tclass) in uxo.tclasses {
            let ttype = tclass.ttype().to_string();
            self.merge_tclass(tclass, codes::CONFLICTING_IMPORTED_TTYPE)?;
            self.imports.insert(ttype, value.to_string());
        }
        Ok(())
    }

    /// Fetches a URL import and parses its body.
    ///
    /// The URL stays active from before the fetch until its body has been
    /// parsed, so a URL cycle re-entering it is caught here the same way
    /// file cycles are caught in [`resolve_import`](Self::resolve_import).
    fn url_import(&mut self, url: &str) -> Result<Option<Uxf>> {
        if self.tracker.is_done(url) {
            return Ok(None);
        }
        if self.tracker.is_active(url) {
            return Err(self.fatal(
                codes::CIRCULAR_IMPORT,
                format!("cannot do circular imports {url:?}"),
            ));
        }
        self.tracker.activate(url);
        let body = ureq::get(url)
            .call()
            .map_err(|err| err.to_string())
            .and_then(|response| response.into_string().map_err(|err| err.to_string()));
        let text = match body {
            Ok(text) => text,
            Err(err) => {
                // even a failed fetch must not be retried
                self.tracker.finish(url);
                self.error(
                    codes::URL_IMPORT_FAILED,
                    format!("failed to import {url:?}: {err}"),
                );
                return Ok(None);
            }
        };
        match self.parse_import_text(&text, url) {
            Ok(uxo) => {
                self.tracker.finish(url);
                Ok(Some(uxo))
            }
            Err(err) if err.code() == Some(codes::CIRCULAR_IMPORT) => Err(err),
            Err(err) => {
                self.tracker.finish(url);
                self.error(
                    codes::IMPORT_PARSE_FAILED,
                    format!("failed to import {url:?}: {err}"),
                );
                Ok(None)
            }
        }
    }

    /// Resolves a dotless import against the installed system definition
    /// files.
    fn system_import_filename(&mut self, value: &str) -> Option<String> {
        let dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));
        let filename = dir.join(format!("{value}.uxf"));
        if filename.is_file() {
            return Some(filename.to_string_lossy().into_owned());
        }
        self.error(
            codes::MISSING_SYSTEM_IMPORT,
            format!("there is no system ttype definition file {value:?} ({filename:?})"),
        );
        None
    }

    /// Loads a file import, searching the document's directory and then
    /// `UXF_PATH`.
    fn load_import(&mut self, filename: &str) -> Result<Option<Uxf>> {
        let fullname = match self.resolve_import(filename)? {
            Resolved::Skip => return Ok(None),
            Resolved::Path(fullname) => fullname,
        };
        let text = match uxf_util::io::read_text(Path::new(&fullname)) {
            Ok(text) => text,
            Err(err) => {
                self.tracker.done.insert(fullname.clone());
                self.error(
                    codes::IMPORT_LOAD_FAILED,
                    format!("failed to import {fullname:?}: {err}"),
                );
                return Ok(None);
            }
        };
        match self.parse_import_text(&text, &fullname) {
            Ok(uxo) => Ok(Some(uxo)),
            Err(err) if err.code() == Some(codes::CIRCULAR_IMPORT) => Err(err),
            Err(err) => {
                self.tracker.done.insert(fullname.clone());
                self.error(
                    codes::IMPORT_LOAD_FAILED,
                    format!("failed to import {fullname:?}: {err}"),
                );
                Ok(None)
            }
        }
    }

    /// Finds the import on disk, or reports how it should be handled.
    fn resolve_import(&mut self, filename: &str) -> Result<Resolved> {
        for dir in self.import_search_dirs() {
            let fullname = full_filename(filename, Some(&dir));
            let fullname = fullname.to_string_lossy().into_owned();
            if self.tracker.is_done(&fullname) {
                return Ok(Resolved::Skip);
            }
            if self.tracker.is_active(&fullname) {
                return Err(self.fatal(
                    codes::CIRCULAR_IMPORT,
                    format!("cannot do circular imports {fullname:?}"),
                ));
            }
            if Path::new(&fullname).is_file() {
                return Ok(Resolved::Path(fullname));
            }
        }
        // nothing matched; let the load fail and report against this name
        Ok(Resolved::Path(
            full_filename(filename, None).to_string_lossy().into_owned(),
        ))
    }

    /// The directories searched for file imports: the document's own
    /// directory, then every entry of `UXF_PATH`.
    fn import_search_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        if self.filename != "-" {
            if let Some(parent) = full_filename(&self.filename, None).parent() {
                dirs.push(parent.to_path_buf());
            }
        }
        if dirs.is_empty() {
            dirs.push(PathBuf::from("."));
        }
        if let Ok(paths) = std::env::var("UXF_PATH") {
            let separator = if cfg!(windows) { ';' } else { ':' };
            for path in paths.split(separator) {
                if !path.is_empty() {
                    dirs.push(PathBuf::from(path));
                }
            }
        }
        dirs
    }

    /// Recursively parses an imported document's text.
    fn parse_import_text(&mut self, text: &str, source: &str) -> Result<Uxf> {
        let options = ParseOptions {
            max_depth: self.options.max_depth,
            ..ParseOptions::default()
        };
        let mut reporter = ImportReporter {
            inner: &mut *self.reporter,
        };
        parse_inner(
            text,
            source,
            &options,
            &mut reporter,
            &mut *self.tracker,
            true,
        )
    }
}

enum Resolved {
    /// Already loaded; importing it again is a silent no-op.
    Skip,
    /// Load from this resolved name.
    Path(String),
}
