//! Pluggable error reporting.
//!
//! The lexer, parser, and writer report every diagnostic through a
//! [`Reporter`] the caller supplies. Non-fatal events are purely
//! informational; fatal events are additionally turned into an
//! [`Error`](crate::Error) by the emitting code and propagated out of the
//! load or dump call.

use std::fmt;

use crate::error::Error;

/// One reported diagnostic.
#[derive(Clone, Debug)]
pub struct ErrorEvent {
    /// Base name of the file being processed, or `-` for in-memory text.
    pub filename: String,
    /// 1-based line number, or 0 when no position applies.
    pub lino: u32,
    /// Numeric diagnostic code, see [`crate::codes`].
    pub code: u16,
    /// Human-readable description.
    pub message: String,
    /// Whether processing unwinds after this report.
    pub fatal: bool,
}

impl fmt::Display for ErrorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:#{}:{}",
            self.filename, self.lino, self.code, self.message
        )
    }
}

/// A sink for diagnostics.
///
/// Implementations must not panic; a fatal event is *also* delivered here
/// before the corresponding error unwinds, so sinks see the complete
/// diagnostic stream.
pub trait Reporter {
    /// Receives one diagnostic.
    fn report(&mut self, event: &ErrorEvent);
}

/// Writes every diagnostic to stderr as `uxf:filename:lino:#code:message`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&mut self, event: &ErrorEvent) {
        eprintln!("uxf:{event}");
    }
}

/// Discards every diagnostic. Fatal errors still unwind as usual.
///
/// Test harnesses use this to keep expected diagnostics out of the output.
#[derive(Clone, Copy, Debug, Default)]
pub struct QuietReporter;

impl Reporter for QuietReporter {
    fn report(&mut self, _event: &ErrorEvent) {}
}

/// Collects every diagnostic for later inspection.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    /// The events in report order.
    pub events: Vec<ErrorEvent>,
}

impl MemoryReporter {
    /// Creates an empty collecting reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// The codes of all collected events, in report order.
    pub fn codes(&self) -> Vec<u16> {
        self.events.iter().map(|e| e.code).collect()
    }

    /// Returns true if any collected event carries `code`.
    pub fn has(&self, code: u16) -> bool {
        self.events.iter().any(|e| e.code == code)
    }
}

impl Reporter for MemoryReporter {
    fn report(&mut self, event: &ErrorEvent) {
        self.events.push(event.clone());
    }
}

/// Reports a non-fatal diagnostic.
pub fn emit(
    reporter: &mut dyn Reporter,
    filename: &str,
    lino: u32,
    code: u16,
    message: impl Into<String>,
) {
    reporter.report(&ErrorEvent {
        filename: filename.to_string(),
        lino,
        code,
        message: message.into(),
        fatal: false,
    });
}

/// Reports a fatal diagnostic and returns the error to propagate.
#[must_use]
pub fn emit_fatal(
    reporter: &mut dyn Reporter,
    filename: &str,
    lino: u32,
    code: u16,
    message: impl Into<String>,
) -> Error {
    let event = ErrorEvent {
        filename: filename.to_string(),
        lino,
        code,
        message: message.into(),
        fatal: true,
    };
    reporter.report(&event);
    Error::from_event(&event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes;

    #[test]
    fn test_event_display() {
        let event = ErrorEvent {
            filename: "x.uxf".to_string(),
            lino: 7,
            code: codes::UNUSED_TTYPE,
            message: "unused ttype: 'point'".to_string(),
            fatal: false,
        };
        assert_eq!(event.to_string(), "x.uxf:7:#416:unused ttype: 'point'");
    }

    #[test]
    fn test_memory_reporter_collects() {
        let mut reporter = MemoryReporter::new();
        emit(&mut reporter, "-", 1, codes::TYPE_MISMATCH, "expected int");
        emit(&mut reporter, "-", 2, codes::NATURALIZED, "converted str");
        assert_eq!(reporter.codes(), vec![codes::TYPE_MISMATCH, codes::NATURALIZED]);
        assert!(reporter.has(codes::NATURALIZED));
        assert!(!reporter.has(codes::UNUSED_TTYPE));
    }

    #[test]
    fn test_emit_fatal_reports_and_returns() {
        let mut reporter = MemoryReporter::new();
        let err = emit_fatal(
            &mut reporter,
            "t.uxf",
            4,
            codes::EXPECTED_TABLE_TTYPE,
            "expected table ttype",
        );
        assert_eq!(reporter.events.len(), 1);
        assert!(reporter.events[0].fatal);
        assert_eq!(err.code(), Some(codes::EXPECTED_TABLE_TTYPE));
    }

    #[test]
    fn test_quiet_reporter_is_silent() {
        let mut reporter = QuietReporter;
        emit(&mut reporter, "-", 1, codes::TYPE_MISMATCH, "ignored");
    }
}
