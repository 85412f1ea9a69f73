//! Error handling for the UXF library.
//!
//! Fatal diagnostics unwind as [`Error::Parse`] carrying the same
//! `(filename, line, code, message)` data the reporter saw. I/O and
//! encoding failures get their own variants.

use thiserror::Error;

use crate::report::ErrorEvent;

/// Main error type for the UXF library.
#[derive(Error, Debug)]
pub enum Error {
    /// A fatal lexical, parse, structural, or model constraint error.
    #[error("uxf:{filename}:{lino}:#{code}:{message}")]
    Parse {
        /// Base name of the file being processed, or `-` for in-memory text.
        filename: String,
        /// 1-based line number, or 0 when no position applies.
        lino: u32,
        /// Numeric diagnostic code, see [`crate::codes`].
        code: u16,
        /// Human-readable description.
        message: String,
    },

    /// Error when reading or writing UXF text fails.
    #[error("uxf:#102:failed to read or write UXF text: {0}")]
    Io(#[from] std::io::Error),

    /// Error when UXF text is not valid UTF-8.
    #[error("uxf:#102:UXF text must be UTF-8 encoded: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl Error {
    /// Builds a parse error from a reported event.
    pub fn from_event(event: &ErrorEvent) -> Self {
        Error::Parse {
            filename: event.filename.clone(),
            lino: event.lino,
            code: event.code,
            message: event.message.clone(),
        }
    }

    /// Builds a positionless constraint error, for model-level violations
    /// that are not tied to any source text.
    pub fn model(code: u16, message: impl Into<String>) -> Self {
        Error::Parse {
            filename: "-".to_string(),
            lino: 0,
            code,
            message: message.into(),
        }
    }

    /// The diagnostic code, if this error carries one.
    pub fn code(&self) -> Option<u16> {
        match self {
            Error::Parse { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Result type alias using the UXF error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes;

    #[test]
    fn test_parse_error_display() {
        let err = Error::Parse {
            filename: "t.uxf".to_string(),
            lino: 3,
            code: codes::EXPECTED_TABLE_TTYPE,
            message: "expected table ttype".to_string(),
        };
        assert_eq!(err.to_string(), "uxf:t.uxf:3:#450:expected table ttype");
    }

    #[test]
    fn test_model_error() {
        let err = Error::model(codes::RESERVED_NAME, "names cannot be reserved");
        assert_eq!(err.code(), Some(codes::RESERVED_NAME));
        assert_eq!(err.to_string(), "uxf:-:0:#304:names cannot be reserved");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.code(), None);
    }
}
