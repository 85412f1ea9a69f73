//! Numeric diagnostic codes for UXF errors and warnings.
//!
//! Every diagnostic the library emits carries one of these codes so that
//! tools (and tests) can match on the number rather than the message text.
//! The numbering is partitioned by area:
//!
//! - `1xx` header and I/O
//! - `2xx` lexical
//! - `3xx` data-model constraint violations
//! - `4xx` parser type and identifier issues
//! - `5xx` imports and document structure
//!
//! Whether a given report is fatal is decided at the call site (the same
//! code can be a warning in one context and fatal in another is *not* the
//! case here, but fatality travels with the event, not the code).

/// Failed to read or decode UXF text.
pub const READ_FAILED: u16 = 102;
/// The input is empty or has no header line.
pub const MISSING_HEADER: u16 = 110;
/// The header line does not have the form `uxf <version>[ <custom>]`.
pub const INVALID_HEADER: u16 = 120;
/// The header line does not begin with `uxf`.
pub const NOT_UXF: u16 = 130;
/// The header's format version is newer than this library supports.
pub const VERSION_TOO_NEW: u16 = 141;
/// The header's format version is not a number.
pub const BAD_VERSION: u16 = 151;
/// `#` after the header was not followed by `<`.
pub const BAD_FILE_COMMENT: u16 = 160;
/// A character no UXF token can start with.
pub const INVALID_CHARACTER: u16 = 170;
/// A document imports itself, directly or through a cycle.
pub const CIRCULAR_IMPORT: u16 = 176;
/// `#` inside the document was not followed by `<`.
pub const COMMENT_EXPECTS_STRING: u16 = 180;
/// A comment somewhere other than the start of a collection or tclass.
pub const MISPLACED_COMMENT: u16 = 190;
/// Bytes literal with a non-hex digit or an odd number of digits.
pub const INVALID_BYTES: u16 = 200;
/// Unparsable negative number.
pub const INVALID_NUMBER: u16 = 210;
/// Unparsable number or date.
pub const INVALID_NUMBER_OR_DATE: u16 = 220;
/// A datetime carried zone information that was dropped.
pub const TIMEZONE_DROPPED: u16 = 231;
/// Unparsable datetime.
pub const INVALID_DATETIME: u16 = 240;
/// An identifier was expected but none was found.
pub const EXPECTED_IDENTIFIER: u16 = 260;
/// A string, bytes literal, or comment ran to end of input.
pub const UNTERMINATED: u16 = 270;

/// A map ktype other than int, date, datetime, str, or bytes.
pub const INVALID_KTYPE: u16 = 280;
/// A table was offered as a map key.
pub const MAP_KEY_IS_TABLE: u16 = 290;
/// A value of a non-key type was offered as a map key.
pub const INVALID_MAP_KEY: u16 = 294;
/// A ttype or field name is empty.
pub const EMPTY_NAME: u16 = 298;
/// A ttype or field name starts with a digit.
pub const NAME_STARTS_WITH_DIGIT: u16 = 300;
/// A ttype or field name clashes with a built-in type name or constant.
pub const RESERVED_NAME: u16 = 304;
/// A ttype or field name contains a forbidden character.
pub const INVALID_NAME_CHARACTER: u16 = 310;
/// A record with the wrong number of values for its table's tclass.
pub const RECORD_ARITY_MISMATCH: u16 = 320;
/// A value was appended to a fieldless table.
pub const FIELDLESS_APPEND: u16 = 334;

/// A scalar's type does not match the declared constraint.
pub const TYPE_MISMATCH: u16 = 400;
/// The document root is not a list, map, or table.
pub const EXPECTED_COLLECTION: u16 = 402;
/// A token that makes no sense where it appeared.
pub const UNEXPECTED_TOKEN: u16 = 410;
/// One defined ttype is never used.
pub const UNUSED_TTYPE: u16 = 416;
/// Several defined ttypes are never used.
pub const UNUSED_TTYPES: u16 = 418;
/// A collection's kind does not match the declared constraint.
pub const COLLECTION_TYPE_MISMATCH: u16 = 420;
/// A ttype is used but never defined or imported.
pub const UNDEFINED_TTYPE: u16 = 424;
/// A comment after something other than a collection opener.
pub const MISPLACED_PARSER_COMMENT: u16 = 440;
/// The identifier after a map's ktype names no known ttype.
pub const EXPECTED_MAP_VTYPE: u16 = 442;
/// The identifier opening a list names no known ttype.
pub const EXPECTED_LIST_VTYPE: u16 = 446;
/// A table without a (known) ttype.
pub const EXPECTED_TABLE_TTYPE: u16 = 450;
/// A nested table's ttype does not satisfy the outer vtype constraint.
pub const TABLE_VTYPE_MISMATCH: u16 = 456;
/// `true` or `false` where only `yes` or `no` are booleans.
pub const BOOL_LITERAL: u16 = 458;
/// A ttype identifier somewhere other than a collection prefix.
pub const MISPLACED_IDENTIFIER: u16 = 460;
/// A second vtype for a list.
pub const LIST_VTYPE_REPEATED: u16 = 470;
/// More than one ktype and vtype for a map.
pub const MAP_TYPES_REPEATED: u16 = 480;
/// A type name outside a list or map prefix.
pub const MISPLACED_TYPE: u16 = 484;
/// A str was converted to the declared scalar type.
pub const NATURALIZED: u16 = 486;
/// An int was widened to real to satisfy the declared type.
pub const INT_WIDENED: u16 = 496;
/// A real was rounded to int to satisfy the declared type.
pub const REAL_NARROWED: u16 = 498;

/// Collections nested deeper than the configured maximum.
pub const DEPTH_EXCEEDED: u16 = 508;
/// A closing `]`, `}`, or `)` with no open collection.
pub const UNMATCHED_COLLECTION_END: u16 = 510;
/// A closing delimiter of the wrong kind.
pub const MISMATCHED_COLLECTION_END: u16 = 512;
/// A tclass definition with no ttype, seen at the next `=`.
pub const UNNAMED_TCLASS: u16 = 518;
/// Conflicting redefinition of a ttype, seen mid-definitions.
pub const CONFLICTING_TTYPE: u16 = 520;
/// A tclass body with no preceding `=`.
pub const MISSING_TCLASS_EQUALS: u16 = 522;
/// A built-in type name or constant used as a ttype name.
pub const TTYPE_IS_BUILTIN: u16 = 524;
/// A tclass definition with no ttype, seen at its end.
pub const UNNAMED_TCLASS_AT_END: u16 = 526;
/// Conflicting redefinition of a ttype, seen at a definition's end.
pub const CONFLICTING_TTYPE_AT_END: u16 = 528;
/// An imported document failed to parse.
pub const IMPORT_PARSE_FAILED: u16 = 530;
/// An imported ttype conflicts with an existing definition.
pub const CONFLICTING_IMPORTED_TTYPE: u16 = 544;
/// An HTTP or HTTPS import could not be fetched.
pub const URL_IMPORT_FAILED: u16 = 550;
/// A system import names no installed ttype definition file.
pub const MISSING_SYSTEM_IMPORT: u16 = 560;
/// A file import could not be loaded.
pub const IMPORT_LOAD_FAILED: u16 = 586;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partitioning() {
        assert!(MISSING_HEADER < 200);
        assert!((200..300).contains(&INVALID_BYTES));
        assert!((280..400).contains(&FIELDLESS_APPEND));
        assert!((400..500).contains(&NATURALIZED));
        assert!((500..600).contains(&CONFLICTING_IMPORTED_TTYPE));
    }

    #[test]
    fn test_codes_are_distinct() {
        let codes = [
            READ_FAILED,
            MISSING_HEADER,
            INVALID_HEADER,
            NOT_UXF,
            VERSION_TOO_NEW,
            BAD_VERSION,
            BAD_FILE_COMMENT,
            INVALID_CHARACTER,
            CIRCULAR_IMPORT,
            COMMENT_EXPECTS_STRING,
            MISPLACED_COMMENT,
            INVALID_BYTES,
            INVALID_NUMBER,
            INVALID_NUMBER_OR_DATE,
            TIMEZONE_DROPPED,
            INVALID_DATETIME,
            EXPECTED_IDENTIFIER,
            UNTERMINATED,
            INVALID_KTYPE,
            MAP_KEY_IS_TABLE,
            INVALID_MAP_KEY,
            EMPTY_NAME,
            NAME_STARTS_WITH_DIGIT,
            RESERVED_NAME,
            INVALID_NAME_CHARACTER,
            RECORD_ARITY_MISMATCH,
            FIELDLESS_APPEND,
            TYPE_MISMATCH,
            EXPECTED_COLLECTION,
            UNEXPECTED_TOKEN,
            UNUSED_TTYPE,
            UNUSED_TTYPES,
            COLLECTION_TYPE_MISMATCH,
            UNDEFINED_TTYPE,
            MISPLACED_PARSER_COMMENT,
            EXPECTED_MAP_VTYPE,
            EXPECTED_LIST_VTYPE,
            EXPECTED_TABLE_TTYPE,
            TABLE_VTYPE_MISMATCH,
            BOOL_LITERAL,
            MISPLACED_IDENTIFIER,
            LIST_VTYPE_REPEATED,
            MAP_TYPES_REPEATED,
            MISPLACED_TYPE,
            NATURALIZED,
            INT_WIDENED,
            REAL_NARROWED,
            DEPTH_EXCEEDED,
            UNMATCHED_COLLECTION_END,
            MISMATCHED_COLLECTION_END,
            UNNAMED_TCLASS,
            CONFLICTING_TTYPE,
            MISSING_TCLASS_EQUALS,
            TTYPE_IS_BUILTIN,
            UNNAMED_TCLASS_AT_END,
            CONFLICTING_TTYPE_AT_END,
            IMPORT_PARSE_FAILED,
            CONFLICTING_IMPORTED_TTYPE,
            URL_IMPORT_FAILED,
            MISSING_SYSTEM_IMPORT,
            IMPORT_LOAD_FAILED,
        ];
        let mut sorted = codes.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), codes.len());
    }
}
