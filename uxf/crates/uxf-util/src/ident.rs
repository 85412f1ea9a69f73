//! Identifier and type-name validation.
//!
//! UXF identifiers (ttypes and field names) match
//! `[A-Za-z_][A-Za-z0-9_]{0,59}` and may not collide with a built-in type
//! name or constant.

use crate::codes;
use crate::error::{Error, Result};
use crate::MAX_IDENTIFIER_LEN;

/// Type names a map key may be declared as.
pub const KEY_TYPE_NAMES: [&str; 5] = ["int", "date", "datetime", "str", "bytes"];

/// Scalar type names.
pub const VALUE_TYPE_NAMES: [&str; 7] =
    ["bool", "int", "real", "date", "datetime", "str", "bytes"];

/// All built-in type names, scalar and collection.
pub const ANY_VALUE_TYPE_NAMES: [&str; 10] = [
    "bool", "int", "real", "date", "datetime", "str", "bytes", "list", "map", "table",
];

/// Words no identifier may equal.
pub const RESERVED_WORDS: [&str; 13] = [
    "bool", "int", "real", "date", "datetime", "str", "bytes", "list", "map", "table", "null",
    "yes", "no",
];

/// Returns true if `name` may be declared as a map ktype.
pub fn is_key_type_name(name: &str) -> bool {
    KEY_TYPE_NAMES.contains(&name)
}

/// Returns true if `name` names a scalar built-in type.
pub fn is_value_type_name(name: &str) -> bool {
    VALUE_TYPE_NAMES.contains(&name)
}

/// Returns true if `name` names any built-in type.
pub fn is_any_value_type_name(name: &str) -> bool {
    ANY_VALUE_TYPE_NAMES.contains(&name)
}

/// Returns true if `name` is a reserved word.
pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

/// Validates a ttype or field name.
///
/// Checks emptiness, the leading character, the character set, the length
/// bound, and the reserved words, failing with the matching `#29x`/`#3xx`
/// code.
pub fn check_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::model(
            codes::EMPTY_NAME,
            "fields and tables must have nonempty names",
        ));
    }
    let first = name.chars().next().unwrap_or('\0');
    if first.is_ascii_digit() {
        return Err(Error::model(
            codes::NAME_STARTS_WITH_DIGIT,
            format!("names must start with a letter or underscore, got {name}"),
        ));
    }
    if is_reserved_word(name) {
        return Err(Error::model(
            codes::RESERVED_NAME,
            format!("names cannot be the same as built-in type names or constants, got {name}"),
        ));
    }
    for c in name.chars() {
        if c != '_' && !c.is_ascii_alphanumeric() {
            return Err(Error::model(
                codes::INVALID_NAME_CHARACTER,
                format!("names may only contain letters, digits, or underscores, got {name}"),
            ));
        }
    }
    if !first.is_ascii_alphabetic() && first != '_' {
        return Err(Error::model(
            codes::INVALID_NAME_CHARACTER,
            format!("names must start with a letter or underscore, got {name}"),
        ));
    }
    if name.len() > MAX_IDENTIFIER_LEN {
        return Err(Error::model(
            codes::INVALID_NAME_CHARACTER,
            format!("names may be at most {MAX_IDENTIFIER_LEN} characters long, got {name}"),
        ));
    }
    Ok(())
}
