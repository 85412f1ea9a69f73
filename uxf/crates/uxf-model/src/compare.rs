//! Deep structural equality with configurable blind spots.
//!
//! Plain `==` on the model types is exact. The comparisons here are what
//! tests and the equivalence mode of comparison tools want instead: reals
//! compare with a tolerance, maps compare order-independently (sorted by
//! the string form of their keys), and comments, the custom header tag,
//! and type annotations can each be ignored.

use crate::{List, Map, Table, Uxf, Value};

/// Relative tolerance for real comparison.
const REL_TOLERANCE: f64 = 1e-9;
/// Absolute tolerance for real comparison, for values near zero.
const ABS_TOLERANCE: f64 = 1e-12;

/// What to ignore while comparing.
#[derive(Clone, Copy, Debug, Default)]
pub struct CompareOptions {
    /// Ignore comments on documents, collections, and tclasses.
    pub ignore_comments: bool,
    /// Ignore the document's custom header tag.
    pub ignore_custom: bool,
    /// Ignore vtypes, ktypes, tclasses, and import registries.
    pub ignore_types: bool,
}

impl CompareOptions {
    /// Compare everything.
    pub fn exact() -> Self {
        Self::default()
    }

    /// Compare values only, ignoring comments, the custom tag, and types.
    pub fn values_only() -> Self {
        Self {
            ignore_comments: true,
            ignore_custom: true,
            ignore_types: true,
        }
    }
}

/// Treats `None` and empty text as the same absence.
fn eq_text(a: Option<&str>, b: Option<&str>) -> bool {
    let a = a.unwrap_or("");
    let b = b.unwrap_or("");
    a == b
}

fn close(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    let diff = (a - b).abs();
    diff <= REL_TOLERANCE * a.abs().max(b.abs()) || diff <= ABS_TOLERANCE
}

/// Deep document equality under `options`.
pub fn eq_uxf(a: &Uxf, b: &Uxf, options: CompareOptions) -> bool {
    if !options.ignore_custom && !eq_text(Some(&a.custom), Some(&b.custom)) {
        return false;
    }
    if !options.ignore_comments && !eq_text(a.comment.as_deref(), b.comment.as_deref()) {
        return false;
    }
    if !options.ignore_types {
        if a.tclasses.len() != b.tclasses.len() {
            return false;
        }
        for (ttype, tclass) in &a.tclasses {
            match b.tclasses.get(ttype) {
                Some(other) if tclass == other => {
                    if !options.ignore_comments && !eq_text(
                        tclass.comment.as_deref(),
                        other.comment.as_deref(),
                    ) {
                        return false;
                    }
                }
                _ => return false,
            }
        }
        if a.imports != b.imports {
            return false;
        }
    }
    eq_value(a.value(), b.value(), options)
}

/// Deep value equality under `options`.
pub fn eq_value(a: &Value, b: &Value, options: CompareOptions) -> bool {
    match (a, b) {
        (Value::Real(x), Value::Real(y)) => close(*x, *y),
        (Value::List(x), Value::List(y)) => eq_list(x, y, options),
        (Value::Map(x), Value::Map(y)) => eq_map(x, y, options),
        (Value::Table(x), Value::Table(y)) => eq_table(x, y, options),
        _ => a == b,
    }
}

fn eq_list(a: &List, b: &List, options: CompareOptions) -> bool {
    if !options.ignore_comments && !eq_text(a.comment.as_deref(), b.comment.as_deref()) {
        return false;
    }
    if !options.ignore_types && a.vtype != b.vtype {
        return false;
    }
    a.len() == b.len()
        && a.iter()
            .zip(b.iter())
            .all(|(x, y)| eq_value(x, y, options))
}

fn eq_map(a: &Map, b: &Map, options: CompareOptions) -> bool {
    if !options.ignore_comments && !eq_text(a.comment.as_deref(), b.comment.as_deref()) {
        return false;
    }
    if !options.ignore_types && (a.ktype() != b.ktype() || a.vtype != b.vtype) {
        return false;
    }
    if a.len() != b.len() {
        return false;
    }
    let mut a_items: Vec<_> = a.items().iter().collect();
    let mut b_items: Vec<_> = b.items().iter().collect();
    a_items.sort_by_key(|(key, _)| key.to_string());
    b_items.sort_by_key(|(key, _)| key.to_string());
    a_items
        .iter()
        .zip(b_items.iter())
        .all(|((ak, av), (bk, bv))| ak == bk && eq_value(av, bv, options))
}

fn eq_table(a: &Table, b: &Table, options: CompareOptions) -> bool {
    if !options.ignore_comments && !eq_text(a.comment.as_deref(), b.comment.as_deref()) {
        return false;
    }
    // two tables of different ttypes are never the same value; only the
    // deeper field and vtype comparison is ignorable
    let same_ttype = match (a.ttype(), b.ttype()) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        (None, None) => true,
        _ => false,
    };
    if !same_ttype {
        return false;
    }
    if !options.ignore_types && a.tclass() != b.tclass() {
        return false;
    }
    if a.len() != b.len() {
        return false;
    }
    a.records()
        .iter()
        .zip(b.records().iter())
        .all(|(ra, rb)| {
            ra.len() == rb.len()
                && ra
                    .iter()
                    .zip(rb.iter())
                    .all(|(x, y)| eq_value(x, y, options))
        })
}
