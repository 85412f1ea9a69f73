//! The UXF map: a keyed collection with optional key- and value-type
//! constraints.

use indexmap::IndexMap;

use uxf_util::{codes, ident, Error, Result};

use crate::{Key, Value};

/// A mapping from keys to values.
///
/// Keys are restricted to int, date, datetime, str, and bytes. Insertion
/// order is kept purely for serialization convenience; equality and
/// comparison treat maps as unordered.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Map {
    items: IndexMap<Key, Value>,
    ktype: Option<String>,
    /// Optional declared value type.
    pub vtype: Option<String>,
    /// Optional comment.
    pub comment: Option<String>,
    pending_key: Option<Key>,
}

impl Map {
    /// Creates an empty, unconstrained map.
    pub fn new() -> Self {
        Self::default()
    }

    /// The declared key type, if any.
    pub fn ktype(&self) -> Option<&str> {
        self.ktype.as_deref()
    }

    /// Declares the key type.
    ///
    /// Only int, date, datetime, str, and bytes are admissible; anything
    /// else fails with `#280`.
    pub fn set_ktype(&mut self, ktype: impl Into<String>) -> Result<()> {
        let ktype = ktype.into();
        if !ident::is_key_type_name(&ktype) {
            return Err(Error::model(
                codes::INVALID_KTYPE,
                format!("ktype may only be bytes, date, datetime, int, or str, got {ktype}"),
            ));
        }
        self.ktype = Some(ktype);
        Ok(())
    }

    /// Inserts `value` under `key`, replacing any previous value.
    pub fn insert(&mut self, key: Key, value: Value) {
        self.items.insert(key, value);
    }

    /// Looks up the value for `key`.
    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.items.get(key)
    }

    /// The underlying items in insertion order.
    pub fn items(&self) -> &IndexMap<Key, Value> {
        &self.items
    }

    /// The number of entries. A set-but-unconsumed pending key does not
    /// count.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The reader-side append contract.
    ///
    /// Alternates between remembering `value` as the pending key and
    /// inserting `value` under the pending key. A pending-key value whose
    /// kind cannot key a map fails with `#290` (tables, which usually mean
    /// a mistyped bytes literal) or `#294` (everything else).
    pub fn push(&mut self, value: Value) -> Result<()> {
        match self.pending_key.take() {
            None => {
                let prefix = "map keys may only be of type int, date, datetime, str, or bytes";
                match Key::from_value(value) {
                    Ok(key) => self.pending_key = Some(key),
                    Err(Value::Table(_)) => {
                        return Err(Error::model(
                            codes::MAP_KEY_IS_TABLE,
                            format!(
                                "{prefix}, got a Table ( … ), maybe bytes (: … :) was intended?"
                            ),
                        ))
                    }
                    Err(other) => {
                        return Err(Error::model(
                            codes::INVALID_MAP_KEY,
                            format!("{prefix}, got {}", other.type_name()),
                        ))
                    }
                }
            }
            Some(key) => {
                self.items.insert(key, value);
            }
        }
        Ok(())
    }

    /// Returns true if the next pushed value will be taken as a key.
    pub fn next_is_key(&self) -> bool {
        self.pending_key.is_none()
    }
}

impl<'a> IntoIterator for &'a Map {
    type Item = (&'a Key, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_alternation() {
        let mut map = Map::new();
        assert!(map.next_is_key());
        map.push(Value::from("one")).unwrap();
        assert!(!map.next_is_key());
        map.push(Value::Int(1)).unwrap();
        assert!(map.next_is_key());
        assert_eq!(map.len(), 1);
        assert_eq!(
            map.get(&Key::Str("one".to_string())),
            Some(&Value::Int(1))
        );
    }

    #[test]
    fn test_push_bad_key() {
        let mut map = Map::new();
        let err = map.push(Value::Real(1.5)).unwrap_err();
        assert_eq!(err.code(), Some(codes::INVALID_MAP_KEY));
        let err = map.push(Value::Null).unwrap_err();
        assert_eq!(err.code(), Some(codes::INVALID_MAP_KEY));
    }

    #[test]
    fn test_push_table_key_gets_hint() {
        let mut map = Map::new();
        let err = map.push(Value::Table(crate::Table::default())).unwrap_err();
        assert_eq!(err.code(), Some(codes::MAP_KEY_IS_TABLE));
        assert!(err.to_string().contains("bytes (: … :)"));
    }

    #[test]
    fn test_set_ktype() {
        let mut map = Map::new();
        map.set_ktype("str").unwrap();
        assert_eq!(map.ktype(), Some("str"));
        let err = map.set_ktype("real").unwrap_err();
        assert_eq!(err.code(), Some(codes::INVALID_KTYPE));
    }

    #[test]
    fn test_insert_replaces() {
        let mut map = Map::new();
        map.insert(Key::Int(1), Value::from("a"));
        map.insert(Key::Int(1), Value::from("b"));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&Key::Int(1)), Some(&Value::from("b")));
    }

    #[test]
    fn test_equality_ignores_order() {
        let mut a = Map::new();
        a.insert(Key::Int(1), Value::from("a"));
        a.insert(Key::Int(2), Value::from("b"));
        let mut b = Map::new();
        b.insert(Key::Int(2), Value::from("b"));
        b.insert(Key::Int(1), Value::from("a"));
        assert_eq!(a, b);
    }
}
