//! The tagged value union and the narrower map-key union.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use crate::{List, Map, Table};

/// Any UXF value: a scalar leaf or a nested collection.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// The absence of a value, written `?`.
    Null,
    /// `yes` or `no`.
    Bool(bool),
    /// A signed 64-bit integer.
    Int(i64),
    /// An IEEE-754 binary64 real.
    Real(f64),
    /// A calendar date.
    Date(NaiveDate),
    /// A naive datetime with seconds precision.
    DateTime(NaiveDateTime),
    /// A Unicode string.
    Str(String),
    /// An arbitrary byte string.
    Bytes(Vec<u8>),
    /// An ordered sequence.
    List(List),
    /// A keyed mapping.
    Map(Map),
    /// A typed record container.
    Table(Table),
}

impl Value {
    /// The UXF type name of this value, as it appears in type constraints.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Real(_) => "real",
            Value::Date(_) => "date",
            Value::DateTime(_) => "datetime",
            Value::Str(_) => "str",
            Value::Bytes(_) => "bytes",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Table(_) => "table",
        }
    }

    /// Returns true for null and the seven scalar kinds.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::List(_) | Value::Map(_) | Value::Table(_))
    }

    /// Returns true if this value satisfies the built-in type `name`.
    ///
    /// Only built-in names are meaningful here; a ttype constraint must be
    /// resolved against a tclass registry by the caller. Null satisfies
    /// every constraint.
    pub fn satisfies_builtin(&self, name: &str) -> bool {
        match self {
            Value::Null => true,
            other => other.type_name() == name,
        }
    }

    /// A borrowed view of the list inside, if this is a list.
    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// A borrowed view of the map inside, if this is a map.
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// A borrowed view of the table inside, if this is a table.
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(table) => Some(table),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(r: f64) -> Self {
        Value::Real(r)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<List> for Value {
    fn from(list: List) -> Self {
        Value::List(list)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

impl From<Table> for Value {
    fn from(table: Table) -> Self {
        Value::Table(table)
    }
}

impl From<Key> for Value {
    fn from(key: Key) -> Self {
        match key {
            Key::Int(i) => Value::Int(i),
            Key::Date(d) => Value::Date(d),
            Key::DateTime(dt) => Value::DateTime(dt),
            Key::Str(s) => Value::Str(s),
            Key::Bytes(b) => Value::Bytes(b),
        }
    }
}

/// A map key. Keys are restricted to the hashable, ordered scalar kinds.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// An integer key.
    Int(i64),
    /// A date key.
    Date(NaiveDate),
    /// A datetime key.
    DateTime(NaiveDateTime),
    /// A string key.
    Str(String),
    /// A bytes key.
    Bytes(Vec<u8>),
}

impl Key {
    /// Converts a value into a key, handing the value back unchanged when
    /// its kind cannot key a map.
    pub fn from_value(value: Value) -> Result<Key, Value> {
        match value {
            Value::Int(i) => Ok(Key::Int(i)),
            Value::Date(d) => Ok(Key::Date(d)),
            Value::DateTime(dt) => Ok(Key::DateTime(dt)),
            Value::Str(s) => Ok(Key::Str(s)),
            Value::Bytes(b) => Ok(Key::Bytes(b)),
            other => Err(other),
        }
    }

    /// The UXF type name of this key.
    pub fn type_name(&self) -> &'static str {
        match self {
            Key::Int(_) => "int",
            Key::Date(_) => "date",
            Key::DateTime(_) => "datetime",
            Key::Str(_) => "str",
            Key::Bytes(_) => "bytes",
        }
    }
}

impl fmt::Display for Key {
    /// A deterministic string form, used where keys must sort stably.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(i) => write!(f, "{i}"),
            Key::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Key::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
            Key::Str(s) => write!(f, "{s}"),
            Key::Bytes(b) => {
                for byte in b {
                    write!(f, "{byte:02X}")?;
                }
                Ok(())
            }
        }
    }
}
