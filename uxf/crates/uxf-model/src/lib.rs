//! uxf-model - The UXF in-memory data model.
//!
//! A UXF document is a tree whose root is one of three collection kinds
//! ([`List`], [`Map`], or [`Table`]) and whose leaves are scalars carried by
//! the [`Value`] enum. Tables are typed by a [`TClass`] (an ordered list of
//! [`Field`]s under a ttype name); the [`Uxf`] document owns the registries
//! of tclasses and imports.
//!
//! The collection types expose two layers of API: the ordinary container
//! operations, and the reader-side `push` contracts the parser relies on
//! (key/value alternation for maps, arity-driven row packing for tables).

pub mod compare;
mod document;
mod list;
mod map;
mod table;
mod tclass;
mod value;

pub use compare::{eq_uxf, eq_value, CompareOptions};
pub use document::Uxf;
pub use list::List;
pub use map::Map;
pub use table::Table;
pub use tclass::{Field, TClass};
pub use value::{Key, Value};
