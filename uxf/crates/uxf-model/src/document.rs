//! The top-level UXF document.

use indexmap::IndexMap;

use uxf_util::{codes, Error, Result};

use crate::{List, TClass, Value};

/// A complete UXF document: one root collection plus the metadata around
/// it.
///
/// `tclasses` maps each ttype to its definition; `imports` maps each
/// imported ttype to the import text that supplied it, so the writer can
/// reproduce the `!import` lines (in first-encountered order) instead of
/// re-emitting imported definitions.
#[derive(Clone, Debug)]
pub struct Uxf {
    value: Value,
    /// Free-form text after the version in the header line.
    pub custom: String,
    /// Optional document comment.
    pub comment: Option<String>,
    /// Registry of ttype to tclass.
    pub tclasses: IndexMap<String, TClass>,
    /// Registry of ttype to the import text that defined it.
    pub imports: IndexMap<String, String>,
}

impl Uxf {
    /// Creates a document rooted at `value`, which must be a list, map, or
    /// table.
    pub fn new(value: Value) -> Result<Self> {
        if value.is_scalar() {
            return Err(Error::model(
                codes::EXPECTED_COLLECTION,
                format!(
                    "a Uxf root must be a list, map, or table, got {}",
                    value.type_name()
                ),
            ));
        }
        Ok(Self {
            value,
            custom: String::new(),
            comment: None,
            tclasses: IndexMap::new(),
            imports: IndexMap::new(),
        })
    }

    /// The root collection.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Mutable access to the root collection.
    pub fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    /// Replaces the root collection; the same kind restriction applies.
    pub fn set_value(&mut self, value: Value) -> Result<()> {
        if value.is_scalar() {
            return Err(Error::model(
                codes::EXPECTED_COLLECTION,
                format!(
                    "a Uxf root must be a list, map, or table, got {}",
                    value.type_name()
                ),
            ));
        }
        self.value = value;
        Ok(())
    }

    /// Registers `tclass`, merging identical duplicates (the later comment
    /// wins) and rejecting conflicting redefinitions.
    pub fn add_tclass(&mut self, tclass: TClass) -> Result<()> {
        if let Some(existing) = self.tclasses.get_mut(tclass.ttype()) {
            if *existing == tclass {
                if tclass.comment.is_some() && tclass.comment != existing.comment {
                    existing.comment = tclass.comment;
                }
                return Ok(());
            }
            return Err(Error::model(
                codes::CONFLICTING_TTYPE,
                format!("conflicting ttype definitions for {}", tclass.ttype()),
            ));
        }
        self.tclasses.insert(tclass.ttype().to_string(), tclass);
        Ok(())
    }

    /// Looks up a tclass by its exact ttype.
    pub fn tclass(&self, ttype: &str) -> Option<&TClass> {
        self.tclasses.get(ttype)
    }

    /// The unique import texts, in first-encountered order.
    pub fn import_filenames(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for filename in self.imports.values() {
            if !seen.contains(&filename.as_str()) {
                seen.push(filename.as_str());
            }
        }
        seen
    }
}

impl Default for Uxf {
    /// An empty document rooted at an empty list.
    fn default() -> Self {
        Self {
            value: Value::List(List::new()),
            custom: String::new(),
            comment: None,
            tclasses: IndexMap::new(),
            imports: IndexMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Field;

    #[test]
    fn test_root_must_be_collection() {
        assert!(Uxf::new(Value::List(List::new())).is_ok());
        let err = Uxf::new(Value::Int(5)).unwrap_err();
        assert_eq!(err.code(), Some(codes::EXPECTED_COLLECTION));
    }

    #[test]
    fn test_default_is_empty_list() {
        let uxo = Uxf::default();
        assert_eq!(uxo.value().as_list().unwrap().len(), 0);
        assert!(uxo.custom.is_empty());
        assert!(uxo.tclasses.is_empty());
    }

    #[test]
    fn test_add_tclass_merges_identical() {
        let mut uxo = Uxf::default();
        let tclass = TClass::new("point", vec![Field::new("x", None).unwrap()]).unwrap();
        uxo.add_tclass(tclass.clone()).unwrap();
        let mut dup = tclass.clone();
        dup.comment = Some("a point".to_string());
        uxo.add_tclass(dup).unwrap();
        assert_eq!(uxo.tclasses.len(), 1);
        assert_eq!(
            uxo.tclass("point").unwrap().comment.as_deref(),
            Some("a point")
        );
    }

    #[test]
    fn test_add_tclass_rejects_conflict() {
        let mut uxo = Uxf::default();
        uxo.add_tclass(TClass::new("point", vec![Field::new("x", None).unwrap()]).unwrap())
            .unwrap();
        let conflicting =
            TClass::new("point", vec![Field::new("y", None).unwrap()]).unwrap();
        let err = uxo.add_tclass(conflicting).unwrap_err();
        assert_eq!(err.code(), Some(codes::CONFLICTING_TTYPE));
    }

    #[test]
    fn test_import_filenames_unique_in_order() {
        let mut uxo = Uxf::default();
        uxo.imports
            .insert("a".to_string(), "shapes.uxf".to_string());
        uxo.imports
            .insert("b".to_string(), "units.uxf".to_string());
        uxo.imports
            .insert("c".to_string(), "shapes.uxf".to_string());
        assert_eq!(uxo.import_filenames(), vec!["shapes.uxf", "units.uxf"]);
    }
}
