//! Typed classes: the schemas of tables.

use uxf_util::{ident, Result};

/// One field of a [`TClass`]: a name and an optional value-type constraint.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    name: String,
    /// Optional declared type: a built-in type name or a ttype.
    pub vtype: Option<String>,
}

impl Field {
    /// Creates a field, validating the name.
    pub fn new(name: impl Into<String>, vtype: Option<&str>) -> Result<Self> {
        let name = name.into();
        ident::check_name(&name)?;
        Ok(Self {
            name,
            vtype: vtype.map(str::to_string),
        })
    }

    /// The field's name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The type of a [`Table`](crate::Table): a ttype name plus an ordered
/// field list.
///
/// A tclass with no fields is "fieldless" and acts as an enumeration-like
/// marker; its tables hold zero-arity records whose only information is
/// their count.
///
/// Equality is case-insensitive on the ttype and pairwise on the fields'
/// names and vtypes; comments never participate. The original casing of
/// the ttype is preserved for serialization.
#[derive(Clone, Debug)]
pub struct TClass {
    ttype: String,
    fields: Vec<Field>,
    /// Optional comment.
    pub comment: Option<String>,
}

impl TClass {
    /// Creates a tclass, validating the ttype name.
    pub fn new(ttype: impl Into<String>, fields: Vec<Field>) -> Result<Self> {
        let ttype = ttype.into();
        ident::check_name(&ttype)?;
        Ok(Self {
            ttype,
            fields,
            comment: None,
        })
    }

    /// Creates a fieldless tclass.
    pub fn fieldless(ttype: impl Into<String>) -> Result<Self> {
        Self::new(ttype, Vec::new())
    }

    /// The ttype name, in its original casing.
    pub fn ttype(&self) -> &str {
        &self.ttype
    }

    /// The fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns true if this tclass has no fields.
    pub fn is_fieldless(&self) -> bool {
        self.fields.is_empty()
    }

    /// The number of fields, which is also every record's arity.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if this tclass has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Appends a field.
    pub fn push_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Sets the vtype of the most recently added field.
    ///
    /// Does nothing when there are no fields.
    pub fn set_last_vtype(&mut self, vtype: impl Into<String>) {
        if let Some(field) = self.fields.last_mut() {
            field.vtype = Some(vtype.into());
        }
    }

    /// Case-insensitive ttype comparison.
    pub fn ttype_eq(&self, other_ttype: &str) -> bool {
        self.ttype.eq_ignore_ascii_case(other_ttype)
    }
}

impl PartialEq for TClass {
    fn eq(&self, other: &Self) -> bool {
        self.ttype.eq_ignore_ascii_case(&other.ttype) && self.fields == other.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> TClass {
        TClass::new(
            "point",
            vec![
                Field::new("x", Some("int")).unwrap(),
                Field::new("y", Some("int")).unwrap(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_field_name_validated() {
        assert!(Field::new("ok_name", None).is_ok());
        assert!(Field::new("int", None).is_err());
        assert!(Field::new("9lives", None).is_err());
    }

    #[test]
    fn test_tclass_basics() {
        let tclass = point();
        assert_eq!(tclass.ttype(), "point");
        assert_eq!(tclass.len(), 2);
        assert!(!tclass.is_fieldless());
        assert_eq!(tclass.fields()[1].name(), "y");
    }

    #[test]
    fn test_fieldless() {
        let tclass = TClass::fieldless("Ready").unwrap();
        assert!(tclass.is_fieldless());
        assert_eq!(tclass.len(), 0);
    }

    #[test]
    fn test_ttype_reserved_rejected() {
        assert!(TClass::fieldless("table").is_err());
        assert!(TClass::fieldless("yes").is_err());
    }

    #[test]
    fn test_equality_is_case_insensitive_on_ttype() {
        let a = point();
        let mut b = point();
        assert_eq!(a, b);
        b.ttype = "POINT".to_string();
        assert_eq!(a, b);
        b.comment = Some("different comment".to_string());
        assert_eq!(a, b);
    }

    #[test]
    fn test_equality_checks_fields() {
        let a = point();
        let mut b = point();
        b.fields[1].vtype = Some("real".to_string());
        assert_ne!(a, b);
        let c = TClass::new("point", vec![Field::new("x", Some("int")).unwrap()]).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_set_last_vtype() {
        let mut tclass = TClass::new("pair", vec![Field::new("a", None).unwrap()]).unwrap();
        tclass.set_last_vtype("real");
        assert_eq!(tclass.fields()[0].vtype.as_deref(), Some("real"));
    }
}
