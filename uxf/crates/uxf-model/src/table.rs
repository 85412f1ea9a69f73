//! The UXF table: a rectangular record container typed by a tclass.

use uxf_util::{codes, ident, Error, Result};

use crate::{TClass, Value};

/// A typed, rectangular record container.
///
/// Every record is a tuple of exactly as many values as the tclass has
/// fields. A table bound to a fieldless tclass carries only a record
/// *count*; pushing values into it is an error.
///
/// The tclass is optional only because the parser creates the table at its
/// opening `(` and learns the ttype from the next token; a table offered
/// through the public API should always be bound.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    tclass: Option<TClass>,
    records: Vec<Vec<Value>>,
    /// Optional comment.
    pub comment: Option<String>,
}

impl Table {
    /// Creates an empty table bound to `tclass`.
    pub fn new(tclass: TClass) -> Self {
        Self {
            tclass: Some(tclass),
            records: Vec::new(),
            comment: None,
        }
    }

    /// Creates an unbound table awaiting its ttype.
    pub fn unbound() -> Self {
        Self::default()
    }

    /// The tclass, if bound.
    pub fn tclass(&self) -> Option<&TClass> {
        self.tclass.as_ref()
    }

    /// Binds the table to `tclass`.
    pub fn set_tclass(&mut self, tclass: TClass) {
        self.tclass = Some(tclass);
    }

    /// The ttype name, if bound.
    pub fn ttype(&self) -> Option<&str> {
        self.tclass.as_ref().map(TClass::ttype)
    }

    /// The fields of the bound tclass, or an empty slice.
    pub fn fields(&self) -> &[crate::Field] {
        self.tclass.as_ref().map_or(&[], TClass::fields)
    }

    /// The number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The records in order.
    pub fn records(&self) -> &[Vec<Value>] {
        &self.records
    }

    /// The record at `row`, if present.
    pub fn get(&self, row: usize) -> Option<&[Value]> {
        self.records.get(row).map(Vec::as_slice)
    }

    /// The first record, if any.
    pub fn first(&self) -> Option<&[Value]> {
        self.get(0)
    }

    /// The last record, if any.
    pub fn last(&self) -> Option<&[Value]> {
        self.records.last().map(Vec::as_slice)
    }

    /// Appends a whole record, checking its arity against the tclass.
    pub fn push_record(&mut self, record: Vec<Value>) -> Result<()> {
        let arity = self.arity()?;
        if record.len() != arity {
            return Err(Error::model(
                codes::RECORD_ARITY_MISMATCH,
                format!(
                    "expected a record of {arity} values, got {}",
                    record.len()
                ),
            ));
        }
        self.records.push(record);
        Ok(())
    }

    /// The reader-side append contract.
    ///
    /// Packs `value` into the current record, starting a new record
    /// whenever the last one is full. Fails with `#334` for fieldless (or
    /// unbound) tables.
    pub fn push(&mut self, value: Value) -> Result<()> {
        let arity = self.arity()?;
        match self.records.last_mut() {
            Some(record) if record.len() < arity => record.push(value),
            _ => self.records.push(vec![value]),
        }
        Ok(())
    }

    /// Marks the presence of one zero-arity record in a fieldless table.
    pub fn push_empty_record(&mut self) -> Result<()> {
        match &self.tclass {
            Some(tclass) if tclass.is_fieldless() => {
                self.records.push(Vec::new());
                Ok(())
            }
            _ => Err(Error::model(
                codes::RECORD_ARITY_MISMATCH,
                "only a fieldless table admits records of zero arity",
            )),
        }
    }

    fn arity(&self) -> Result<usize> {
        match &self.tclass {
            Some(tclass) if !tclass.is_fieldless() => Ok(tclass.len()),
            _ => Err(Error::model(
                codes::FIELDLESS_APPEND,
                "can't append to a fieldless table",
            )),
        }
    }

    /// The declared type of the next value [`push`](Self::push) would
    /// accept, if any.
    pub fn next_vtype(&self) -> Option<&str> {
        let tclass = self.tclass.as_ref()?;
        if tclass.is_fieldless() {
            return None;
        }
        let column = match self.records.last() {
            Some(record) if record.len() < tclass.len() => record.len(),
            _ => 0,
        };
        tclass.fields()[column].vtype.as_deref()
    }

    /// Returns true if every value this table can hold is scalar.
    ///
    /// A field with a declared scalar vtype counts without looking at the
    /// data; a field without a vtype forces a scan of the stored cells.
    pub fn is_scalar(&self) -> bool {
        let Some(tclass) = &self.tclass else {
            return true;
        };
        let mut all_declared = true;
        for field in tclass.fields() {
            match &field.vtype {
                None => {
                    all_declared = false;
                    break;
                }
                Some(vtype) if !ident::is_value_type_name(vtype) => return false,
                Some(_) => {}
            }
        }
        if all_declared {
            return true;
        }
        self.records
            .iter()
            .all(|record| record.iter().all(Value::is_scalar))
    }
}
