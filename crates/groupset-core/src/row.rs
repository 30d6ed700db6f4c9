//! Row and schema contracts handed to the evaluator by the upstream executor.

use crate::{
    error::EvalError,
    value::{Value, ValueType},
};
use serde::{Deserialize, Serialize};

///
/// ColumnDef
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ColumnDef {
    pub name: String,
    pub ty: ValueType,
}

impl ColumnDef {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: ValueType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

///
/// Schema
///
/// Ordered, named, typed columns. Rows align to it positionally.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Schema {
    columns: Vec<ColumnDef>,
}

impl Schema {
    #[must_use]
    pub const fn new(columns: Vec<ColumnDef>) -> Self {
        Self { columns }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    #[must_use]
    pub fn column(&self, index: usize) -> Option<&ColumnDef> {
        self.columns.get(index)
    }

    /// Resolve a column name to its slot.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name == name)
    }

    /// Check one row against this schema: arity, then declared type of every
    /// non-null value.
    pub fn check_row(&self, row: &Row) -> Result<(), EvalError> {
        if row.len() != self.len() {
            return Err(EvalError::engine_invariant(format!(
                "row arity mismatch: expected {} values, found {}",
                self.len(),
                row.len()
            )));
        }

        for (column, value) in self.columns.iter().zip(row.values()) {
            let actual = value.value_type();
            let widened = actual == ValueType::Integer && column.ty == ValueType::Decimal;
            if actual != ValueType::Null && actual != column.ty && !widened {
                return Err(EvalError::engine_type_mismatch(format!(
                    "column '{}' declared {} but row carries {actual}",
                    column.name, column.ty
                )));
            }
        }

        Ok(())
    }
}

///
/// Row
///
/// Immutable positional tuple produced by the upstream source.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Row(Vec<Value>);

impl Row {
    #[must_use]
    pub const fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.0
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

///
/// RowSource
///
/// Pull boundary for upstream row production. `Ok(None)` ends the input;
/// an error aborts the evaluation that is pulling.
///

pub trait RowSource {
    fn next_row(&mut self) -> Result<Option<Row>, EvalError>;
}

///
/// IterRowSource
///
/// Adapts any infallible row iterator to [`RowSource`].
///

pub struct IterRowSource<I> {
    rows: I,
}

impl<I: Iterator<Item = Row>> IterRowSource<I> {
    pub const fn new(rows: I) -> Self {
        Self { rows }
    }
}

impl<I: Iterator<Item = Row>> RowSource for IterRowSource<I> {
    fn next_row(&mut self) -> Result<Option<Row>, EvalError> {
        Ok(self.rows.next())
    }
}

///
/// TESTS
///
