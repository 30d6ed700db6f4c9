//! Row-level scalar expressions: grouping keys and aggregate inputs.

use crate::{
    aggregate::AggregateSpec,
    error::{ErrorOrigin, EvalError},
    row::Row,
    value::{Value, ValueError, ValueType, arith, null_if},
};
use serde::{Deserialize, Serialize};

// re-exports
pub use crate::{types::TruncUnit, value::ArithOp};

///
/// Expr
///
/// Resolved scalar expression over one input row. Column references are
/// positional. `Aggregate` is representable only so plan validation can
/// reject it where aggregates are not allowed.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Expr {
    Column(usize),
    Literal(Value),
    Arith {
        op: ArithOp,
        left: Box<Self>,
        right: Box<Self>,
    },
    Coalesce(Vec<Self>),
    NullIf(Box<Self>, Box<Self>),
    DateTrunc {
        unit: TruncUnit,
        expr: Box<Self>,
    },
    Aggregate(Box<AggregateSpec>),
}

impl Expr {
    ///
    /// CONSTRUCTION
    ///

    #[must_use]
    pub const fn column(index: usize) -> Self {
        Self::Column(index)
    }

    #[must_use]
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    #[must_use]
    pub fn arith(op: ArithOp, left: Self, right: Self) -> Self {
        Self::Arith {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    #[must_use]
    pub fn null_if(left: Self, right: Self) -> Self {
        Self::NullIf(Box::new(left), Box::new(right))
    }

    #[must_use]
    pub fn date_trunc(unit: TruncUnit, expr: Self) -> Self {
        Self::DateTrunc {
            unit,
            expr: Box::new(expr),
        }
    }

    ///
    /// INSPECTION
    ///

    /// Return true when any node of this tree is an aggregate reference.
    #[must_use]
    pub fn contains_aggregate(&self) -> bool {
        match self {
            Self::Column(_) | Self::Literal(_) => false,
            Self::Arith { left, right, .. } | Self::NullIf(left, right) => {
                left.contains_aggregate() || right.contains_aggregate()
            }
            Self::Coalesce(items) => items.iter().any(Self::contains_aggregate),
            Self::DateTrunc { expr, .. } => expr.contains_aggregate(),
            Self::Aggregate(_) => true,
        }
    }

    /// Visit every column slot referenced outside aggregate subtrees.
    pub fn for_each_column(&self, f: &mut impl FnMut(usize)) {
        match self {
            Self::Column(index) => f(*index),
            Self::Literal(_) | Self::Aggregate(_) => {}
            Self::Arith { left, right, .. } | Self::NullIf(left, right) => {
                left.for_each_column(f);
                right.for_each_column(f);
            }
            Self::Coalesce(items) => {
                for item in items {
                    item.for_each_column(f);
                }
            }
            Self::DateTrunc { expr, .. } => expr.for_each_column(f),
        }
    }

    ///
    /// EVALUATION
    ///

    /// Evaluate this expression against one row.
    pub fn eval(&self, row: &Row) -> Result<Value, EvalError> {
        match self {
            Self::Column(index) => row.get(*index).cloned().ok_or_else(|| {
                EvalError::engine_invariant(format!(
                    "column slot {index} out of range for row of {} values",
                    row.len()
                ))
            }),
            Self::Literal(value) => Ok(value.clone()),
            Self::Arith { op, left, right } => {
                let left = left.eval(row)?;
                let right = right.eval(row)?;

                Ok(arith(*op, &left, &right)?)
            }
            Self::Coalesce(items) => {
                // Short-circuit: later arguments are not evaluated once one is non-null.
                for item in items {
                    let value = item.eval(row)?;
                    if !value.is_null() {
                        return Ok(value);
                    }
                }

                Ok(Value::Null)
            }
            Self::NullIf(left, right) => Ok(null_if(&left.eval(row)?, &right.eval(row)?)),
            Self::DateTrunc { unit, expr } => date_trunc(*unit, expr.eval(row)?),
            Self::Aggregate(_) => Err(EvalError::configuration(
                ErrorOrigin::Expr,
                "aggregate expression cannot be evaluated against a single row",
            )),
        }
    }
}

fn date_trunc(unit: TruncUnit, value: Value) -> Result<Value, EvalError> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::Timestamp(ts) => ts.truncate(unit).map(Value::Timestamp).ok_or_else(|| {
            ValueError::Overflow { op: "date_trunc" }.into()
        }),
        other => Err(ValueError::TypeMismatch {
            op: "date_trunc",
            left: other.value_type(),
            right: ValueType::Timestamp,
        }
        .into()),
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorClass, types::Timestamp};

    fn row(values: Vec<Value>) -> Row {
        Row::new(values)
    }

    #[test]
    fn column_and_literal_evaluate_directly() {
        let input = row(vec![Value::text("North"), Value::Integer(1000)]);

        assert_eq!(Expr::column(1).eval(&input).expect("column"), Value::Integer(1000));
        assert_eq!(Expr::literal(7).eval(&input).expect("literal"), Value::Integer(7));
    }

    #[test]
    fn out_of_range_column_is_an_invariant_violation() {
        let err = Expr::column(3)
            .eval(&row(vec![Value::Null]))
            .expect_err("slot 3 missing");

        assert_eq!(err.class, ErrorClass::InvariantViolation);
    }

    #[test]
    fn guarded_division_yields_null_instead_of_failing() {
        let input = row(vec![Value::Integer(10), Value::Integer(0)]);
        let raw = Expr::arith(ArithOp::Div, Expr::column(0), Expr::column(1));
        let guarded = Expr::arith(
            ArithOp::Div,
            Expr::column(0),
            Expr::null_if(Expr::column(1), Expr::literal(0)),
        );

        assert_eq!(
            raw.eval(&input).expect_err("raw divide").class,
            ErrorClass::DivisionByZero
        );
        assert_eq!(guarded.eval(&input).expect("guarded divide"), Value::Null);
    }

    #[test]
    fn coalesce_short_circuits_after_first_non_null() {
        let input = row(vec![Value::Null, Value::Integer(0)]);
        // The third argument would fail if evaluated.
        let expr = Expr::Coalesce(vec![
            Expr::column(0),
            Expr::column(1),
            Expr::arith(ArithOp::Div, Expr::literal(1), Expr::literal(0)),
        ]);

        assert_eq!(expr.eval(&input).expect("coalesce"), Value::Integer(0));
    }

    #[test]
    fn date_trunc_buckets_timestamps_and_passes_null() {
        // 2024-03-15T13:45:30Z
        let input = row(vec![Value::timestamp(1_710_510_330), Value::Null]);

        assert_eq!(
            Expr::date_trunc(TruncUnit::Month, Expr::column(0))
                .eval(&input)
                .expect("month"),
            Value::Timestamp(Timestamp::from_seconds(1_709_251_200))
        );
        assert_eq!(
            Expr::date_trunc(TruncUnit::Day, Expr::column(1))
                .eval(&input)
                .expect("null"),
            Value::Null
        );
    }

    #[test]
    fn date_trunc_rejects_non_timestamps() {
        let err = Expr::date_trunc(TruncUnit::Day, Expr::literal("x"))
            .eval(&row(vec![]))
            .expect_err("text");

        assert_eq!(err.class, ErrorClass::TypeMismatch);
    }

    #[test]
    fn aggregate_detection_walks_nested_nodes() {
        let plain = Expr::Coalesce(vec![Expr::column(0), Expr::literal(0)]);
        let nested = Expr::arith(
            ArithOp::Add,
            Expr::column(0),
            Expr::Aggregate(Box::new(AggregateSpec::sum(Expr::column(1)))),
        );

        assert!(!plain.contains_aggregate());
        assert!(nested.contains_aggregate());
    }

    #[test]
    fn for_each_column_skips_aggregate_subtrees() {
        let expr = Expr::arith(
            ArithOp::Add,
            Expr::column(2),
            Expr::Aggregate(Box::new(AggregateSpec::sum(Expr::column(5)))),
        );
        let mut seen = Vec::new();
        expr.for_each_column(&mut |index| seen.push(index));

        assert_eq!(seen, vec![2]);
    }
}
