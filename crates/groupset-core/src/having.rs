//! Module: having
//! Responsibility: three-valued predicate evaluation over materialized group rows.
//! Does not own: aggregate finalization or subtotal rendering.
//! Boundary: the engine keeps a row only when its predicate is `TriBool::True`.

use crate::{
    engine::{PlanError, ResultRow},
    error::{ErrorOrigin, EvalError},
    value::{ArithOp, CompareOp, TriBool, Value, ValueError, arith, compare, null_if},
};
use serde::{Deserialize, Serialize};

///
/// HavingOperand
///
/// Scalar operand resolved against one result row. `Key(i)` reads grouping
/// key column `i`, which is `Null` on rows whose subset omits it.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum HavingOperand {
    Literal(Value),
    Key(usize),
    Aggregate(usize),
    Grouping(Vec<usize>),
    Arith {
        op: ArithOp,
        left: Box<Self>,
        right: Box<Self>,
    },
    Coalesce(Vec<Self>),
    NullIf(Box<Self>, Box<Self>),
}

impl HavingOperand {
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

    /// Resolve this operand against one result row.
    pub fn eval(&self, row: &ResultRow) -> Result<Value, EvalError> {
        match self {
            Self::Literal(value) => Ok(value.clone()),
            Self::Key(index) => row.key(*index).cloned().ok_or_else(|| {
                having_invariant(format!("grouping key {index} missing from result row"))
            }),
            Self::Aggregate(index) => row.aggregate(*index).cloned().ok_or_else(|| {
                having_invariant(format!("aggregate {index} missing from result row"))
            }),
            Self::Grouping(columns) => {
                let id = row.grouping_id(columns);
                i64::try_from(id)
                    .map(Value::Integer)
                    .map_err(|_| having_value_error(ValueError::Overflow { op: "grouping" }))
            }
            Self::Arith { op, left, right } => {
                arith(*op, &left.eval(row)?, &right.eval(row)?).map_err(having_value_error)
            }
            Self::Coalesce(items) => {
                for item in items {
                    let value = item.eval(row)?;
                    if !value.is_null() {
                        return Ok(value);
                    }
                }

                Ok(Value::Null)
            }
            Self::NullIf(left, right) => Ok(null_if(&left.eval(row)?, &right.eval(row)?)),
        }
    }

    fn validate(&self, key_count: usize, aggregate_count: usize) -> Result<(), PlanError> {
        match self {
            Self::Literal(_) => Ok(()),
            Self::Key(index) => check_key(*index, key_count),
            Self::Aggregate(index) => {
                if *index < aggregate_count {
                    Ok(())
                } else {
                    Err(PlanError::UnknownHavingAggregate {
                        index: *index,
                        aggregate_count,
                    })
                }
            }
            Self::Grouping(columns) => {
                if columns.is_empty() {
                    return Err(PlanError::EmptyGroupingCall);
                }
                columns
                    .iter()
                    .try_for_each(|&column| check_key(column, key_count))
            }
            Self::Arith { left, right, .. } | Self::NullIf(left, right) => {
                left.validate(key_count, aggregate_count)?;
                right.validate(key_count, aggregate_count)
            }
            Self::Coalesce(items) => items
                .iter()
                .try_for_each(|item| item.validate(key_count, aggregate_count)),
        }
    }
}

///
/// HavingPredicate
///
/// Boolean tree evaluated with Kleene logic. `InList` follows SQL `IN`:
/// a `Null` operand or a non-matching list containing `Null` is `Unknown`,
/// so `x NOT IN (…, NULL)` never admits a row.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum HavingPredicate {
    True,
    False,
    Compare {
        op: CompareOp,
        left: HavingOperand,
        right: HavingOperand,
    },
    And(Vec<Self>),
    Or(Vec<Self>),
    Not(Box<Self>),
    IsNull(HavingOperand),
    InList {
        operand: HavingOperand,
        list: Vec<HavingOperand>,
        negated: bool,
    },
}

impl HavingPredicate {
    ///
    /// CONSTRUCTION
    ///

    #[must_use]
    pub const fn compare(op: CompareOp, left: HavingOperand, right: HavingOperand) -> Self {
        Self::Compare { op, left, right }
    }

    #[must_use]
    pub fn negate(inner: Self) -> Self {
        Self::Not(Box::new(inner))
    }

    #[must_use]
    pub const fn in_list(operand: HavingOperand, list: Vec<HavingOperand>) -> Self {
        Self::InList {
            operand,
            list,
            negated: false,
        }
    }

    #[must_use]
    pub const fn not_in_list(operand: HavingOperand, list: Vec<HavingOperand>) -> Self {
        Self::InList {
            operand,
            list,
            negated: true,
        }
    }

    ///
    /// EVALUATION
    ///

    /// Evaluate against one result row.
    pub fn eval(&self, row: &ResultRow) -> Result<TriBool, EvalError> {
        match self {
            Self::True => Ok(TriBool::True),
            Self::False => Ok(TriBool::False),
            Self::Compare { op, left, right } => {
                compare(*op, &left.eval(row)?, &right.eval(row)?).map_err(having_value_error)
            }
            Self::And(items) => {
                let mut acc = TriBool::True;
                for item in items {
                    acc = acc & item.eval(row)?;
                    if acc == TriBool::False {
                        break;
                    }
                }

                Ok(acc)
            }
            Self::Or(items) => {
                let mut acc = TriBool::False;
                for item in items {
                    acc = acc | item.eval(row)?;
                    if acc == TriBool::True {
                        break;
                    }
                }

                Ok(acc)
            }
            Self::Not(inner) => Ok(!inner.eval(row)?),
            Self::IsNull(operand) => Ok(TriBool::from_bool(operand.eval(row)?.is_null())),
            Self::InList {
                operand,
                list,
                negated,
            } => {
                let probe = operand.eval(row)?;
                let mut found = TriBool::False;
                for item in list {
                    found = found
                        | compare(CompareOp::Eq, &probe, &item.eval(row)?)
                            .map_err(having_value_error)?;
                    if found == TriBool::True {
                        break;
                    }
                }

                Ok(if *negated { !found } else { found })
            }
        }
    }

    /// Return true only when the predicate is `True`; `False` and `Unknown`
    /// both reject.
    pub fn admits(&self, row: &ResultRow) -> Result<bool, EvalError> {
        Ok(self.eval(row)?.is_true())
    }

    /// Check every key and aggregate reference against the plan shape.
    pub(crate) fn validate(
        &self,
        key_count: usize,
        aggregate_count: usize,
    ) -> Result<(), PlanError> {
        match self {
            Self::True | Self::False => Ok(()),
            Self::Compare { left, right, .. } => {
                left.validate(key_count, aggregate_count)?;
                right.validate(key_count, aggregate_count)
            }
            Self::And(items) | Self::Or(items) => items
                .iter()
                .try_for_each(|item| item.validate(key_count, aggregate_count)),
            Self::Not(inner) => inner.validate(key_count, aggregate_count),
            Self::IsNull(operand) => operand.validate(key_count, aggregate_count),
            Self::InList { operand, list, .. } => {
                operand.validate(key_count, aggregate_count)?;
                list.iter()
                    .try_for_each(|item| item.validate(key_count, aggregate_count))
            }
        }
    }
}

const fn check_key(index: usize, key_count: usize) -> Result<(), PlanError> {
    if index < key_count {
        Ok(())
    } else {
        Err(PlanError::UnknownHavingKey { index, key_count })
    }
}

fn having_value_error(err: ValueError) -> EvalError {
    EvalError::from(err).with_origin(ErrorOrigin::Having)
}

fn having_invariant(message: String) -> EvalError {
    EvalError::engine_invariant(message).with_origin(ErrorOrigin::Having)
}

///
/// TESTS
///
