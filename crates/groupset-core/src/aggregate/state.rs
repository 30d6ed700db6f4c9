//! Module: aggregate::state
//! Responsibility: per-group accumulator state machines (observe/merge/finalize).
//! Does not own: deciding which rows reach an accumulator.
//! Boundary: consumed by the partition engine and by parallel merge.

use crate::{
    aggregate::{AggregateKind, AggregateSpec, DistinctValues},
    error::{ErrorClass, ErrorOrigin, EvalError},
    types::Decimal,
    value::{Value, ValueError, outranks_representative, strict_order_cmp},
};
use std::cmp::Ordering;

///
/// SumState
///
/// Running numeric total. `Empty` means no non-null input was observed,
/// which finalizes to `Null` rather than zero. Integer totals are kept in
/// i128 and only promoted to `Decimal` when a decimal input arrives.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SumState {
    #[default]
    Empty,
    Integer(i128),
    Decimal(Decimal),
}

impl SumState {
    fn add_value(self, value: &Value, kind: AggregateKind) -> Result<Self, EvalError> {
        match value {
            Value::Null => Ok(self),
            Value::Integer(v) => self.combine(Self::Integer(i128::from(*v))),
            Value::Decimal(v) => self.combine(Self::Decimal(*v)),
            other => Err(non_numeric_input(kind, other)),
        }
    }

    // Exact, order-independent addition of two partial totals.
    fn combine(self, other: Self) -> Result<Self, EvalError> {
        match (self, other) {
            (Self::Empty, other) => Ok(other),
            (this, Self::Empty) => Ok(this),
            (Self::Integer(a), Self::Integer(b)) => a
                .checked_add(b)
                .map(Self::Integer)
                .ok_or_else(|| overflow("sum")),
            (a, b) => {
                let total = a
                    .as_decimal()?
                    .checked_add(b.as_decimal()?)
                    .ok_or_else(|| overflow("sum"))?;

                Ok(Self::Decimal(total))
            }
        }
    }

    fn as_decimal(self) -> Result<Decimal, EvalError> {
        match self {
            Self::Empty => Ok(Decimal::ZERO),
            Self::Integer(v) => Decimal::from_i128(v).ok_or_else(|| overflow("sum")),
            Self::Decimal(v) => Ok(v),
        }
    }

    fn finalize(self) -> Result<Value, EvalError> {
        match self {
            Self::Empty => Ok(Value::Null),
            Self::Integer(v) => match i64::try_from(v) {
                Ok(v) => Ok(Value::Integer(v)),
                Err(_) => Ok(Value::Decimal(self.as_decimal()?)),
            },
            Self::Decimal(v) => Ok(Value::Decimal(v)),
        }
    }
}

///
/// Accumulator
///
/// Closed set of aggregate state machines, one variant per kind.
///
/// NULL inputs are skipped by every variant except `CountStar`, which counts
/// rows. `merge` is associative and commutative so partial states built over
/// disjoint row ranges combine in any order to the single-pass result.
///

#[derive(Clone, Debug)]
pub enum Accumulator {
    CountStar(u64),
    Count(u64),
    Sum(SumState),
    Avg { sum: SumState, count: u64 },
    Min(Option<Value>),
    Max(Option<Value>),
    Distinct {
        kind: AggregateKind,
        values: DistinctValues,
    },
}

impl Accumulator {
    /// Build the initial state for one aggregate kind (no DISTINCT).
    #[must_use]
    pub const fn for_kind(kind: AggregateKind) -> Self {
        match kind {
            AggregateKind::CountStar => Self::CountStar(0),
            AggregateKind::Count => Self::Count(0),
            AggregateKind::Sum => Self::Sum(SumState::Empty),
            AggregateKind::Avg => Self::Avg {
                sum: SumState::Empty,
                count: 0,
            },
            AggregateKind::Min => Self::Min(None),
            AggregateKind::Max => Self::Max(None),
        }
    }

    /// Build the initial state for one aggregate spec, honouring DISTINCT.
    #[must_use]
    pub fn for_spec(spec: &AggregateSpec) -> Self {
        if spec.needs_distinct_state() {
            Self::Distinct {
                kind: spec.kind(),
                values: DistinctValues::default(),
            }
        } else {
            Self::for_kind(spec.kind())
        }
    }

    #[must_use]
    pub const fn kind(&self) -> AggregateKind {
        match self {
            Self::CountStar(_) => AggregateKind::CountStar,
            Self::Count(_) => AggregateKind::Count,
            Self::Sum(_) => AggregateKind::Sum,
            Self::Avg { .. } => AggregateKind::Avg,
            Self::Min(_) => AggregateKind::Min,
            Self::Max(_) => AggregateKind::Max,
            Self::Distinct { kind, .. } => *kind,
        }
    }

    /// Feed one input value. `CountStar` ignores the value and counts the row.
    pub fn observe(&mut self, value: &Value) -> Result<(), EvalError> {
        if let Self::CountStar(count) = self {
            *count = count.saturating_add(1);
            return Ok(());
        }
        if value.is_null() {
            return Ok(());
        }

        match self {
            Self::CountStar(_) => {}
            Self::Count(count) => *count = count.saturating_add(1),
            Self::Sum(sum) => *sum = sum.add_value(value, AggregateKind::Sum)?,
            Self::Avg { sum, count } => {
                *sum = sum.add_value(value, AggregateKind::Avg)?;
                *count = count.saturating_add(1);
            }
            Self::Min(best) => replace_extremum(best, value, Ordering::Less, AggregateKind::Min)?,
            Self::Max(best) => {
                replace_extremum(best, value, Ordering::Greater, AggregateKind::Max)?;
            }
            Self::Distinct { kind, values } => {
                // Validate numeric input eagerly so the error surfaces on the
                // offending row rather than at finalization.
                if matches!(kind, AggregateKind::Sum | AggregateKind::Avg)
                    && value.as_decimal().is_none()
                {
                    return Err(non_numeric_input(*kind, value));
                }
                values.insert(value);
            }
        }

        Ok(())
    }

    /// Combine two partial states for the same aggregate.
    pub fn merge(self, other: Self) -> Result<Self, EvalError> {
        match (self, other) {
            (Self::CountStar(a), Self::CountStar(b)) => Ok(Self::CountStar(a.saturating_add(b))),
            (Self::Count(a), Self::Count(b)) => Ok(Self::Count(a.saturating_add(b))),
            (Self::Sum(a), Self::Sum(b)) => Ok(Self::Sum(a.combine(b)?)),
            (
                Self::Avg { sum, count },
                Self::Avg {
                    sum: other_sum,
                    count: other_count,
                },
            ) => Ok(Self::Avg {
                sum: sum.combine(other_sum)?,
                count: count.saturating_add(other_count),
            }),
            (Self::Min(mut best), Self::Min(other)) => {
                if let Some(other) = other {
                    replace_extremum(&mut best, &other, Ordering::Less, AggregateKind::Min)?;
                }
                Ok(Self::Min(best))
            }
            (Self::Max(mut best), Self::Max(other)) => {
                if let Some(other) = other {
                    replace_extremum(&mut best, &other, Ordering::Greater, AggregateKind::Max)?;
                }
                Ok(Self::Max(best))
            }
            (
                Self::Distinct { kind, mut values },
                Self::Distinct {
                    kind: other_kind,
                    values: other_values,
                },
            ) if kind == other_kind => {
                values.merge(other_values);
                Ok(Self::Distinct { kind, values })
            }
            (this, other) => Err(EvalError::aggregate_invariant(format!(
                "aggregate merge kind mismatch: {} vs {}",
                this.kind().name(),
                other.kind().name()
            ))),
        }
    }

    /// Convert the state into its output value. Called exactly once.
    ///
    /// SUM/AVG/MIN/MAX with no non-null input finalize to `Null`; COUNT
    /// variants finalize to a (possibly zero) integer.
    pub fn finalize(self) -> Result<Value, EvalError> {
        match self {
            Self::CountStar(count) | Self::Count(count) => count_value(count),
            Self::Sum(sum) => sum.finalize(),
            Self::Avg { sum, count } => average(sum, count),
            Self::Min(best) | Self::Max(best) => Ok(best.unwrap_or(Value::Null)),
            Self::Distinct { kind, values } => {
                let mut inner = Self::for_kind(kind);
                for value in values.iter() {
                    inner.observe(value)?;
                }

                inner.finalize()
            }
        }
    }
}

fn replace_extremum(
    best: &mut Option<Value>,
    candidate: &Value,
    wanted: Ordering,
    kind: AggregateKind,
) -> Result<(), EvalError> {
    let replace = match best.as_ref() {
        None => true,
        Some(current) => {
            let ordering = strict_order_cmp(candidate, current).ok_or_else(|| {
                EvalError::new(
                    ErrorClass::TypeMismatch,
                    ErrorOrigin::Aggregate,
                    format!(
                        "{} cannot compare {} with {}",
                        kind.name(),
                        candidate.value_type(),
                        current.value_type()
                    ),
                )
            })?;
            // Ties keep one representative whichever side arrived first.
            ordering == wanted
                || (ordering == Ordering::Equal && outranks_representative(candidate, current))
        }
    };
    if replace {
        *best = Some(candidate.clone());
    }

    Ok(())
}

fn average(sum: SumState, count: u64) -> Result<Value, EvalError> {
    if count == 0 {
        return Ok(Value::Null);
    }

    let count = i64::try_from(count).map_err(|_| overflow("avg"))?;
    let mean = sum
        .as_decimal()?
        .checked_div(Decimal::from_i64(count))
        .ok_or_else(|| overflow("avg"))?;

    Ok(Value::Decimal(mean))
}

fn count_value(count: u64) -> Result<Value, EvalError> {
    i64::try_from(count)
        .map(Value::Integer)
        .map_err(|_| overflow("count"))
}

fn overflow(op: &'static str) -> EvalError {
    EvalError::from(ValueError::Overflow { op }).with_origin(ErrorOrigin::Aggregate)
}

fn non_numeric_input(kind: AggregateKind, value: &Value) -> EvalError {
    EvalError::new(
        ErrorClass::TypeMismatch,
        ErrorOrigin::Aggregate,
        format!("{} requires numeric input, found {}", kind.name(), value.value_type()),
    )
}
