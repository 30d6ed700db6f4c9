use crate::value::{TriBool, Value, ValueError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl CompareOp {
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
        }
    }

    const fn holds(self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => matches!(ordering, Ordering::Equal),
            Self::Ne => !matches!(ordering, Ordering::Equal),
            Self::Lt => matches!(ordering, Ordering::Less),
            Self::Lte => !matches!(ordering, Ordering::Greater),
            Self::Gt => matches!(ordering, Ordering::Greater),
            Self::Gte => !matches!(ordering, Ordering::Less),
        }
    }
}

/// Three-valued comparison used by predicates.
///
/// Any `Null` operand yields `Unknown` before types are inspected, so
/// `Null = Null` is `Unknown`, never `True`.
pub fn compare(op: CompareOp, left: &Value, right: &Value) -> Result<TriBool, ValueError> {
    if left.is_null() || right.is_null() {
        return Ok(TriBool::Unknown);
    }

    let ordering = strict_order_cmp(left, right).ok_or_else(|| ValueError::TypeMismatch {
        op: op.symbol(),
        left: left.value_type(),
        right: right.value_type(),
    })?;

    Ok(TriBool::from_bool(op.holds(ordering)))
}

/// Grouping equality: `Null` matches `Null`, everything else delegates to
/// value equality. Incomparable variants are simply unequal.
#[must_use]
pub fn group_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        _ => strict_order_cmp(left, right) == Some(Ordering::Equal),
    }
}

/// Total canonical comparator used by the sort stage.
///
/// Ordering rules:
/// 1. Canonical variant rank (`Null` lowest, Integer and Decimal share a rank)
/// 2. Variant-specific comparison for same-ranked values
#[must_use]
pub fn canonical_cmp(left: &Value, right: &Value) -> Ordering {
    let rank = left.canonical_rank().cmp(&right.canonical_rank());
    if rank != Ordering::Equal {
        return rank;
    }

    strict_order_cmp(left, right).unwrap_or(Ordering::Equal)
}

// Strict comparator for orderable non-null variants; numerics compare across
// Integer and Decimal. Returns `None` for incomparable pairs.
pub(crate) fn strict_order_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
        (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
        (Value::Decimal(a), Value::Decimal(b)) => Some(a.cmp(b)),
        (Value::Integer(_), Value::Decimal(_)) | (Value::Decimal(_), Value::Integer(_)) => {
            Some(left.as_decimal()?.cmp(&right.as_decimal()?))
        }
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Representative choice between two grouping-equal values.
///
/// Returns true when `candidate` should replace `current`: `Decimal` beats
/// `Integer`, then the larger decimal scale wins. Any other grouping-equal
/// pair is identical, so the choice never depends on arrival order.
pub(crate) fn outranks_representative(candidate: &Value, current: &Value) -> bool {
    representative_rank(candidate) > representative_rank(current)
}

const fn representative_rank(value: &Value) -> Option<u32> {
    match value {
        Value::Decimal(decimal) => Some(decimal.scale()),
        _ => None,
    }
}
