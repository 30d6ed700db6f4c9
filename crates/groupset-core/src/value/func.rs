use crate::value::{Value, group_equal};

/// Return the first non-`Null` value, or `Null` when every input is `Null`.
///
/// Zero-substitution for empty aggregates is spelled `coalesce([result, 0])`
/// at the projection layer; accumulators never do it themselves.
#[must_use]
pub fn coalesce<'a>(values: impl IntoIterator<Item = &'a Value>) -> Value {
    values
        .into_iter()
        .find(|value| !value.is_null())
        .cloned()
        .unwrap_or(Value::Null)
}

/// `NULLIF(a, b)`: `Null` when the operands are grouping-equal, else `a`.
///
/// `x / null_if(y, 0)` is the guard that turns a zero divisor into a `Null`
/// result instead of a `DivisionByZero` failure.
#[must_use]
pub fn null_if(left: &Value, right: &Value) -> Value {
    if group_equal(left, right) {
        Value::Null
    } else {
        left.clone()
    }
}
