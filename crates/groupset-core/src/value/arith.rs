use crate::{
    types::Decimal,
    value::{Value, ValueError},
};
use serde::{Deserialize, Serialize};

///
/// ArithOp
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }
}

/// Apply one binary arithmetic operator.
///
/// A `Null` operand yields `Null`. A zero divisor fails with
/// `DivisionByZero`; wrap the divisor in `null_if(b, 0)` to get `Null`
/// instead. Integer division truncates toward zero.
pub fn arith(op: ArithOp, left: &Value, right: &Value) -> Result<Value, ValueError> {
    if left.is_null() || right.is_null() {
        return Ok(Value::Null);
    }

    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => arith_integer(op, *a, *b).map(Value::Integer),
        (Value::Integer(_) | Value::Decimal(_), Value::Integer(_) | Value::Decimal(_)) => {
            let (Some(a), Some(b)) = (left.as_decimal(), right.as_decimal()) else {
                return Err(mismatch(op, left, right));
            };

            arith_decimal(op, a, b).map(Value::Decimal)
        }
        _ => Err(mismatch(op, left, right)),
    }
}

fn arith_integer(op: ArithOp, a: i64, b: i64) -> Result<i64, ValueError> {
    let result = match op {
        ArithOp::Add => a.checked_add(b),
        ArithOp::Sub => a.checked_sub(b),
        ArithOp::Mul => a.checked_mul(b),
        ArithOp::Div => {
            if b == 0 {
                return Err(ValueError::DivisionByZero);
            }
            a.checked_div(b)
        }
    };

    result.ok_or(ValueError::Overflow { op: op.symbol() })
}

fn arith_decimal(op: ArithOp, a: Decimal, b: Decimal) -> Result<Decimal, ValueError> {
    let result = match op {
        ArithOp::Add => a.checked_add(b),
        ArithOp::Sub => a.checked_sub(b),
        ArithOp::Mul => a.checked_mul(b),
        ArithOp::Div => {
            if b.is_zero() {
                return Err(ValueError::DivisionByZero);
            }
            a.checked_div(b)
        }
    };

    result.ok_or(ValueError::Overflow { op: op.symbol() })
}

const fn mismatch(op: ArithOp, left: &Value, right: &Value) -> ValueError {
    ValueError::TypeMismatch {
        op: op.symbol(),
        left: left.value_type(),
        right: right.value_type(),
    }
}
