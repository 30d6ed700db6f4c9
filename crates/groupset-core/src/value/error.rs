use crate::{error::ErrorClass, value::ValueType};
use thiserror::Error as ThisError;

///
/// ValueError
///
/// Scalar operator failures. Operand types are reported by name only; a
/// `Null` operand never reaches this taxonomy because it short-circuits first.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ValueError {
    #[error("operator '{op}' is not defined for {left} and {right}")]
    TypeMismatch {
        op: &'static str,
        left: ValueType,
        right: ValueType,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("numeric overflow in '{op}'")]
    Overflow { op: &'static str },
}

impl ValueError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::TypeMismatch { .. } => ErrorClass::TypeMismatch,
            Self::DivisionByZero => ErrorClass::DivisionByZero,
            Self::Overflow { .. } => ErrorClass::Overflow,
        }
    }
}
