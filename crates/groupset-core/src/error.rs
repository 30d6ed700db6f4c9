use crate::{engine::PlanError, group::GroupingSetError, value::ValueError};
use std::fmt;
use thiserror::Error as ThisError;

///
/// EvalError
///
/// Structured evaluation error with a stable classification.
/// Every failure aborts the current evaluation; nothing is retried here.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct EvalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    pub detail: Option<ErrorDetail>,
}

impl EvalError {
    /// Construct an EvalError without typed detail.
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    /// Construct an engine-origin invariant violation.
    pub(crate) fn engine_invariant(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvariantViolation,
            ErrorOrigin::Engine,
            message.into(),
        )
    }

    /// Construct an aggregate-origin invariant violation.
    pub(crate) fn aggregate_invariant(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvariantViolation,
            ErrorOrigin::Aggregate,
            message.into(),
        )
    }

    /// Construct a configuration error for a specific origin.
    pub(crate) fn configuration(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Configuration, origin, message.into())
    }

    /// Construct a row-shape type mismatch raised by the engine.
    pub(crate) fn engine_type_mismatch(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::TypeMismatch, ErrorOrigin::Engine, message.into())
    }

    /// Construct a group-count guardrail failure.
    pub(crate) fn group_limit_exceeded(attempted: u64, limit: u64) -> Self {
        Self::new(
            ErrorClass::LimitExceeded,
            ErrorOrigin::Engine,
            format!("grouped evaluation limit exceeded (groups): attempted={attempted}, limit={limit}"),
        )
    }

    /// Re-tag an error with the component that surfaced it.
    #[must_use]
    pub(crate) const fn with_origin(mut self, origin: ErrorOrigin) -> Self {
        self.origin = origin;
        self
    }

    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self.class, ErrorClass::Configuration)
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorDetail
///
/// Structured, origin-specific error detail carried by [`EvalError`].
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    Value(ValueError),
    #[error("{0}")]
    GroupingSet(GroupingSetError),
    #[error("{0}")]
    Plan(PlanError),
}

impl From<ValueError> for EvalError {
    fn from(err: ValueError) -> Self {
        Self {
            class: err.class(),
            origin: ErrorOrigin::Value,
            message: err.to_string(),
            detail: Some(ErrorDetail::Value(err)),
        }
    }
}

impl From<GroupingSetError> for EvalError {
    fn from(err: GroupingSetError) -> Self {
        Self {
            class: ErrorClass::Configuration,
            origin: ErrorOrigin::Grouping,
            message: err.to_string(),
            detail: Some(ErrorDetail::GroupingSet(err)),
        }
    }
}

impl From<PlanError> for EvalError {
    fn from(err: PlanError) -> Self {
        Self {
            class: ErrorClass::Configuration,
            origin: err.origin(),
            message: err.to_string(),
            detail: Some(ErrorDetail::Plan(err)),
        }
    }
}

///
/// ErrorClass
/// Error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Configuration,
    TypeMismatch,
    DivisionByZero,
    Overflow,
    LimitExceeded,
    InvariantViolation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Configuration => "configuration",
            Self::TypeMismatch => "type_mismatch",
            Self::DivisionByZero => "division_by_zero",
            Self::Overflow => "overflow",
            Self::LimitExceeded => "limit_exceeded",
            Self::InvariantViolation => "invariant_violation",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Component that raised the error.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Value,
    Expr,
    Grouping,
    Aggregate,
    Engine,
    Having,
    Sort,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Value => "value",
            Self::Expr => "expr",
            Self::Grouping => "grouping",
            Self::Aggregate => "aggregate",
            Self::Engine => "engine",
            Self::Having => "having",
            Self::Sort => "sort",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_errors_keep_their_class_and_detail() {
        let err = EvalError::from(ValueError::DivisionByZero);

        assert_eq!(err.class, ErrorClass::DivisionByZero);
        assert_eq!(err.origin, ErrorOrigin::Value);
        assert!(matches!(
            err.detail,
            Some(ErrorDetail::Value(ValueError::DivisionByZero))
        ));
    }

    #[test]
    fn grouping_set_errors_are_configuration_failures() {
        let err = EvalError::from(GroupingSetError::EmptySpec);

        assert!(err.is_configuration());
        assert_eq!(
            err.display_with_class(),
            "grouping:configuration: grouping set specification has no columns and no explicit grand total"
        );
    }

    #[test]
    fn with_origin_retags_without_touching_class() {
        let err = EvalError::from(ValueError::DivisionByZero).with_origin(ErrorOrigin::Having);

        assert_eq!(err.origin, ErrorOrigin::Having);
        assert_eq!(err.class, ErrorClass::DivisionByZero);
    }
}
