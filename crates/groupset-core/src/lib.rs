//! Core grouping-and-aggregation evaluator: three-valued NULL logic, grouping
//! set expansion, NULL-skipping accumulators, partitioning, and HAVING.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod aggregate;
pub mod config;
pub mod engine;
pub mod error;
pub mod expr;
pub mod group;
pub mod having;
pub mod obs;
pub mod row;
pub mod sort;
pub mod types;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// CONSTANTS
///

/// Maximum number of grouping key expressions one plan may declare.
///
/// Grouping subsets and `GROUPING()` bits are tracked in a `u64` mask.
pub const MAX_GROUPING_COLUMNS: usize = 64;

///
/// Prelude
///
/// Prelude contains the vocabulary needed to build and run one grouped
/// evaluation. Sinks and sort helpers stay one module down.
///

pub mod prelude {
    pub use crate::{
        aggregate::{AggregateKind, AggregateSpec},
        config::{EvalConfig, NullOrder},
        engine::{Evaluator, GroupingPlan, ResultRow},
        error::{ErrorClass, EvalError},
        expr::{ArithOp, Expr, TruncUnit},
        group::GroupingSetSpec,
        having::{HavingOperand, HavingPredicate},
        row::{ColumnDef, Row, Schema},
        value::{CompareOp, TriBool, Value, ValueType},
    };
}
