//! Module: engine
//! Responsibility: plan validation, row partitioning, parallel merge, and
//! result materialization.
//! Does not own: value semantics, accumulator algebra, or predicate logic.
//! Boundary: the only component that creates, mutates, and finalizes
//! accumulator state.

mod evaluator;
mod partition;
mod plan;
mod result;


pub use evaluator::Evaluator;
pub use partition::Partition;
pub use plan::{GroupingPlan, PlanError};
pub use result::ResultRow;
