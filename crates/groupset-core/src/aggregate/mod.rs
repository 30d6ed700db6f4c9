//! Module: aggregate
//! Responsibility: aggregate specs and NULL-skipping accumulator state machines.
//! Does not own: group partitioning or HAVING evaluation.
//! Boundary: accumulators are created, fed, merged, and finalized by the engine.

mod distinct;
mod spec;
mod state;


pub use distinct::DistinctValues;
pub use spec::{AggregateKind, AggregateSpec};
pub use state::{Accumulator, SumState};
