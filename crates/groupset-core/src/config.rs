//! Evaluation policy passed explicitly to each evaluator.
//!
//! Nothing here is ambient: two evaluators with different configs never
//! influence each other.

use serde::{Deserialize, Serialize};

const DEFAULT_MAX_GROUPS: u64 = 1_000_000;
const DEFAULT_PARALLEL_CHUNK_ROWS: usize = 4_096;

///
/// NullOrder
///
/// Placement of `Null` in a downstream sort, independent of sort direction.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum NullOrder {
    NullsFirst,
    #[default]
    NullsLast,
}

///
/// EvalConfig
///
/// Hard limits and NULL policy for one grouped evaluation.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct EvalConfig {
    pub null_order: NullOrder,

    /// Maximum live (subset, key) groups per evaluation.
    pub max_groups: u64,

    /// Rows per worker range in the parallel entry point.
    pub parallel_chunk_rows: usize,
}

impl EvalConfig {
    /// Build a config with an explicit group-count hard limit.
    #[must_use]
    pub const fn with_hard_limits(max_groups: u64) -> Self {
        Self {
            null_order: NullOrder::NullsLast,
            max_groups,
            parallel_chunk_rows: DEFAULT_PARALLEL_CHUNK_ROWS,
        }
    }

    /// Build a config with no group-count limit.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self::with_hard_limits(u64::MAX)
    }

    #[must_use]
    pub const fn with_null_order(mut self, null_order: NullOrder) -> Self {
        self.null_order = null_order;
        self
    }

    #[must_use]
    pub const fn with_parallel_chunk_rows(mut self, rows: usize) -> Self {
        self.parallel_chunk_rows = rows;
        self
    }

    // Zero would make `par_chunks` panic; treat it as one row per chunk.
    pub(crate) const fn effective_chunk_rows(&self) -> usize {
        if self.parallel_chunk_rows == 0 {
            1
        } else {
            self.parallel_chunk_rows
        }
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self::with_hard_limits(DEFAULT_MAX_GROUPS)
    }
}

///
/// TESTS
///
