use crate::obs::{EvalTraceEvent, EvalTraceSink};
use std::sync::{Mutex, PoisonError};

///
/// EvalMetricsReport
///
/// Point-in-time copy of the counters held by [`EvalMetrics`].
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct EvalMetricsReport {
    pub evaluations: u64,
    pub rows_in: u64,
    pub groups: u64,
    pub rows_out: u64,
    pub rows_filtered: u64,
}

///
/// EvalMetrics
///
/// Counter-accumulating trace sink. One instance may be shared by many
/// evaluators, including ones running on different threads.
///

#[derive(Debug, Default)]
pub struct EvalMetrics {
    state: Mutex<EvalMetricsReport>,
}

impl EvalMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn report(&self) -> EvalMetricsReport {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn reset(&self) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = EvalMetricsReport::default();
    }
}

impl EvalTraceSink for EvalMetrics {
    fn on_event(&self, event: EvalTraceEvent) {
        let mut m = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        match event {
            EvalTraceEvent::Start { .. } | EvalTraceEvent::Phase { .. } => {}
            EvalTraceEvent::Finish {
                rows_in,
                groups,
                rows_out,
            } => {
                // Every group materializes one row; HAVING drops the rest.
                m.evaluations = m.evaluations.saturating_add(1);
                m.rows_in = m.rows_in.saturating_add(rows_in);
                m.groups = m.groups.saturating_add(groups);
                m.rows_out = m.rows_out.saturating_add(rows_out);
                m.rows_filtered = m.rows_filtered.saturating_add(groups.saturating_sub(rows_out));
            }
        }
    }
}
