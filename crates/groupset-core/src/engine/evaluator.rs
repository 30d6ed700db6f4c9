use crate::{
    config::EvalConfig,
    engine::{GroupingPlan, Partition, ResultRow},
    error::{ErrorOrigin, EvalError},
    obs::{EvalTraceEvent, EvalTraceSink, TracePhase},
    row::{Row, RowSource},
    sort::{SortKey, SortTarget, sort_result_rows},
};
use rayon::prelude::*;
use std::sync::Arc;

///
/// Evaluator
///
/// Runs one validated [`GroupingPlan`] under an explicit [`EvalConfig`].
/// Each call is an independent pure evaluation: the first error aborts it
/// and no partial output is returned.
///

#[derive(Clone)]
pub struct Evaluator {
    plan: GroupingPlan,
    config: EvalConfig,
    trace: Option<Arc<dyn EvalTraceSink>>,
}

impl Evaluator {
    #[must_use]
    pub const fn new(plan: GroupingPlan, config: EvalConfig) -> Self {
        Self {
            plan,
            config,
            trace: None,
        }
    }

    /// Attach a trace sink. Tracing never changes results.
    #[must_use]
    pub fn with_trace(mut self, sink: Arc<dyn EvalTraceSink>) -> Self {
        self.trace = Some(sink);
        self
    }

    #[must_use]
    pub const fn plan(&self) -> &GroupingPlan {
        &self.plan
    }

    #[must_use]
    pub const fn config(&self) -> &EvalConfig {
        &self.config
    }

    ///
    /// ENTRY POINTS
    ///

    /// Evaluate over an in-memory row stream.
    pub fn evaluate<I>(&self, rows: I) -> Result<Vec<ResultRow>, EvalError>
    where
        I: IntoIterator<Item = Row>,
    {
        self.trace_start();

        let mut partition = self.partition();
        for row in rows {
            partition.observe(&row)?;
        }
        self.trace_phase(TracePhase::Partition, partition.rows());

        self.finish(partition)
    }

    /// Evaluate by pulling from a fallible row source until it is exhausted.
    pub fn evaluate_source(&self, source: &mut impl RowSource) -> Result<Vec<ResultRow>, EvalError> {
        self.trace_start();

        let mut partition = self.partition();
        while let Some(row) = source.next_row()? {
            partition.observe(&row)?;
        }
        self.trace_phase(TracePhase::Partition, partition.rows());

        self.finish(partition)
    }

    /// Evaluate with one worker per `parallel_chunk_rows` range.
    ///
    /// Workers own their partitions exclusively; partials are merged in
    /// range order, so output matches [`Evaluator::evaluate`] exactly.
    pub fn evaluate_parallel(&self, rows: &[Row]) -> Result<Vec<ResultRow>, EvalError> {
        self.trace_start();

        let partials = rows
            .par_chunks(self.config.effective_chunk_rows())
            .map(|chunk| {
                let mut partition = self.partition();
                for row in chunk {
                    partition.observe(row)?;
                }
                Ok(partition)
            })
            .collect::<Result<Vec<_>, EvalError>>()?;
        let observed = partials.iter().map(Partition::rows).sum();
        self.trace_phase(TracePhase::Partition, observed);

        let merged_count = partials.len() as u64;
        let mut merged = self.partition();
        for partial in partials {
            merged = merged.merge(partial)?;
        }
        self.trace_phase(TracePhase::Merge, merged_count);

        self.finish(merged)
    }

    /// Fresh worker partition for callers driving their own fan-out.
    ///
    /// No trace event is emitted here; the caller owns the fan-out, so only
    /// [`Evaluator::finish`] reports (`Materialize`, `Having`, `Finish`).
    #[must_use]
    pub fn partition(&self) -> Partition<'_> {
        Partition::new(&self.plan, self.config.max_groups)
    }

    /// Finalize a (merged) partition, then apply HAVING.
    ///
    /// Only `(subset, key)` pairs that observed at least one row produce a
    /// result; an empty input yields no rows, not even a grand total.
    pub fn finish(&self, partition: Partition<'_>) -> Result<Vec<ResultRow>, EvalError> {
        if !std::ptr::eq(partition.plan(), &self.plan) {
            return Err(EvalError::engine_invariant(
                "partition was not created by this evaluator",
            ));
        }

        let rows_in = partition.rows();
        let groups = partition.groups();
        let materialized = partition.materialize()?;
        self.trace_phase(TracePhase::Materialize, materialized.len() as u64);

        let output = match self.plan.having() {
            Some(having) => {
                let mut kept = Vec::with_capacity(materialized.len());
                for row in materialized {
                    if having.admits(&row)? {
                        kept.push(row);
                    }
                }
                self.trace_phase(TracePhase::Having, kept.len() as u64);
                kept
            }
            None => materialized,
        };

        self.trace(EvalTraceEvent::Finish {
            rows_in,
            groups,
            rows_out: output.len() as u64,
        });

        Ok(output)
    }

    /// Order result rows with this evaluator's NULL placement policy.
    pub fn sort(&self, rows: &mut [ResultRow], keys: &[SortKey]) -> Result<(), EvalError> {
        for key in keys {
            let in_range = match key.target {
                SortTarget::Key(column) => column < self.plan.key_count(),
                SortTarget::Aggregate(index) => index < self.plan.aggregates().len(),
                SortTarget::GroupingId => true,
            };
            if !in_range {
                return Err(EvalError::configuration(
                    ErrorOrigin::Sort,
                    format!("sort target {:?} is outside the plan output", key.target),
                ));
            }
        }

        sort_result_rows(rows, keys, self.config.null_order);
        self.trace_phase(TracePhase::Sort, rows.len() as u64);

        Ok(())
    }

    ///
    /// TRACE
    ///

    fn trace(&self, event: EvalTraceEvent) {
        if let Some(sink) = &self.trace {
            sink.on_event(event);
        }
    }

    fn trace_start(&self) {
        self.trace(EvalTraceEvent::Start {
            subsets: self.plan.subsets().len() as u64,
            aggregates: self.plan.aggregates().len() as u64,
        });
    }

    fn trace_phase(&self, phase: TracePhase, rows: u64) {
        self.trace(EvalTraceEvent::Phase { phase, rows });
    }
}

impl std::fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluator")
            .field("plan", &self.plan)
            .field("config", &self.config)
            .field("traced", &self.trace.is_some())
            .finish()
    }
}
