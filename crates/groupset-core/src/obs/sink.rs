///
/// EvalTraceSink
///

pub trait EvalTraceSink: Send + Sync {
    fn on_event(&self, event: EvalTraceEvent);
}

///
/// TracePhase
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TracePhase {
    Partition,
    Merge,
    Materialize,
    Having,
    Sort,
}

///
/// EvalTraceEvent
///
/// `rows` on a phase event counts rows leaving that phase: rows observed for
/// `Partition`, partials folded for `Merge`, result rows built for
/// `Materialize`, and rows kept for `Having`.
///
/// `Start` and the `Partition`/`Merge` phases come from the `evaluate*`
/// entry points only. Partitions driven by hand through
/// `Evaluator::partition` and handed to `Evaluator::finish` report just the
/// finish-side events, so a sink may see `Finish` without a `Start`.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EvalTraceEvent {
    Start {
        subsets: u64,
        aggregates: u64,
    },
    Phase {
        phase: TracePhase,
        rows: u64,
    },
    Finish {
        rows_in: u64,
        groups: u64,
        rows_out: u64,
    },
}
