//! Evaluation tracing boundary.
//!
//! Tracing is optional, injected by the caller, and must not affect
//! evaluation results. All instrumentation flows through [`EvalTraceEvent`]
//! and [`EvalTraceSink`].

mod metrics;
mod sink;

pub use metrics::{EvalMetrics, EvalMetricsReport};
pub use sink::{EvalTraceEvent, EvalTraceSink, TracePhase};
