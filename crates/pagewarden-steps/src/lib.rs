//! Precondition-gated step graphs and their execution.
//!
//! A command is answered by walking a `StepGraph`: checks branch on facts
//! about the command, terminal actions reply, index or star. `Steps` pairs a
//! graph with the fallback that reports an unrecoverable failure.

pub mod check;
pub mod context;
pub mod error;
pub mod graph;
pub mod indexer;
pub mod step;
pub mod steps;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod trace;

pub use check::Check;
pub use context::{LogsLocation, StepContext};
pub use error::{StepError, StepGraphError};
pub use graph::{StepGraph, StepGraphBuilder};
pub use indexer::{IndexError, Indexer, TracingIndexer};
pub use step::{StepId, StepNode};
pub use steps::{Steps, StepsOutcome, StepsState};
pub use trace::{StepTrace, TraceEntry};
