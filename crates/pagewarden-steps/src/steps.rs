//! Run wrapper pairing the primary graph with its failure fallback.
//!
//! `Ready -> Running -> Completed`, or on an unrecoverable failure
//! `Running -> FallbackRunning -> FallbackCompleted`. `perform` consumes the
//! wrapper, so the primary graph and the fallback each run at most once.

use std::fmt;

use pagewarden_github::Command;
use tracing::{debug, error, info};

use crate::context::StepContext;
use crate::error::StepError;
use crate::graph::StepGraph;
use crate::trace::StepTrace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Enumerates supported `StepsState` values.
pub enum StepsState {
    Ready,
    Running,
    Completed,
    FallbackRunning,
    FallbackCompleted,
}

impl StepsState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::FallbackRunning => "fallback_running",
            Self::FallbackCompleted => "fallback_completed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::FallbackCompleted)
    }
}

impl fmt::Display for StepsState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
/// Terminal result of one `Steps::perform`.
pub enum StepsOutcome {
    Completed {
        trace: StepTrace,
    },
    FallbackCompleted {
        error: StepError,
        primary_trace: StepTrace,
        fallback_trace: StepTrace,
        /// Set when the fallback itself could not finish; it is not retried.
        fallback_error: Option<StepError>,
    },
}

impl StepsOutcome {
    pub fn state(&self) -> StepsState {
        match self {
            Self::Completed { .. } => StepsState::Completed,
            Self::FallbackCompleted { .. } => StepsState::FallbackCompleted,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    pub fn primary_trace(&self) -> &StepTrace {
        match self {
            Self::Completed { trace } => trace,
            Self::FallbackCompleted { primary_trace, .. } => primary_trace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Primary step graph plus the fixed fallback for one command.
pub struct Steps {
    primary: StepGraph,
    fallback: StepGraph,
}

impl Steps {
    pub fn new(primary: StepGraph, fallback: StepGraph) -> Self {
        Self { primary, fallback }
    }

    pub fn primary(&self) -> &StepGraph {
        &self.primary
    }

    pub fn fallback(&self) -> &StepGraph {
        &self.fallback
    }

    pub fn perform(self, command: &Command, ctx: &StepContext<'_>) -> StepsOutcome {
        let mut state = StepsState::Ready;
        transition(&mut state, StepsState::Running);
        let outcome = match self.primary.perform(command, ctx) {
            Ok(trace) => {
                transition(&mut state, StepsState::Completed);
                info!(path = ?trace.labels(), "command completed");
                StepsOutcome::Completed { trace }
            }
            Err(failure) => {
                error!(
                    error = %failure.error,
                    path = ?failure.trace.labels(),
                    "step failed, running fallback"
                );
                transition(&mut state, StepsState::FallbackRunning);
                let (fallback_trace, fallback_error) = match self.fallback.perform(command, ctx) {
                    Ok(trace) => (trace, None),
                    Err(fallback_failure) => {
                        error!(error = %fallback_failure.error, "fallback failed");
                        (fallback_failure.trace, Some(fallback_failure.error))
                    }
                };
                transition(&mut state, StepsState::FallbackCompleted);
                StepsOutcome::FallbackCompleted {
                    error: failure.error,
                    primary_trace: failure.trace,
                    fallback_trace,
                    fallback_error,
                }
            }
        };
        debug_assert!(state.is_terminal(), "steps finished in state {state}");
        debug_assert_eq!(state, outcome.state());
        outcome
    }
}

fn transition(state: &mut StepsState, next: StepsState) {
    debug!(from = %state, to = %next, "steps state");
    *state = next;
}
