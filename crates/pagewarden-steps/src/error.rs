use pagewarden_github::GithubApiError;
use thiserror::Error;

use crate::indexer::IndexError;
use crate::step::StepId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Enumerates supported `StepGraphError` values.
pub enum StepGraphError {
    #[error("step {node} refers to successor {successor} which was not built before it")]
    UnknownSuccessor { node: StepId, successor: StepId },
    #[error("step {0} does not exist in this graph")]
    UnknownStep(StepId),
}

#[derive(Debug, Error)]
/// Unrecoverable failure while performing a step.
pub enum StepError {
    #[error(transparent)]
    Github(#[from] GithubApiError),
    #[error(transparent)]
    Indexing(#[from] IndexError),
    #[error("comment does not contain a page link")]
    MissingLink,
    #[error(transparent)]
    Graph(#[from] StepGraphError),
}
