use std::fmt;

use pagewarden_github::GithubPlatform;

use crate::indexer::Indexer;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Where operators publish the agent's logs; quoted in replies.
pub struct LogsLocation {
    address: String,
}

impl LogsLocation {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

impl fmt::Display for LogsLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
    }
}

#[derive(Clone, Copy)]
/// Collaborators a step may call while performing.
pub struct StepContext<'a> {
    pub github: &'a dyn GithubPlatform,
    pub indexer: &'a dyn Indexer,
    pub logs: &'a LogsLocation,
}

impl<'a> StepContext<'a> {
    pub fn new(
        github: &'a dyn GithubPlatform,
        indexer: &'a dyn Indexer,
        logs: &'a LogsLocation,
    ) -> Self {
        Self {
            github,
            indexer,
            logs,
        }
    }
}
