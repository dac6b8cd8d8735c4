use std::fmt;

use pagewarden_github::Command;
use tracing::{error, info};

use crate::check::Check;
use crate::context::StepContext;
use crate::error::StepError;
use crate::trace::TraceEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Position of a node inside its `StepGraph`.
pub struct StepId(pub(crate) usize);

impl StepId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One unit of work. Every variant except `Final` names its successor(s).
pub enum StepNode {
    Reply {
        text: String,
        next: StepId,
    },
    Check {
        check: Check,
        on_true: StepId,
        on_false: StepId,
    },
    IndexSite {
        site_url: String,
        index_name: String,
        next: StepId,
    },
    /// Indexes the page linked from the comment body.
    IndexPage {
        index_name: String,
        next: StepId,
    },
    StarRepo {
        next: StepId,
    },
    Final {
        note: Option<String>,
        failed: bool,
    },
}

impl StepNode {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Reply { .. } => "reply",
            Self::Check { .. } => "check",
            Self::IndexSite { .. } => "index_site",
            Self::IndexPage { .. } => "index_page",
            Self::StarRepo { .. } => "star_repo",
            Self::Final { .. } => "final",
        }
    }

    pub fn successors(&self) -> Vec<StepId> {
        match self {
            Self::Reply { next, .. }
            | Self::IndexSite { next, .. }
            | Self::IndexPage { next, .. }
            | Self::StarRepo { next } => vec![*next],
            Self::Check {
                on_true, on_false, ..
            } => vec![*on_true, *on_false],
            Self::Final { .. } => Vec::new(),
        }
    }

    /// Performs this node alone and returns the successor to continue with,
    /// or `None` once the chain is over.
    pub fn perform(
        &self,
        command: &Command,
        ctx: &StepContext<'_>,
        trace: &mut Vec<TraceEntry>,
    ) -> Result<Option<StepId>, StepError> {
        match self {
            Self::Reply { text, next } => {
                ctx.github.create_issue_comment(command.issue(), text)?;
                info!(issue = %command.issue(), "reply posted");
                trace.push(TraceEntry::Reply { text: text.clone() });
                Ok(Some(*next))
            }
            Self::Check {
                check,
                on_true,
                on_false,
            } => {
                let passed = check.evaluate(command, ctx)?;
                trace.push(TraceEntry::Check {
                    check: *check,
                    passed,
                });
                Ok(Some(if passed { *on_true } else { *on_false }))
            }
            Self::IndexSite {
                site_url,
                index_name,
                next,
            } => {
                let repo = command.repo().repo_ref();
                info!(repo = %repo, site_url = %site_url, index_name = %index_name, "indexing site");
                ctx.indexer.index_site(&repo, site_url, index_name)?;
                trace.push(TraceEntry::IndexSite {
                    site_url: site_url.clone(),
                    index_name: index_name.clone(),
                });
                Ok(Some(*next))
            }
            Self::IndexPage { index_name, next } => {
                let page_url = command.link().ok_or(StepError::MissingLink)?;
                info!(page_url, index_name = %index_name, "indexing page");
                ctx.indexer.index_page(page_url, index_name)?;
                trace.push(TraceEntry::IndexPage {
                    page_url: page_url.to_string(),
                    index_name: index_name.clone(),
                });
                Ok(Some(*next))
            }
            Self::StarRepo { next } => {
                let repo = &command.issue().repo;
                ctx.github.star_repository(repo)?;
                info!(repo = %repo, "repository starred");
                trace.push(TraceEntry::StarRepo { repo: repo.clone() });
                Ok(Some(*next))
            }
            Self::Final { note, failed } => {
                match (note, failed) {
                    (Some(note), true) => error!(note = %note, "finished"),
                    (Some(note), false) => info!(note = %note, "finished"),
                    (None, true) => error!("finished with failure"),
                    (None, false) => info!("finished"),
                }
                trace.push(TraceEntry::Final {
                    note: note.clone(),
                    failed: *failed,
                });
                Ok(None)
            }
        }
    }
}
