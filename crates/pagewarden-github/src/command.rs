//! Immutable per-command view of an inbound comment and its repository.

use serde_json::Value;
use tracing::debug;

use crate::error::GithubApiError;
use crate::github_types::{GithubOwnerKind, IssueCommentEvent};
use crate::platform::GithubPlatform;
use crate::repo_ref::{IssueRef, RepoRef};

pub const GH_PAGES_BRANCH: &str = "gh-pages";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Snapshot of the repository metadata every check of one command observes.
pub struct CachedRepo {
    owner_login: String,
    owner_kind: GithubOwnerKind,
    name: String,
    fork: bool,
    gh_pages_branch: bool,
}

impl CachedRepo {
    pub fn new(
        owner_login: impl Into<String>,
        owner_kind: GithubOwnerKind,
        name: impl Into<String>,
        fork: bool,
        gh_pages_branch: bool,
    ) -> Self {
        Self {
            owner_login: owner_login.into(),
            owner_kind,
            name: name.into(),
            fork,
            gh_pages_branch,
        }
    }

    /// Loads the repository and checks for its pages branch: two remote calls,
    /// made once per command.
    pub fn fetch(platform: &dyn GithubPlatform, repo: &RepoRef) -> Result<Self, GithubApiError> {
        let metadata = platform.repository(repo)?;
        let gh_pages_branch = platform.branch_exists(repo, GH_PAGES_BRANCH)?;
        debug!(
            repo = %repo,
            fork = metadata.fork,
            gh_pages_branch,
            "repository snapshot loaded"
        );
        Ok(Self {
            owner_login: metadata.owner.login,
            owner_kind: metadata.owner.kind,
            name: metadata.name,
            fork: metadata.fork,
            gh_pages_branch,
        })
    }

    pub fn owner_login(&self) -> &str {
        &self.owner_login
    }

    pub fn owner_kind(&self) -> GithubOwnerKind {
        self.owner_kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_fork(&self) -> bool {
        self.fork
    }

    pub fn has_gh_pages_branch(&self) -> bool {
        self.gh_pages_branch
    }

    pub fn repo_ref(&self) -> RepoRef {
        RepoRef::new(self.owner_login.clone(), self.name.clone())
    }

    /// `owner.github.io`, or `owner.github.io/repo` for project pages.
    pub fn pages_domain(&self) -> String {
        if self.gh_pages_branch {
            format!("{}.github.io/{}", self.owner_login, self.name)
        } else {
            format!("{}.github.io", self.owner_login)
        }
    }
}

#[derive(Debug, Clone)]
/// One inbound comment plus the context needed to act on it.
pub struct Command {
    author_login: String,
    body: String,
    issue: IssueRef,
    repo: CachedRepo,
    json: Value,
}

impl Command {
    pub fn new(
        author_login: impl Into<String>,
        body: impl Into<String>,
        issue: IssueRef,
        repo: CachedRepo,
    ) -> Self {
        let author_login = author_login.into();
        let body = body.into();
        let json = serde_json::json!({
            "body": body,
            "user": { "login": author_login },
        });
        Self {
            author_login,
            body,
            issue,
            repo,
            json,
        }
    }

    /// Builds the command for a webhook event, fetching the repository
    /// snapshot the issue belongs to.
    pub fn load(
        platform: &dyn GithubPlatform,
        event: &IssueCommentEvent,
    ) -> Result<Self, GithubApiError> {
        let repo = CachedRepo::fetch(platform, &event.issue.repo)?;
        Ok(Self {
            author_login: event.comment.user.login.clone(),
            body: event.comment.body.clone().unwrap_or_default(),
            issue: event.issue.clone(),
            repo,
            json: event.raw_comment.clone(),
        })
    }

    pub fn author_login(&self) -> &str {
        &self.author_login
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn issue(&self) -> &IssueRef {
        &self.issue
    }

    pub fn repo(&self) -> &CachedRepo {
        &self.repo
    }

    /// Raw comment object as received.
    pub fn json(&self) -> &Value {
        &self.json
    }

    /// Text between the first `(` and the first `)` that follows it.
    pub fn link(&self) -> Option<&str> {
        let start = self.body.find('(')? + 1;
        let len = self.body[start..].find(')')?;
        Some(self.body[start..start + len].trim())
    }
}
