use crate::error::GithubApiError;
use crate::github_types::{GithubRepository, OrganizationMembership};
use crate::repo_ref::{IssueRef, RepoRef};

/// Blocking view of the GitHub operations the agent needs.
///
/// Every call may block on the network. Errors are fatal for the command
/// being processed.
pub trait GithubPlatform: Send + Sync {
    fn repository(&self, repo: &RepoRef) -> Result<GithubRepository, GithubApiError>;

    /// Returns `false` when the branch does not exist.
    fn branch_exists(&self, repo: &RepoRef, branch: &str) -> Result<bool, GithubApiError>;

    /// Returns `None` when `login` is not a member of `org`.
    fn organization_membership(
        &self,
        org: &str,
        login: &str,
    ) -> Result<Option<OrganizationMembership>, GithubApiError>;

    fn create_issue_comment(&self, issue: &IssueRef, body: &str) -> Result<(), GithubApiError>;

    fn star_repository(&self, repo: &RepoRef) -> Result<(), GithubApiError>;
}
