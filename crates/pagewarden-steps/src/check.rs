//! Boolean facts about a command that gate the index graph.

use std::fmt;

use pagewarden_github::{Command, GithubOwnerKind};
use tracing::{info, warn};

use crate::context::StepContext;
use crate::error::StepError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Enumerates supported `Check` values.
pub enum Check {
    /// Repository is named `owner.github.io`.
    RepoName,
    GhPagesBranch,
    /// Comment author owns the repository.
    AuthorOwner,
    /// Comment author is an active admin of the owning organization.
    OrganizationAdmin,
    RepoFork,
    /// Linked page lives on the repository's pages domain.
    PageHostedOnGithub,
}

impl Check {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RepoName => "repo_name",
            Self::GhPagesBranch => "gh_pages_branch",
            Self::AuthorOwner => "author_owner",
            Self::OrganizationAdmin => "organization_admin",
            Self::RepoFork => "repo_fork",
            Self::PageHostedOnGithub => "page_hosted_on_github",
        }
    }

    pub fn evaluate(self, command: &Command, ctx: &StepContext<'_>) -> Result<bool, StepError> {
        let repo = command.repo();
        let passed = match self {
            Self::RepoName => {
                let expected = format!("{}.github.io", repo.owner_login());
                repo.name().eq_ignore_ascii_case(&expected)
            }
            Self::GhPagesBranch => repo.has_gh_pages_branch(),
            Self::AuthorOwner => command
                .author_login()
                .eq_ignore_ascii_case(repo.owner_login()),
            Self::OrganizationAdmin => {
                if repo.owner_kind() != GithubOwnerKind::Organization {
                    info!(
                        owner = repo.owner_login(),
                        "repository owner is not an organization"
                    );
                    false
                } else {
                    ctx.github
                        .organization_membership(repo.owner_login(), command.author_login())?
                        .is_some_and(|membership| membership.is_active_admin())
                }
            }
            Self::RepoFork => repo.is_fork(),
            Self::PageHostedOnGithub => match command.link() {
                Some(link) => link_on_domain(link, &repo.pages_domain()),
                None => {
                    warn!("comment does not contain a page link");
                    false
                }
            },
        };
        info!(
            check = self.as_str(),
            passed,
            author = command.author_login(),
            repo = %repo.repo_ref(),
            "precondition evaluated"
        );
        Ok(passed)
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `link` must be `http(s)://` + `domain`, followed by nothing or a
/// path/query/fragment separator.
fn link_on_domain(link: &str, domain: &str) -> bool {
    let Some(rest) = link
        .strip_prefix("https://")
        .or_else(|| link.strip_prefix("http://"))
    else {
        return false;
    };
    if rest.len() < domain.len() || !rest.is_char_boundary(domain.len()) {
        return false;
    }
    let (head, tail) = rest.split_at(domain.len());
    head.eq_ignore_ascii_case(domain)
        && (tail.is_empty() || tail.starts_with(&['/', '?', '#'][..]))
}
