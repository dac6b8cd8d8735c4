//! GitHub-facing data model and transport for the pagewarden agent.
//!
//! Provides the per-command `Command`/`CachedRepo` snapshot, the
//! `GithubPlatform` collaborator trait consumed by steps and checks, and a
//! blocking REST implementation of that trait.

pub mod api_client;
pub mod command;
pub mod error;
pub mod github_types;
pub mod platform;
pub mod repo_ref;

pub use api_client::{GithubApiClient, GithubApiClientConfig};
pub use command::{CachedRepo, Command};
pub use error::{truncate_for_error, GithubApiError};
pub use github_types::{
    GithubIssueComment, GithubIssueSummary, GithubOwner, GithubOwnerKind, GithubRepository,
    GithubUser, IssueCommentEvent, OrganizationMembership,
};
pub use platform::GithubPlatform;
pub use repo_ref::{IssueRef, RepoRef};
