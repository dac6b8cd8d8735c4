use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::repo_ref::{IssueRef, RepoRef};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
/// Public struct `GithubUser` used across pagewarden components.
pub struct GithubUser {
    pub login: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
/// Enumerates supported `GithubOwnerKind` values.
pub enum GithubOwnerKind {
    #[default]
    User,
    Organization,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
/// Public struct `GithubOwner` used across pagewarden components.
pub struct GithubOwner {
    pub login: String,
    #[serde(rename = "type", default)]
    pub kind: GithubOwnerKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
/// Repository metadata as returned by `GET /repos/{owner}/{repo}`.
pub struct GithubRepository {
    pub name: String,
    pub owner: GithubOwner,
    #[serde(default)]
    pub fork: bool,
}

impl GithubRepository {
    pub fn repo_ref(&self) -> RepoRef {
        RepoRef::new(self.owner.login.clone(), self.name.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
/// Public struct `GithubIssueComment` used across pagewarden components.
pub struct GithubIssueComment {
    pub id: u64,
    pub body: Option<String>,
    pub user: GithubUser,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GithubIssueSummary {
    pub number: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
/// Membership of a user in an organization (`GET /orgs/{org}/memberships/{user}`).
pub struct OrganizationMembership {
    pub state: String,
    pub role: String,
}

impl OrganizationMembership {
    pub fn is_active_admin(&self) -> bool {
        self.state.eq_ignore_ascii_case("active") && self.role.eq_ignore_ascii_case("admin")
    }
}

#[derive(Debug, Clone)]
/// `issue_comment` webhook payload: the action, the comment, its issue and
/// repository.
///
/// The raw comment object is retained so callers can reach fields the typed
/// view does not model.
pub struct IssueCommentEvent {
    pub action: String,
    pub comment: GithubIssueComment,
    pub issue: IssueRef,
    pub raw_comment: Value,
}

impl IssueCommentEvent {
    pub fn from_payload(payload: &Value) -> Result<Self, crate::GithubApiError> {
        #[derive(Deserialize)]
        struct Payload {
            #[serde(default)]
            action: String,
            comment: Value,
            issue: GithubIssueSummary,
            repository: GithubRepository,
        }

        let decode = |message: String| crate::GithubApiError::Decode {
            operation: "issue comment event".to_string(),
            message,
        };
        let parsed: Payload =
            serde_json::from_value(payload.clone()).map_err(|error| decode(error.to_string()))?;
        let comment: GithubIssueComment = serde_json::from_value(parsed.comment.clone())
            .map_err(|error| decode(error.to_string()))?;
        Ok(Self {
            action: parsed.action,
            comment,
            issue: IssueRef::new(parsed.repository.repo_ref(), parsed.issue.number),
            raw_comment: parsed.comment,
        })
    }

    /// Only freshly posted comments carry a command; edits and deletions don't.
    pub fn is_created(&self) -> bool {
        self.action == "created"
    }
}
