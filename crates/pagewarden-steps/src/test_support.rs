//! Recording collaborators for exercising step graphs without a network.

use std::sync::Mutex;

use pagewarden_github::{
    CachedRepo, Command, GithubApiError, GithubOwner, GithubOwnerKind, GithubPlatform,
    GithubRepository, IssueRef, OrganizationMembership, RepoRef,
};

use crate::context::{LogsLocation, StepContext};
use crate::indexer::{IndexError, Indexer};

pub const TEST_LOGS_ADDRESS: &str = "https://logs.example.com/pagewarden";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Enumerates supported `PlatformCall` values.
pub enum PlatformCall {
    Repository { repo: RepoRef },
    Branch { repo: RepoRef, branch: String },
    Membership { org: String, login: String },
    Comment { issue: IssueRef, body: String },
    Star { repo: RepoRef },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Enumerates supported `IndexCall` values.
pub enum IndexCall {
    Site {
        repo: RepoRef,
        site_url: String,
        index_name: String,
    },
    Page {
        page_url: String,
        index_name: String,
    },
}

/// Command on issue #1 of `repo`.
pub fn command_on(author: &str, body: &str, repo: CachedRepo) -> Command {
    let issue = IssueRef::new(repo.repo_ref(), 1);
    Command::new(author, body, issue, repo)
}

pub fn user_repo(owner: &str, name: &str, fork: bool, gh_pages: bool) -> CachedRepo {
    CachedRepo::new(owner, GithubOwnerKind::User, name, fork, gh_pages)
}

pub fn org_repo(owner: &str, name: &str, fork: bool, gh_pages: bool) -> CachedRepo {
    CachedRepo::new(owner, GithubOwnerKind::Organization, name, fork, gh_pages)
}

#[derive(Debug, Default)]
pub struct RecordingPlatform {
    calls: Mutex<Vec<PlatformCall>>,
    repositories: Vec<(GithubRepository, bool)>,
    org_admins: Vec<(String, String)>,
    fail_membership: bool,
    fail_comments: bool,
    fail_star: bool,
}

impl RecordingPlatform {
    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn comments(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PlatformCall::Comment { body, .. } => Some(body),
                _ => None,
            })
            .collect()
    }

    pub fn stars(&self) -> Vec<RepoRef> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PlatformCall::Star { repo } => Some(repo),
                _ => None,
            })
            .collect()
    }

    pub fn membership_lookups(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, PlatformCall::Membership { .. }))
            .count()
    }

    fn record(&self, call: PlatformCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn unavailable(operation: &str) -> GithubApiError {
        GithubApiError::Status {
            operation: operation.to_string(),
            status: 503,
            body: "service unavailable".to_string(),
        }
    }
}

impl GithubPlatform for RecordingPlatform {
    fn repository(&self, repo: &RepoRef) -> Result<GithubRepository, GithubApiError> {
        self.record(PlatformCall::Repository { repo: repo.clone() });
        self.repositories
            .iter()
            .find(|(known, _)| known.repo_ref() == *repo)
            .map(|(known, _)| known.clone())
            .ok_or_else(|| GithubApiError::Status {
                operation: "get repository".to_string(),
                status: 404,
                body: "Not Found".to_string(),
            })
    }

    fn branch_exists(&self, repo: &RepoRef, branch: &str) -> Result<bool, GithubApiError> {
        self.record(PlatformCall::Branch {
            repo: repo.clone(),
            branch: branch.to_string(),
        });
        Ok(self
            .repositories
            .iter()
            .any(|(known, gh_pages)| known.repo_ref() == *repo && *gh_pages))
    }

    fn organization_membership(
        &self,
        org: &str,
        login: &str,
    ) -> Result<Option<OrganizationMembership>, GithubApiError> {
        self.record(PlatformCall::Membership {
            org: org.to_string(),
            login: login.to_string(),
        });
        if self.fail_membership {
            return Err(Self::unavailable("get organization membership"));
        }
        let admin = self
            .org_admins
            .iter()
            .any(|(admin_org, admin_login)| admin_org == org && admin_login == login);
        Ok(admin.then(|| OrganizationMembership {
            state: "active".to_string(),
            role: "admin".to_string(),
        }))
    }

    fn create_issue_comment(&self, issue: &IssueRef, body: &str) -> Result<(), GithubApiError> {
        self.record(PlatformCall::Comment {
            issue: issue.clone(),
            body: body.to_string(),
        });
        if self.fail_comments {
            return Err(Self::unavailable("create issue comment"));
        }
        Ok(())
    }

    fn star_repository(&self, repo: &RepoRef) -> Result<(), GithubApiError> {
        self.record(PlatformCall::Star { repo: repo.clone() });
        if self.fail_star {
            return Err(Self::unavailable("star repository"));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct RecordingIndexer {
    calls: Mutex<Vec<IndexCall>>,
    fail: bool,
}

impl RecordingIndexer {
    pub fn calls(&self) -> Vec<IndexCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    fn record(&self, call: IndexCall) -> Result<(), IndexError> {
        let index_name = match &call {
            IndexCall::Site { index_name, .. } | IndexCall::Page { index_name, .. } => {
                index_name.clone()
            }
        };
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        if self.fail {
            return Err(IndexError::Request {
                index_name,
                message: "indexer offline".to_string(),
            });
        }
        Ok(())
    }
}

impl Indexer for RecordingIndexer {
    fn index_site(
        &self,
        repo: &RepoRef,
        site_url: &str,
        index_name: &str,
    ) -> Result<(), IndexError> {
        self.record(IndexCall::Site {
            repo: repo.clone(),
            site_url: site_url.to_string(),
            index_name: index_name.to_string(),
        })
    }

    fn index_page(&self, page_url: &str, index_name: &str) -> Result<(), IndexError> {
        self.record(IndexCall::Page {
            page_url: page_url.to_string(),
            index_name: index_name.to_string(),
        })
    }
}

#[derive(Debug)]
/// Recording platform, recording indexer and a fixed logs location.
pub struct Harness {
    pub platform: RecordingPlatform,
    pub indexer: RecordingIndexer,
    pub logs: LogsLocation,
}

impl Default for Harness {
    fn default() -> Self {
        Self {
            platform: RecordingPlatform::default(),
            indexer: RecordingIndexer::default(),
            logs: LogsLocation::new(TEST_LOGS_ADDRESS),
        }
    }
}

impl Harness {
    pub fn context(&self) -> StepContext<'_> {
        StepContext::new(&self.platform, &self.indexer, &self.logs)
    }

    pub fn with_repository(mut self, repo: CachedRepo) -> Self {
        let metadata = GithubRepository {
            name: repo.name().to_string(),
            owner: GithubOwner {
                login: repo.owner_login().to_string(),
                kind: repo.owner_kind(),
            },
            fork: repo.is_fork(),
        };
        self.platform
            .repositories
            .push((metadata, repo.has_gh_pages_branch()));
        self
    }

    pub fn with_org_admin(mut self, org: &str, login: &str) -> Self {
        self.platform
            .org_admins
            .push((org.to_string(), login.to_string()));
        self
    }

    pub fn failing_membership(mut self) -> Self {
        self.platform.fail_membership = true;
        self
    }

    pub fn failing_comments(mut self) -> Self {
        self.platform.fail_comments = true;
        self
    }

    pub fn failing_star(mut self) -> Self {
        self.platform.fail_star = true;
        self
    }

    pub fn failing_indexer(mut self) -> Self {
        self.indexer.fail = true;
        self
    }
}
