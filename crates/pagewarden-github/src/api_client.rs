use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::error::{truncate_for_error, GithubApiError};
use crate::github_types::{GithubRepository, OrganizationMembership};
use crate::platform::GithubPlatform;
use crate::repo_ref::{IssueRef, RepoRef};

const ERROR_BODY_MAX_CHARS: usize = 800;

#[derive(Debug, Clone)]
/// Public struct `GithubApiClientConfig` used across pagewarden components.
pub struct GithubApiClientConfig {
    pub api_base: String,
    pub token: String,
    pub request_timeout_ms: u64,
}

#[derive(Clone)]
/// Blocking GitHub REST client implementing [`GithubPlatform`].
pub struct GithubApiClient {
    http: Client,
    api_base: String,
}

impl GithubApiClient {
    pub fn new(config: &GithubApiClientConfig) -> Result<Self, GithubApiError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("pagewarden-agent"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            reqwest::header::HeaderValue::from_static("2022-11-28"),
        );
        let auth_header = format!("Bearer {}", config.token.trim());
        headers.insert(
            reqwest::header::AUTHORIZATION,
            reqwest::header::HeaderValue::from_str(&auth_header).map_err(|_| {
                GithubApiError::Config("invalid github authorization header".to_string())
            })?,
        );

        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.request_timeout_ms.max(1)))
            .build()
            .map_err(|source| GithubApiError::Transport {
                operation: "client setup".to_string(),
                source,
            })?;
        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    fn send(&self, operation: &str, request: RequestBuilder) -> Result<Response, GithubApiError> {
        debug!(operation, "github api request");
        request.send().map_err(|source| GithubApiError::Transport {
            operation: operation.to_string(),
            source,
        })
    }

    fn ensure_success(operation: &str, response: Response) -> Result<Response, GithubApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(GithubApiError::Status {
            operation: operation.to_string(),
            status: status.as_u16(),
            body: truncate_for_error(&body, ERROR_BODY_MAX_CHARS),
        })
    }

    fn decode<T: DeserializeOwned>(operation: &str, response: Response) -> Result<T, GithubApiError> {
        response.json::<T>().map_err(|error| GithubApiError::Decode {
            operation: operation.to_string(),
            message: error.to_string(),
        })
    }

    fn request_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<T, GithubApiError> {
        let response = self.send(operation, request)?;
        let response = Self::ensure_success(operation, response)?;
        Self::decode(operation, response)
    }

    /// Like `request_json`, but maps `404 Not Found` to `None`.
    fn request_optional_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<Option<T>, GithubApiError> {
        let response = self.send(operation, request)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::ensure_success(operation, response)?;
        Self::decode(operation, response).map(Some)
    }
}

impl GithubPlatform for GithubApiClient {
    fn repository(&self, repo: &RepoRef) -> Result<GithubRepository, GithubApiError> {
        self.request_json(
            "get repository",
            self.http.get(format!(
                "{}/repos/{}/{}",
                self.api_base, repo.owner, repo.name
            )),
        )
    }

    fn branch_exists(&self, repo: &RepoRef, branch: &str) -> Result<bool, GithubApiError> {
        let found: Option<serde_json::Value> = self.request_optional_json(
            "get branch",
            self.http.get(format!(
                "{}/repos/{}/{}/branches/{}",
                self.api_base, repo.owner, repo.name, branch
            )),
        )?;
        Ok(found.is_some())
    }

    fn organization_membership(
        &self,
        org: &str,
        login: &str,
    ) -> Result<Option<OrganizationMembership>, GithubApiError> {
        self.request_optional_json(
            "get organization membership",
            self.http
                .get(format!("{}/orgs/{}/memberships/{}", self.api_base, org, login)),
        )
    }

    fn create_issue_comment(&self, issue: &IssueRef, body: &str) -> Result<(), GithubApiError> {
        let operation = "create issue comment";
        let payload = json!({ "body": body });
        let response = self.send(
            operation,
            self.http
                .post(format!(
                    "{}/repos/{}/{}/issues/{}/comments",
                    self.api_base, issue.repo.owner, issue.repo.name, issue.number
                ))
                .json(&payload),
        )?;
        Self::ensure_success(operation, response).map(|_| ())
    }

    fn star_repository(&self, repo: &RepoRef) -> Result<(), GithubApiError> {
        let operation = "star repository";
        let response = self.send(
            operation,
            self.http
                .put(format!(
                    "{}/user/starred/{}/{}",
                    self.api_base, repo.owner, repo.name
                ))
                .header(reqwest::header::CONTENT_LENGTH, "0"),
        )?;
        Self::ensure_success(operation, response).map(|_| ())
    }
}
