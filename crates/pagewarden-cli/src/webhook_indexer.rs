use std::time::Duration;

use anyhow::{Context, Result};
use pagewarden_github::{truncate_for_error, RepoRef};
use pagewarden_steps::{IndexError, Indexer};
use reqwest::blocking::Client;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum IndexRequest<'a> {
    Site {
        repository: String,
        url: &'a str,
        index_name: &'a str,
    },
    Page {
        url: &'a str,
        index_name: &'a str,
    },
}

impl IndexRequest<'_> {
    fn index_name(&self) -> &str {
        match self {
            Self::Site { index_name, .. } | Self::Page { index_name, .. } => index_name,
        }
    }
}

/// Forwards index requests to an HTTP endpoint owned by the indexing service.
pub(crate) struct WebhookIndexer {
    http: Client,
    endpoint: String,
}

impl WebhookIndexer {
    pub(crate) fn new(endpoint: &str, request_timeout_ms: u64) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(request_timeout_ms.max(1)))
            .build()
            .context("failed to create indexer http client")?;
        Ok(Self {
            http,
            endpoint: endpoint.trim().to_string(),
        })
    }

    fn submit(&self, request: &IndexRequest<'_>) -> Result<(), IndexError> {
        let index_name = request.index_name().to_string();
        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .map_err(|error| IndexError::Request {
                index_name: index_name.clone(),
                message: error.to_string(),
            })?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(IndexError::Rejected {
                index_name,
                status: status.as_u16(),
                body: truncate_for_error(&body, 400),
            });
        }
        info!(index_name = %index_name, status = status.as_u16(), "index request accepted");
        Ok(())
    }
}

impl Indexer for WebhookIndexer {
    fn index_site(
        &self,
        repo: &RepoRef,
        site_url: &str,
        index_name: &str,
    ) -> Result<(), IndexError> {
        self.submit(&IndexRequest::Site {
            repository: repo.as_slug(),
            url: site_url,
            index_name,
        })
    }

    fn index_page(&self, page_url: &str, index_name: &str) -> Result<(), IndexError> {
        self.submit(&IndexRequest::Page {
            url: page_url,
            index_name,
        })
    }
}
