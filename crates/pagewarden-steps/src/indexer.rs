use pagewarden_github::RepoRef;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
/// Enumerates supported `IndexError` values.
pub enum IndexError {
    #[error("index request for '{index_name}' failed: {message}")]
    Request { index_name: String, message: String },
    #[error("indexer rejected '{index_name}' with status {status}: {body}")]
    Rejected {
        index_name: String,
        status: u16,
        body: String,
    },
}

/// Entry point of the content indexing subsystem.
pub trait Indexer: Send + Sync {
    fn index_site(
        &self,
        repo: &RepoRef,
        site_url: &str,
        index_name: &str,
    ) -> Result<(), IndexError>;

    fn index_page(&self, page_url: &str, index_name: &str) -> Result<(), IndexError>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Indexer that only records the request in the log.
pub struct TracingIndexer;

impl Indexer for TracingIndexer {
    fn index_site(
        &self,
        repo: &RepoRef,
        site_url: &str,
        index_name: &str,
    ) -> Result<(), IndexError> {
        info!(repo = %repo, site_url, index_name, "index site requested");
        Ok(())
    }

    fn index_page(&self, page_url: &str, index_name: &str) -> Result<(), IndexError> {
        info!(page_url, index_name, "index page requested");
        Ok(())
    }
}
