use thiserror::Error;

#[derive(Debug, Error)]
/// Enumerates failures raised while talking to the GitHub REST API.
pub enum GithubApiError {
    #[error("github api {operation} request failed: {source}")]
    Transport {
        operation: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("github api {operation} failed with status {status}: {body}")]
    Status {
        operation: String,
        status: u16,
        body: String,
    },
    #[error("failed to decode github {operation}: {message}")]
    Decode { operation: String, message: String },
    #[error("invalid github configuration: {0}")]
    Config(String),
}

impl GithubApiError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub fn truncate_for_error(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated = text.chars().take(max_chars).collect::<String>();
    truncated.push_str("...");
    truncated
}
