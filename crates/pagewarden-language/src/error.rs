use thiserror::Error;

use crate::response::ResponseKey;

#[derive(Debug, Error)]
/// Enumerates supported `LanguageError` values.
pub enum LanguageError {
    #[error("at least one language must be configured")]
    NoLanguages,
    #[error("language '{language}' has an invalid pattern '{pattern}': {message}")]
    InvalidPattern {
        language: String,
        pattern: String,
        message: String,
    },
    #[error("language '{language}' is missing the '{}' response", key.as_str())]
    MissingResponse { language: String, key: ResponseKey },
    #[error("unknown response key '{0}'")]
    UnknownResponseKey(String),
    #[error("failed to read languages file {path}: {message}")]
    File { path: String, message: String },
}
