//! GitLab API error types.

use thiserror::Error;

use crate::http::HttpError;

/// Errors that can occur when talking to the source GitLab instance.
#[derive(Debug, Error)]
pub enum GitLabError {
    /// The GraphQL endpoint answered with an `errors` payload.
    #[error("GitLab GraphQL query failed: {0}")]
    Query(serde_json::Value),

    #[error("GitLab API returned {status} for {url}: {body}")]
    Status { status: u16, url: String, body: String },

    #[error("unexpected GitLab response shape: {0}")]
    Deserialize(String),

    #[error(transparent)]
    Http(#[from] HttpError),
}

impl GitLabError {
    pub(crate) fn status(status: u16, url: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            url: url.into(),
            body: body.into(),
        }
    }
}

impl From<serde_json::Error> for GitLabError {
    fn from(err: serde_json::Error) -> Self {
        Self::Deserialize(err.to_string())
    }
}
