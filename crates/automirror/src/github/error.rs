//! GitHub API error types.

use thiserror::Error;

use crate::http::HttpError;

/// Errors that can occur when talking to the destination GitHub host.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// The create call was rejected; carries the response body.
    #[error("could not create repository {name} ({status}): {body}")]
    RepositoryCreation {
        name: String,
        status: u16,
        body: String,
    },

    /// The existence probe answered something other than success or 404.
    #[error("could not tell whether {url} exists: HTTP {status}")]
    Probe { url: String, status: u16 },

    #[error("GitHub API returned {status} for {url}: {body}")]
    Status { status: u16, url: String, body: String },

    #[error("invalid mirror URL for {name}: {source}")]
    InvalidMirrorUrl {
        name: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    Http(#[from] HttpError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creation_error_carries_response_body() {
        let err = GitHubError::RepositoryCreation {
            name: "repo-a".to_string(),
            status: 422,
            body: r#"{"message":"name already exists on this account"}"#.to_string(),
        };
        assert!(err.to_string().contains("name already exists"));
        assert!(err.to_string().contains("422"));
    }

    #[test]
    fn existence_check_error_mentions_status() {
        let err = GitHubError::Probe {
            url: "https://github.com/org/repo".to_string(),
            status: 503,
        };
        assert!(err.to_string().contains("503"));
    }
}
