//! Shared, read-only state handed to every repository task.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use thiserror::Error;

use super::progress::ProgressCallback;
use crate::config::MirrorSettings;
use crate::github::{GitHubClient, GitHubError};
use crate::gitlab::{GitLabClient, GitLabError};
use crate::http::HttpTransport;

/// Errors that abort a run or a single repository task.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    GitHub(#[from] GitHubError),

    #[error(transparent)]
    GitLab(#[from] GitLabError),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Clients, settings and reporting hooks for one run.
pub struct SyncContext {
    pub(crate) settings: Arc<MirrorSettings>,
    pub(crate) github: GitHubClient,
    pub(crate) gitlab: GitLabClient,
    pub(crate) progress: Option<Arc<ProgressCallback>>,
    pub(crate) shutdown_flag: Option<Arc<AtomicBool>>,
}

impl SyncContext {
    /// Build both platform clients over a shared transport.
    pub fn new(settings: MirrorSettings, transport: Arc<dyn HttpTransport>) -> Self {
        let github = GitHubClient::from_settings(Arc::clone(&transport), &settings);
        let gitlab = GitLabClient::new(transport, &settings.gitlab_host, &settings.gitlab_token);

        Self {
            settings: Arc::new(settings),
            github,
            gitlab,
            progress: None,
            shutdown_flag: None,
        }
    }

    /// Set the progress callback.
    pub fn with_progress(mut self, callback: Arc<ProgressCallback>) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Set the flag checked before each repository task starts.
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    pub(crate) fn on_progress(&self) -> Option<&ProgressCallback> {
        self.progress.as_deref()
    }

    pub(crate) fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Acquire))
    }
}
