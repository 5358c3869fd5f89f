//! Options and results of a mirror run.

use crate::github::UpsertAction;

/// Default number of repositories processed at the same time.
pub const DEFAULT_CONCURRENCY: usize = 20;

/// What the dispatcher does once every repository task has been spawned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DispatchMode {
    /// Wait for every task before returning.
    #[default]
    Join,
    /// Return right away. Tasks still running when the runtime shuts down
    /// are dropped.
    Detach,
}

/// Options for a mirror run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Maximum repositories processed concurrently.
    pub concurrency: usize,
    /// Only list and report what would be mirrored.
    pub plan: bool,
    /// Join or detach the per-repository tasks.
    pub dispatch: DispatchMode,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            plan: false,
            dispatch: DispatchMode::Join,
        }
    }
}

/// Result of the upsert step for one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upserted {
    /// Destination repository name.
    pub name: String,
    /// Whether the repository was created or updated.
    pub action: UpsertAction,
}

/// Result of the mirror step for one repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorOutcome {
    /// A mirror to the same place was already registered.
    AlreadyExists,
    /// A new mirror was registered.
    Created,
}

/// Result of fully processing one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoOutcome {
    pub name: String,
    pub action: UpsertAction,
    pub mirror: MirrorOutcome,
}

/// A repository that plan mode would mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMirror {
    /// Destination repository name.
    pub name: String,
    /// Source full path.
    pub full_path: String,
}

/// Aggregate result of a run.
#[derive(Debug, Default)]
pub struct SyncResult {
    /// Number of projects returned by the source.
    pub listed: usize,
    /// Repositories mirrored successfully.
    pub succeeded: usize,
    /// Repositories that failed.
    pub failed: usize,
    /// Repositories skipped (excluded or cancelled).
    pub skipped: usize,
    /// Tasks dispatched but not awaited.
    pub detached: usize,
    /// Plan mode output, sorted by destination name.
    pub planned: Vec<PlannedMirror>,
    /// Per-repository errors: (destination name, message).
    pub errors: Vec<(String, String)>,
}

impl SyncResult {
    /// Whether any repository failed.
    pub fn has_errors(&self) -> bool {
        self.failed > 0
    }
}
