//! Progress reporting types for mirror runs.
//!
//! Per-repository events carry the destination name so reporters can key
//! their output by it.

/// Progress events emitted during a run.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum SyncProgress {
    /// Querying the source platform for tagged projects.
    FetchingProjects {
        /// Source instance base URL.
        host: String,
        /// Topic used as selector.
        topic: String,
    },

    /// Finished listing projects.
    FetchComplete {
        /// Number of projects returned by the source.
        total: usize,
    },

    /// A listed project was skipped because it is excluded by configuration.
    Excluded {
        /// Source full path.
        full_path: String,
    },

    /// Plan mode: a project that would be mirrored.
    Planned {
        /// Destination repository name.
        name: String,
        /// Source full path.
        full_path: String,
    },

    /// Starting work on a repository.
    Processing {
        /// Destination repository name.
        name: String,
        /// Source full path.
        full_path: String,
    },

    /// The destination repository is missing and is being created.
    CreatingRepository {
        /// Destination repository name.
        name: String,
        /// Source display name.
        display_name: String,
        /// Destination organization.
        organization: String,
    },

    /// The destination repository exists and its metadata is being updated.
    UpdatingRepository {
        /// Destination repository name.
        name: String,
        /// Source display name.
        display_name: String,
        /// Destination organization.
        organization: String,
    },

    /// The metadata update was rejected; the run carries on.
    UpdateIgnored {
        /// Destination repository name.
        name: String,
        /// Error message.
        error: String,
    },

    /// A matching push mirror is already registered.
    MirrorExists {
        /// Destination repository name.
        name: String,
        /// Source project URL.
        source: String,
        /// Destination `organization/name`.
        target: String,
    },

    /// Registering a new push mirror.
    SettingMirror {
        /// Destination repository name.
        name: String,
        /// Source project URL.
        source: String,
        /// Destination `organization/name`.
        target: String,
    },

    /// A repository finished successfully.
    Done {
        /// Destination repository name.
        name: String,
    },

    /// A repository failed. Other repositories are unaffected.
    Failed {
        /// Destination repository name.
        name: String,
        /// Error message.
        error: String,
    },

    /// A repository was not started because shutdown was requested.
    Cancelled {
        /// Destination repository name.
        name: String,
    },

    /// Tasks were dispatched without waiting for them.
    Detached {
        /// Number of dispatched tasks.
        count: usize,
    },

    /// All dispatched repositories have been attempted.
    SyncComplete {
        /// Repositories mirrored successfully.
        succeeded: usize,
        /// Repositories that failed.
        failed: usize,
        /// Repositories skipped (excluded or cancelled).
        skipped: usize,
    },

    /// Warning message (non-fatal).
    Warning {
        /// Warning message.
        message: String,
    },
}

/// Callback for progress updates during a run.
pub type ProgressCallback = Box<dyn Fn(SyncProgress) + Send + Sync>;

/// Emit a progress event if a callback is provided.
#[inline]
pub fn emit(on_progress: Option<&ProgressCallback>, event: SyncProgress) {
    if let Some(cb) = on_progress {
        cb(event);
    }
}
