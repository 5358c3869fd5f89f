//! Mirror run orchestration.
//!
//! # Module Structure
//!
//! - [`types`] - Core types: `SyncResult`, `SyncOptions`, `DispatchMode`, constants
//! - [`progress`] - Progress reporting: `SyncProgress`, `ProgressCallback`, `emit()`
//! - [`context`] - Shared clients and hooks: `SyncContext`, `SyncError`
//! - [`engine`] - Listing, upsert, mirror setup and dispatch: `run()`
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use automirror::MirrorSettings;
//! use automirror::http::reqwest_transport::ReqwestTransport;
//! use automirror::sync::{SyncContext, SyncOptions, run};
//!
//! let settings = MirrorSettings::from_env()?;
//! let transport = Arc::new(ReqwestTransport::build(None)?);
//! let ctx = Arc::new(SyncContext::new(settings, transport));
//! let result = run(ctx, &SyncOptions::default()).await?;
//! println!("Mirrored {} repositories", result.succeeded);
//! ```

mod context;
pub mod engine;
mod progress;
mod types;

pub use context::{SyncContext, SyncError};

// Re-export types
pub use types::{
    DEFAULT_CONCURRENCY, DispatchMode, MirrorOutcome, PlannedMirror, RepoOutcome, SyncOptions,
    SyncResult, Upserted,
};

// Re-export progress types
pub use progress::{ProgressCallback, SyncProgress, emit};

// Re-export engine functions for convenience
pub use engine::{
    dispatch, ensure_mirror, list_repositories, name_collisions, plan, run, select_repositories,
    sync_repository, upsert_repository,
};
