//! Automirror - keep GitHub mirrors of tagged GitLab projects.
//!
//! Public GitLab projects carrying a selector topic are listed, a
//! same-named repository is created (or refreshed) in a GitHub
//! organization, and a push mirror from the project to that repository is
//! registered on the GitLab side. Running it again converges: nothing is
//! created twice.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use automirror::{MirrorSettings, SyncContext, SyncOptions, run};
//! use automirror::http::reqwest_transport::ReqwestTransport;
//!
//! let settings = MirrorSettings::from_env()?;
//! let transport = Arc::new(ReqwestTransport::build(None)?);
//! let result = run(Arc::new(SyncContext::new(settings, transport)), &SyncOptions::default()).await?;
//! ```

pub mod config;
pub mod descriptor;
pub mod github;
pub mod gitlab;
pub mod http;
pub mod mirror;
pub mod sync;

pub use config::{ConfigError, MirrorSettings};
pub use descriptor::RepositoryDescriptor;
pub use mirror::{MirrorTarget, redact_url};
pub use sync::{SyncContext, SyncError, SyncOptions, SyncProgress, SyncResult, run};
