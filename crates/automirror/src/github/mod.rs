//! GitHub API client for the destination side of a mirror.
//!
//! # Module Structure
//!
//! - [`error`] - Error types for GitHub API operations
//! - [`types`] - Request payloads and custom properties
//! - [`client`] - Existence probe, create/update, mirror targets

mod client;
mod error;
mod types;

pub use client::GitHubClient;
pub use error::GitHubError;
pub use types::{CustomProperties, UPSTREAM_PROPERTY, UpsertAction, upstream_properties};
