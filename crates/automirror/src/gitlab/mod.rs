//! GitLab API client for the source side of a mirror.
//!
//! # Module Structure
//!
//! - [`error`] - Error types for GitLab API operations
//! - [`types`] - GraphQL and REST payloads
//! - [`client`] - Project listing and remote mirror management
//! - [`convert`] - Conversion to [`RepositoryDescriptor`](crate::descriptor::RepositoryDescriptor)

mod client;
mod convert;
mod error;
mod types;

pub use client::GitLabClient;
pub use convert::to_descriptor;
pub use error::GitLabError;
pub use types::{GitLabProject, RemoteMirror};
