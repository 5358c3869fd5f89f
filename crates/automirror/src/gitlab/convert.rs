//! Conversion from GitLab API types to platform-agnostic descriptors.

use crate::descriptor::RepositoryDescriptor;

use super::error::GitLabError;
use super::types::GitLabProject;

/// Convert a listed project into a [`RepositoryDescriptor`].
///
/// Rejects nodes whose identifying fields are blank, since every later step
/// derives names and ids from them.
pub fn to_descriptor(project: GitLabProject) -> Result<RepositoryDescriptor, GitLabError> {
    if project.full_path.trim().is_empty() {
        return Err(GitLabError::Deserialize(format!(
            "project {:?} has an empty fullPath",
            project.name
        )));
    }
    if project.id.trim().is_empty() {
        return Err(GitLabError::Deserialize(format!(
            "project {} has an empty id",
            project.full_path
        )));
    }

    Ok(RepositoryDescriptor {
        full_path: project.full_path,
        web_url: project.web_url,
        name: project.name,
        description: project.description.filter(|d| !d.is_empty()),
        id: project.id,
    })
}
