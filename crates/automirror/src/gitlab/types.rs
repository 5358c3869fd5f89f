//! GitLab API data types.

use serde::{Deserialize, Serialize};

/// Envelope of every GraphQL response.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    pub errors: Option<serde_json::Value>,
}

/// `data` of the topic-filtered project search.
#[derive(Debug, Deserialize)]
pub struct ProjectSearch {
    pub projects: ProjectConnection,
}

#[derive(Debug, Deserialize)]
pub struct ProjectConnection {
    pub nodes: Vec<GitLabProject>,
}

/// GitLab project - fields requested by the listing query.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitLabProject {
    /// Full path including namespace (e.g., "group/subgroup/project").
    pub full_path: String,
    /// Web URL to the project.
    pub web_url: String,
    /// Project name.
    pub name: String,
    /// Project description.
    pub description: Option<String>,
    /// Global id (e.g., "gid://gitlab/Project/42").
    pub id: String,
}

/// A push mirror registered on a project.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteMirror {
    pub id: u64,
    /// Target URL. GitLab masks any credentials it contains.
    pub url: String,
}

/// Body of `POST /projects/:id/remote_mirrors`.
#[derive(Debug, Serialize)]
pub struct CreateRemoteMirror<'a> {
    pub enabled: bool,
    pub url: &'a str,
    pub auth_method: &'a str,
}
