//! GitLab API client: project listing over GraphQL, remote mirrors over REST.

use std::sync::Arc;

use url::Url;

use super::convert::to_descriptor;
use super::error::GitLabError;
use super::types::{CreateRemoteMirror, GraphQlResponse, ProjectSearch, RemoteMirror};
use crate::descriptor::RepositoryDescriptor;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::mirror::MirrorTarget;

const PRIVATE_TOKEN: &str = "PRIVATE-TOKEN";

/// Public projects tagged with any of the given topics.
const PROJECTS_BY_TOPIC: &str = r#"
query($selector: [String!]!) {
    projects(topics: $selector) {
        nodes {
            fullPath, webUrl, name, description, id
        }
    }
}
"#;

/// Client for the source GitLab instance.
#[derive(Clone)]
pub struct GitLabClient {
    transport: Arc<dyn HttpTransport>,
    /// Base URL without trailing slash, e.g. `https://gitlab.com`.
    base: String,
    token: Arc<String>,
}

impl GitLabClient {
    /// Create a new GitLab client.
    ///
    /// # Arguments
    ///
    /// * `transport` - HTTP transport shared by all clients
    /// * `host` - Instance base URL (e.g., `https://gitlab.example.com`)
    /// * `token` - Access token used for the REST mirror endpoints
    pub fn new(transport: Arc<dyn HttpTransport>, host: &Url, token: &str) -> Self {
        Self {
            transport,
            base: host.as_str().trim_end_matches('/').to_string(),
            token: Arc::new(token.to_string()),
        }
    }

    /// Get the host URL.
    pub fn host(&self) -> &str {
        &self.base
    }

    fn graphql_url(&self) -> String {
        format!("{}/api/graphql", self.base)
    }

    fn remote_mirrors_url(&self, project_id: &str) -> String {
        format!("{}/api/v4/projects/{}/remote_mirrors", self.base, project_id)
    }

    /// List public projects tagged with `topic`.
    ///
    /// The query is sent without credentials so only public projects are
    /// returned. Order is whatever the API returns.
    pub async fn list_projects_by_topic(
        &self,
        topic: &str,
    ) -> Result<Vec<RepositoryDescriptor>, GitLabError> {
        let url = self.graphql_url();
        let request = HttpRequest::new(HttpMethod::Post, &url).json(&serde_json::json!({
            "query": PROJECTS_BY_TOPIC,
            "variables": { "selector": [topic] },
        }))?;

        tracing::debug!(url = %url, topic, "Listing projects");
        let response = self.transport.send(request).await?;

        let search = parse_graphql::<ProjectSearch>(&url, &response)?;
        search
            .projects
            .nodes
            .into_iter()
            .map(to_descriptor)
            .collect()
    }

    /// List the remote mirrors registered on a project.
    pub async fn list_remote_mirrors(
        &self,
        project_id: &str,
    ) -> Result<Vec<RemoteMirror>, GitLabError> {
        let url = self.remote_mirrors_url(project_id);
        let request = HttpRequest::get(&url).header(PRIVATE_TOKEN, self.token.as_str());

        tracing::debug!(url = %url, "Listing remote mirrors");
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(GitLabError::status(response.status, url, response.text()));
        }

        Ok(response.json()?)
    }

    /// Register an enabled push mirror authenticated by the credentials
    /// embedded in `target`.
    ///
    /// Only the status is checked; the body of a successful response is
    /// logged, not parsed.
    pub async fn create_remote_mirror(
        &self,
        project_id: &str,
        target: &MirrorTarget,
    ) -> Result<(), GitLabError> {
        let url = self.remote_mirrors_url(project_id);
        let request = HttpRequest::new(HttpMethod::Post, &url)
            .header(PRIVATE_TOKEN, self.token.as_str())
            .json(&CreateRemoteMirror {
                enabled: true,
                url: target.secret_url(),
                auth_method: "password",
            })?;

        tracing::debug!(url = %url, target = %target, "Creating remote mirror");
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(GitLabError::status(response.status, url, response.text()));
        }

        tracing::debug!(url = %url, status = response.status, body = %response.text(), "Remote mirror created");
        Ok(())
    }
}

/// Decode a GraphQL response, surfacing an `errors` payload before anything else.
fn parse_graphql<T: serde::de::DeserializeOwned>(
    url: &str,
    response: &HttpResponse,
) -> Result<T, GitLabError> {
    let parsed = response.json::<GraphQlResponse<T>>();

    match parsed {
        Ok(GraphQlResponse {
            errors: Some(errors),
            ..
        }) => Err(GitLabError::Query(errors)),
        Ok(_) | Err(_) if !response.is_success() => Err(GitLabError::status(
            response.status,
            url,
            response.text(),
        )),
        Ok(GraphQlResponse { data: Some(data), .. }) => Ok(data),
        Ok(GraphQlResponse { data: None, .. }) => Err(GitLabError::Deserialize(
            "GraphQL response has neither data nor errors".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}
