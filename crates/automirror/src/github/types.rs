//! GitHub API request payloads.

use std::collections::BTreeMap;

use serde::Serialize;

/// Custom property pointing back at the upstream project.
pub const UPSTREAM_PROPERTY: &str = "Upstream";

/// Organization custom properties, keyed by property name.
pub type CustomProperties = BTreeMap<String, String>;

/// Build the custom properties recorded on every mirrored repository.
pub fn upstream_properties(web_url: &str) -> CustomProperties {
    CustomProperties::from([(UPSTREAM_PROPERTY.to_string(), web_url.to_string())])
}

/// Body of `POST /orgs/{org}/repos`.
#[derive(Debug, Serialize)]
pub struct CreateRepository<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub custom_properties: &'a CustomProperties,
}

/// Body of `PATCH /repos/{org}/{repo}`.
#[derive(Debug, Serialize)]
pub struct UpdateRepository<'a> {
    pub description: &'a str,
    pub custom_properties: &'a CustomProperties,
}

/// Outcome of an upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertAction {
    Created,
    Updated,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_body_shape() {
        let properties = upstream_properties("https://src/org/repo-a");
        let body = serde_json::to_value(CreateRepository {
            name: "repo-a",
            description: "d",
            custom_properties: &properties,
        })
        .expect("serialize");

        assert_eq!(
            body,
            serde_json::json!({
                "name": "repo-a",
                "description": "d",
                "custom_properties": { "Upstream": "https://src/org/repo-a" },
            })
        );
    }
}
