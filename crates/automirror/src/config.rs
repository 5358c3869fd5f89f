//! Settings loaded once from the process environment.
//!
//! Every value is read from an environment variable of the same name
//! (a `.env` file is merged into the environment by the CLI beforehand):
//!
//! ```text
//! GITHUB_ORGANIZATION=my-org
//! GITHUB_USERNAME=mirror-bot
//! GITHUB_TOKEN=ghp_...
//! GITLAB_HOST=https://gitlab.example.com
//! GITLAB_TOKEN=glpat-...
//! GITLAB_REPOSITORY_SELECTOR=mirror-to-github
//!
//! # optional
//! GITHUB_HOST=github.com
//! MIRROR_EXCLUDE=group/private-fork,group/scratch
//! MIRROR_ONLY=group/tool,group/lib
//! ```

use std::collections::HashMap;
use std::fmt;

use config::{Config as ConfigBuilder, Environment};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Default destination host.
pub const DEFAULT_GITHUB_HOST: &str = "github.com";

/// Errors raised while loading settings. All of them are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("could not read settings: {0}")]
    Source(#[from] config::ConfigError),
}

/// Raw shape of the environment, before validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSettings {
    github_organization: Option<String>,
    github_username: Option<String>,
    github_token: Option<String>,
    github_host: Option<String>,
    gitlab_host: Option<String>,
    gitlab_token: Option<String>,
    gitlab_repository_selector: Option<String>,
    mirror_exclude: Option<String>,
    mirror_only: Option<String>,
}

/// Validated, immutable settings shared read-only by every component.
#[derive(Clone, PartialEq, Eq)]
pub struct MirrorSettings {
    /// Destination organization.
    pub github_organization: String,
    /// Destination user embedded in mirror URLs.
    pub github_username: String,
    /// Destination token, used for REST calls and embedded in mirror URLs.
    pub github_token: String,
    /// Destination host without scheme, e.g. `github.com`.
    pub github_host: String,
    /// Source instance base URL, without a trailing slash.
    pub gitlab_host: Url,
    /// Source token for the remote mirror REST calls.
    pub gitlab_token: String,
    /// Topic that selects which source projects get mirrored.
    pub gitlab_repository_selector: String,
    /// Source full paths that are never mirrored.
    pub exclude: Vec<String>,
    /// When non-empty, the only source full paths that may be mirrored.
    pub only: Vec<String>,
}

impl fmt::Debug for MirrorSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MirrorSettings")
            .field("github_organization", &self.github_organization)
            .field("github_username", &self.github_username)
            .field("github_token", &"[REDACTED]")
            .field("github_host", &self.github_host)
            .field("gitlab_host", &self.gitlab_host.as_str())
            .field("gitlab_token", &"[REDACTED]")
            .field("gitlab_repository_selector", &self.gitlab_repository_selector)
            .field("exclude", &self.exclude)
            .field("only", &self.only)
            .finish()
    }
}

impl MirrorSettings {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Load settings from an explicit variable map instead of the process
    /// environment.
    pub fn from_map(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::load(Some(vars))
    }

    fn load(vars: Option<HashMap<String, String>>) -> Result<Self, ConfigError> {
        let settings = ConfigBuilder::builder()
            .add_source(Environment::default().try_parsing(false).source(vars))
            .build()?;

        let raw: RawSettings = settings.try_deserialize()?;
        Self::validate(raw)
    }

    fn validate(raw: RawSettings) -> Result<Self, ConfigError> {
        let github_host = match non_empty(raw.github_host) {
            Some(host) => normalize_github_host(&host)?,
            None => DEFAULT_GITHUB_HOST.to_string(),
        };

        let gitlab_host = required("GITLAB_HOST", raw.gitlab_host)?;

        Ok(Self {
            github_organization: required("GITHUB_ORGANIZATION", raw.github_organization)?,
            github_username: required("GITHUB_USERNAME", raw.github_username)?,
            github_token: required("GITHUB_TOKEN", raw.github_token)?,
            github_host,
            gitlab_host: parse_gitlab_host(&gitlab_host)?,
            gitlab_token: required("GITLAB_TOKEN", raw.gitlab_token)?,
            gitlab_repository_selector: required(
                "GITLAB_REPOSITORY_SELECTOR",
                raw.gitlab_repository_selector,
            )?,
            exclude: raw
                .mirror_exclude
                .as_deref()
                .map(parse_list)
                .unwrap_or_default(),
            only: raw
                .mirror_only
                .as_deref()
                .map(parse_list)
                .unwrap_or_default(),
        })
    }

    /// Whether a source full path is listed in `MIRROR_EXCLUDE`.
    #[must_use]
    pub fn is_excluded(&self, full_path: &str) -> bool {
        self.exclude.iter().any(|p| p == full_path)
    }

    /// Whether a listed project should be mirrored: not excluded, and in
    /// `MIRROR_ONLY` when that list is set. Exclusion wins.
    #[must_use]
    pub fn is_selected(&self, full_path: &str) -> bool {
        !self.is_excluded(full_path)
            && (self.only.is_empty() || self.only.iter().any(|p| p == full_path))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(key: &'static str, value: Option<String>) -> Result<String, ConfigError> {
    non_empty(value).ok_or(ConfigError::Missing(key))
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Accept `gitlab.example.com`, `https://gitlab.example.com` or
/// `https://gitlab.example.com/`.
fn parse_gitlab_host(value: &str) -> Result<Url, ConfigError> {
    let with_scheme = if value.contains("://") {
        value.to_string()
    } else {
        format!("https://{value}")
    };

    let url = Url::parse(with_scheme.trim_end_matches('/')).map_err(|e| ConfigError::Invalid {
        key: "GITLAB_HOST",
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ConfigError::Invalid {
            key: "GITLAB_HOST",
            reason: format!("expected an http(s) URL, got {value:?}"),
        });
    }

    Ok(url)
}

fn normalize_github_host(value: &str) -> Result<String, ConfigError> {
    let host = value
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/');

    if host.is_empty() || host.contains('/') {
        return Err(ConfigError::Invalid {
            key: "GITHUB_HOST",
            reason: format!("expected a bare host name, got {value:?}"),
        });
    }

    Ok(host.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_env() -> HashMap<String, String> {
        [
            ("GITHUB_ORGANIZATION", "mirror-org"),
            ("GITHUB_USERNAME", "bot"),
            ("GITHUB_TOKEN", "ghp_secret"),
            ("GITLAB_HOST", "https://gitlab.example.com"),
            ("GITLAB_TOKEN", "glpat-secret"),
            ("GITLAB_REPOSITORY_SELECTOR", "mirrored"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn loads_all_required_settings() {
        let settings = MirrorSettings::from_map(complete_env()).expect("valid settings");

        assert_eq!(settings.github_organization, "mirror-org");
        assert_eq!(settings.github_username, "bot");
        assert_eq!(settings.github_token, "ghp_secret");
        assert_eq!(settings.github_host, DEFAULT_GITHUB_HOST);
        assert_eq!(settings.gitlab_host.as_str(), "https://gitlab.example.com/");
        assert_eq!(settings.gitlab_token, "glpat-secret");
        assert_eq!(settings.gitlab_repository_selector, "mirrored");
        assert!(settings.exclude.is_empty());
        assert!(settings.only.is_empty());
        assert!(settings.is_selected("any/project"));
    }

    #[test]
    fn each_missing_required_setting_is_reported() {
        for key in [
            "GITHUB_ORGANIZATION",
            "GITHUB_USERNAME",
            "GITHUB_TOKEN",
            "GITLAB_HOST",
            "GITLAB_TOKEN",
            "GITLAB_REPOSITORY_SELECTOR",
        ] {
            let mut env = complete_env();
            env.remove(key);
            let err = MirrorSettings::from_map(env).expect_err("should fail");
            assert!(
                matches!(err, ConfigError::Missing(k) if k == key),
                "unexpected error for {key}: {err}"
            );
        }
    }

    #[test]
    fn empty_values_count_as_missing() {
        let mut env = complete_env();
        env.insert("GITHUB_TOKEN".to_string(), "   ".to_string());
        let err = MirrorSettings::from_map(env).expect_err("should fail");
        assert!(matches!(err, ConfigError::Missing("GITHUB_TOKEN")));
    }

    #[test]
    fn bare_gitlab_host_gets_https_scheme() {
        let mut env = complete_env();
        env.insert("GITLAB_HOST".to_string(), "gitlab.com/".to_string());
        let settings = MirrorSettings::from_map(env).expect("valid settings");
        assert_eq!(settings.gitlab_host.scheme(), "https");
        assert_eq!(settings.gitlab_host.host_str(), Some("gitlab.com"));
    }

    #[test]
    fn non_http_gitlab_host_is_rejected() {
        let mut env = complete_env();
        env.insert("GITLAB_HOST".to_string(), "ftp://gitlab.com".to_string());
        let err = MirrorSettings::from_map(env).expect_err("should fail");
        assert!(matches!(err, ConfigError::Invalid { key: "GITLAB_HOST", .. }));
    }

    #[test]
    fn numeric_tokens_stay_strings() {
        let mut env = complete_env();
        env.insert("GITLAB_TOKEN".to_string(), "123456".to_string());
        let settings = MirrorSettings::from_map(env).expect("valid settings");
        assert_eq!(settings.gitlab_token, "123456");
    }

    #[test]
    fn optional_github_host_and_exclude_list() {
        let mut env = complete_env();
        env.insert("GITHUB_HOST".to_string(), "https://ghe.example.com/".to_string());
        env.insert(
            "MIRROR_EXCLUDE".to_string(),
            " group/a, ,group/b ".to_string(),
        );
        let settings = MirrorSettings::from_map(env).expect("valid settings");

        assert_eq!(settings.github_host, "ghe.example.com");
        assert_eq!(settings.exclude, vec!["group/a", "group/b"]);
        assert!(settings.is_excluded("group/a"));
        assert!(!settings.is_excluded("group/c"));
    }

    #[test]
    fn only_list_restricts_selection_and_exclusion_wins() {
        let mut env = complete_env();
        env.insert("MIRROR_ONLY".to_string(), "group/a,group/b".to_string());
        env.insert("MIRROR_EXCLUDE".to_string(), "group/b".to_string());
        let settings = MirrorSettings::from_map(env).expect("valid settings");

        assert_eq!(settings.only, vec!["group/a", "group/b"]);
        assert!(settings.is_selected("group/a"));
        assert!(!settings.is_selected("group/b"));
        assert!(!settings.is_selected("group/c"));
    }

    #[test]
    fn debug_output_redacts_tokens() {
        let settings = MirrorSettings::from_map(complete_env()).expect("valid settings");
        let debug = format!("{settings:?}");
        assert!(!debug.contains("ghp_secret"));
        assert!(!debug.contains("glpat-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
