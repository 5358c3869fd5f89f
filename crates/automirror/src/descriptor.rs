//! Platform-agnostic view of a source repository selected for mirroring.

/// Maximum number of characters kept from the source description.
pub const DESCRIPTION_BUDGET: usize = 200;

/// A source repository, as listed by the source platform.
///
/// Produced once by the lister and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryDescriptor {
    /// Full path including namespace (e.g. "group/subgroup/project").
    pub full_path: String,
    /// Browser URL of the project.
    pub web_url: String,
    /// Display name.
    pub name: String,
    /// Free-form description, if the project has one.
    pub description: Option<String>,
    /// Opaque global identifier (e.g. "gid://gitlab/Project/42").
    pub id: String,
}

impl RepositoryDescriptor {
    /// Name of the destination repository: the last segment of the full path.
    #[must_use]
    pub fn destination_name(&self) -> &str {
        destination_name(&self.full_path)
    }

    /// Description stored on the destination repository.
    #[must_use]
    pub fn mirror_description(&self) -> String {
        mirror_description(self.description.as_deref(), &self.web_url)
    }

    /// Project id usable with the source REST API.
    #[must_use]
    pub fn project_id(&self) -> &str {
        project_id(&self.id)
    }
}

/// Last `/`-separated segment of a full path.
#[must_use]
pub fn destination_name(full_path: &str) -> &str {
    full_path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(full_path)
}

/// Final segment of an opaque identifier delimited by `/` or `:`.
#[must_use]
pub fn project_id(opaque_id: &str) -> &str {
    opaque_id
        .rsplit(['/', ':'])
        .next()
        .unwrap_or(opaque_id)
}

/// Build the destination description: the truncated source description
/// followed by a pointer back to the upstream project.
///
/// Control characters are flattened to spaces, one for one, so the kept
/// portion never exceeds [`DESCRIPTION_BUDGET`] characters.
#[must_use]
pub fn mirror_description(description: Option<&str>, web_url: &str) -> String {
    let description = description.unwrap_or_default();
    if description.trim().is_empty() {
        return format!("Mirror of {web_url}.");
    }

    let kept: String = description
        .chars()
        .take(DESCRIPTION_BUDGET)
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();

    format!("{kept} · Mirror of {web_url}.")
}
