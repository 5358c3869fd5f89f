use automirror::sync::SyncProgress;

/// Logging reporter using tracing for structured output.
pub struct LoggingReporter;

impl LoggingReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, event: SyncProgress) {
        match event {
            SyncProgress::FetchingProjects { host, topic } => {
                tracing::info!(host = %host, topic = %topic, "Listing projects");
            }

            SyncProgress::FetchComplete { total } => {
                tracing::info!(total, "Listing complete");
            }

            SyncProgress::Excluded { full_path } => {
                tracing::info!(source = %full_path, "Not selected by configuration");
            }

            SyncProgress::Planned { name, full_path } => {
                tracing::info!(repo = %name, source = %full_path, "Would mirror");
            }

            SyncProgress::Processing { name, full_path } => {
                tracing::debug!(repo = %name, source = %full_path, "Processing");
            }

            SyncProgress::CreatingRepository {
                name,
                display_name,
                organization,
            } => {
                tracing::info!(repo = %name, display_name = %display_name, organization = %organization, "Creating repository");
            }

            SyncProgress::UpdatingRepository {
                name,
                display_name,
                organization,
            } => {
                tracing::info!(repo = %name, display_name = %display_name, organization = %organization, "Updating repository");
            }

            SyncProgress::UpdateIgnored { name, error } => {
                tracing::warn!(repo = %name, error = %error, "Repository update failed, continuing");
            }

            SyncProgress::MirrorExists {
                name,
                source,
                target,
            } => {
                tracing::info!(repo = %name, source = %source, target = %target, "Mirror already exists");
            }

            SyncProgress::SettingMirror {
                name,
                source,
                target,
            } => {
                tracing::info!(repo = %name, source = %source, target = %target, "Setting mirror");
            }

            SyncProgress::Done { name } => {
                tracing::info!(repo = %name, "Done");
            }

            SyncProgress::Failed { name, error } => {
                tracing::error!(repo = %name, error = %error, "Failed");
            }

            SyncProgress::Cancelled { name } => {
                tracing::warn!(repo = %name, "Cancelled before start");
            }

            SyncProgress::Detached { count } => {
                tracing::info!(count, "Dispatched without waiting");
            }

            SyncProgress::SyncComplete {
                succeeded,
                failed,
                skipped,
            } => {
                tracing::info!(succeeded, failed, skipped, "Mirror run complete");
            }

            SyncProgress::Warning { message } => {
                tracing::warn!("{}", message);
            }

            _ => {}
        }
    }
}

impl Default for LoggingReporter {
    fn default() -> Self {
        Self::new()
    }
}
