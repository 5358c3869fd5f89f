use std::sync::Mutex;

use automirror::sync::SyncProgress;
use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Width of the repository name column.
const NAME_WIDTH: usize = 20;

/// Bars owned by the reporter. Only one phase is active at a time.
#[derive(Default)]
struct ProgressState {
    /// Spinner shown while the source is queried.
    fetch_bar: Option<ProgressBar>,
    /// Repositories finished out of those listed.
    mirror_bar: Option<ProgressBar>,
}

/// Interactive progress reporter using indicatif.
///
/// Every repository step is printed as its own line, prefixed with the
/// destination name, above a single bar counting finished repositories.
pub struct InteractiveReporter {
    multi: MultiProgress,
    state: Mutex<ProgressState>,
}

impl InteractiveReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            state: Mutex::new(ProgressState::default()),
        }
    }

    fn println(&self, line: String) {
        self.multi.println(line).ok();
    }

    fn advance(&self, state: &ProgressState) {
        if let Some(ref pb) = state.mirror_bar {
            pb.inc(1);
        }
    }

    pub fn handle(&self, event: SyncProgress) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        match event {
            SyncProgress::FetchingProjects { host, topic } => {
                let pb = self.multi.add(ProgressBar::new_spinner());
                pb.set_style(Self::spinner_style());
                pb.set_prefix("List");
                pb.set_message(format!("projects tagged {topic} on {host}"));
                pb.enable_steady_tick(std::time::Duration::from_millis(100));
                state.fetch_bar = Some(pb);
            }

            SyncProgress::FetchComplete { total } => {
                if let Some(pb) = state.fetch_bar.take() {
                    pb.finish_and_clear();
                }
                self.println(format!(
                    "{} {} tagged project(s)",
                    style("Found").bold().green(),
                    total
                ));

                if total > 0 {
                    let pb = self.multi.add(ProgressBar::new(total as u64));
                    pb.set_style(Self::bar_style());
                    pb.set_prefix("Mirror");
                    state.mirror_bar = Some(pb);
                }
            }

            SyncProgress::Excluded { full_path } => {
                self.println(format!(
                    "{} {} (not selected by configuration)",
                    style("Skipping").dim(),
                    full_path
                ));
                self.advance(&state);
            }

            SyncProgress::Planned { name, full_path } => {
                // Nothing is mirrored in plan mode.
                if let Some(pb) = state.mirror_bar.take() {
                    pb.finish_and_clear();
                }
                self.println(format_line(&name, &format!("<- {full_path}")));
            }

            SyncProgress::Processing { name, .. } => {
                if let Some(ref pb) = state.mirror_bar {
                    pb.set_message(name);
                }
            }

            SyncProgress::CreatingRepository {
                name,
                display_name,
                organization,
            } => {
                self.println(format_line(
                    &name,
                    &format!("Creating repository {display_name} at {organization}/{name}..."),
                ));
            }

            SyncProgress::UpdatingRepository {
                name,
                display_name,
                organization,
            } => {
                self.println(format_line(
                    &name,
                    &format!("Updating repository {display_name} at {organization}/{name}..."),
                ));
            }

            SyncProgress::UpdateIgnored { name, error } => {
                self.println(format_line(
                    &name,
                    &format!("{} update failed: {error}", style("⚠").yellow()),
                ));
            }

            SyncProgress::MirrorExists {
                name,
                source,
                target,
            } => {
                self.println(format_line(
                    &name,
                    &format!("Mirror from {source} to {target} already exists"),
                ));
            }

            SyncProgress::SettingMirror {
                name,
                source,
                target,
            } => {
                self.println(format_line(
                    &name,
                    &format!("Setting mirror from {source} to {target}"),
                ));
            }

            SyncProgress::Done { name } => {
                self.println(format_line(&name, &style("Done").green().to_string()));
                self.advance(&state);
            }

            SyncProgress::Failed { name, error } => {
                self.println(format_line(
                    &name,
                    &format!("{} {error}", style("Failed:").red().bold()),
                ));
                self.advance(&state);
            }

            SyncProgress::Cancelled { name } => {
                self.println(format_line(&name, &style("Cancelled").yellow().to_string()));
                self.advance(&state);
            }

            SyncProgress::Detached { count } => {
                if let Some(pb) = state.mirror_bar.take() {
                    pb.finish_and_clear();
                }
                self.println(format!(
                    "{} {count} repositories dispatched, not waiting for them",
                    style("Detached").bold().yellow()
                ));
            }

            SyncProgress::SyncComplete { .. } => {
                if let Some(pb) = state.mirror_bar.take() {
                    pb.finish_and_clear();
                }
            }

            SyncProgress::Warning { message } => {
                self.println(format!("{} {}", style("⚠").yellow(), message));
            }

            _ => {}
        }
    }

    /// Finish any bar still on screen.
    pub fn finish(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(pb) = state.fetch_bar.take() {
            pb.finish_and_clear();
        }
        if let Some(pb) = state.mirror_bar.take()
            && !pb.is_finished()
        {
            pb.finish();
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{prefix:.bold.cyan} {spinner:.green} {msg}")
            .expect("Invalid template")
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos:>3}/{len:3} {msg}")
            .expect("Invalid template")
            .progress_chars("█▓░")
    }
}

impl Default for InteractiveReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// `[name                ] message`, with the name padded to a fixed column.
fn format_line(name: &str, message: &str) -> String {
    format!(
        "[{}] {}",
        style(format!("{name:<NAME_WIDTH$}")).cyan().bold(),
        message
    )
}
