use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use automirror::MirrorSettings;
use automirror::http::reqwest_transport::ReqwestTransport;
use automirror::sync::{DispatchMode, SyncContext, SyncOptions, SyncResult, run};
use console::style;

use crate::progress::ProgressReporter;

/// Options collected from the command line.
#[derive(Debug, Clone)]
pub struct MirrorArgs {
    pub plan: bool,
    pub detach: bool,
    pub concurrency: usize,
    pub timeout: Option<Duration>,
}

impl MirrorArgs {
    fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            concurrency: self.concurrency,
            plan: self.plan,
            dispatch: if self.detach {
                DispatchMode::Detach
            } else {
                DispatchMode::Join
            },
        }
    }
}

/// Run one mirror pass and report the outcome.
pub async fn handle_mirror(
    args: MirrorArgs,
    settings: MirrorSettings,
    shutdown: Arc<AtomicBool>,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing::debug!(settings = ?settings, "Loaded settings");

    let transport = Arc::new(ReqwestTransport::build(args.timeout)?);
    let reporter = Arc::new(ProgressReporter::new());

    let ctx = SyncContext::new(settings, transport)
        .with_progress(reporter.as_callback())
        .with_shutdown_flag(shutdown);

    let result = run(Arc::new(ctx), &args.sync_options()).await;
    reporter.finish();

    let result = match result {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(error = %e, "Mirror run aborted");
            if reporter.is_interactive() {
                eprintln!("{} {}", style("error:").red().bold(), e);
            }
            return Ok(ExitCode::FAILURE);
        }
    };

    if reporter.is_interactive() {
        print_summary(&result, &args);
    } else {
        log_summary(&result, &args);
    }

    Ok(exit_code(&result))
}

fn exit_code(result: &SyncResult) -> ExitCode {
    if result.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn print_summary(result: &SyncResult, args: &MirrorArgs) {
    println!();
    if args.plan {
        println!(
            "{} {} of {} listed project(s) would be mirrored",
            style("Plan:").bold(),
            result.planned.len(),
            result.listed
        );
        return;
    }

    if result.detached > 0 {
        println!(
            "{} {} repositories dispatched without waiting",
            style("Summary:").bold(),
            result.detached
        );
        return;
    }

    println!(
        "{} {} mirrored, {} failed, {} skipped ({} listed)",
        style("Summary:").bold(),
        style(result.succeeded).green(),
        if result.failed > 0 {
            style(result.failed).red()
        } else {
            style(result.failed).dim()
        },
        result.skipped,
        result.listed
    );

    if !result.errors.is_empty() {
        println!();
        println!("{}", style("Errors:").red().bold());
        for (name, error) in &result.errors {
            println!("  {name}: {error}");
        }
    }
}

fn log_summary(result: &SyncResult, args: &MirrorArgs) {
    if args.plan {
        tracing::info!(
            planned = result.planned.len(),
            listed = result.listed,
            "Plan complete"
        );
        return;
    }

    tracing::info!(
        listed = result.listed,
        succeeded = result.succeeded,
        failed = result.failed,
        skipped = result.skipped,
        detached = result.detached,
        "Summary"
    );
    for (name, error) in &result.errors {
        tracing::error!(repo = %name, error = %error, "Repository failed");
    }
}
