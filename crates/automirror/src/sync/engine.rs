//! Mirror engine: list, upsert, configure the push mirror.
//!
//! Each repository goes through the same strictly sequential steps:
//! existence probe, create or update, mirror list, mirror create. Repositories
//! are independent of each other and run as separate tasks.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::Semaphore;

use super::context::{SyncContext, SyncError};
use super::progress::{SyncProgress, emit};
use super::types::{
    DispatchMode, MirrorOutcome, PlannedMirror, RepoOutcome, SyncOptions, SyncResult, Upserted,
};
use crate::config::MirrorSettings;
use crate::descriptor::RepositoryDescriptor;
use crate::github::{GitHubError, UpsertAction, upstream_properties};

/// List the public source projects tagged with the configured topic.
///
/// A GraphQL `errors` payload aborts the run; nothing can proceed without
/// the list.
pub async fn list_repositories(ctx: &SyncContext) -> Result<Vec<RepositoryDescriptor>, SyncError> {
    let topic = &ctx.settings.gitlab_repository_selector;
    emit(
        ctx.on_progress(),
        SyncProgress::FetchingProjects {
            host: ctx.gitlab.host().to_string(),
            topic: topic.clone(),
        },
    );

    let repos = ctx.gitlab.list_projects_by_topic(topic).await?;

    emit(
        ctx.on_progress(),
        SyncProgress::FetchComplete { total: repos.len() },
    );
    Ok(repos)
}

/// Split listed repositories into (selected, skipped) according to the
/// exclude and only lists.
pub fn select_repositories(
    settings: &MirrorSettings,
    repos: Vec<RepositoryDescriptor>,
) -> (Vec<RepositoryDescriptor>, Vec<RepositoryDescriptor>) {
    repos
        .into_iter()
        .partition(|repo| settings.is_selected(&repo.full_path))
}

/// Destination names claimed by more than one source project.
pub fn name_collisions(repos: &[RepositoryDescriptor]) -> BTreeMap<String, Vec<String>> {
    let mut by_name: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for repo in repos {
        by_name
            .entry(repo.destination_name().to_string())
            .or_default()
            .push(repo.full_path.clone());
    }
    by_name.retain(|_, paths| paths.len() > 1);
    by_name
}

/// Mapping from destination name to source path, sorted by name.
pub fn plan(repos: &[RepositoryDescriptor]) -> Vec<PlannedMirror> {
    let mut planned: Vec<PlannedMirror> = repos
        .iter()
        .map(|repo| PlannedMirror {
            name: repo.destination_name().to_string(),
            full_path: repo.full_path.clone(),
        })
        .collect();
    planned.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.full_path.cmp(&b.full_path)));
    planned
}

/// Create the destination repository, or refresh its metadata if it exists.
///
/// Returns the destination name for the mirror step. A rejected update is
/// reported and otherwise ignored; a rejected create fails the repository.
pub async fn upsert_repository(
    ctx: &SyncContext,
    repo: &RepositoryDescriptor,
) -> Result<Upserted, SyncError> {
    let name = repo.destination_name();
    let organization = ctx.github.organization();
    let exists = ctx.github.repository_exists(name).await?;

    let description = repo.mirror_description();
    let properties = upstream_properties(&repo.web_url);

    if exists {
        emit(
            ctx.on_progress(),
            SyncProgress::UpdatingRepository {
                name: name.to_string(),
                display_name: repo.name.clone(),
                organization: organization.to_string(),
            },
        );

        match ctx
            .github
            .update_repository(name, &description, &properties)
            .await
        {
            Ok(()) => {}
            Err(GitHubError::Status { status, body, .. }) => {
                tracing::warn!(repo = %name, status, "Repository update rejected");
                emit(
                    ctx.on_progress(),
                    SyncProgress::UpdateIgnored {
                        name: name.to_string(),
                        error: format!("HTTP {status}: {body}"),
                    },
                );
            }
            Err(e) => return Err(e.into()),
        }

        Ok(Upserted {
            name: name.to_string(),
            action: UpsertAction::Updated,
        })
    } else {
        emit(
            ctx.on_progress(),
            SyncProgress::CreatingRepository {
                name: name.to_string(),
                display_name: repo.name.clone(),
                organization: organization.to_string(),
            },
        );

        ctx.github
            .create_repository(name, &description, &properties)
            .await?;

        Ok(Upserted {
            name: name.to_string(),
            action: UpsertAction::Created,
        })
    }
}

/// Make sure the source project pushes to `destination_name`.
///
/// Existing mirrors are compared with credentials redacted, so a rotated
/// token does not cause a second registration.
pub async fn ensure_mirror(
    ctx: &SyncContext,
    repo: &RepositoryDescriptor,
    destination_name: &str,
) -> Result<MirrorOutcome, SyncError> {
    let project_id = repo.project_id();
    let existing = ctx.gitlab.list_remote_mirrors(project_id).await?;
    let target = ctx.github.mirror_target(destination_name)?;

    let source = format!("{}/{}", ctx.gitlab.host(), repo.full_path);
    let target_path = format!("{}/{}", ctx.github.organization(), destination_name);

    if existing.iter().any(|mirror| target.matches(&mirror.url)) {
        emit(
            ctx.on_progress(),
            SyncProgress::MirrorExists {
                name: destination_name.to_string(),
                source,
                target: target_path,
            },
        );
        return Ok(MirrorOutcome::AlreadyExists);
    }

    emit(
        ctx.on_progress(),
        SyncProgress::SettingMirror {
            name: destination_name.to_string(),
            source,
            target: target_path,
        },
    );

    ctx.gitlab.create_remote_mirror(project_id, &target).await?;

    Ok(MirrorOutcome::Created)
}

/// Upsert the destination repository, then ensure the mirror.
pub async fn sync_repository(
    ctx: &SyncContext,
    repo: &RepositoryDescriptor,
) -> Result<RepoOutcome, SyncError> {
    emit(
        ctx.on_progress(),
        SyncProgress::Processing {
            name: repo.destination_name().to_string(),
            full_path: repo.full_path.clone(),
        },
    );

    let upserted = upsert_repository(ctx, repo).await?;
    let mirror = ensure_mirror(ctx, repo, &upserted.name).await?;

    Ok(RepoOutcome {
        name: upserted.name,
        action: upserted.action,
        mirror,
    })
}

enum UnitOutcome {
    Synced,
    Cancelled,
    Failed(SyncError),
}

/// Run [`sync_repository`] for every repository as its own task.
///
/// A semaphore bounds how many run at once. With [`DispatchMode::Join`] all
/// tasks are awaited before returning.
pub async fn dispatch(
    ctx: Arc<SyncContext>,
    repos: Vec<RepositoryDescriptor>,
    options: &SyncOptions,
) -> SyncResult {
    let mut result = SyncResult {
        listed: repos.len(),
        ..SyncResult::default()
    };

    if repos.is_empty() {
        emit(
            ctx.on_progress(),
            SyncProgress::SyncComplete {
                succeeded: 0,
                failed: 0,
                skipped: 0,
            },
        );
        return result;
    }

    let concurrency = options.concurrency.clamp(1, repos.len());
    let semaphore = Arc::new(Semaphore::new(concurrency));
    let mut handles = Vec::with_capacity(repos.len());

    for repo in repos {
        let ctx = Arc::clone(&ctx);
        let semaphore = Arc::clone(&semaphore);
        let name = repo.destination_name().to_string();

        let handle = tokio::spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    return UnitOutcome::Failed(SyncError::Internal(
                        "Semaphore closed unexpectedly".to_string(),
                    ));
                }
            };

            let name = repo.destination_name().to_string();
            if ctx.is_shutdown_requested() {
                emit(ctx.on_progress(), SyncProgress::Cancelled { name });
                return UnitOutcome::Cancelled;
            }

            match sync_repository(&ctx, &repo).await {
                Ok(_) => {
                    emit(ctx.on_progress(), SyncProgress::Done { name });
                    UnitOutcome::Synced
                }
                Err(e) => {
                    emit(
                        ctx.on_progress(),
                        SyncProgress::Failed {
                            name,
                            error: e.to_string(),
                        },
                    );
                    UnitOutcome::Failed(e)
                }
            }
        });

        handles.push((name, handle));
    }

    if options.dispatch == DispatchMode::Detach {
        result.detached = handles.len();
        emit(
            ctx.on_progress(),
            SyncProgress::Detached {
                count: result.detached,
            },
        );
        return result;
    }

    for (name, handle) in handles {
        match handle.await {
            Ok(UnitOutcome::Synced) => result.succeeded += 1,
            Ok(UnitOutcome::Cancelled) => result.skipped += 1,
            Ok(UnitOutcome::Failed(e)) => {
                result.failed += 1;
                result.errors.push((name, e.to_string()));
            }
            Err(join_err) => {
                let error = format!("task failed: {join_err}");
                emit(
                    ctx.on_progress(),
                    SyncProgress::Failed {
                        name: name.clone(),
                        error: error.clone(),
                    },
                );
                result.failed += 1;
                result.errors.push((name, error));
            }
        }
    }

    emit(
        ctx.on_progress(),
        SyncProgress::SyncComplete {
            succeeded: result.succeeded,
            failed: result.failed,
            skipped: result.skipped,
        },
    );

    result
}

/// List, filter, then plan or dispatch.
pub async fn run(ctx: Arc<SyncContext>, options: &SyncOptions) -> Result<SyncResult, SyncError> {
    let listed = list_repositories(&ctx).await?;
    let total = listed.len();

    let (repos, excluded) = select_repositories(&ctx.settings, listed);
    for repo in &excluded {
        emit(
            ctx.on_progress(),
            SyncProgress::Excluded {
                full_path: repo.full_path.clone(),
            },
        );
    }

    for (name, paths) in name_collisions(&repos) {
        emit(
            ctx.on_progress(),
            SyncProgress::Warning {
                message: format!(
                    "{} source projects map to {}/{}: {}",
                    paths.len(),
                    ctx.github.organization(),
                    name,
                    paths.join(", ")
                ),
            },
        );
    }

    if options.plan {
        let planned = plan(&repos);
        for entry in &planned {
            emit(
                ctx.on_progress(),
                SyncProgress::Planned {
                    name: entry.name.clone(),
                    full_path: entry.full_path.clone(),
                },
            );
        }
        return Ok(SyncResult {
            listed: total,
            skipped: excluded.len(),
            planned,
            ..SyncResult::default()
        });
    }

    let mut result = dispatch(ctx, repos, options).await;
    result.listed = total;
    result.skipped += excluded.len();
    Ok(result)
}
