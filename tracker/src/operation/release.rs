use jira::models::{core::same_name, version::VersionChange};
use log::{debug, info, warn};

use super::resolve_project;
use crate::{error::TrackerError, TrackerRuntime};

#[derive(Debug, Clone)]
pub enum Release {
    /// Creates the version, or brings the given flags of an existing one up to date
    Ensure {
        project: Option<String>,
        version: String,
        released: Option<bool>,
        archived: Option<bool>,
    },
    /// Marks an existing version released
    Deploy { project: Option<String>, version: String },
}

pub(crate) async fn execute(runtime: &TrackerRuntime, instructions: &Release) -> Result<VersionChange, TrackerError> {
    match instructions {
        Release::Ensure {
            project,
            version,
            released,
            archived,
        } => ensure(runtime, project.as_deref(), version, *released, *archived).await,
        Release::Deploy { project, version } => deploy(runtime, project.as_deref(), version).await,
    }
}

fn release_name(version: &str) -> Result<&str, TrackerError> {
    let version = version.trim();
    if version.is_empty() {
        Err(TrackerError::BadInput("A release number is required".to_string()))
    } else {
        Ok(version)
    }
}

async fn ensure(
    runtime: &TrackerRuntime,
    project: Option<&str>,
    version: &str,
    released: Option<bool>,
    archived: Option<bool>,
) -> Result<VersionChange, TrackerError> {
    let version = release_name(version)?;
    let client = runtime.client();
    let project = resolve_project(runtime, project).await?;

    if !runtime.guarded(client.project_has_releases_enabled(&project)).await? {
        warn!("Releases are not enabled for project {}, the version is created anyway", project.name);
    }

    let change = runtime
        .guarded(client.ensure_version(&project, version, released, archived))
        .await?;
    match &change {
        VersionChange::Created(v) => info!("Version {} created in {}", v.name, project.key),
        VersionChange::Updated(v) => info!("Version {} of {} updated", v.name, project.key),
        VersionChange::Unchanged(v) => debug!("Version {} of {} already as requested", v.name, project.key),
    }
    Ok(change)
}

async fn deploy(runtime: &TrackerRuntime, project: Option<&str>, version: &str) -> Result<VersionChange, TrackerError> {
    let version = release_name(version)?;
    let client = runtime.client();
    let project = resolve_project(runtime, project).await?;

    let current = runtime
        .guarded(client.get_versions(&project))
        .await?
        .into_iter()
        .find(|v| same_name(v.name.trim(), version))
        .ok_or_else(|| TrackerError::VersionNotFound {
            project: project.name.clone(),
            version: version.to_string(),
        })?;

    if current.released {
        debug!("Version {} of {} is already released", current.name, project.key);
        return Ok(VersionChange::Unchanged(current));
    }

    let change = runtime
        .guarded(client.ensure_version(&project, &current.name, Some(true), None))
        .await?;
    info!("Version {} of {} released", current.name, project.key);
    Ok(change)
}
