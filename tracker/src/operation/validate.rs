use log::warn;

use super::{non_blank, resolve_project};
use crate::{error::TrackerError, TrackerRuntime};

#[derive(Debug, Clone, Default)]
pub struct Validate {
    /// Also checks this project, falls back to the configured one
    pub project: Option<String>,
}

/// Checks the connection and, when there is a project to check, that it exists.
/// Returns the warnings found; a project with releases disabled is only a warning.
pub(crate) async fn execute(runtime: &TrackerRuntime, instructions: &Validate) -> Result<Vec<String>, TrackerError> {
    let client = runtime.client();
    runtime.guarded(client.validate_connection()).await?;

    let mut warnings = Vec::new();
    let project_name = non_blank(instructions.project.as_deref())
        .or_else(|| non_blank(runtime.configuration().issues.project.as_deref()));
    if let Some(name) = project_name {
        let project = resolve_project(runtime, Some(name)).await?;
        if !runtime.guarded(client.project_has_releases_enabled(&project)).await? {
            let warning = format!(
                "Releases are not enabled for project {}, versions cannot be managed there",
                project.name
            );
            warn!("{warning}");
            warnings.push(warning);
        }
    }
    Ok(warnings)
}
