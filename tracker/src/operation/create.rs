use log::{error, info, warn};

use super::{non_blank, resolve_project};
use crate::{client::NewTrackedIssue, error::TrackerError, TrackerRuntime};
use jira::models::core::same_name;

#[derive(Debug, Clone, Default)]
pub struct CreateIssue {
    /// Falls back to the configured project
    pub project: Option<String>,
    pub summary: String,
    pub description: Option<String>,
    pub issue_type: String,
    pub fix_version: Option<String>,
}

/// Creates the issue and returns its key. A fix version which does not exist
/// is left out with a warning.
pub(crate) async fn execute(runtime: &TrackerRuntime, instructions: &CreateIssue) -> Result<String, TrackerError> {
    if instructions.summary.trim().is_empty() {
        return Err(TrackerError::BadInput("The summary of a new issue may not be empty".to_string()));
    }
    let client = runtime.client();
    let project = resolve_project(runtime, instructions.project.as_deref()).await?;

    let Some(issue_type) = runtime
        .guarded(client.find_issue_type(&project, instructions.issue_type.trim()))
        .await?
    else {
        error!(
            "Unable to find issue type '{}' in project {}",
            instructions.issue_type, project.key
        );
        return Err(TrackerError::IssueTypeNotFound {
            project: project.name.clone(),
            issue_type: instructions.issue_type.clone(),
        });
    };

    let fix_version = match non_blank(instructions.fix_version.as_deref()) {
        Some(wanted) => {
            let found = runtime
                .guarded(client.get_versions(&project))
                .await?
                .into_iter()
                .find(|v| same_name(&v.name, wanted));
            if found.is_none() {
                warn!(
                    "Could not set Fix For version to '{wanted}' because it was not found in Jira for project key '{}'.",
                    project.key
                );
            }
            found
        }
        None => None,
    };

    let new_issue = NewTrackedIssue {
        summary: instructions.summary.trim().to_string(),
        description: instructions.description.clone(),
        issue_type,
        fix_version,
    };
    let key = runtime.guarded(client.create_issue(&project, &new_issue)).await?;
    info!("Created {key} in project {}", project.key);
    Ok(key)
}
