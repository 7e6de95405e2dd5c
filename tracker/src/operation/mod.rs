//! The issue tracking use cases, one submodule for each.
use jira::{
    jql::{mapping_query, JiraContext},
    models::{core::same_name, issue::TrackedIssue, project::Project, transition::TransitionOutcome},
};
use log::{debug, error};

use crate::{error::TrackerError, TrackerRuntime};

pub mod close;
pub mod comment;
pub mod create;
pub mod issues;
pub mod release;
pub mod suggest;
pub mod transition;
pub mod validate;

/// Outcome of an operation on many issues. Every issue ends up in exactly one list.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub transitioned: Vec<String>,
    /// Already in the target status, or not in the required from-status
    pub skipped: Vec<String>,
    /// Issue key and the reason
    pub failed: Vec<(String, String)>,
}

impl BatchReport {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Selects the issues of a batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueSelection {
    /// Falls back to the configured project
    pub project: Option<String>,
    pub fix_version: Option<String>,
    /// Falls back to the configured custom JQL
    pub custom_jql: Option<String>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Finds the named project, or the configured one when no name is given
pub(crate) async fn resolve_project(
    runtime: &TrackerRuntime,
    name: Option<&str>,
) -> Result<Project, TrackerError> {
    let name = non_blank(name)
        .or_else(|| non_blank(runtime.configuration().issues.project.as_deref()))
        .ok_or_else(|| TrackerError::BadInput("No project given, and no default project configured".to_string()))?;

    let project = runtime
        .guarded(runtime.client().find_project(name))
        .await?
        .ok_or_else(|| TrackerError::ProjectNotFound(name.to_string()))?;
    debug!("Project {name} is {} ({})", project.key, project.id);
    Ok(project)
}

/// Builds the query context. With a custom JQL the project is neither required
/// nor looked up; without one the project must exist.
pub(crate) async fn resolve_context(
    runtime: &TrackerRuntime,
    selection: &IssueSelection,
) -> Result<JiraContext, TrackerError> {
    let issues = &runtime.configuration().issues;
    let custom_jql = non_blank(selection.custom_jql.as_deref())
        .or_else(|| non_blank(issues.custom_jql.as_deref()));
    let project_name =
        non_blank(selection.project.as_deref()).or_else(|| non_blank(issues.project.as_deref()));

    let fix_version = non_blank(selection.fix_version.as_deref());

    let (project_key, custom_jql) = match (project_name, custom_jql) {
        // The custom query replaces the project filter, the project is not looked up
        (name, Some(jql)) => (name.unwrap_or_default().to_string(), Some(jql.to_string())),
        (Some(name), None) => {
            let project = resolve_project(runtime, Some(name)).await?;
            // A release is selected through the mapping query when one is configured
            let mapping = match (fix_version, non_blank(issues.custom_mapping_query.as_deref())) {
                (Some(version), Some(query)) => Some(mapping_query(&project.name, Some(query), version)?),
                _ => None,
            };
            (project.key, mapping)
        }
        (None, None) => {
            return Err(TrackerError::BadInput(
                "Either a project or a custom JQL query is required".to_string(),
            ))
        }
    };

    let mut context = JiraContext::new(&project_key)
        .with_fix_version(fix_version)
        .with_custom_jql(custom_jql.as_deref());
    context.closed_state.clone_from(&issues.closed_state);
    Ok(context)
}

/// Moves every issue to `to_status`, skipping those not in `from_status` when
/// one is given. A failure is recorded and the batch goes on.
pub(crate) async fn transition_all(
    runtime: &TrackerRuntime,
    issues: Vec<TrackedIssue>,
    from_status: Option<&str>,
    to_status: &str,
    comment: &str,
) -> Result<BatchReport, TrackerError> {
    let mut report = BatchReport::default();
    for issue in issues {
        runtime.check_cancelled()?;

        if let Some(from) = non_blank(from_status) {
            if !same_name(&issue.status, from) {
                debug!("{} is not in the {from} status, and will not be changed.", issue.id);
                report.skipped.push(issue.id);
                continue;
            }
        }

        let outcome = runtime
            .guarded(runtime.client().change_issue_status(&issue, to_status, comment))
            .await;
        match outcome {
            Ok(TransitionOutcome::Transitioned(_)) => report.transitioned.push(issue.id),
            Ok(TransitionOutcome::AlreadyInStatus) => report.skipped.push(issue.id),
            Err(TrackerError::Cancelled) => return Err(TrackerError::Cancelled),
            Err(e) => {
                error!("Unable to change the status of {} to {to_status}: {e}", issue.id);
                report.failed.push((issue.id, e.to_string()));
            }
        }
    }
    Ok(report)
}
