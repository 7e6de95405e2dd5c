use jira::models::issue::TrackedIssue;
use log::debug;

use super::{resolve_context, IssueSelection};
use crate::{error::TrackerError, TrackerRuntime};

/// The issues of a project, optionally of one fix version and in one status
#[derive(Debug, Clone, Default)]
pub struct IssueQuery {
    pub selection: IssueSelection,
    pub status: Option<String>,
}

pub(crate) async fn execute(runtime: &TrackerRuntime, query: &IssueQuery) -> Result<Vec<TrackedIssue>, TrackerError> {
    let context = resolve_context(runtime, &query.selection)
        .await?
        .with_status(query.status.as_deref());
    let issues = runtime
        .guarded(runtime.client().enumerate_issues(&context))
        .await?;
    debug!("Found {} issues with '{}'", issues.len(), context.jql());
    Ok(issues)
}
