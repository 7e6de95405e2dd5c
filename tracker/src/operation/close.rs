use jira::models::issue::TrackedIssue;
use log::{debug, info};

use super::{non_blank, resolve_context, transition_all, BatchReport, IssueSelection};
use crate::{error::TrackerError, TrackerRuntime};

#[derive(Debug, Clone, Default)]
pub struct CloseIssues {
    pub selection: IssueSelection,
    /// Only this issue instead of all selected ones
    pub issue_key: Option<String>,
    pub comment: Option<String>,
}

/// Moves every selected issue which is not closed yet to the configured closed status
pub(crate) async fn execute(runtime: &TrackerRuntime, instructions: &CloseIssues) -> Result<BatchReport, TrackerError> {
    let closed_state = runtime.configuration().issues.closed_state.clone();

    let issues = match non_blank(instructions.issue_key.as_deref()) {
        Some(key) => vec![runtime.guarded(runtime.client().get_issue(key)).await?],
        None => {
            let context = resolve_context(runtime, &instructions.selection).await?;
            runtime
                .guarded(runtime.client().enumerate_issues(&context))
                .await?
        }
    };

    let (closed, open): (Vec<TrackedIssue>, Vec<TrackedIssue>) =
        issues.into_iter().partition(|issue| issue.is_closed);
    for issue in &closed {
        debug!("{} is already closed", issue.id);
    }

    let mut report = transition_all(
        runtime,
        open,
        None,
        &closed_state,
        instructions.comment.as_deref().unwrap_or_default(),
    )
    .await?;
    report.skipped.extend(closed.into_iter().map(|issue| issue.id));
    info!(
        "{} issues closed, {} were closed already, {} failed",
        report.transitioned.len(),
        report.skipped.len(),
        report.failed.len()
    );
    Ok(report)
}
