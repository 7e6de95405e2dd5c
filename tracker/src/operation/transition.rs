use log::info;

use super::{non_blank, resolve_context, transition_all, BatchReport, IssueSelection};
use crate::{error::TrackerError, TrackerRuntime};

#[derive(Debug, Clone, Default)]
pub struct TransitionIssues {
    pub selection: IssueSelection,
    /// Only this issue instead of all selected ones
    pub issue_key: Option<String>,
    /// Only issues in this status are moved, compared ignoring case
    pub from_status: Option<String>,
    pub to_status: String,
    pub comment: Option<String>,
}

pub(crate) async fn execute(
    runtime: &TrackerRuntime,
    instructions: &TransitionIssues,
) -> Result<BatchReport, TrackerError> {
    let to_status = instructions.to_status.trim();
    if to_status.is_empty() {
        return Err(TrackerError::BadInput("The status to move issues to must be given".to_string()));
    }

    let issues = match non_blank(instructions.issue_key.as_deref()) {
        Some(key) => vec![runtime.guarded(runtime.client().get_issue(key)).await?],
        None => {
            let context = resolve_context(runtime, &instructions.selection).await?;
            runtime
                .guarded(runtime.client().enumerate_issues(&context))
                .await?
        }
    };

    let report = transition_all(
        runtime,
        issues,
        instructions.from_status.as_deref(),
        to_status,
        instructions.comment.as_deref().unwrap_or_default(),
    )
    .await?;
    info!(
        "{} issues moved to {to_status}, {} skipped, {} failed",
        report.transitioned.len(),
        report.skipped.len(),
        report.failed.len()
    );
    Ok(report)
}
