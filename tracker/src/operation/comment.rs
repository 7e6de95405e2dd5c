use log::info;

use super::non_blank;
use crate::{error::TrackerError, TrackerRuntime};

#[derive(Debug, Clone, Default)]
pub struct CommentIssue {
    pub issue_key: String,
    pub body: String,
}

/// Adds the comment and returns the key of the issue it was added to
pub(crate) async fn execute(runtime: &TrackerRuntime, instructions: &CommentIssue) -> Result<String, TrackerError> {
    let issue_key = non_blank(Some(instructions.issue_key.as_str()))
        .ok_or_else(|| TrackerError::BadInput("An issue key is required".to_string()))?;
    if instructions.body.trim().is_empty() {
        return Err(TrackerError::BadInput("The comment may not be empty".to_string()));
    }

    runtime
        .guarded(runtime.client().add_comment(issue_key, &instructions.body))
        .await?;
    info!("Comment added to {issue_key}");
    Ok(issue_key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockTracker;
    use crate::operation::tests::runtime_with;
    use mockall::predicate::*;

    #[tokio::test]
    async fn comment_goes_to_the_trimmed_key() -> Result<(), TrackerError> {
        let mut client = MockTracker::new();
        client
            .expect_add_comment()
            .with(eq("WID-7"), eq("Deployed to staging"))
            .times(1)
            .returning(|_, _| Ok(()));
        let runtime = runtime_with(client);

        let key = execute(
            &runtime,
            &CommentIssue {
                issue_key: " WID-7 ".to_string(),
                body: "Deployed to staging".to_string(),
            },
        )
        .await?;

        assert_eq!(key, "WID-7");
        Ok(())
    }

    #[tokio::test]
    async fn empty_comment_is_rejected() {
        let mut client = MockTracker::new();
        client.expect_add_comment().times(0);
        let runtime = runtime_with(client);

        let result = execute(
            &runtime,
            &CommentIssue {
                issue_key: "WID-7".to_string(),
                body: "  ".to_string(),
            },
        )
        .await;

        assert!(matches!(result, Err(TrackerError::BadInput(_))));
    }
}
