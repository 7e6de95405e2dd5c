use log::debug;

use super::{resolve_context, resolve_project, IssueSelection};
use crate::{error::TrackerError, TrackerRuntime};

/// Candidate values for completing user input
#[derive(Debug, Clone)]
pub enum Suggest {
    Projects,
    Versions { project: Option<String> },
    IssueTypes { project: Option<String> },
    /// Transitions available to the last issue of the selection
    Transitions { selection: IssueSelection },
}

pub(crate) async fn execute(runtime: &TrackerRuntime, instructions: &Suggest) -> Result<Vec<String>, TrackerError> {
    let client = runtime.client();
    let names = match instructions {
        Suggest::Projects => runtime
            .guarded(client.get_projects())
            .await?
            .into_iter()
            .map(|p| p.name)
            .collect(),
        Suggest::Versions { project } => {
            let project = resolve_project(runtime, project.as_deref()).await?;
            runtime
                .guarded(client.get_versions(&project))
                .await?
                .into_iter()
                .map(|v| v.name)
                .collect()
        }
        Suggest::IssueTypes { project } => {
            let project = resolve_project(runtime, project.as_deref()).await?;
            runtime
                .guarded(client.get_issue_types(&project))
                .await?
                .into_iter()
                .map(|t| t.name)
                .collect()
        }
        Suggest::Transitions { selection } => {
            let context = resolve_context(runtime, selection).await?;
            let issues = runtime.guarded(client.enumerate_issues(&context)).await?;
            match issues.last() {
                Some(issue) => {
                    debug!("Suggesting the transitions of {}", issue.id);
                    runtime
                        .guarded(client.get_transitions(&issue.id))
                        .await?
                        .into_iter()
                        .map(|t| t.name)
                        .collect()
                }
                None => vec![],
            }
        }
    };
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockTracker;
    use crate::operation::tests::{issue, runtime_with, widgets};
    use jira::models::transition::Transition;
    use mockall::predicate::*;

    #[tokio::test]
    async fn transitions_of_the_last_issue() -> Result<(), TrackerError> {
        let mut client = MockTracker::new();
        client.expect_find_project().returning(|_| Ok(Some(widgets())));
        client
            .expect_enumerate_issues()
            .returning(|_| Ok(vec![issue("WID-1", "Open", false), issue("WID-9", "Open", false)]));
        client
            .expect_get_transitions()
            .with(eq("WID-9"))
            .times(1)
            .returning(|_| {
                Ok(vec![
                    Transition {
                        id: "11".to_string(),
                        name: "Start Progress".to_string(),
                    },
                    Transition {
                        id: "31".to_string(),
                        name: "Done".to_string(),
                    },
                ])
            });
        let runtime = runtime_with(client);

        let names = execute(
            &runtime,
            &Suggest::Transitions {
                selection: IssueSelection::default(),
            },
        )
        .await?;

        assert_eq!(names, vec!["Start Progress", "Done"]);
        Ok(())
    }

    #[tokio::test]
    async fn no_issues_no_transitions() -> Result<(), TrackerError> {
        let mut client = MockTracker::new();
        client.expect_find_project().returning(|_| Ok(Some(widgets())));
        client.expect_enumerate_issues().returning(|_| Ok(vec![]));
        client.expect_get_transitions().times(0);
        let runtime = runtime_with(client);

        let names = execute(
            &runtime,
            &Suggest::Transitions {
                selection: IssueSelection::default(),
            },
        )
        .await?;

        assert!(names.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn project_names() -> Result<(), TrackerError> {
        let mut client = MockTracker::new();
        client.expect_get_projects().returning(|| Ok(vec![widgets()]));
        let runtime = runtime_with(client);

        assert_eq!(execute(&runtime, &Suggest::Projects).await?, vec!["Widgets"]);
        Ok(())
    }
}
