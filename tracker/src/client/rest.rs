use async_trait::async_trait;
use futures::TryStreamExt;
use jira::{
    jql::JiraContext,
    models::{
        issue::{Issue, IssueType, TrackedIssue},
        project::Project,
        transition::{Transition, TransitionOutcome},
        version::{Version, VersionChange},
    },
    Jira, JiraError,
};
use log::debug;

use super::{IssueTrackerClient, NewTrackedIssue};

/// Issue tracking over the Jira REST interface
pub struct RestTracker {
    jira: Jira,
}

impl RestTracker {
    #[must_use]
    pub fn new(jira: Jira) -> Self {
        RestTracker { jira }
    }

    fn tracked(&self, issue: &Issue) -> Result<TrackedIssue, JiraError> {
        TrackedIssue::from_issue(issue, self.jira.server_root())
    }
}

#[async_trait]
impl IssueTrackerClient for RestTracker {
    async fn validate_connection(&self) -> Result<(), JiraError> {
        self.jira.validate_connection().await
    }

    async fn get_projects(&self) -> Result<Vec<Project>, JiraError> {
        self.jira.get_projects().try_collect().await
    }

    async fn find_project(&self, name: &str) -> Result<Option<Project>, JiraError> {
        self.jira.try_get_project(name).await
    }

    async fn project_has_releases_enabled(&self, project: &Project) -> Result<bool, JiraError> {
        self.jira.project_has_releases_enabled(&project.id).await
    }

    async fn get_versions(&self, project: &Project) -> Result<Vec<Version>, JiraError> {
        self.jira.get_versions(&project.id).try_collect().await
    }

    async fn ensure_version(
        &self,
        project: &Project,
        name: &str,
        released: Option<bool>,
        archived: Option<bool>,
    ) -> Result<VersionChange, JiraError> {
        self.jira.ensure_version(&project.id, name, released, archived).await
    }

    async fn get_issue_types(&self, project: &Project) -> Result<Vec<IssueType>, JiraError> {
        self.jira.get_issue_types(Some(&project.id)).await
    }

    async fn enumerate_issues(&self, context: &JiraContext) -> Result<Vec<TrackedIssue>, JiraError> {
        let jql = context.jql();
        debug!("Searching for issues with '{jql}'");
        let issues: Vec<Issue> = self.jira.get_issues(Some(&jql)).try_collect().await?;
        issues.iter().map(|issue| self.tracked(issue)).collect()
    }

    async fn get_issue(&self, issue_key: &str) -> Result<TrackedIssue, JiraError> {
        let issue = self.jira.get_issue(issue_key).await?;
        self.tracked(&issue)
    }

    async fn get_transitions(&self, issue_key: &str) -> Result<Vec<Transition>, JiraError> {
        self.jira.get_issue_transitions(issue_key).await
    }

    async fn change_issue_status(
        &self,
        issue: &TrackedIssue,
        to_status: &str,
        comment: &str,
    ) -> Result<TransitionOutcome, JiraError> {
        self.jira
            .change_status(&issue.id, &issue.status, to_status, Some(comment))
            .await
    }

    async fn add_comment(&self, issue_key: &str, body: &str) -> Result<(), JiraError> {
        self.jira.add_comment(issue_key, body).await
    }

    async fn create_issue(&self, project: &Project, issue: &NewTrackedIssue) -> Result<String, JiraError> {
        let created = self
            .jira
            .create_issue(
                &project.id,
                &issue.summary,
                &issue.issue_type.name,
                issue.description.as_deref(),
                issue.fix_version.as_ref().map(|v| v.name.as_str()),
            )
            .await?;
        Ok(created.key)
    }
}
