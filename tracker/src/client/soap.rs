use std::collections::HashMap;

use async_trait::async_trait;
use jira::{
    jql::JiraContext,
    models::{
        core::same_name,
        issue::{IssueType, TrackedIssue},
        project::Project,
        transition::{Transition, TransitionOutcome},
        version::{Version, VersionChange},
    },
    soap::{
        models::{RemoteIssue, RemoteVersion},
        JiraSoap, SoapSession,
    },
    Jira, JiraError,
};
use log::{debug, info, warn};

use super::{IssueTrackerClient, NewTrackedIssue};

/// `getIssuesFromJqlSearch` has no paging, so a search asks for as many issues as the service can return
const MAX_SEARCH_RESULTS: i64 = i32::MAX as i64;

/// Issue tracking over the legacy SOAP service
pub struct SoapTracker {
    session: SoapSession,
    statuses: HashMap<String, String>,
}

fn version_of(remote: RemoteVersion) -> Version {
    Version {
        id: remote.id,
        name: remote.name,
        released: remote.released,
        archived: remote.archived,
    }
}

impl SoapTracker {
    /// Logs in with the HTTP client of `jira` and fetches the status names
    ///
    /// # Errors
    /// When the login or the status lookup fails
    pub async fn connect(jira: &Jira, user: &str, password: &str) -> Result<SoapTracker, JiraError> {
        let soap = JiraSoap::new(jira.server_root(), jira.client.clone())?;
        let session = soap.connect(user, password).await?;
        let statuses = session.get_statuses().await?;
        Ok(SoapTracker { session, statuses })
    }

    #[must_use]
    pub fn new(session: SoapSession, statuses: HashMap<String, String>) -> Self {
        SoapTracker { session, statuses }
    }

    fn tracked(&self, issue: &RemoteIssue) -> Result<TrackedIssue, JiraError> {
        issue.to_tracked(&self.statuses, self.session.server_root())
    }

    async fn find_remote_version(&self, project: &Project, name: &str) -> Result<Option<RemoteVersion>, JiraError> {
        Ok(self
            .session
            .get_versions(&project.key)
            .await?
            .into_iter()
            .find(|v| same_name(v.name.trim(), name.trim())))
    }
}

#[async_trait]
impl IssueTrackerClient for SoapTracker {
    async fn validate_connection(&self) -> Result<(), JiraError> {
        // Logged in already, any call proves the session is usable
        self.session.get_statuses().await.map(|_| ())
    }

    async fn get_projects(&self) -> Result<Vec<Project>, JiraError> {
        Ok(self
            .session
            .get_projects()
            .await?
            .into_iter()
            .map(|p| Project {
                id: p.id,
                key: p.key,
                name: p.name,
            })
            .collect())
    }

    async fn find_project(&self, name: &str) -> Result<Option<Project>, JiraError> {
        Ok(self
            .get_projects()
            .await?
            .into_iter()
            .find(|p| same_name(&p.name, name)))
    }

    async fn project_has_releases_enabled(&self, _project: &Project) -> Result<bool, JiraError> {
        // The SOAP service predates the project feature flags
        Ok(true)
    }

    async fn get_versions(&self, project: &Project) -> Result<Vec<Version>, JiraError> {
        Ok(self
            .session
            .get_versions(&project.key)
            .await?
            .into_iter()
            .map(version_of)
            .collect())
    }

    async fn ensure_version(
        &self,
        project: &Project,
        name: &str,
        released: Option<bool>,
        archived: Option<bool>,
    ) -> Result<VersionChange, JiraError> {
        if archived.is_some() {
            warn!("The SOAP interface cannot archive versions, the archived flag of {name} is left as it is");
        }
        let (current, created) = match self.find_remote_version(project, name).await? {
            Some(current) => (current, false),
            None => {
                let added = self.session.add_version(&project.key, name.trim()).await?;
                info!("Created version {} in project {}", added.name, project.key);
                (added, true)
            }
        };

        let changed = match released {
            Some(true) if !current.released => {
                self.session.release_version(&project.key, current.clone()).await?;
                info!("Released version {} of project {}", current.name, project.key);
                Some(RemoteVersion {
                    released: true,
                    ..current.clone()
                })
            }
            Some(false) if current.released => {
                warn!("The SOAP interface cannot unrelease version {}", current.name);
                None
            }
            _ => None,
        };

        Ok(match (created, changed) {
            (true, changed) => VersionChange::Created(version_of(changed.unwrap_or(current))),
            (false, Some(changed)) => VersionChange::Updated(version_of(changed)),
            (false, None) => VersionChange::Unchanged(version_of(current)),
        })
    }

    async fn get_issue_types(&self, project: &Project) -> Result<Vec<IssueType>, JiraError> {
        Ok(self
            .session
            .get_issue_types(Some(&project.id))
            .await?
            .into_iter()
            .map(|t| IssueType { id: t.id, name: t.name })
            .collect())
    }

    async fn enumerate_issues(&self, context: &JiraContext) -> Result<Vec<TrackedIssue>, JiraError> {
        let jql = context.jql();
        debug!("Searching for issues with '{jql}'");
        let issues = self
            .session
            .get_issues_from_jql_search(&jql, MAX_SEARCH_RESULTS)
            .await?;
        if i64::try_from(issues.len()).is_ok_and(|found| found >= MAX_SEARCH_RESULTS) {
            warn!("The search '{jql}' returned the largest number of issues the SOAP service allows, there may be more");
        }
        issues.iter().map(|issue| self.tracked(issue)).collect()
    }

    async fn get_issue(&self, issue_key: &str) -> Result<TrackedIssue, JiraError> {
        let issue = self.session.get_issue(issue_key).await?;
        self.tracked(&issue)
    }

    async fn get_transitions(&self, issue_key: &str) -> Result<Vec<Transition>, JiraError> {
        Ok(self
            .session
            .get_available_actions(issue_key)
            .await?
            .into_iter()
            .map(|a| Transition { id: a.id, name: a.name })
            .collect())
    }

    async fn change_issue_status(
        &self,
        issue: &TrackedIssue,
        to_status: &str,
        comment: &str,
    ) -> Result<TransitionOutcome, JiraError> {
        let to_status = to_status.trim();
        if to_status.is_empty() {
            return Err(JiraError::RequiredParameter("to_status".to_string()));
        }
        if same_name(&issue.status, to_status) {
            debug!("{} is already in the {to_status} status.", issue.id);
            return Ok(TransitionOutcome::AlreadyInStatus);
        }

        let actions = self.get_transitions(&issue.id).await?;
        let Some(action) = actions.iter().find(|a| same_name(&a.name, to_status)).cloned() else {
            return Err(JiraError::InvalidTransition {
                issue: issue.id.clone(),
                to_status: to_status.to_string(),
                available: actions.into_iter().map(|a| a.name).collect(),
            });
        };

        self.session.progress_workflow_action(&issue.id, &action.id).await?;
        if !comment.trim().is_empty() {
            self.session.add_comment(&issue.id, comment).await?;
        }
        info!("Issue {} transitioned to {to_status}", issue.id);
        Ok(TransitionOutcome::Transitioned(action))
    }

    async fn add_comment(&self, issue_key: &str, body: &str) -> Result<(), JiraError> {
        self.session.add_comment(issue_key, body).await
    }

    async fn create_issue(&self, project: &Project, issue: &NewTrackedIssue) -> Result<String, JiraError> {
        let fix_versions = match &issue.fix_version {
            Some(version) => self
                .find_remote_version(project, &version.name)
                .await?
                .into_iter()
                .collect(),
            None => vec![],
        };
        let created = self
            .session
            .create_issue(&RemoteIssue {
                project: project.key.clone(),
                summary: issue.summary.clone(),
                description: issue.description.clone().unwrap_or_default(),
                issue_type: issue.issue_type.id.clone(),
                fix_versions,
                ..Default::default()
            })
            .await?;
        info!("Jira issue {} created.", created.key);
        Ok(created.key)
    }

    async fn disconnect(&self) {
        self.session.clone().logout().await;
    }
}
