//! The capabilities the operations need from an issue tracker, implemented over
//! the Jira REST interface and over the legacy SOAP service.
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
    Jira, JiraError,
};
use log::debug;

use crate::{
    config::{ApiType, AppConfiguration},
    error::TrackerError,
};

pub mod rest;
pub mod soap;

pub use rest::RestTracker;
pub use soap::SoapTracker;

/// What a new issue is made of, the project aside
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrackedIssue {
    pub summary: String,
    pub description: Option<String>,
    pub issue_type: IssueType,
    /// Only set to a version known to exist in the project
    pub fix_version: Option<Version>,
}

#[async_trait]
pub trait IssueTrackerClient: Send + Sync {
    /// Checks the credentials and that issues can be browsed
    async fn validate_connection(&self) -> Result<(), JiraError>;

    async fn get_projects(&self) -> Result<Vec<Project>, JiraError>;

    /// Exact, case-insensitive name match
    async fn find_project(&self, name: &str) -> Result<Option<Project>, JiraError>;

    async fn project_has_releases_enabled(&self, project: &Project) -> Result<bool, JiraError>;

    async fn get_versions(&self, project: &Project) -> Result<Vec<Version>, JiraError>;

    async fn ensure_version(
        &self,
        project: &Project,
        name: &str,
        released: Option<bool>,
        archived: Option<bool>,
    ) -> Result<VersionChange, JiraError>;

    async fn get_issue_types(&self, project: &Project) -> Result<Vec<IssueType>, JiraError>;

    async fn find_issue_type(&self, project: &Project, name: &str) -> Result<Option<IssueType>, JiraError> {
        Ok(self
            .get_issue_types(project)
            .await?
            .into_iter()
            .find(|t| same_name(&t.name, name)))
    }

    async fn enumerate_issues(&self, context: &JiraContext) -> Result<Vec<TrackedIssue>, JiraError>;

    async fn get_issue(&self, issue_key: &str) -> Result<TrackedIssue, JiraError>;

    /// Names and ids of the transitions available to the issue now
    async fn get_transitions(&self, issue_key: &str) -> Result<Vec<Transition>, JiraError>;

    /// A blank comment means no comment
    async fn change_issue_status(
        &self,
        issue: &TrackedIssue,
        to_status: &str,
        comment: &str,
    ) -> Result<TransitionOutcome, JiraError>;

    async fn add_comment(&self, issue_key: &str, body: &str) -> Result<(), JiraError>;

    /// Returns the key of the new issue
    async fn create_issue(&self, project: &Project, issue: &NewTrackedIssue) -> Result<String, JiraError>;

    /// Ends the session with the server, if there is one
    async fn disconnect(&self) {}
}

/// Creates the client for the configured interface. The SOAP client logs in
/// and fetches the status names before it is returned.
///
/// # Errors
/// Invalid configuration, or a failed login for SOAP
pub async fn connect(config: &AppConfiguration) -> Result<Box<dyn IssueTrackerClient>, TrackerError> {
    config.validate()?;

    let mut builder = Jira::builder()
        .host(config.jira.url.trim())
        .basic_auth(config.jira.user.as_str(), config.jira.token.as_str());
    if let Some(seconds) = config.jira.timeout_secs {
        builder = builder.timeout(seconds);
    }
    let jira = builder
        .build()
        .map_err(|e| TrackerError::InvalidConfiguration(e.to_string()))?;

    match config.jira.api {
        ApiType::Rest => {
            debug!("Using the REST interface of {}", jira.server_root());
            Ok(Box::new(RestTracker::new(jira)))
        }
        ApiType::Soap => {
            debug!("Using the SOAP interface of {}", jira.server_root());
            let soap = SoapTracker::connect(&jira, &config.jira.user, &config.jira.token).await?;
            Ok(Box::new(soap))
        }
    }
}
