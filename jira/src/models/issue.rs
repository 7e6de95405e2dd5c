use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{core::NamedThing, project::ProjectRef};
use crate::{JiraError, Result};

/// Represents a jira issue as returned by `search` and `issue/{key}`
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Issue {
    /// Numeric id of the jira issue
    pub id: String,
    /// The key of the jira issue, typically used and referenced by the user.
    pub key: String,
    pub fields: IssueFields,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct IssueFields {
    pub status: NamedThing,
    #[serde(rename = "issuetype")]
    pub issue_type: NamedThing,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub reporter: Option<Reporter>,
    pub created: String,
    #[serde(rename = "resolutiondate")]
    pub resolution_date: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Reporter {
    #[serde(alias = "displayName")]
    pub display_name: String,
}

/// The issue as the rest of the application sees it, independent of the
/// protocol it was fetched with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TrackedIssue {
    /// The issue key, e.g. `WIDGETS-12`
    pub id: String,
    pub issue_type: String,
    pub title: String,
    pub description: String,
    pub status: String,
    /// Derived from the resolution, not from the name of the status
    pub is_closed: bool,
    pub submitted_date: DateTime<Utc>,
    pub submitter: String,
    pub url: String,
}

impl TrackedIssue {
    ///
    /// # Errors
    /// If the `created` field is not a timestamp
    pub fn from_issue(issue: &Issue, server_root: &str) -> Result<TrackedIssue> {
        let fields = &issue.fields;
        Ok(TrackedIssue {
            id: issue.key.clone(),
            issue_type: fields.issue_type.name.clone(),
            title: fields.summary.clone().unwrap_or_default(),
            description: fields.description.clone().unwrap_or_default(),
            status: fields.status.name.clone(),
            is_closed: fields.resolution_date.is_some(),
            submitted_date: parse_jira_timestamp(&fields.created)?,
            submitter: fields
                .reporter
                .as_ref()
                .map(|r| r.display_name.clone())
                .unwrap_or_default(),
            url: browse_url(server_root, &issue.key),
        })
    }
}

/// The browsable URL of an issue
#[must_use]
pub fn browse_url(server_root: &str, key: &str) -> String {
    format!("{}/browse/{key}", server_root.trim_end_matches('/'))
}

/// Jira renders timestamps like `2024-01-15T10:30:00.000+0000`, which is not
/// quite RFC 3339. Both forms are accepted.
///
/// # Errors
/// `JiraError::DateParse` if the text is neither
pub fn parse_jira_timestamp(text: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%z")
        .or_else(|_| DateTime::parse_from_rfc3339(text))
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| JiraError::DateParse(text.to_string()))
}

/// Project scoped classification of issues, i.e. `Bug` or `Task`
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct IssueType {
    pub id: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct NewIssueResponse {
    pub id: String,
    pub key: String,
}

#[allow(clippy::module_name_repetitions)]
#[derive(Serialize, Debug)]
pub struct NewIssue {
    pub fields: NewIssueFields,
}

#[derive(Serialize, Debug)]
pub struct NewIssueFields {
    pub project: ProjectRef,
    pub issuetype: NamedThing,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "fixVersions", skip_serializing_if = "Vec::is_empty")]
    pub fix_versions: Vec<NamedThing>,
}

/// Body of the `issue/{key}/comment` POST
#[derive(Serialize, Debug)]
pub struct NewComment {
    pub body: String,
}
