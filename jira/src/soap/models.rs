use std::collections::HashMap;

use chrono::Utc;

use super::xml::{Element, Value};
use crate::models::issue::{browse_url, parse_jira_timestamp, TrackedIssue};
use crate::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteProject {
    pub id: String,
    pub key: String,
    pub name: String,
}

impl From<&Element> for RemoteProject {
    fn from(e: &Element) -> Self {
        RemoteProject {
            id: e.text_field("id"),
            key: e.text_field("key"),
            name: e.text_field("name"),
        }
    }
}

/// Anything the SOAP service describes by id and name: statuses, issue types,
/// workflow actions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteNamed {
    pub id: String,
    pub name: String,
}

impl From<&Element> for RemoteNamed {
    fn from(e: &Element) -> Self {
        RemoteNamed {
            id: e.text_field("id"),
            name: e.text_field("name"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteVersion {
    pub id: String,
    pub name: String,
    pub released: bool,
    pub archived: bool,
    pub release_date: Option<String>,
}

impl From<&Element> for RemoteVersion {
    fn from(e: &Element) -> Self {
        RemoteVersion {
            id: e.text_field("id"),
            name: e.text_field("name"),
            released: e.bool_field("released"),
            archived: e.bool_field("archived"),
            release_date: e.field("releaseDate"),
        }
    }
}

impl RemoteVersion {
    pub(crate) fn to_value(&self) -> Value {
        let mut fields = vec![("name", Value::from(self.name.as_str()))];
        if !self.id.is_empty() {
            fields.insert(0, ("id", Value::from(self.id.as_str())));
        }
        fields.push(("released", Value::Bool(self.released)));
        fields.push(("archived", Value::Bool(self.archived)));
        fields.push(("releaseDate", Value::from(self.release_date.clone())));
        Value::Struct("RemoteVersion", fields)
    }

    /// Marks the version released as of now
    pub(crate) fn into_released(mut self) -> RemoteVersion {
        self.released = true;
        self.release_date = Some(Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteIssue {
    pub id: String,
    pub key: String,
    pub project: String,
    pub summary: String,
    pub description: String,
    /// Issue type id, or name when creating
    pub issue_type: String,
    /// Status id
    pub status: String,
    pub reporter: String,
    pub created: String,
    pub resolution: Option<String>,
    pub fix_versions: Vec<RemoteVersion>,
}

impl From<&Element> for RemoteIssue {
    fn from(e: &Element) -> Self {
        RemoteIssue {
            id: e.text_field("id"),
            key: e.text_field("key"),
            project: e.text_field("project"),
            summary: e.text_field("summary"),
            description: e.text_field("description"),
            issue_type: e.text_field("type"),
            status: e.text_field("status"),
            reporter: e.text_field("reporter"),
            created: e.text_field("created"),
            resolution: e.field("resolution").filter(|r| !r.is_empty()),
            fix_versions: e
                .child("fixVersions")
                .map(|versions| versions.children.iter().map(RemoteVersion::from).collect())
                .unwrap_or_default(),
        }
    }
}

impl RemoteIssue {
    pub(crate) fn to_value(&self) -> Value {
        Value::Struct(
            "RemoteIssue",
            vec![
                ("project", Value::from(self.project.as_str())),
                ("summary", Value::from(self.summary.as_str())),
                ("description", Value::from(self.description.as_str())),
                ("type", Value::from(self.issue_type.as_str())),
                (
                    "fixVersions",
                    Value::Array(
                        "RemoteVersion",
                        self.fix_versions.iter().map(RemoteVersion::to_value).collect(),
                    ),
                ),
            ],
        )
    }

    /// Maps the issue to the common record, naming the status through the
    /// dictionary from [`super::SoapSession::get_statuses`]. An unknown status
    /// id is kept as it is.
    ///
    /// # Errors
    /// When `created` is not a timestamp
    pub fn to_tracked(&self, statuses: &HashMap<String, String>, server_root: &str) -> Result<TrackedIssue> {
        Ok(TrackedIssue {
            id: self.key.clone(),
            issue_type: self.issue_type.clone(),
            title: self.summary.clone(),
            description: self.description.clone(),
            status: statuses
                .get(&self.status)
                .cloned()
                .unwrap_or_else(|| self.status.clone()),
            is_closed: self.resolution.is_some(),
            submitted_date: parse_jira_timestamp(&self.created)?,
            submitter: self.reporter.clone(),
            url: browse_url(server_root, &self.key),
        })
    }
}
