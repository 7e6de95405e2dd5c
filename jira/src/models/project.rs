use serde::{Deserialize, Serialize};

use super::issue::IssueType;

/// The Jira Software feature flag which must be enabled for a project to have releases.
pub const RELEASES_FEATURE: &str = "jsw.agility.releases";

#[derive(Clone, Debug, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct Project {
    /// Unique numeric identity of a jira project
    pub id: String,
    /// The jira project key, typically a short upper-case abbreviation used in JQL
    pub key: String,
    /// The name of the jira project
    pub name: String,
}

/// Reference to a project inside a request body
#[derive(Debug, Serialize)]
pub struct ProjectRef {
    pub id: String,
}

/// The subset of `project/{id}` we need to find the issue types of a project
#[derive(Debug, Deserialize)]
pub struct ProjectDetails {
    #[serde(default, alias = "issueTypes")]
    pub issue_types: Vec<IssueType>,
}

/// Response of `project/{id}/features`
#[derive(Debug, Deserialize, Default)]
pub struct ProjectFeatures {
    #[serde(default)]
    pub features: Vec<ProjectFeature>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectFeature {
    pub feature: Option<String>,
    pub state: Option<String>,
}

impl ProjectFeatures {
    /// The first entry named [`RELEASES_FEATURE`] decides, and only `ENABLED` counts.
    #[must_use]
    pub fn releases_enabled(&self) -> bool {
        self.features
            .iter()
            .find(|f| f.feature.as_deref() == Some(RELEASES_FEATURE))
            .is_some_and(|f| f.state.as_deref() == Some("ENABLED"))
    }
}
