use serde::{Deserialize, Serialize};

/// A Jira fix-version, also known as a release
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Version {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub released: bool,
    #[serde(default)]
    pub archived: bool,
}

impl Version {
    /// Does the version differ from the requested flags?
    /// A flag which is not requested never counts as a difference.
    #[must_use]
    pub fn differs_from(&self, released: Option<bool>, archived: Option<bool>) -> bool {
        released.is_some_and(|r| r != self.released) || archived.is_some_and(|a| a != self.archived)
    }
}

/// Body of the `version` POST
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVersion {
    pub project_id: String,
    pub name: String,
    pub released: bool,
    pub archived: bool,
}

/// Body of the `version/{id}` PUT, only the requested flags are sent
#[derive(Debug, Serialize)]
pub struct VersionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub released: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
}

/// Result of [`crate::Jira::ensure_version`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionChange {
    Created(Version),
    Updated(Version),
    Unchanged(Version),
}

impl VersionChange {
    #[must_use]
    pub fn version(&self) -> &Version {
        match self {
            VersionChange::Created(v) | VersionChange::Updated(v) | VersionChange::Unchanged(v) => v,
        }
    }
}
