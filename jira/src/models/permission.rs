use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The permission needed to see any issue at all
pub const BROWSE_PROJECTS: &str = "BROWSE_PROJECTS";

/// Response of `mypermissions`
#[derive(Debug, Deserialize, Default)]
pub struct Permissions {
    #[serde(default)]
    pub permissions: BTreeMap<String, Permission>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Permission {
    pub key: String,
    #[serde(alias = "havePermission")]
    pub have_permission: bool,
}

impl Permissions {
    /// Looks up a permission by key, ignoring case
    #[must_use]
    pub fn granted(&self, key: &str) -> bool {
        self.permissions
            .values()
            .find(|p| p.key.eq_ignore_ascii_case(key))
            .is_some_and(|p| p.have_permission)
    }
}
