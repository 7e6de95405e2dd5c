//! Construction of JQL search filters.
use crate::{JiraError, Result};

/// What a batch of issues is selected by
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JiraContext {
    pub project_key_or_name: String,
    pub fix_for_version: Option<String>,
    pub custom_jql: Option<String>,
    pub status: Option<String>,
    pub closed_state: String,
}

impl JiraContext {
    #[must_use]
    pub fn new(project_key_or_name: &str) -> Self {
        JiraContext {
            project_key_or_name: project_key_or_name.to_string(),
            closed_state: "Closed".to_string(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_fix_version(mut self, version: Option<&str>) -> Self {
        self.fix_for_version = version.map(ToString::to_string);
        self
    }

    #[must_use]
    pub fn with_custom_jql(mut self, jql: Option<&str>) -> Self {
        self.custom_jql = jql.map(ToString::to_string);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: Option<&str>) -> Self {
        self.status = status.map(ToString::to_string);
        self
    }

    /// The search filter. A non-blank custom JQL is used as it is, and the
    /// project, version and status are then ignored.
    #[must_use]
    pub fn jql(&self) -> String {
        if let Some(custom) = non_blank(self.custom_jql.as_deref()) {
            return custom.to_string();
        }

        let mut jql = format!("project='{}'", quoted(&self.project_key_or_name));
        if let Some(version) = non_blank(self.fix_for_version.as_deref()) {
            jql.push_str(&format!(" and fixVersion='{}'", quoted(version)));
        }
        if let Some(status) = non_blank(self.status.as_deref()) {
            jql.push_str(&format!(" and status='{}'", quoted(status)));
        }
        jql
    }
}

/// A double quoted JQL string literal, `"` and `\` escaped
#[must_use]
pub fn jql_value(value: &str) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            literal.push('\\');
        }
        literal.push(c);
    }
    literal.push('"');
    literal
}

/// Placeholder in a custom mapping query for the release number, as a JQL literal
pub const RELEASE_NUMBER_PLACEHOLDER: &str = "$ReleaseNumber";
const JQL_VALUE_RELEASE_NUMBER: &str = "$JqlValue($ReleaseNumber)";

/// Query selecting the issues which belong to a release of a project.
///
/// In a custom mapping query `$ReleaseNumber`, or `$JqlValue($ReleaseNumber)`,
/// is replaced by the release number as a double quoted JQL literal.
///
/// # Errors
/// `RequiredParameter` when the release number is blank
pub fn mapping_query(
    project_name: &str,
    custom_mapping_query: Option<&str>,
    release_number: &str,
) -> Result<String> {
    if release_number.trim().is_empty() {
        return Err(JiraError::RequiredParameter("release_number".to_string()));
    }
    Ok(match non_blank(custom_mapping_query) {
        Some(query) => {
            let release = jql_value(release_number.trim());
            let query = query
                .replace(JQL_VALUE_RELEASE_NUMBER, &release)
                .replace(RELEASE_NUMBER_PLACEHOLDER, &release);
            format!("project = \"{project_name}\" AND ({query})")
        }
        None => format!(
            "project = \"{project_name}\" AND fixVersion = {}",
            jql_value(release_number)
        ),
    })
}

// Contents of a single quoted literal
fn quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
