use serde::{Deserialize, Serialize};

/// Connection settings as they are persisted in the application configuration
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct JiraClientConfiguration {
    pub jira_url: String,
    pub user: String,
    pub token: String,
}

impl Default for JiraClientConfiguration {
    fn default() -> Self {
        JiraClientConfiguration {
            jira_url: "https://jira.example.com".into(),
            user: "user.name@example.com".into(),
            token: "<your secret jira token goes here>".into(),
        }
    }
}

impl JiraClientConfiguration {
    /// Does the token look like a real Jira token rather than the placeholder?
    #[must_use]
    pub fn has_valid_jira_token(&self) -> bool {
        let token = self.token.trim();
        !(token.is_empty() || token == JiraClientConfiguration::default().token)
    }
}
