//!
//! ```rust,ignore
//! // Explicit configuration
//! let jira = Jira::builder()
//!     .host("https://jira.example.com")
//!     .basic_auth("builder@example.com", "api-token")
//!     .timeout(30)
//!     .build()?;
//!
//! // JIRA_HOST, JIRA_USER, JIRA_TOKEN and optionally JIRA_API_VERSION
//! let jira = JiraBuilder::create_from_env()?;
//! ```
use crate::{server_url, Credentials, Jira};
use log::debug;
use reqwest::Client;
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Error type for `JiraBuilder` operations
#[derive(Error, Debug)]
pub enum JiraBuilderError {
    #[error("Environment variable {0} not set")]
    EnvVarNotSet(String),

    #[error("URL parsing error: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("Jira client initialization error: {0}")]
    ClientInitError(String),

    #[error("Timeout must be positive")]
    InvalidTimeout,
}

/// Names of the environment variables read by [`JiraBuilder::from_env`]
pub struct JiraEnvVars;

impl JiraEnvVars {
    pub const HOST: &'static str = "JIRA_HOST";
    pub const USER: &'static str = "JIRA_USER";
    pub const TOKEN: &'static str = "JIRA_TOKEN";
    pub const API_VERSION: &'static str = "JIRA_API_VERSION";
}

pub const DEFAULT_API_VERSION: &str = "2";

const USER_AGENT: &str = concat!("jira-tracker/", env!("CARGO_PKG_VERSION"));

/// Builder for creating Jira client instances
#[derive(Default)]
pub struct JiraBuilder {
    host: Option<String>,
    api_version: Option<String>,
    credentials: Option<Credentials>,
    timeout: Option<Duration>,
}

impl JiraBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the Jira server URL, i.e. `https://jira.example.com`
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets the REST API version (default is "2")
    #[must_use]
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    #[must_use]
    pub fn basic_auth(mut self, username: impl Into<String>, token: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::Basic(username.into(), token.into()));
        self
    }

    #[must_use]
    pub fn bearer_auth(mut self, token: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::Bearer(token.into()));
        self
    }

    /// Sets a request timeout in seconds
    #[must_use]
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout = Some(Duration::from_secs(seconds));
        self
    }

    /// Picks up whatever is set of `JIRA_HOST`, `JIRA_USER`, `JIRA_TOKEN` and `JIRA_API_VERSION`
    #[must_use]
    pub fn from_env(self) -> Self {
        let mut builder = self;

        if let Ok(host) = env::var(JiraEnvVars::HOST) {
            builder = builder.host(host);
        }
        if let Ok(api_version) = env::var(JiraEnvVars::API_VERSION) {
            builder = builder.api_version(api_version);
        }
        if let (Ok(user), Ok(token)) = (env::var(JiraEnvVars::USER), env::var(JiraEnvVars::TOKEN)) {
            builder = builder.basic_auth(user, token);
        }

        builder
    }

    /// Builds the client. Without credentials the client is anonymous.
    ///
    /// # Errors
    /// When the host is missing or not an URL, the timeout is zero or the HTTP
    /// client cannot be created
    pub fn build(self) -> Result<Jira, JiraBuilderError> {
        let host = self
            .host
            .ok_or_else(|| JiraBuilderError::EnvVarNotSet(JiraEnvVars::HOST.to_string()))?;
        let credentials = self.credentials.unwrap_or(Credentials::Anonymous);
        let api_version = self
            .api_version
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        let host_url = server_url(&host).map_err(|e| match e {
            crate::JiraError::ParseError(e) => JiraBuilderError::UrlParseError(e),
            other => JiraBuilderError::ClientInitError(other.to_string()),
        })?;

        let mut client_builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = self.timeout {
            if timeout.is_zero() {
                return Err(JiraBuilderError::InvalidTimeout);
            }
            client_builder = client_builder.timeout(timeout);
        }
        let client = client_builder
            .build()
            .map_err(|e| JiraBuilderError::ClientInitError(e.to_string()))?;

        let jira = Jira::from_parts(host_url, format!("rest/api/{api_version}"), credentials, client);
        debug!("Created Jira client for {}", jira.server_root());

        Ok(jira)
    }

    /// Convenience method to create a Jira client from environment variables
    ///
    /// # Errors
    /// See [`JiraBuilder::build`]
    pub fn create_from_env() -> Result<Jira, JiraBuilderError> {
        Self::new().from_env().build()
    }
}

impl Jira {
    #[must_use]
    pub fn builder() -> JiraBuilder {
        JiraBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_is_required() {
        assert!(matches!(
            JiraBuilder::new().basic_auth("me", "secret").build(),
            Err(JiraBuilderError::EnvVarNotSet(_))
        ));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(matches!(
            Jira::builder().host("https://jira.example.com").timeout(0).build(),
            Err(JiraBuilderError::InvalidTimeout)
        ));
    }

    #[test]
    fn builds_with_context_path() -> Result<(), JiraBuilderError> {
        let jira = Jira::builder()
            .host("https://example.com/jira")
            .bearer_auth("token")
            .api_version("latest")
            .timeout(10)
            .build()?;
        assert_eq!(jira.server_root(), "https://example.com/jira");
        Ok(())
    }
}
