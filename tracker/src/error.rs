use std::{io, path::PathBuf};

use jira::JiraError;
use thiserror::Error;

#[allow(clippy::module_name_repetitions)]
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Unable to load the application configuration file {path:?}: {source}")]
    ApplicationConfig {
        path: PathBuf,
        source: ::config::ConfigError,
    },
    #[error("Unable to create configuration file {path:?}: {source}")]
    ConfigFileCreation { path: PathBuf, source: io::Error },
    #[error("Unable to serialize the configuration: {0}")]
    ConfigSerialization(#[from] toml::ser::Error),
    #[error("Unable to determine the configuration directory of the current user")]
    NoConfigDirectory,
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Invalid Jira token in application configuration")]
    InvalidJiraToken,
    #[error(transparent)]
    Jira(#[from] JiraError),
    #[error("Project {0} not found in Jira.")]
    ProjectNotFound(String),
    #[error("Unable to find the issue type '{issue_type}' in project {project}")]
    IssueTypeNotFound { project: String, issue_type: String },
    #[error("Version {version} does not exist in project {project}.")]
    VersionNotFound { project: String, version: String },
    #[error("Could not make sense of input: {0}")]
    BadInput(String),
    #[error("Operation cancelled")]
    Cancelled,
}
