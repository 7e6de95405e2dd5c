use crate::error::TrackerError;
use ::config::{Config, Environment, File as ConfigFile, FileFormat};
use directories::ProjectDirs;
use jira::config::JiraClientConfiguration;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use url::Url;

/// Prefix of environment variables overriding the configuration file,
/// i.e. `JIRA_TRACKER__JIRA__TOKEN` overrides `token` in the `[jira]` section
pub const ENV_PREFIX: &str = "JIRA_TRACKER";
const ENV_SEPARATOR: &str = "__";

/// Application configuration struct
/// Holds what we need to connect to Jira and the defaults of the issue operations
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
pub struct AppConfiguration {
    pub jira: JiraSection,

    /// Missing in files written before the section existed
    #[serde(default)]
    pub issues: IssueSection,
}

/// Which of the two Jira interfaces to talk to
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApiType {
    #[default]
    Rest,
    /// The SOAP service of Jira servers older than the REST interface
    Soap,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct JiraSection {
    pub url: String,
    pub user: String,
    pub token: String,
    #[serde(default)]
    pub api: ApiType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for JiraSection {
    fn default() -> Self {
        let defaults = JiraClientConfiguration::default();
        JiraSection {
            url: defaults.jira_url,
            user: defaults.user,
            token: defaults.token,
            api: ApiType::Rest,
            timeout_secs: None,
        }
    }
}

impl From<&JiraSection> for JiraClientConfiguration {
    fn from(section: &JiraSection) -> Self {
        JiraClientConfiguration {
            jira_url: section.url.clone(),
            user: section.user.clone(),
            token: section.token.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct IssueSection {
    /// Project used when an operation does not name one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// Status issues are moved to when they are closed
    #[serde(default = "default_closed_state")]
    pub closed_state: String,
    /// Replaces the generated project/version filter when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_jql: Option<String>,
    /// Selects the issues of a release instead of `fixVersion`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_mapping_query: Option<String>,
}

impl Default for IssueSection {
    fn default() -> Self {
        IssueSection {
            project: None,
            closed_state: default_closed_state(),
            custom_jql: None,
            custom_mapping_query: None,
        }
    }
}

fn default_closed_state() -> String {
    "Closed".to_string()
}

impl AppConfiguration {
    /// Checks what deserialization cannot: the URL, the user and the token.
    ///
    /// # Errors
    /// `InvalidConfiguration` or `InvalidJiraToken`
    pub fn validate(&self) -> Result<(), TrackerError> {
        let url = Url::parse(self.jira.url.trim())
            .map_err(|e| TrackerError::InvalidConfiguration(format!("jira.url '{}': {e}", self.jira.url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(TrackerError::InvalidConfiguration(format!(
                "jira.url must be http or https, not {}",
                url.scheme()
            )));
        }
        if self.jira.user.trim().is_empty() {
            return Err(TrackerError::InvalidConfiguration("jira.user is empty".to_string()));
        }
        if !JiraClientConfiguration::from(&self.jira).has_valid_jira_token() {
            return Err(TrackerError::InvalidJiraToken);
        }
        if self.issues.closed_state.trim().is_empty() {
            return Err(TrackerError::InvalidConfiguration(
                "issues.closed_state is empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Filename holding the application configuration parameters
///
/// # Errors
/// When the platform has no configuration directory for the current user
pub fn configuration_file() -> Result<PathBuf, TrackerError> {
    Ok(project_dirs()?.preference_dir().join("config.toml"))
}

fn project_dirs() -> Result<ProjectDirs, TrackerError> {
    ProjectDirs::from("com", "example", "jira-tracker").ok_or(TrackerError::NoConfigDirectory)
}

#[allow(clippy::missing_errors_doc)]
pub fn load() -> Result<AppConfiguration, TrackerError> {
    load_from(&configuration_file()?)
}

/// Reads the configuration file, applying `JIRA_TRACKER__*` environment overrides
#[allow(clippy::missing_errors_doc)]
pub fn load_from(path: &Path) -> Result<AppConfiguration, TrackerError> {
    debug!("Loading configuration from {}", path.display());
    Config::builder()
        .add_source(ConfigFile::from(path).format(FileFormat::Toml).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator(ENV_SEPARATOR)
                .separator(ENV_SEPARATOR)
                .try_parsing(true),
        )
        .build()
        .and_then(|settings| settings.try_deserialize::<AppConfiguration>())
        .map_err(|source| TrackerError::ApplicationConfig {
            path: path.into(),
            source,
        })
}

/// Loads the configuration, writing a default one first if there is none.
/// The default is not valid until the user has entered the Jira details.
#[allow(clippy::missing_errors_doc)]
pub fn load_or_create() -> Result<AppConfiguration, TrackerError> {
    let path = configuration_file()?;
    if !path.exists() {
        info!("No configuration in {}, creating a default one", path.display());
        create_configuration_file(&AppConfiguration::default(), &path)?;
    }
    load_from(&path)
}

#[allow(clippy::missing_errors_doc)]
pub fn save(cfg: &AppConfiguration) -> Result<PathBuf, TrackerError> {
    let path = configuration_file()?;
    create_configuration_file(cfg, &path)?;
    Ok(path)
}

#[allow(clippy::missing_errors_doc)]
pub fn remove() -> Result<PathBuf, TrackerError> {
    let path = configuration_file()?;
    fs::remove_file(&path).map_err(|source| TrackerError::ConfigFileCreation {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

#[allow(clippy::missing_errors_doc)]
pub fn application_config_to_string(cfg: &AppConfiguration) -> Result<String, TrackerError> {
    Ok(toml::to_string::<AppConfiguration>(cfg)?)
}

pub(crate) fn create_configuration_file(cfg: &AppConfiguration, path: &Path) -> Result<(), TrackerError> {
    let toml = application_config_to_string(cfg)?;
    write_file(path, &toml).map_err(|source| TrackerError::ConfigFileCreation {
        path: path.into(),
        source,
    })
}

fn write_file(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(directory) = path.parent() {
        if !directory.try_exists()? {
            fs::create_dir_all(directory)?;
        }
    }
    let mut file = File::create(path)?;
    file.write_all(contents.as_bytes())
}
