use std::fmt::{self, Formatter};

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub(crate) enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

#[derive(Parser)]
/// Jira issue tracker utility - list, create, transition and close issues, and manage releases
///
/// Project, issue type, status and version names are compared ignoring case.
/// When no project is given, the project of the configuration file is used.
///
/// Connection details are read from the configuration file, see `jira-tracker config`.
/// Any value may be overridden with an environment variable, i.e. `JIRA_TRACKER__JIRA__TOKEN`.
#[command(author, version, about)] // Read from Cargo.toml
pub(crate) struct Opts {
    #[command(subcommand)]
    pub cmd: Command,

    #[arg(global = true, short, long)]
    pub verbosity: Option<LogLevel>,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// List the issues of a project, a release or a custom JQL query
    Issues(Issues),
    /// Create an issue
    Create(Create),
    /// Move issues to another status
    Transition(Transition),
    /// Move the issues which are not closed yet to the closed status
    Close(Close),
    /// Add a comment to an issue
    Comment(Comment),
    /// Create, update and release versions
    Release(Release),
    /// Check the configuration and the connection to Jira
    Validate(Validate),
    /// List the values the other commands accept
    Suggest(Suggest),
    /// Subcommands for configuration
    Config(Config),
}

/// Selects the issues to work on
#[derive(Args, Clone)]
pub(crate) struct Selection {
    /// Project name
    #[arg(short, long)]
    pub project: Option<String>,
    /// Only issues with this fix version
    #[arg(short, long)]
    pub fix_version: Option<String>,
    /// JQL query replacing the project and fix version filter
    #[arg(long)]
    pub jql: Option<String>,
}

#[derive(Args)]
pub(crate) struct Issues {
    #[command(flatten)]
    pub selection: Selection,
    /// Only issues in this status
    #[arg(short, long)]
    pub status: Option<String>,
}

#[derive(Args)]
pub(crate) struct Create {
    #[arg(short, long)]
    pub project: Option<String>,
    #[arg(short, long, required = true)]
    pub summary: String,
    #[arg(short, long)]
    pub description: Option<String>,
    /// Issue type name, i.e. Bug
    #[arg(short = 't', long, required = true)]
    pub issue_type: String,
    /// Left out, with a warning, when the project has no such version
    #[arg(short, long)]
    pub fix_version: Option<String>,
}

#[derive(Args)]
pub(crate) struct Transition {
    #[command(flatten)]
    pub selection: Selection,
    /// Only this issue, i.e. WID-42
    #[arg(short, long)]
    pub issue: Option<String>,
    /// Only issues currently in this status
    #[arg(long)]
    pub from: Option<String>,
    /// The status to move the issues to
    #[arg(long, required = true)]
    pub to: String,
    #[arg(short, long)]
    pub comment: Option<String>,
}

#[derive(Args)]
pub(crate) struct Close {
    #[command(flatten)]
    pub selection: Selection,
    /// Only this issue, i.e. WID-42
    #[arg(short, long)]
    pub issue: Option<String>,
    #[arg(short, long)]
    pub comment: Option<String>,
}

#[derive(Args)]
pub(crate) struct Comment {
    /// The issue to comment, i.e. WID-42
    #[arg(short, long, required = true)]
    pub issue: String,
    /// The comment text
    pub body: String,
}

#[derive(Args)]
pub(crate) struct Release {
    #[command(subcommand)]
    pub cmd: ReleaseCommand,
}

#[derive(Subcommand)]
pub(crate) enum ReleaseCommand {
    /// Create the version if it does not exist, and set the given flags
    Ensure {
        #[arg(short, long)]
        project: Option<String>,
        /// Version name, i.e. 1.2.0
        version: String,
        #[arg(long)]
        released: Option<bool>,
        #[arg(long)]
        archived: Option<bool>,
    },
    /// Mark an existing version released
    Deploy {
        #[arg(short, long)]
        project: Option<String>,
        version: String,
    },
}

#[derive(Args)]
pub(crate) struct Validate {
    /// Also check this project, defaults to the configured one
    #[arg(short, long)]
    pub project: Option<String>,
}

#[derive(Args)]
pub(crate) struct Suggest {
    #[command(subcommand)]
    pub cmd: SuggestCommand,
}

#[derive(Subcommand)]
pub(crate) enum SuggestCommand {
    /// Project names
    Projects,
    /// Versions of a project
    Versions {
        #[arg(short, long)]
        project: Option<String>,
    },
    /// Issue types of a project
    IssueTypes {
        #[arg(short, long)]
        project: Option<String>,
    },
    /// Transitions available to the last issue of the selection
    Transitions {
        #[command(flatten)]
        selection: Selection,
    },
}

#[derive(Args)]
pub(crate) struct Config {
    #[command(subcommand)]
    pub cmd: ConfigCommand,
}

/// Create, modify or list the configuration file.
/// The configuration file is created the first time you use `update`
#[derive(Subcommand, Clone)]
pub(crate) enum ConfigCommand {
    /// Update the configuration file
    Update(UpdateConfiguration),
    /// write current configuration to standard output
    List,
    /// Remove the current configuration
    Remove,
}

#[derive(Args, Clone)]
pub(crate) struct UpdateConfiguration {
    /// The Jira API token, or the password of servers without tokens
    #[arg(short, long)]
    pub token: Option<String>,
    /// Your user name or email address, i.e. me@whereever.com
    #[arg(short, long)]
    pub user: Option<String>,
    /// The base url of your Jira, i.e. <https://yourcompany.atlassian.net>
    #[arg(long)]
    pub url: Option<String>,
    /// Talk to the legacy SOAP service instead of the REST interface
    #[arg(long)]
    pub soap: Option<bool>,
    /// Seconds before a request to Jira is abandoned
    #[arg(long)]
    pub timeout: Option<u64>,
    /// Project used when a command does not name one
    #[arg(short, long)]
    pub project: Option<String>,
    /// Status issues are moved to by `close`
    #[arg(long)]
    pub closed_state: Option<String>,
    /// JQL query used instead of the project and fix version filter
    #[arg(long)]
    pub custom_jql: Option<String>,
    /// JQL condition selecting the issues of a release, used with the project instead of `fixVersion`
    #[arg(long)]
    pub custom_mapping_query: Option<String>,
}
