//! # The Jira Issue Tracker Command Line Utility
//!
//! Lists the issues of a project or a release, creates issues, moves issues
//! through the workflow, and creates and releases versions. Talks to the REST
//! interface of Jira, or to the SOAP service of older servers.
//!
//! ## Configuration
//! Before using the tool, configure it with your Jira credentials:
//! ```bash
//! jira-tracker config update --token YOUR_API_TOKEN --user your.email@company.com --url https://yourcompany.atlassian.net --project Widgets
//! ```
//!
//! ## Usage Examples
//!
//! ### Listing issues
//! All issues fixed in release 1.2:
//! ```bash
//! jira-tracker issues -f 1.2
//! ```
//!
//! ### Moving issues through the workflow
//! ```bash
//! jira-tracker transition -f 1.2 --from "In Review" --to Done -c "Reviewed"
//! jira-tracker close -f 1.2 -c "Released in 1.2"
//! ```
//!
//! ### Releasing
//! ```bash
//! jira-tracker release ensure 1.3
//! jira-tracker release deploy 1.2
//! ```
//!
//! ### Commenting
//! ```bash
//! jira-tracker comment -i WID-42 "Deployed to staging"
//! ```
//!
//! Ctrl-C stops a running command at its next call to Jira.
use clap::Parser;
use cli::{Command, LogLevel, Opts, ReleaseCommand, SuggestCommand};
use commands::configuration;
use env_logger::Env;
use jira::models::version::VersionChange;
use log::{debug, warn};
use std::env;
use std::fs::File;
use std::process::exit;

use tracker::{
    error::TrackerError,
    operation::{
        close::CloseIssues, comment::CommentIssue, create::CreateIssue, issues::IssueQuery, release::Release, suggest::Suggest,
        transition::TransitionIssues, validate::Validate, BatchReport, IssueSelection,
    },
    Operation, OperationResult, TrackerRuntime,
};

mod cli;
mod commands;

#[tokio::main]
async fn main() -> Result<(), TrackerError> {
    let opts: Opts = Opts::parse();

    configure_logging(&opts); // Handles the -v option

    let operation = match opts.cmd {
        Command::Config(config) => {
            configuration::execute(config.cmd);
            return Ok(());
        }
        Command::Issues(issues) => Operation::Issues(issues.into()),
        Command::Create(create) => Operation::Create(create.into()),
        Command::Transition(transition) => Operation::Transition(transition.into()),
        Command::Close(close) => Operation::Close(close.into()),
        Command::Comment(comment) => Operation::Comment(CommentIssue {
            issue_key: comment.issue,
            body: comment.body,
        }),
        Command::Release(release) => Operation::Release(release.cmd.into()),
        Command::Validate(validate) => Operation::Validate(Validate {
            project: validate.project,
        }),
        Command::Suggest(suggest) => Operation::Suggest(suggest.cmd.into()),
    };

    let runtime = get_runtime().await;
    let token = runtime.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling");
            token.cancel();
        }
    });

    let result = runtime.execute(operation).await;
    runtime.shutdown().await;

    match result {
        Ok(operation_result) => {
            if !report(&operation_result) {
                exit(1);
            }
        }
        Err(TrackerError::Cancelled) => {
            eprintln!("Cancelled");
            exit(130);
        }
        Err(e) => {
            eprintln!("ERROR: {e}");
            exit(1);
        }
    }
    Ok(())
}

/// Prints the result, returns false when some of the work failed
fn report(operation_result: &OperationResult) -> bool {
    match operation_result {
        OperationResult::Issues(issues) => {
            for issue in issues {
                println!("{:<12} {:<12} {:<14} {}", issue.id, issue.issue_type, issue.status, issue.title);
            }
            true
        }
        OperationResult::Created(key) => {
            println!("Created {key}");
            true
        }
        OperationResult::Commented(key) => {
            println!("Comment added to {key}");
            true
        }
        OperationResult::Batch(batch) => report_batch(batch),
        OperationResult::Release(change) => {
            match change {
                VersionChange::Created(v) => println!("Version {} created", v.name),
                VersionChange::Updated(v) => println!(
                    "Version {} updated, released: {} archived: {}",
                    v.name, v.released, v.archived
                ),
                VersionChange::Unchanged(v) => println!("Version {} is already up to date", v.name),
            }
            true
        }
        OperationResult::Validated(warnings) => {
            for warning in warnings {
                println!("WARNING: {warning}");
            }
            println!("Connection OK");
            true
        }
        OperationResult::Suggestions(names) => {
            for name in names {
                println!("{name}");
            }
            true
        }
    }
}

fn report_batch(batch: &BatchReport) -> bool {
    for key in &batch.transitioned {
        println!("{key} moved");
    }
    for key in &batch.skipped {
        println!("{key} skipped");
    }
    for (key, reason) in &batch.failed {
        eprintln!("{key} failed: {reason}");
    }
    println!(
        "{} moved, {} skipped, {} failed",
        batch.transitioned.len(),
        batch.skipped.len(),
        batch.failed.len()
    );
    batch.is_success()
}

/// Loads the configuration and connects to Jira
async fn get_runtime() -> TrackerRuntime {
    match TrackerRuntime::new().await {
        Ok(runtime) => runtime,
        Err(err) => {
            match err {
                TrackerError::ApplicationConfig { .. } => {
                    eprintln!("Configuration file not found. Use 'jira-tracker config update' to create it");
                }
                _ => {
                    eprintln!("Failed to create runtime: '{err}'");
                }
            }

            exit(1);
        }
    }
}

fn configure_logging(opts: &Opts) {
    let mut tmp_dir = env::temp_dir();
    tmp_dir.push("jira-tracker.log");

    if opts.verbosity.is_some() {
        println!("Logging to {}", &tmp_dir.to_string_lossy());
    }

    let target = match File::create(&tmp_dir) {
        Ok(file) => env_logger::Target::Pipe(Box::new(file)),
        Err(e) => {
            eprintln!("Can't create {}: {e}, logging to stderr", tmp_dir.to_string_lossy());
            env_logger::Target::Stderr
        }
    };

    // If nothing else was specified in RUST_LOG, use 'warn'
    env_logger::Builder::from_env(Env::default().default_filter_or(opts.verbosity.map_or(
        "warn",
        |lvl| match lvl {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        },
    )))
    .target(target)
    .init();
    debug!("Logging started");
}

impl From<cli::Selection> for IssueSelection {
    fn from(val: cli::Selection) -> Self {
        IssueSelection {
            project: val.project,
            fix_version: val.fix_version,
            custom_jql: val.jql,
        }
    }
}

impl From<cli::Issues> for IssueQuery {
    fn from(val: cli::Issues) -> Self {
        IssueQuery {
            selection: val.selection.into(),
            status: val.status,
        }
    }
}

impl From<cli::Create> for CreateIssue {
    fn from(val: cli::Create) -> Self {
        CreateIssue {
            project: val.project,
            summary: val.summary,
            description: val.description,
            issue_type: val.issue_type,
            fix_version: val.fix_version,
        }
    }
}

impl From<cli::Transition> for TransitionIssues {
    fn from(val: cli::Transition) -> Self {
        TransitionIssues {
            selection: val.selection.into(),
            issue_key: val.issue,
            from_status: val.from,
            to_status: val.to,
            comment: val.comment,
        }
    }
}

impl From<cli::Close> for CloseIssues {
    fn from(val: cli::Close) -> Self {
        CloseIssues {
            selection: val.selection.into(),
            issue_key: val.issue,
            comment: val.comment,
        }
    }
}

impl From<ReleaseCommand> for Release {
    fn from(val: ReleaseCommand) -> Self {
        match val {
            ReleaseCommand::Ensure {
                project,
                version,
                released,
                archived,
            } => Release::Ensure {
                project,
                version,
                released,
                archived,
            },
            ReleaseCommand::Deploy { project, version } => Release::Deploy { project, version },
        }
    }
}

impl From<SuggestCommand> for Suggest {
    fn from(val: SuggestCommand) -> Self {
        match val {
            SuggestCommand::Projects => Suggest::Projects,
            SuggestCommand::Versions { project } => Suggest::Versions { project },
            SuggestCommand::IssueTypes { project } => Suggest::IssueTypes { project },
            SuggestCommand::Transitions { selection } => Suggest::Transitions {
                selection: selection.into(),
            },
        }
    }
}
