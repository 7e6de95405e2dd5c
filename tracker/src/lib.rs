//! Issue tracking operations on top of Jira: listing the issues of a release,
//! creating issues, moving issues through the workflow, and managing release
//! versions.
use std::future::Future;

use client::IssueTrackerClient;
use crate::config::AppConfiguration;
use error::TrackerError;
use jira::{models::issue::TrackedIssue, models::version::VersionChange, JiraError};
use log::debug;
use operation::{
    close::{self, CloseIssues},
    comment::{self, CommentIssue},
    create::{self, CreateIssue},
    issues::{self, IssueQuery},
    release::{self, Release},
    suggest::{self, Suggest},
    transition::{self, TransitionIssues},
    validate::{self, Validate},
    BatchReport,
};
use tokio_util::sync::CancellationToken;

pub mod client;
pub mod config;
pub mod error;
pub mod operation;

pub struct TrackerRuntime {
    config: AppConfiguration,
    client: Box<dyn IssueTrackerClient>,
    cancel: CancellationToken,
}

pub enum Operation {
    Issues(IssueQuery),
    Create(CreateIssue),
    Transition(TransitionIssues),
    Close(CloseIssues),
    Comment(CommentIssue),
    Release(Release),
    Validate(Validate),
    Suggest(Suggest),
}

#[derive(Debug)]
pub enum OperationResult {
    Issues(Vec<TrackedIssue>),
    Created(String),
    /// Key of the commented issue
    Commented(String),
    Batch(BatchReport),
    Release(VersionChange),
    /// Warnings found while validating, empty when all is well
    Validated(Vec<String>),
    Suggestions(Vec<String>),
}

impl TrackerRuntime {
    /// Loads and validates the configuration, then connects to Jira with the
    /// configured interface.
    ///
    /// # Errors
    ///
    /// - Returns an error if the configuration fails to load or is invalid.
    /// - Returns an error if the SOAP login fails.
    pub async fn new() -> Result<Self, TrackerError> {
        let config = crate::config::load()?;
        let client = client::connect(&config).await?;
        Ok(TrackerRuntime::with_client(config, client))
    }

    #[must_use]
    pub fn with_client(config: AppConfiguration, client: Box<dyn IssueTrackerClient>) -> Self {
        TrackerRuntime {
            config,
            client,
            cancel: CancellationToken::new(),
        }
    }

    #[must_use]
    pub fn configuration(&self) -> &AppConfiguration {
        &self.config
    }

    #[must_use]
    pub fn client(&self) -> &dyn IssueTrackerClient {
        self.client.as_ref()
    }

    /// Cancelling the token makes the running operation return
    /// `TrackerError::Cancelled` at its next call to Jira. The call in flight is dropped.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Runs a call to Jira unless the runtime is, or gets, cancelled
    pub(crate) async fn guarded<T, F>(&self, call: F) -> Result<T, TrackerError>
    where
        F: Future<Output = Result<T, JiraError>>,
    {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => {
                debug!("Cancelled while waiting for Jira");
                Err(TrackerError::Cancelled)
            }
            result = call => result.map_err(TrackerError::from),
        }
    }

    pub(crate) fn check_cancelled(&self) -> Result<(), TrackerError> {
        if self.cancel.is_cancelled() {
            Err(TrackerError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Executes the specified `Operation` and returns the result.
    ///
    /// # Errors
    ///
    /// - `BadInput` when the operation lacks what it needs, like a project.
    /// - `ProjectNotFound`, `IssueTypeNotFound`, `VersionNotFound` when a name does not resolve.
    /// - `Cancelled` when the cancellation token fired.
    /// - `Jira` for failed requests. Batch operations record per issue failures in
    ///   the `BatchReport` instead.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let runtime = TrackerRuntime::new().await?;
    /// let result = runtime
    ///     .execute(Operation::Release(Release::Deploy {
    ///         project: Some("Widgets".to_string()),
    ///         version: "1.2".to_string(),
    ///     }))
    ///     .await?;
    /// ```
    pub async fn execute(&self, operation: Operation) -> Result<OperationResult, TrackerError> {
        self.check_cancelled()?;
        match operation {
            Operation::Issues(query) => Ok(OperationResult::Issues(issues::execute(self, &query).await?)),
            Operation::Create(instructions) => {
                Ok(OperationResult::Created(create::execute(self, &instructions).await?))
            }
            Operation::Transition(instructions) => {
                Ok(OperationResult::Batch(transition::execute(self, &instructions).await?))
            }
            Operation::Close(instructions) => Ok(OperationResult::Batch(close::execute(self, &instructions).await?)),
            Operation::Comment(instructions) => {
                Ok(OperationResult::Commented(comment::execute(self, &instructions).await?))
            }
            Operation::Release(instructions) => {
                Ok(OperationResult::Release(release::execute(self, &instructions).await?))
            }
            Operation::Validate(instructions) => {
                Ok(OperationResult::Validated(validate::execute(self, &instructions).await?))
            }
            Operation::Suggest(instructions) => {
                Ok(OperationResult::Suggestions(suggest::execute(self, &instructions).await?))
            }
        }
    }

    /// Ends the session with Jira
    pub async fn shutdown(self) {
        self.client.disconnect().await;
    }
}
