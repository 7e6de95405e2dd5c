//! Client for the legacy SOAP service (`/rpc/soap/jirasoapservice-v2`) of Jira
//! servers which predate the REST interface.
//!
//! The service is session based: [`JiraSoap::connect`] logs in and hands out a
//! [`SoapSession`] carrying the token, [`SoapSession::logout`] ends it.
use std::collections::HashMap;

use log::{debug, warn};
use reqwest::{header::CONTENT_TYPE, Client};
use url::Url;

use crate::{server_url, Errors, JiraError, Result};
use models::{RemoteIssue, RemoteNamed, RemoteProject, RemoteVersion};
use xml::{envelope, return_value, Value};

pub mod models;
pub mod xml;

pub const SOAP_SERVICE_PATH: &str = "rpc/soap/jirasoapservice-v2";

#[derive(Clone, Debug)]
pub struct JiraSoap {
    endpoint: Url,
    server_root: String,
    client: Client,
}

impl JiraSoap {
    #[allow(clippy::missing_errors_doc)]
    pub fn new(server_url_text: &str, client: Client) -> Result<JiraSoap> {
        let root = server_url(server_url_text)?;
        Ok(JiraSoap {
            endpoint: root.join(SOAP_SERVICE_PATH)?,
            server_root: root.as_str().trim_end_matches('/').to_string(),
            client,
        })
    }

    #[must_use]
    pub fn server_root(&self) -> &str {
        &self.server_root
    }

    /// Logs in
    ///
    /// # Errors
    /// `SoapFault` when the credentials are rejected
    pub async fn connect(&self, user: &str, password: &str) -> Result<SoapSession> {
        let token = self.call("login", &[user.into(), password.into()]).await?.text;
        if token.trim().is_empty() {
            return Err(JiraError::SoapFault("login returned no session token".to_string()));
        }
        debug!("Logged in to {} as {user}", self.server_root);
        Ok(SoapSession {
            soap: self.clone(),
            token,
        })
    }

    async fn call(&self, operation: &str, params: &[Value]) -> Result<xml::Element> {
        debug!("SOAP call {operation} on {}", self.endpoint);
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", "\"\"")
            .body(envelope(operation, params))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("status {status:?} body '{body:?}'");
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(JiraError::NotFound(self.endpoint.to_string()));
        }
        if status.is_success() || is_envelope(&body) {
            // Faults arrive with status 500 and a regular envelope
            return return_value(&body);
        }
        Err(JiraError::Fault {
            code: status,
            errors: Errors::from_body(&body),
        })
    }
}

fn is_envelope(body: &str) -> bool {
    xml::Element::parse(body).is_ok_and(|envelope| envelope.child("Body").is_some())
}

/// A logged in session. Calls are made with the session token as first parameter.
#[derive(Clone, Debug)]
pub struct SoapSession {
    soap: JiraSoap,
    token: String,
}

impl SoapSession {
    #[must_use]
    pub fn server_root(&self) -> &str {
        self.soap.server_root()
    }

    async fn call(&self, operation: &str, params: Vec<Value>) -> Result<xml::Element> {
        let mut all = Vec::with_capacity(params.len() + 1);
        all.push(Value::from(self.token.as_str()));
        all.extend(params);
        self.soap.call(operation, &all).await
    }

    /// Ends the session. A failure is only logged, the session is gone either way.
    pub async fn logout(self) {
        if let Err(e) = self.call("logout", vec![]).await {
            warn!("Logout from {} failed: {e}", self.server_root());
        }
    }

    /// Status id to status name. Issues carry only the status id.
    #[allow(clippy::missing_errors_doc)]
    pub async fn get_statuses(&self) -> Result<HashMap<String, String>> {
        let statuses = self.call("getStatuses", vec![]).await?;
        let mut by_id = HashMap::new();
        for status in statuses.children.iter().map(RemoteNamed::from) {
            by_id.entry(status.id).or_insert(status.name);
        }
        Ok(by_id)
    }

    /// All projects, one per key
    #[allow(clippy::missing_errors_doc)]
    pub async fn get_projects(&self) -> Result<Vec<RemoteProject>> {
        let projects = self.call("getProjectsNoSchemes", vec![]).await?;
        let mut unique: Vec<RemoteProject> = Vec::new();
        for project in projects.children.iter().map(RemoteProject::from) {
            if !unique.iter().any(|p| p.key == project.key) {
                unique.push(project);
            }
        }
        Ok(unique)
    }

    #[allow(clippy::missing_errors_doc)]
    pub async fn get_versions(&self, project_key: &str) -> Result<Vec<RemoteVersion>> {
        let versions = self.call("getVersions", vec![project_key.into()]).await?;
        Ok(versions.children.iter().map(RemoteVersion::from).collect())
    }

    #[allow(clippy::missing_errors_doc)]
    pub async fn add_version(&self, project_key: &str, name: &str) -> Result<RemoteVersion> {
        let version = RemoteVersion {
            name: name.to_string(),
            ..Default::default()
        };
        let created = self
            .call("addVersion", vec![project_key.into(), version.to_value()])
            .await?;
        Ok(RemoteVersion::from(&created))
    }

    /// Marks the version released with today's release date
    #[allow(clippy::missing_errors_doc)]
    pub async fn release_version(&self, project_key: &str, version: RemoteVersion) -> Result<()> {
        let released = version.into_released();
        self.call("releaseVersion", vec![project_key.into(), released.to_value()])
            .await?;
        Ok(())
    }

    /// Issue types of a project, or all issue types without a project id
    #[allow(clippy::missing_errors_doc)]
    pub async fn get_issue_types(&self, project_id: Option<&str>) -> Result<Vec<RemoteNamed>> {
        let types = match project_id.filter(|p| !p.trim().is_empty()) {
            Some(project_id) => self.call("getIssueTypesForProject", vec![project_id.into()]).await?,
            None => self.call("getIssueTypes", vec![]).await?,
        };
        Ok(types.children.iter().map(RemoteNamed::from).collect())
    }

    #[allow(clippy::missing_errors_doc)]
    pub async fn get_issue(&self, issue_key: &str) -> Result<RemoteIssue> {
        Ok(RemoteIssue::from(&self.call("getIssue", vec![issue_key.into()]).await?))
    }

    /// Workflow actions available to the issue in its current status
    #[allow(clippy::missing_errors_doc)]
    pub async fn get_available_actions(&self, issue_key: &str) -> Result<Vec<RemoteNamed>> {
        let actions = self.call("getAvailableActions", vec![issue_key.into()]).await?;
        Ok(actions.children.iter().map(RemoteNamed::from).collect())
    }

    #[allow(clippy::missing_errors_doc)]
    pub async fn progress_workflow_action(&self, issue_key: &str, action_id: &str) -> Result<RemoteIssue> {
        let issue = self
            .call(
                "progressWorkflowAction",
                vec![
                    issue_key.into(),
                    action_id.into(),
                    Value::Array("RemoteFieldValue", vec![]),
                ],
            )
            .await?;
        Ok(RemoteIssue::from(&issue))
    }

    #[allow(clippy::missing_errors_doc)]
    pub async fn add_comment(&self, issue_key: &str, body: &str) -> Result<()> {
        self.call(
            "addComment",
            vec![
                issue_key.into(),
                Value::Struct("RemoteComment", vec![("body", body.into())]),
            ],
        )
        .await?;
        Ok(())
    }

    /// Creates the issue from `project`, `summary`, `description`, `issue_type`
    /// and `fix_versions`; the other fields are assigned by the server.
    #[allow(clippy::missing_errors_doc)]
    pub async fn create_issue(&self, issue: &RemoteIssue) -> Result<RemoteIssue> {
        let created = self.call("createIssue", vec![issue.to_value()]).await?;
        Ok(RemoteIssue::from(&created))
    }

    #[allow(clippy::missing_errors_doc)]
    pub async fn get_issues_from_jql_search(&self, jql: &str, max: i64) -> Result<Vec<RemoteIssue>> {
        let issues = self
            .call("getIssuesFromJqlSearch", vec![jql.into(), Value::Int(max)])
            .await?;
        Ok(issues.children.iter().map(RemoteIssue::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn response(operation: &str, body: &str) -> String {
        format!(
            r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/"><soapenv:Body><ns1:{operation}Response xmlns:ns1="http://soap.rpc.jira.atlassian.com">{body}</ns1:{operation}Response></soapenv:Body></soapenv:Envelope>"#
        )
    }

    #[tokio::test]
    async fn login_then_list_projects() -> Result<()> {
        let mut server = Server::new_async().await;
        let login = server
            .mock("POST", "/rpc/soap/jirasoapservice-v2")
            .match_body(Matcher::Regex("<jira:login ".to_string()))
            .with_status(200)
            .with_body(response("login", "<loginReturn>tok3n</loginReturn>"))
            .expect(1)
            .create_async()
            .await;
        let projects = server
            .mock("POST", "/rpc/soap/jirasoapservice-v2")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex("<jira:getProjectsNoSchemes ".to_string()),
                Matcher::Regex(r#"<in0 xsi:type="xsd:string">tok3n</in0>"#.to_string()),
            ]))
            .with_status(200)
            .with_body(response(
                "getProjectsNoSchemes",
                "<getProjectsNoSchemesReturn>\
                   <item><id>1</id><key>WID</key><name>Widgets</name></item>\
                   <item><id>1</id><key>WID</key><name>Widgets</name></item>\
                   <item><id>2</id><key>SPR</key><name>Sprockets</name></item>\
                 </getProjectsNoSchemesReturn>",
            ))
            .create_async()
            .await;

        let soap = JiraSoap::new(&server.url(), Client::new())?;
        let session = soap.connect("jdoe", "secret").await?;
        let found = session.get_projects().await?;

        assert_eq!(found.len(), 2);
        assert_eq!(found[1].name, "Sprockets");
        login.assert_async().await;
        projects.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn rejected_login_is_a_fault() -> Result<()> {
        let mut server = Server::new_async().await;
        let _login = server
            .mock("POST", "/jira/rpc/soap/jirasoapservice-v2")
            .with_status(500)
            .with_body(
                r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/"><soapenv:Body><soapenv:Fault><faultcode>soapenv:Server.userException</faultcode><faultstring>Invalid username or password.</faultstring></soapenv:Fault></soapenv:Body></soapenv:Envelope>"#,
            )
            .create_async()
            .await;

        let soap = JiraSoap::new(&format!("{}/jira", server.url()), Client::new())?;
        match soap.connect("jdoe", "wrong").await {
            Err(JiraError::SoapFault(message)) => assert_eq!(message, "Invalid username or password."),
            other => panic!("Expected a fault, got {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn gateway_error_keeps_status_and_body() -> Result<()> {
        let mut server = Server::new_async().await;
        let _login = server
            .mock("POST", "/rpc/soap/jirasoapservice-v2")
            .with_status(502)
            .with_body("<html><body><h1>502 Bad Gateway</h1></body></html>")
            .create_async()
            .await;

        let soap = JiraSoap::new(&server.url(), Client::new())?;
        match soap.connect("jdoe", "secret").await {
            Err(JiraError::Fault { code, errors }) => {
                assert_eq!(code, reqwest::StatusCode::BAD_GATEWAY);
                assert!(errors.message().contains("502 Bad Gateway"));
            }
            other => panic!("Expected an HTTP fault, got {other:?}"),
        }
        Ok(())
    }
}
