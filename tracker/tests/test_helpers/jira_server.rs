//! A mocked Jira server and a runtime connected to it
use mockito::{Server, ServerGuard};
use serde_json::{json, Value};
use tracker::{
    client,
    config::{ApiType, AppConfiguration, IssueSection, JiraSection},
    error::TrackerError,
    TrackerRuntime,
};

pub fn configuration(url: &str, api: ApiType) -> AppConfiguration {
    AppConfiguration {
        jira: JiraSection {
            url: url.to_string(),
            user: "builder@example.com".to_string(),
            token: "ATATT3xFfGF0abcdef".to_string(),
            api,
            timeout_secs: Some(10),
        },
        issues: IssueSection {
            project: Some("Widgets".to_string()),
            closed_state: "Done".to_string(),
            ..Default::default()
        },
    }
}

pub async fn mocked_server() -> ServerGuard {
    let _ = env_logger::builder().is_test(true).try_init();
    Server::new_async().await
}

/// Connects the way the binary does, with the given configuration
pub async fn runtime(config: AppConfiguration) -> Result<TrackerRuntime, TrackerError> {
    let client = client::connect(&config).await?;
    Ok(TrackerRuntime::with_client(config, client))
}

pub fn project_page() -> String {
    json!({
        "startAt": 0,
        "maxResults": 50,
        "total": 1,
        "values": [{ "id": "10000", "key": "WID", "name": "Widgets" }],
    })
    .to_string()
}

pub fn issue(key: &str, status: &str, resolved: Option<&str>) -> Value {
    json!({
        "id": format!("1{}", key.trim_start_matches("WID-")),
        "key": key,
        "fields": {
            "status": { "id": "1", "name": status },
            "issuetype": { "id": "10004", "name": "Bug" },
            "summary": format!("Summary of {key}"),
            "description": null,
            "reporter": { "displayName": "Jane Doe" },
            "created": "2024-01-15T10:30:00.000+0000",
            "resolutiondate": resolved
        }
    })
}

pub fn search_page(issues: Vec<Value>) -> String {
    json!({
        "startAt": 0,
        "maxResults": 50,
        "total": issues.len(),
        "issues": issues,
    })
    .to_string()
}

pub fn soap_response(operation: &str, body: &str) -> String {
    format!(
        r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/"><soapenv:Body><ns1:{operation}Response xmlns:ns1="http://soap.rpc.jira.atlassian.com">{body}</ns1:{operation}Response></soapenv:Body></soapenv:Envelope>"#
    )
}
