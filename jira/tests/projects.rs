mod test_helpers;

use jira::JiraError;
use mockito::Matcher;
use serde_json::json;
use test_helpers::{fixtures, jira_client::mocked_jira};

#[tokio::test]
async fn project_name_must_match_exactly_ignoring_case() -> Result<(), JiraError> {
    let (mut server, jira) = mocked_jira().await;
    let _search = server
        .mock("GET", "/rest/api/2/project/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("query".to_string(), "AB".to_string()),
            Matcher::UrlEncoded("startAt".to_string(), "0".to_string()),
        ]))
        .with_status(200)
        .with_body(fixtures::page(
            vec![
                fixtures::project("10001", "ABC", "ABC"),
                fixtures::project("10002", "AB", "ab"),
            ],
            0,
            2,
        ))
        .create_async()
        .await;

    let project = jira.try_get_project("AB").await?.expect("project AB");

    assert_eq!(project.id, "10002");
    Ok(())
}

#[tokio::test]
async fn missing_project_is_none_or_an_error() -> Result<(), JiraError> {
    let (mut server, jira) = mocked_jira().await;
    let _search = server
        .mock("GET", "/rest/api/2/project/search")
        .match_query(Matcher::UrlEncoded("query".to_string(), "AB".to_string()))
        .with_status(200)
        .with_body(fixtures::page(vec![fixtures::project("10001", "ABC", "ABC")], 0, 1))
        .create_async()
        .await;

    assert!(jira.try_get_project("AB").await?.is_none());
    assert!(matches!(
        jira.get_project("AB").await,
        Err(JiraError::ProjectNotFound(name)) if name == "AB"
    ));
    Ok(())
}

#[tokio::test]
async fn releases_feature_must_be_enabled() -> Result<(), JiraError> {
    let (mut server, jira) = mocked_jira().await;
    let _enabled = server
        .mock("GET", "/rest/api/2/project/10000/features")
        .with_status(200)
        .with_body(
            json!({ "features": [
                { "feature": "jsw.classic.roadmap", "state": "DISABLED" },
                { "feature": "jsw.agility.releases", "state": "ENABLED" }
            ]})
            .to_string(),
        )
        .create_async()
        .await;
    let _disabled = server
        .mock("GET", "/rest/api/2/project/10001/features")
        .with_status(200)
        .with_body(json!({ "features": [{ "feature": "jsw.agility.releases", "state": "DISABLED" }]}).to_string())
        .create_async()
        .await;
    let _absent = server
        .mock("GET", "/rest/api/2/project/10002/features")
        .with_status(200)
        .with_body(json!({ "features": [] }).to_string())
        .create_async()
        .await;

    assert!(jira.project_has_releases_enabled("10000").await?);
    assert!(!jira.project_has_releases_enabled("10001").await?);
    assert!(!jira.project_has_releases_enabled("10002").await?);
    Ok(())
}

#[tokio::test]
async fn issue_types_of_a_project() -> Result<(), JiraError> {
    let (mut server, jira) = mocked_jira().await;
    let _project = server
        .mock("GET", "/rest/api/2/project/10000")
        .with_status(200)
        .with_body(
            json!({
                "id": "10000", "key": "WIDGETS", "name": "Widgets",
                "issueTypes": [{ "id": "1", "name": "Bug" }, { "id": "3", "name": "Task" }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let task = jira.find_issue_type("10000", "task").await?;
    assert_eq!(task.map(|t| t.id).as_deref(), Some("3"));
    assert!(jira.find_issue_type("10000", "Epic").await?.is_none());
    Ok(())
}
