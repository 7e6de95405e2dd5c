mod test_helpers;

use futures::TryStreamExt;
use jira::{
    models::issue::{Issue, TrackedIssue},
    JiraError,
};
use mockito::Matcher;
use serde_json::json;
use test_helpers::{fixtures, jira_client::mocked_jira};

#[tokio::test]
async fn search_follows_the_jql_and_maps_issues() -> Result<(), JiraError> {
    let (mut server, jira) = mocked_jira().await;
    let search = server
        .mock("GET", "/rest/api/2/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("jql".to_string(), "project='WIDGETS' and fixVersion='1.2'".to_string()),
            Matcher::UrlEncoded("startAt".to_string(), "0".to_string()),
        ]))
        .with_status(200)
        .with_body(fixtures::search_page(
            vec![
                fixtures::issue("10001", "WIDGETS-1", "Open"),
                fixtures::issue("10002", "WIDGETS-2", "Closed"),
            ],
            0,
            2,
        ))
        .expect(1)
        .create_async()
        .await;

    let issues: Vec<Issue> = jira
        .get_issues(Some("project='WIDGETS' and fixVersion='1.2'"))
        .try_collect()
        .await?;
    let tracked = TrackedIssue::from_issue(&issues[0], jira.server_root())?;

    assert_eq!(issues.len(), 2);
    assert_eq!(tracked.url, format!("{}/browse/WIDGETS-1", server.url()));
    assert_eq!(tracked.submitter, "Jane Doe");
    search.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn search_404_yields_no_issues() -> Result<(), JiraError> {
    let (mut server, jira) = mocked_jira().await;
    let _search = server
        .mock("GET", "/rest/api/2/search")
        .match_query(Matcher::Any)
        .with_status(404)
        .create_async()
        .await;

    let issues: Vec<Issue> = jira.get_issues(None).try_collect().await?;

    assert!(issues.is_empty());
    Ok(())
}

#[tokio::test]
async fn other_404s_are_errors() {
    let (mut server, jira) = mocked_jira().await;
    let _versions = server
        .mock("GET", "/rest/api/2/project/10000/version")
        .match_query(Matcher::Any)
        .with_status(404)
        .create_async()
        .await;

    let result: Result<Vec<_>, JiraError> = jira.get_versions("10000").try_collect().await;

    assert!(matches!(result, Err(JiraError::NotFound(_))));
}

#[tokio::test]
async fn create_issue_returns_the_new_key() -> Result<(), JiraError> {
    let (mut server, jira) = mocked_jira().await;
    let create = server
        .mock("POST", "/rest/api/2/issue")
        .match_body(Matcher::JsonString(
            json!({
                "fields": {
                    "project": { "id": "10000" },
                    "issuetype": { "name": "Bug" },
                    "summary": "Sprocket falls off",
                    "description": "Every time",
                    "fixVersions": [{ "name": "1.2" }]
                }
            })
            .to_string(),
        ))
        .with_status(201)
        .with_body(r#"{"id":"10042","key":"WIDGETS-42","self":"https://jira.example.com/rest/api/2/issue/10042"}"#)
        .expect(1)
        .create_async()
        .await;

    let created = jira
        .create_issue("10000", "Sprocket falls off", "Bug", Some("Every time"), Some("1.2"))
        .await?;

    assert_eq!(created.key, "WIDGETS-42");
    create.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn validation_fails_without_browse_permission() -> Result<(), JiraError> {
    let (mut server, jira) = mocked_jira().await;
    let _myself = server
        .mock("GET", "/rest/api/2/myself")
        .with_status(200)
        .with_body(r#"{"self":"https://jira.example.com/rest/api/2/user?accountId=5b10","accountId":"5b10","displayName":"Build Bot"}"#)
        .create_async()
        .await;
    let _perms = server
        .mock("GET", "/rest/api/2/mypermissions")
        .match_query(Matcher::UrlEncoded("permissions".to_string(), "BROWSE_PROJECTS".to_string()))
        .with_status(200)
        .with_body(
            json!({ "permissions": { "BROWSE_PROJECTS": {
                "id": "10", "key": "BROWSE_PROJECTS", "name": "Browse Projects", "havePermission": false
            }}})
            .to_string(),
        )
        .create_async()
        .await;

    assert!(matches!(
        jira.validate_connection().await,
        Err(JiraError::BrowsePermissionDenied)
    ));
    Ok(())
}

#[tokio::test]
async fn rejected_credentials_stop_validation() -> Result<(), JiraError> {
    let (mut server, jira) = mocked_jira().await;
    let _myself = server
        .mock("GET", "/rest/api/2/myself")
        .with_status(401)
        .create_async()
        .await;
    let perms = server
        .mock("GET", "/rest/api/2/mypermissions")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    assert!(matches!(jira.validate_connection().await, Err(JiraError::Unauthorized)));
    perms.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn comment_is_posted_to_the_issue() -> Result<(), JiraError> {
    let (mut server, jira) = mocked_jira().await;
    let comment = server
        .mock("POST", "/rest/api/2/issue/WIDGETS-1/comment")
        .match_body(Matcher::JsonString(r#"{"body":"Deployed to staging"}"#.to_string()))
        .with_status(201)
        .with_body(r#"{"id":"10400","body":"Deployed to staging"}"#)
        .expect(1)
        .create_async()
        .await;

    jira.add_comment("WIDGETS-1", "Deployed to staging").await?;

    comment.assert_async().await;
    Ok(())
}
