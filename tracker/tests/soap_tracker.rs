mod test_helpers;

use mockito::{Matcher, Mock, ServerGuard};
use test_helpers::jira_server::{configuration, mocked_server, runtime, soap_response};
use tracker::{config::ApiType, error::TrackerError, operation::issues::IssueQuery, Operation, OperationResult};

const ENDPOINT: &str = "/rpc/soap/jirasoapservice-v2";

/// Login, statuses and the Widgets project
async fn mock_session(server: &mut ServerGuard) -> Vec<Mock> {
    let login = server
        .mock("POST", ENDPOINT)
        .match_body(Matcher::Regex("<jira:login ".to_string()))
        .with_status(200)
        .with_body(soap_response("login", "<loginReturn>tok3n</loginReturn>"))
        .create_async()
        .await;
    let statuses = server
        .mock("POST", ENDPOINT)
        .match_body(Matcher::Regex("<jira:getStatuses ".to_string()))
        .with_status(200)
        .with_body(soap_response(
            "getStatuses",
            "<getStatusesReturn><item><id>1</id><name>Open</name></item></getStatusesReturn>",
        ))
        .create_async()
        .await;
    let projects = server
        .mock("POST", ENDPOINT)
        .match_body(Matcher::Regex("<jira:getProjectsNoSchemes ".to_string()))
        .with_status(200)
        .with_body(soap_response(
            "getProjectsNoSchemes",
            "<getProjectsNoSchemesReturn><item><id>10000</id><key>WID</key><name>Widgets</name></item></getProjectsNoSchemesReturn>",
        ))
        .create_async()
        .await;
    vec![login, statuses, projects]
}

#[tokio::test]
async fn issues_over_soap_carry_status_names() -> Result<(), TrackerError> {
    let mut server = mocked_server().await;
    let login = server
        .mock("POST", ENDPOINT)
        .match_body(Matcher::Regex("<jira:login ".to_string()))
        .with_status(200)
        .with_body(soap_response("login", "<loginReturn>tok3n</loginReturn>"))
        .expect(1)
        .create_async()
        .await;
    let _statuses = server
        .mock("POST", ENDPOINT)
        .match_body(Matcher::Regex("<jira:getStatuses ".to_string()))
        .with_status(200)
        .with_body(soap_response(
            "getStatuses",
            "<getStatusesReturn><item><id>1</id><name>Open</name></item><item><id>6</id><name>Closed</name></item></getStatusesReturn>",
        ))
        .create_async()
        .await;
    let _projects = server
        .mock("POST", ENDPOINT)
        .match_body(Matcher::Regex("<jira:getProjectsNoSchemes ".to_string()))
        .with_status(200)
        .with_body(soap_response(
            "getProjectsNoSchemes",
            "<getProjectsNoSchemesReturn><item><id>10000</id><key>WID</key><name>Widgets</name></item></getProjectsNoSchemesReturn>",
        ))
        .create_async()
        .await;
    let search = server
        .mock("POST", ENDPOINT)
        .match_body(Matcher::Regex("<jira:getIssuesFromJqlSearch ".to_string()))
        .with_status(200)
        .with_body(soap_response(
            "getIssuesFromJqlSearch",
            "<getIssuesFromJqlSearchReturn>\
               <item><id>10001</id><key>WID-1</key><project>WID</project><summary>Broken</summary>\
                 <type>1</type><status>6</status><reporter>jdoe</reporter>\
                 <created>2024-01-15T10:30:00.000Z</created><resolution>1</resolution></item>\
             </getIssuesFromJqlSearchReturn>",
        ))
        .expect(1)
        .create_async()
        .await;

    let runtime = runtime(configuration(&server.url(), ApiType::Soap)).await?;
    let result = runtime.execute(Operation::Issues(IssueQuery::default())).await?;

    match result {
        OperationResult::Issues(issues) => {
            assert_eq!(issues.len(), 1);
            assert_eq!(issues[0].id, "WID-1");
            assert_eq!(issues[0].status, "Closed");
            assert!(issues[0].is_closed);
            assert_eq!(issues[0].url, format!("{}/browse/WID-1", server.url()));
        }
        other => panic!("Expected issues, got {other:?}"),
    }
    login.assert_async().await;
    search.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn rejected_login_fails_the_connection() {
    let mut server = mocked_server().await;
    let _login = server
        .mock("POST", ENDPOINT)
        .with_status(500)
        .with_body(
            r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/"><soapenv:Body><soapenv:Fault><faultcode>soapenv:Server.userException</faultcode><faultstring>Invalid username or password.</faultstring></soapenv:Fault></soapenv:Body></soapenv:Envelope>"#,
        )
        .create_async()
        .await;

    let result = runtime(configuration(&server.url(), ApiType::Soap)).await;

    assert!(matches!(
        result,
        Err(TrackerError::Jira(jira::JiraError::SoapFault(message))) if message == "Invalid username or password."
    ));
}

#[tokio::test]
async fn search_asks_for_every_matching_issue() -> Result<(), TrackerError> {
    let mut server = mocked_server().await;
    let _session = mock_session(&mut server).await;
    let search = server
        .mock("POST", ENDPOINT)
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("<jira:getIssuesFromJqlSearch ".to_string()),
            Matcher::Regex(r#"<in2 xsi:type="xsd:int">2147483647</in2>"#.to_string()),
        ]))
        .with_status(200)
        .with_body(soap_response(
            "getIssuesFromJqlSearch",
            "<getIssuesFromJqlSearchReturn></getIssuesFromJqlSearchReturn>",
        ))
        .expect(1)
        .create_async()
        .await;

    let runtime = runtime(configuration(&server.url(), ApiType::Soap)).await?;
    let result = runtime.execute(Operation::Issues(IssueQuery::default())).await?;

    assert!(matches!(result, OperationResult::Issues(issues) if issues.is_empty()));
    search.assert_async().await;
    Ok(())
}
