use jira::{Credentials, Jira};
use mockito::{Server, ServerGuard};

/// A mock Jira server and a client talking to it with basic authentication
pub async fn mocked_jira() -> (ServerGuard, Jira) {
    let _ = env_logger::builder().is_test(true).try_init();
    let server = Server::new_async().await;
    let jira = Jira::new(
        server.url(),
        Credentials::Basic("builder@example.com".to_string(), "api-token".to_string()),
    )
    .expect("Error initializing jira client");
    (server, jira)
}
