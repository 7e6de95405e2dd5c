use serde::{Deserialize, Serialize};

/// The authenticated user, as returned by `myself`
#[derive(Debug, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "self")]
    pub self_url: String,
    #[serde(default, alias = "accountId")]
    pub account_id: String,
    #[serde(default, alias = "emailAddress")]
    pub email_address: Option<String>,
    #[serde(alias = "displayName")]
    pub display_name: String,
}
