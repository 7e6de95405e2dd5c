#![allow(dead_code)]
pub mod jira_server;
