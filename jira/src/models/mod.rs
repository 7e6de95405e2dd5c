//! Typed representations of the payloads exchanged with Jira.
//!
//! There is one struct per response shape, so a renamed or missing field
//! surfaces as a deserialization error when the response is parsed.
pub mod core;
pub mod issue;
pub mod permission;
pub mod project;
pub mod transition;
pub mod user;
pub mod version;
