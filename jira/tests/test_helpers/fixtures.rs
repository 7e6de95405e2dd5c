//! Canned Jira responses
use serde_json::{json, Value};

/// One page of a paged resource, items under `values`
pub fn page(values: Vec<Value>, start_at: usize, total: usize) -> String {
    json!({
        "startAt": start_at,
        "maxResults": 50,
        "total": total,
        "isLast": start_at + values.len() >= total,
        "values": values,
    })
    .to_string()
}

/// One page of `search`, items under `issues`
pub fn search_page(issues: Vec<Value>, start_at: usize, total: usize) -> String {
    json!({
        "startAt": start_at,
        "maxResults": 50,
        "total": total,
        "issues": issues,
    })
    .to_string()
}

pub fn project(id: &str, key: &str, name: &str) -> Value {
    json!({ "self": format!("https://jira.example.com/rest/api/2/project/{id}"), "id": id, "key": key, "name": name })
}

pub fn version(id: &str, name: &str, released: bool, archived: bool) -> Value {
    json!({ "id": id, "name": name, "released": released, "archived": archived, "projectId": 10000 })
}

pub fn issue(id: &str, key: &str, status: &str) -> Value {
    json!({
        "id": id,
        "key": key,
        "fields": {
            "status": { "id": "1", "name": status },
            "issuetype": { "id": "10004", "name": "Bug" },
            "summary": format!("Summary of {key}"),
            "description": null,
            "reporter": { "displayName": "Jane Doe" },
            "created": "2024-01-15T10:30:00.000+0000",
            "resolutiondate": null
        }
    })
}

pub fn transitions(names: &[(&str, &str)]) -> String {
    json!({
        "transitions": names
            .iter()
            .map(|(id, name)| json!({ "id": id, "name": name, "to": { "name": name } }))
            .collect::<Vec<_>>()
    })
    .to_string()
}
