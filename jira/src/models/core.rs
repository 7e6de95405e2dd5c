use serde::{Deserialize, Serialize};

/// Compares two Jira names the way Jira users expect: exact match, ignoring case.
///
/// `"ABC"` matches `"abc"`, but never `"AB"`.
#[must_use]
pub fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Any Jira object which is only interesting because of its name, like the
/// status or the issue type embedded in an issue.
#[derive(Clone, Debug, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct NamedThing {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_name_is_exact_but_case_insensitive() {
        assert!(same_name("ABC", "abc"));
        assert!(same_name("Ready for QA", "READY FOR QA"));
        assert!(!same_name("ABC", "AB"));
        assert!(!same_name("AB", "ABC"));
    }

    #[test]
    fn named_thing_ignores_other_fields() {
        let status: NamedThing = serde_json::from_str(r#"{"id": "3", "name": "In Progress"}"#).unwrap();
        assert_eq!(status.name, "In Progress");
    }
}
