use serde::{Deserialize, Serialize};

/// A workflow action available on an issue in its current status
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Transition {
    pub id: String,
    pub name: String,
}

/// Response of `issue/{id}/transitions`
#[derive(Debug, Deserialize, Default)]
pub struct Transitions {
    #[serde(default)]
    pub transitions: Vec<Transition>,
}

/// Body of the `issue/{id}/transitions` POST.
///
/// A comment, when present, is added in the same call as the transition.
#[derive(Debug, Serialize)]
pub struct TransitionRequest {
    pub transition: TransitionId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<CommentUpdate>,
}

#[derive(Debug, Serialize)]
pub struct TransitionId {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct CommentUpdate {
    pub comment: Vec<AddComment>,
}

#[derive(Debug, Serialize)]
pub struct AddComment {
    pub add: CommentBody,
}

#[derive(Debug, Serialize)]
pub struct CommentBody {
    pub body: String,
}

impl TransitionRequest {
    #[must_use]
    pub fn new(transition_id: &str, comment: Option<&str>) -> Self {
        let update = comment
            .filter(|c| !c.trim().is_empty())
            .map(|c| CommentUpdate {
                comment: vec![AddComment {
                    add: CommentBody {
                        body: c.to_string(),
                    },
                }],
            });
        TransitionRequest {
            transition: TransitionId {
                id: transition_id.to_string(),
            },
            update,
        }
    }
}

/// What happened when an issue was asked to move to a status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The issue was already in the requested status, nothing was sent
    AlreadyInStatus,
    Transitioned(Transition),
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn transition_request_without_comment() {
        let request = TransitionRequest::new("21", None);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"transition": {"id": "21"}})
        );
    }

    #[test]
    fn transition_request_with_comment() {
        let request = TransitionRequest::new("31", Some("Released in 1.2"));
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "transition": {"id": "31"},
                "update": {"comment": [{"add": {"body": "Released in 1.2"}}]}
            })
        );
    }

    #[test]
    fn blank_comment_is_not_sent() {
        let request = TransitionRequest::new("31", Some("   "));
        assert!(request.update.is_none());
    }

    #[test]
    fn missing_transitions_array_is_empty() {
        let transitions: Transitions = serde_json::from_str("{}").unwrap();
        assert!(transitions.transitions.is_empty());
    }
}
