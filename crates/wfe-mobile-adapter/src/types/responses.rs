/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust response structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

use super::models::{Task, User, null_as_default};

/// `task/my` answers either with a bare list or with a paging envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskPage {
    Envelope {
        #[serde(default, deserialize_with = "null_as_default")]
        content: Vec<Task>,
    },
    Bare(Vec<Task>),
}

impl TaskPage {
    pub fn into_tasks(self) -> Vec<Task> {
        match self {
            TaskPage::Envelope { content } => content,
            TaskPage::Bare(tasks) => tasks,
        }
    }
}

/// Structured variant of the `auth/basic` answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthTokenResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_and_bare_yield_same_tasks() {
        let tasks = r#"[{"id": 1, "name": "Review"}, {"id": 2, "name": "Sign"}]"#;
        let bare: TaskPage = serde_json::from_str(tasks).unwrap();
        let envelope: TaskPage =
            serde_json::from_str(&format!(r#"{{"content": {tasks}, "totalElements": 2}}"#))
                .unwrap();
        assert_eq!(bare.into_tasks(), envelope.into_tasks());
    }

    #[test]
    fn test_envelope_with_null_content() {
        let page: TaskPage =
            serde_json::from_str(r#"{"content": null, "totalElements": 0}"#).unwrap();
        assert!(page.into_tasks().is_empty());
    }

    #[test]
    fn test_auth_response_without_user() {
        let resp: AuthTokenResponse = serde_json::from_str(r#"{"token": "abc"}"#).unwrap();
        assert_eq!(resp.token, "abc");
        assert!(resp.user.is_none());
    }
}
