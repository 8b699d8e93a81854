//! Compact JSON payloads exchanged over the queues.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::Result, models::TodoStatus};

/// Work item asking a consumer to create one participant's ticket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TicketCreateMessage {
    #[serde(rename = "soi")]
    pub catalog_id: Uuid,
    #[serde(rename = "poi")]
    pub participant_id: Uuid,
}

/// Desired state of one todo.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoStateEntry {
    #[serde(rename = "t")]
    pub todo_id: Uuid,
    #[serde(rename = "s", default)]
    pub state: TodoStatus,
}

/// Work item moving every ticket of a catalog toward new todo states.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TicketStateChangeMessage {
    #[serde(rename = "so")]
    pub catalog_id: Uuid,
    /// Deactivate the catalog's tickets
    #[serde(rename = "sd", default)]
    pub should_delete: bool,
    #[serde(rename = "ts", default)]
    pub todos_changed: bool,
    #[serde(rename = "ot", default)]
    pub todo_states: Vec<TodoStateEntry>,
}

impl TicketStateChangeMessage {
    /// Desired states as `(todo, state)` pairs.
    pub fn desired_states(&self) -> Vec<(Uuid, TodoStatus)> {
        self.todo_states.iter().map(|e| (e.todo_id, e.state)).collect()
    }
}

/// Serializes a message payload.
pub fn to_payload<T: Serialize>(message: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(message)?)
}

/// Parses a message payload.
pub fn from_payload<T: for<'de> Deserialize<'de>>(payload: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_create_uses_short_names() {
        let message = TicketCreateMessage {
            catalog_id: Uuid::nil(),
            participant_id: Uuid::nil(),
        };
        let json = serde_json::to_value(message).unwrap();
        assert_eq!(json["soi"], Uuid::nil().to_string());
        assert_eq!(json["poi"], Uuid::nil().to_string());
        assert_eq!(json.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_state_change_defaults_missing_state_to_locked() {
        let todo = Uuid::new_v4();
        let payload = format!(
            r#"{{"so":"{}","sd":false,"ts":true,"ot":[{{"t":"{todo}"}},{{"t":"{todo}","s":"active"}}]}}"#,
            Uuid::nil()
        );
        let message: TicketStateChangeMessage = from_payload(payload.as_bytes()).unwrap();
        assert_eq!(
            message.desired_states(),
            [(todo, TodoStatus::Locked), (todo, TodoStatus::Active)]
        );
        assert!(message.todos_changed);
    }
}
