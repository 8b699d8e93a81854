//! Status enumerations for plans and ticket todos.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Phase of a catalog a plan (and the todos built from it) belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    /// Single opening wave
    Base,

    /// One of the weekly waves between base and end
    Recurring,

    /// Single closing wave
    End,
}

impl FromStr for PlanType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "base" => Ok(PlanType::Base),
            "recurring" => Ok(PlanType::Recurring),
            "end" => Ok(PlanType::End),
            _ => Err(format!("Invalid plan type: {s}")),
        }
    }
}

impl PlanType {
    /// Convert to the stored string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Base => "base",
            PlanType::Recurring => "recurring",
            PlanType::End => "end",
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of one wave inside a participant's ticket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TodoStatus {
    /// Wave has not opened yet
    #[default]
    Locked,

    /// Wave is open and accepts answers
    Active,

    /// Wave was submitted
    Done,

    /// Wave closed before it was submitted
    Expired,
}

/// Events that move a todo between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoEvent {
    /// The wave window opened
    Activate,

    /// The participant submitted a complete wave
    Submit,

    /// The wave window closed
    Expire,
}

impl TodoStatus {
    /// Looks up the transition table.
    ///
    /// Returns the next state, or `None` when `event` is not permitted in the
    /// current state. `Done` and `Expired` accept no events.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use survey_core::models::{TodoEvent, TodoStatus};
    ///
    /// assert_eq!(
    ///     TodoStatus::Locked.transition(TodoEvent::Activate),
    ///     Some(TodoStatus::Active)
    /// );
    /// assert_eq!(TodoStatus::Done.transition(TodoEvent::Expire), None);
    /// ```
    pub fn transition(self, event: TodoEvent) -> Option<TodoStatus> {
        match (self, event) {
            (TodoStatus::Locked, TodoEvent::Activate) => Some(TodoStatus::Active),
            (TodoStatus::Locked, TodoEvent::Expire) => Some(TodoStatus::Expired),
            (TodoStatus::Active, TodoEvent::Submit) => Some(TodoStatus::Done),
            (TodoStatus::Active, TodoEvent::Expire) => Some(TodoStatus::Expired),
            _ => None,
        }
    }

    /// Event that would move a todo into `self`, if one exists.
    pub fn entering_event(self) -> Option<TodoEvent> {
        match self {
            TodoStatus::Active => Some(TodoEvent::Activate),
            TodoStatus::Done => Some(TodoEvent::Submit),
            TodoStatus::Expired => Some(TodoEvent::Expire),
            TodoStatus::Locked => None,
        }
    }

    /// Whether no further event is accepted.
    pub fn is_terminal(self) -> bool {
        matches!(self, TodoStatus::Done | TodoStatus::Expired)
    }

    /// Convert to the stored string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoStatus::Locked => "locked",
            TodoStatus::Active => "active",
            TodoStatus::Done => "done",
            TodoStatus::Expired => "expired",
        }
    }

    /// Status with an icon for display.
    pub fn with_icon(&self) -> &'static str {
        match self {
            TodoStatus::Locked => "🔒 Locked",
            TodoStatus::Active => "➤ Active",
            TodoStatus::Done => "✓ Done",
            TodoStatus::Expired => "✗ Expired",
        }
    }
}

impl FromStr for TodoStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "locked" => Ok(TodoStatus::Locked),
            "active" => Ok(TodoStatus::Active),
            "done" => Ok(TodoStatus::Done),
            "expired" => Ok(TodoStatus::Expired),
            _ => Err(format!("Invalid todo status: {s}")),
        }
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery channel of a scheduled notification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportType {
    #[default]
    Email,
    Push,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        use TodoEvent::*;
        use TodoStatus::*;

        assert_eq!(Locked.transition(Activate), Some(Active));
        assert_eq!(Locked.transition(Expire), Some(Expired));
        assert_eq!(Active.transition(Submit), Some(Done));
        assert_eq!(Active.transition(Expire), Some(Expired));

        assert_eq!(Locked.transition(Submit), None);
        assert_eq!(Active.transition(Activate), None);
        for terminal in [Done, Expired] {
            assert!(terminal.is_terminal());
            for event in [Activate, Submit, Expire] {
                assert_eq!(terminal.transition(event), None);
            }
        }
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("ACTIVE".parse::<TodoStatus>().unwrap(), TodoStatus::Active);
        assert_eq!("expired".parse::<TodoStatus>().unwrap(), TodoStatus::Expired);
        assert!("pending".parse::<TodoStatus>().is_err());
        assert_eq!("recurring".parse::<PlanType>().unwrap(), PlanType::Recurring);
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&TodoStatus::Locked).unwrap();
        assert_eq!(json, "\"locked\"");
        let plan_type: PlanType = serde_json::from_str("\"end\"").unwrap();
        assert_eq!(plan_type, PlanType::End);
    }
}
