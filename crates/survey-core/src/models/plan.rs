//! Plan, schedule and notification models.

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{PlanType, Survey, TransportType};
use crate::error::{Result, SurveyError};

/// A scheduled reminder inside a wave window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: Uuid,

    pub date: Timestamp,

    #[serde(default)]
    pub transport_type: TransportType,

    #[serde(default)]
    pub is_sent: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<Timestamp>,

    /// Template todo this notification belongs to, set on publish
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub todo_id: Option<Uuid>,
}

impl Notification {
    /// Creates an unsent notification with a fresh identity.
    pub fn scheduled(date: Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            transport_type: TransportType::default(),
            is_sent: false,
            sent_at: None,
            todo_id: None,
        }
    }
}

/// Raw window settings as supplied by the catalog author.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowSettings {
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    #[serde(default)]
    pub notifications: Vec<Timestamp>,
}

/// A validated wave window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Schedule {
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    #[serde(default)]
    pub notifications: Vec<Notification>,
}

impl Schedule {
    /// Moves the window and every notification by `offset`.
    ///
    /// Shifted notifications get fresh identities and are unsent.
    pub fn shifted(&self, offset: SignedDuration) -> Result<Schedule> {
        let shift = |ts: Timestamp| {
            ts.checked_add(offset).map_err(|e| {
                SurveyError::invalid_input("schedule")
                    .with_reason(format!("shifting {ts} by {offset:?} overflows: {e}"))
            })
        };

        let notifications = self
            .notifications
            .iter()
            .map(|n| {
                Ok(Notification {
                    transport_type: n.transport_type,
                    ..Notification::scheduled(shift(n.date)?)
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Schedule {
            start_date: shift(self.start_date)?,
            end_date: shift(self.end_date)?,
            notifications,
        })
    }

    pub fn contains(&self, instant: Timestamp) -> bool {
        self.start_date <= instant && instant <= self.end_date
    }
}

/// One wave of a catalog: survey content plus its window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    pub plan_type: PlanType,

    #[serde(default)]
    pub survey: Survey,

    /// `None` until settings were applied
    #[serde(default)]
    pub schedule: Option<Schedule>,
}

impl Plan {
    pub fn new(plan_type: PlanType) -> Self {
        Self {
            plan_type,
            survey: Survey::default(),
            schedule: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_moves_window_and_renews_notifications() {
        let start: Timestamp = "2030-01-01T08:00:00Z".parse().unwrap();
        let end: Timestamp = "2030-01-02T08:00:00Z".parse().unwrap();
        let original = Schedule {
            start_date: start,
            end_date: end,
            notifications: vec![Notification {
                is_sent: true,
                ..Notification::scheduled(start)
            }],
        };

        let week = SignedDuration::from_hours(24 * 7);
        let shifted = original.shifted(week).unwrap();

        assert_eq!(shifted.start_date, "2030-01-08T08:00:00Z".parse().unwrap());
        assert_eq!(shifted.end_date, "2030-01-09T08:00:00Z".parse().unwrap());
        assert_eq!(shifted.notifications[0].date, shifted.start_date);
        assert_ne!(shifted.notifications[0].id, original.notifications[0].id);
        assert!(!shifted.notifications[0].is_sent);
    }

    #[test]
    fn test_shift_overflow_is_rejected() {
        let schedule = Schedule {
            start_date: Timestamp::MAX,
            end_date: Timestamp::MAX,
            notifications: Vec::new(),
        };
        assert!(schedule.shifted(SignedDuration::from_hours(1)).is_err());
    }
}
