//! Validation of a single wave window.

use jiff::Timestamp;

use crate::{
    error::{Result, SurveyError},
    models::{Notification, Schedule, WindowSettings},
};

/// Validates raw window settings at `now` and builds the schedule.
///
/// Rules, first failure wins:
/// 1. start strictly before end
/// 2. start strictly after `now`
/// 3. every notification inside `[start, end]`
/// 4. notifications strictly increasing
///
/// Every notification of the result has a fresh identity and is unsent.
pub fn validate_window(settings: &WindowSettings, now: Timestamp) -> Result<Schedule> {
    check_bounds(settings.start_date, settings.end_date)?;
    if settings.start_date <= now {
        return Err(SurveyError::StartInPast {
            start: settings.start_date,
        });
    }
    check_notifications(
        settings.start_date,
        settings.end_date,
        settings.notifications.iter().copied(),
    )?;

    Ok(Schedule {
        start_date: settings.start_date,
        end_date: settings.end_date,
        notifications: settings
            .notifications
            .iter()
            .copied()
            .map(Notification::scheduled)
            .collect(),
    })
}

/// Re-runs the ordering rules (1, 3 and 4) on an already built schedule.
pub fn check_order(schedule: &Schedule) -> Result<()> {
    check_bounds(schedule.start_date, schedule.end_date)?;
    check_notifications(
        schedule.start_date,
        schedule.end_date,
        schedule.notifications.iter().map(|n| n.date),
    )
}

fn check_bounds(start: Timestamp, end: Timestamp) -> Result<()> {
    if start >= end {
        return Err(SurveyError::StartAfterEnd { start, end });
    }
    Ok(())
}

fn check_notifications(
    start: Timestamp,
    end: Timestamp,
    dates: impl IntoIterator<Item = Timestamp>,
) -> Result<()> {
    let mut previous: Option<Timestamp> = None;
    for date in dates {
        if date < start {
            return Err(SurveyError::NotificationBeforeStart {
                notification: date,
                start,
            });
        }
        if date > end {
            return Err(SurveyError::NotificationAfterEnd {
                notification: date,
                end,
            });
        }
        if let Some(previous) = previous.filter(|p| date <= *p) {
            return Err(SurveyError::NotificationOutOfOrder {
                notification: date,
                previous,
            });
        }
        previous = Some(date);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, Timestamp};

    use super::*;

    fn days(now: Timestamp, n: i64) -> Timestamp {
        now.checked_add(SignedDuration::from_hours(24 * n)).unwrap()
    }

    fn window(now: Timestamp, start: i64, end: i64, notifications: &[i64]) -> WindowSettings {
        WindowSettings {
            start_date: days(now, start),
            end_date: days(now, end),
            notifications: notifications.iter().map(|n| days(now, *n)).collect(),
        }
    }

    #[test]
    fn test_ordered_notifications_validate() {
        let now = Timestamp::now();
        let schedule = validate_window(&window(now, 1, 8, &[2, 5]), now).unwrap();

        assert_eq!(schedule.start_date, days(now, 1));
        assert_eq!(schedule.notifications.len(), 2);
        assert!(schedule.notifications.iter().all(|n| !n.is_sent && n.todo_id.is_none()));
        assert_ne!(schedule.notifications[0].id, schedule.notifications[1].id);
        assert!(schedule.notifications[0].date < schedule.notifications[1].date);
    }

    #[test]
    fn test_reversed_notifications_are_out_of_order() {
        let now = Timestamp::now();
        let err = validate_window(&window(now, 1, 8, &[5, 2]), now).unwrap_err();
        assert!(matches!(err, SurveyError::NotificationOutOfOrder { .. }));
    }

    #[test]
    fn test_duplicate_notifications_are_out_of_order() {
        let now = Timestamp::now();
        let err = validate_window(&window(now, 1, 8, &[3, 3]), now).unwrap_err();
        assert!(matches!(err, SurveyError::NotificationOutOfOrder { .. }));
    }

    #[test]
    fn test_start_must_precede_end() {
        let now = Timestamp::now();
        let err = validate_window(&window(now, 3, 3, &[]), now).unwrap_err();
        assert!(matches!(err, SurveyError::StartAfterEnd { .. }));

        let err = validate_window(&window(now, 4, 2, &[]), now).unwrap_err();
        assert!(matches!(err, SurveyError::StartAfterEnd { .. }));
    }

    #[test]
    fn test_start_must_be_in_future() {
        let now = Timestamp::now();
        let err = validate_window(&window(now, -1, 2, &[]), now).unwrap_err();
        assert!(matches!(err, SurveyError::StartInPast { .. }));

        let exact = WindowSettings {
            start_date: now,
            end_date: days(now, 1),
            notifications: Vec::new(),
        };
        assert!(matches!(
            validate_window(&exact, now),
            Err(SurveyError::StartInPast { .. })
        ));
    }

    #[test]
    fn test_notification_window_sides_are_distinguished() {
        let now = Timestamp::now();
        let err = validate_window(&window(now, 2, 8, &[1]), now).unwrap_err();
        assert!(matches!(err, SurveyError::NotificationBeforeStart { .. }));

        let err = validate_window(&window(now, 2, 8, &[9]), now).unwrap_err();
        assert!(matches!(err, SurveyError::NotificationAfterEnd { .. }));

        // Window bounds themselves are inside.
        assert!(validate_window(&window(now, 2, 8, &[2, 8]), now).is_ok());
    }

    #[test]
    fn test_first_failure_wins() {
        let now = Timestamp::now();
        // Start after end and in the past: the bound check comes first.
        let err = validate_window(&window(now, -1, -2, &[]), now).unwrap_err();
        assert!(matches!(err, SurveyError::StartAfterEnd { .. }));

        // Out of window before out of order.
        let err = validate_window(&window(now, 2, 8, &[5, 1]), now).unwrap_err();
        assert!(matches!(err, SurveyError::NotificationBeforeStart { .. }));
    }

    #[test]
    fn test_validated_schedules_hold_invariants() {
        let now = Timestamp::now();
        let cases = [
            window(now, 1, 2, &[]),
            window(now, 1, 30, &[1, 2, 3, 29, 30]),
            window(now, 10, 11, &[10]),
        ];
        for settings in &cases {
            let schedule = validate_window(settings, now).unwrap();
            assert!(schedule.start_date < schedule.end_date);
            assert!(check_order(&schedule).is_ok());
            for pair in schedule.notifications.windows(2) {
                assert!(pair[0].date < pair[1].date);
            }
        }
    }
}
