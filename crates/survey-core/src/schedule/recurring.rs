//! Expansion of the recurring phase into chained weekly waves.

use jiff::{SignedDuration, Timestamp};

use super::validator::check_order;
use crate::{
    error::{Result, SurveyError},
    models::Schedule,
};

const HOURS_PER_WEEK: i64 = 24 * 7;

/// Upper bound on additional weekly waves, ten years of weeks.
pub const MAX_REPEATS: u32 = 520;

/// Derives `repeats` weekly waves from the validated week-0 window.
///
/// Returns `[week0, week1, ..., weekN]`. Week 0 must start after `base_end`
/// and every wave must start after the previous one ends. Any violation
/// fails the whole expansion, as does a `repeats` above [`MAX_REPEATS`].
pub fn expand_recurring(week0: &Schedule, repeats: u32, base_end: Timestamp) -> Result<Vec<Schedule>> {
    if repeats > MAX_REPEATS {
        return Err(SurveyError::invalid_input("repeats").with_reason(format!(
            "{repeats} exceeds the maximum of {MAX_REPEATS} weekly repeats"
        )));
    }
    if week0.start_date <= base_end {
        return Err(SurveyError::StartBeforePreviousEnd {
            start: week0.start_date,
            previous_end: base_end,
        });
    }

    let mut waves = vec![week0.clone()];

    for week in 1..=i64::from(repeats) {
        let wave = week0.shifted(SignedDuration::from_hours(HOURS_PER_WEEK * week))?;
        check_order(&wave)?;

        let previous_end = waves.last().map_or(base_end, |w| w.end_date);
        if wave.start_date <= previous_end {
            return Err(SurveyError::StartBeforePreviousEnd {
                start: wave.start_date,
                previous_end,
            });
        }
        waves.push(wave);
    }

    Ok(waves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Notification;

    fn days(now: Timestamp, n: i64) -> Timestamp {
        now.checked_add(SignedDuration::from_hours(24 * n)).unwrap()
    }

    fn week0(now: Timestamp, start: i64, end: i64) -> Schedule {
        Schedule {
            start_date: days(now, start),
            end_date: days(now, end),
            notifications: vec![Notification::scheduled(days(now, start))],
        }
    }

    #[test]
    fn test_excessive_repeats_are_rejected() {
        let now = Timestamp::now();
        let week0 = week0(now, 10, 11);

        let err = expand_recurring(&week0, u32::MAX, days(now, 8)).unwrap_err();
        assert!(matches!(err, SurveyError::InvalidInput { ref field, .. } if field == "repeats"));

        let waves = expand_recurring(&week0, MAX_REPEATS, days(now, 8)).unwrap();
        assert_eq!(waves.len(), MAX_REPEATS as usize + 1);
    }

    #[test]
    fn test_two_repeats_produce_three_weekly_waves() {
        let now = Timestamp::now();
        let waves = expand_recurring(&week0(now, 10, 11), 2, days(now, 8)).unwrap();

        let windows: Vec<_> = waves.iter().map(|w| (w.start_date, w.end_date)).collect();
        assert_eq!(
            windows,
            [
                (days(now, 10), days(now, 11)),
                (days(now, 17), days(now, 18)),
                (days(now, 24), days(now, 25)),
            ]
        );
        for wave in &waves {
            assert_eq!(wave.notifications[0].date, wave.start_date);
        }
        assert_ne!(waves[1].notifications[0].id, waves[2].notifications[0].id);
    }

    #[test]
    fn test_zero_repeats_keeps_week_zero() {
        let now = Timestamp::now();
        let waves = expand_recurring(&week0(now, 10, 11), 0, days(now, 8)).unwrap();
        assert_eq!(waves.len(), 1);
    }

    #[test]
    fn test_week_zero_must_follow_base() {
        let now = Timestamp::now();
        let err = expand_recurring(&week0(now, 10, 11), 2, days(now, 10)).unwrap_err();
        assert!(matches!(err, SurveyError::StartBeforePreviousEnd { .. }));
    }

    #[test]
    fn test_windows_longer_than_a_week_overlap() {
        let now = Timestamp::now();
        let err = expand_recurring(&week0(now, 10, 17), 3, days(now, 8)).unwrap_err();
        assert!(matches!(err, SurveyError::StartBeforePreviousEnd { .. }));
    }

    #[test]
    fn test_expanded_waves_never_overlap() {
        let now = Timestamp::now();
        for (length, repeats) in [(1, 5), (3, 4), (6, 10)] {
            let base_end = days(now, 2);
            let waves = expand_recurring(&week0(now, 3, 3 + length), repeats, base_end).unwrap();
            assert_eq!(waves.len(), repeats as usize + 1);
            assert!(waves[0].start_date > base_end);
            for pair in waves.windows(2) {
                assert!(pair[0].end_date < pair[1].start_date);
            }
        }
    }
}
