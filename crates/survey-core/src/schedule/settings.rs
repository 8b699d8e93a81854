//! Applying declarative schedule settings to a draft catalog.

use jiff::Timestamp;

use super::{expand_recurring, validate_window};
use crate::{
    error::{Result, SurveyError},
    models::{Catalog, CatalogSettings, Plan, PlanType, Schedule},
};

/// Fully validated schedules for every phase, not yet applied.
#[derive(Debug, Clone)]
struct ValidatedSettings {
    base: Schedule,
    recurring: Vec<Schedule>,
    end: Schedule,
}

fn validate_settings(
    catalog: &Catalog,
    settings: &CatalogSettings,
    now: Timestamp,
) -> Result<ValidatedSettings> {
    let base = validate_window(&settings.base, now)?;

    let recurring = match (&settings.recurring, catalog.has_recurring_survey()) {
        (Some(recurring), true) => {
            let week0 = validate_window(&recurring.window, now)?;
            expand_recurring(&week0, recurring.repeats, base.end_date)?
        }
        (None, false) => Vec::new(),
        (Some(_), false) => {
            return Err(SurveyError::invalid_input("recurring")
                .with_reason("recurring settings given but no recurring modules are assigned"));
        }
        (None, true) => {
            return Err(SurveyError::invalid_input("recurring")
                .with_reason("recurring modules are assigned but no recurring settings given"));
        }
    };

    let end = validate_window(&settings.end, now)?;
    let previous_end = recurring.last().map_or(base.end_date, |w| w.end_date);
    if end.start_date <= previous_end {
        return Err(SurveyError::StartBeforePreviousEnd {
            start: end.start_date,
            previous_end,
        });
    }

    Ok(ValidatedSettings {
        base,
        recurring,
        end,
    })
}

impl Catalog {
    /// Validates `settings` and replaces the schedule of every plan.
    ///
    /// Base is validated first, then the recurring phase (week 0 expanded
    /// into its weekly chain), then end. On failure the catalog is unchanged.
    pub fn apply_settings(&mut self, settings: CatalogSettings, now: Timestamp) -> Result<()> {
        self.ensure_draft()?;
        let validated = validate_settings(self, &settings, now)?;

        let recurring_survey = self
            .recurring_plans
            .first()
            .map(|plan| plan.survey.clone())
            .unwrap_or_default();

        self.base_plan.schedule = Some(validated.base);
        self.recurring_plans = validated
            .recurring
            .into_iter()
            .map(|schedule| Plan {
                plan_type: PlanType::Recurring,
                survey: recurring_survey.clone(),
                schedule: Some(schedule),
            })
            .collect();
        self.end_plan.schedule = Some(validated.end);

        self.start_date = self.base_plan.schedule.as_ref().map(|s| s.start_date);
        self.end_date = self.end_plan.schedule.as_ref().map(|s| s.end_date);
        self.settings = Some(settings);
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;
    use uuid::Uuid;

    use super::*;
    use crate::models::{RecurringSettings, Survey, SurveyModule, WindowSettings};

    fn days(now: Timestamp, n: i64) -> Timestamp {
        now.checked_add(SignedDuration::from_hours(24 * n)).unwrap()
    }

    fn window(now: Timestamp, start: i64, end: i64) -> WindowSettings {
        WindowSettings {
            start_date: days(now, start),
            end_date: days(now, end),
            notifications: vec![days(now, start)],
        }
    }

    fn recurring_catalog(now: Timestamp) -> Catalog {
        let mut catalog = Catalog::new("Weekly", Uuid::nil(), now);
        let module = SurveyModule {
            id: Uuid::new_v4(),
            company_id: Uuid::nil(),
            name: "Pulse".to_string(),
            description: None,
            questions: Vec::new(),
            estimated_duration: 0.0,
            is_draft: false,
            created_at: now,
            updated_at: now,
        };
        catalog
            .assign_survey(PlanType::Recurring, Survey { modules: vec![module] })
            .unwrap();
        catalog
    }

    fn settings(now: Timestamp, repeats: u32, end_start: i64) -> CatalogSettings {
        CatalogSettings {
            base: window(now, 1, 8),
            recurring: Some(RecurringSettings {
                window: window(now, 10, 11),
                repeats,
            }),
            end: window(now, end_start, end_start + 2),
        }
    }

    #[test]
    fn test_apply_settings_schedules_every_phase() {
        let now = Timestamp::now();
        let mut catalog = recurring_catalog(now);

        catalog.apply_settings(settings(now, 2, 30), now).unwrap();

        assert_eq!(catalog.recurring_plans.len(), 3);
        assert!(catalog
            .recurring_plans
            .iter()
            .all(|p| p.plan_type == PlanType::Recurring && p.survey.modules.len() == 1));
        assert_eq!(catalog.start_date, Some(days(now, 1)));
        assert_eq!(catalog.end_date, Some(days(now, 32)));
        assert!(catalog.settings.is_some());
        assert!(catalog.plans().all(|p| p.schedule.is_some()));
    }

    #[test]
    fn test_end_must_follow_last_recurring_wave() {
        let now = Timestamp::now();
        let mut catalog = recurring_catalog(now);
        let before = catalog.clone();

        // The third wave runs from day 24 to 25.
        let err = catalog.apply_settings(settings(now, 2, 25), now).unwrap_err();

        assert!(matches!(err, SurveyError::StartBeforePreviousEnd { .. }));
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_recurring_settings_need_modules() {
        let now = Timestamp::now();
        let mut catalog = Catalog::new("Plain", Uuid::nil(), now);
        let err = catalog.apply_settings(settings(now, 1, 30), now).unwrap_err();
        assert!(matches!(err, SurveyError::InvalidInput { ref field, .. } if field == "recurring"));

        let mut catalog = recurring_catalog(now);
        let no_recurring = CatalogSettings {
            recurring: None,
            ..settings(now, 0, 30)
        };
        assert!(catalog.apply_settings(no_recurring, now).is_err());
    }

    #[test]
    fn test_catalog_without_recurring_phase() {
        let now = Timestamp::now();
        let mut catalog = Catalog::new("Plain", Uuid::nil(), now);
        let plain = CatalogSettings {
            base: window(now, 1, 8),
            recurring: None,
            end: window(now, 9, 12),
        };
        catalog.apply_settings(plain, now).unwrap();
        assert!(catalog.recurring_plans.is_empty());
        assert_eq!(catalog.wave_count(), 2);
    }

    #[test]
    fn test_published_catalog_rejects_settings() {
        let now = Timestamp::now();
        let mut catalog = recurring_catalog(now);
        catalog.is_draft = false;
        let err = catalog.apply_settings(settings(now, 1, 30), now).unwrap_err();
        assert!(matches!(err, SurveyError::AlreadyPublished { .. }));
    }
}
