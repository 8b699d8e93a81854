//! Catalog model: a company's three-phase survey definition.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CatalogSettings, Notification, Plan, PlanType, Survey, TicketTodo, TodoStatus};
use crate::error::{Result, SurveyError};

/// A company-scoped survey definition spanning base, recurring and end waves.
///
/// While `is_draft` is set the plans may be replaced freely. After publishing
/// only the operational flags change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Catalog {
    pub id: Uuid,

    pub company_id: Uuid,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_template_id: Option<Uuid>,

    pub base_plan: Plan,

    /// Week 0 followed by its weekly repetitions
    #[serde(default)]
    pub recurring_plans: Vec<Plan>,

    pub end_plan: Plan,

    /// Start of the first wave, once scheduled
    #[serde(default)]
    pub start_date: Option<Timestamp>,

    /// End of the last wave, once scheduled
    #[serde(default)]
    pub end_date: Option<Timestamp>,

    /// Canonical wave templates, built on publish
    #[serde(default)]
    pub ticket_todos: Vec<TicketTodo>,

    /// Settings the current schedule was derived from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<CatalogSettings>,

    pub is_draft: bool,

    pub is_active: bool,

    pub is_done: bool,

    pub created_at: Timestamp,

    pub updated_at: Timestamp,
}

impl Catalog {
    /// Creates an empty draft catalog.
    pub fn new(name: impl Into<String>, company_id: Uuid, now: Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            company_id,
            name: name.into(),
            email_template_id: None,
            base_plan: Plan::new(PlanType::Base),
            recurring_plans: Vec::new(),
            end_plan: Plan::new(PlanType::End),
            start_date: None,
            end_date: None,
            ticket_todos: Vec::new(),
            settings: None,
            is_draft: true,
            is_active: false,
            is_done: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// All plans in wave order: base, recurring, end.
    pub fn plans(&self) -> impl Iterator<Item = &Plan> {
        std::iter::once(&self.base_plan)
            .chain(self.recurring_plans.iter())
            .chain(std::iter::once(&self.end_plan))
    }

    fn plans_mut(&mut self) -> impl Iterator<Item = &mut Plan> {
        std::iter::once(&mut self.base_plan)
            .chain(self.recurring_plans.iter_mut())
            .chain(std::iter::once(&mut self.end_plan))
    }

    /// Fails with `AlreadyPublished` once the catalog left draft state.
    pub fn ensure_draft(&self) -> Result<()> {
        if self.is_draft {
            Ok(())
        } else {
            Err(SurveyError::AlreadyPublished { id: self.id })
        }
    }

    /// Whether recurring modules were assigned.
    pub fn has_recurring_survey(&self) -> bool {
        self.recurring_plans
            .first()
            .is_some_and(|plan| !plan.survey.is_empty())
    }

    /// Replaces the survey of the plans of one phase.
    ///
    /// Assigning recurring content seeds the week-0 plan when none exists yet.
    pub fn assign_survey(&mut self, plan_type: PlanType, survey: Survey) -> Result<()> {
        self.ensure_draft()?;
        match plan_type {
            PlanType::Base => self.base_plan.survey = survey,
            PlanType::End => self.end_plan.survey = survey,
            PlanType::Recurring => {
                if self.recurring_plans.is_empty() {
                    self.recurring_plans.push(Plan::new(PlanType::Recurring));
                }
                for plan in &mut self.recurring_plans {
                    plan.survey = survey.clone();
                }
            }
        }
        Ok(())
    }

    /// Builds one locked template per plan and links every notification to
    /// the template of its plan.
    ///
    /// Recomputes the aggregate dates from the first and last template.
    pub fn build_templates(&mut self) -> Result<()> {
        let mut templates = Vec::new();
        for plan in self.plans_mut() {
            let Some(schedule) = plan.schedule.as_ref() else {
                return Err(SurveyError::invalid_input("settings").with_reason(format!(
                    "the {} plan has no schedule",
                    plan.plan_type
                )));
            };
            let template = TicketTodo::from_plan(plan, schedule);
            if let Some(schedule) = plan.schedule.as_mut() {
                for notification in &mut schedule.notifications {
                    notification.todo_id = Some(template.id);
                }
            }
            templates.push(template);
        }

        self.start_date = templates.first().map(|t| t.start_date);
        self.end_date = templates.last().map(|t| t.due_date);
        self.ticket_todos = templates;
        Ok(())
    }

    /// Looks up a template by todo identity.
    pub fn template(&self, todo_id: Uuid) -> Option<&TicketTodo> {
        self.ticket_todos.iter().find(|t| t.id == todo_id)
    }

    /// Looks up a scheduled notification across all plans.
    pub fn notification(&self, notification_id: Uuid) -> Option<&Notification> {
        self.plans()
            .filter_map(|plan| plan.schedule.as_ref())
            .flat_map(|schedule| schedule.notifications.iter())
            .find(|n| n.id == notification_id)
    }

    /// Flags a notification as delivered, keeping the first delivery time.
    pub fn mark_notification_sent(&mut self, notification_id: Uuid, now: Timestamp) -> Result<()> {
        let notification = self
            .plans_mut()
            .filter_map(|plan| plan.schedule.as_mut())
            .flat_map(|schedule| schedule.notifications.iter_mut())
            .find(|n| n.id == notification_id)
            .ok_or(SurveyError::NotificationNotFound {
                id: notification_id,
            })?;
        if !notification.is_sent {
            notification.is_sent = true;
            notification.sent_at = Some(now);
        }
        Ok(())
    }

    /// State each template should be in at `now`.
    pub fn desired_todo_states(&self, now: Timestamp) -> Vec<(Uuid, TodoStatus)> {
        self.ticket_todos
            .iter()
            .map(|todo| {
                let status = if now < todo.start_date {
                    TodoStatus::Locked
                } else if now <= todo.due_date {
                    TodoStatus::Active
                } else {
                    TodoStatus::Expired
                };
                (todo.id, status)
            })
            .collect()
    }

    pub fn wave_count(&self) -> usize {
        self.plans().count()
    }
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;

    use super::*;
    use crate::models::{Notification, Schedule};

    fn scheduled(plan_type: PlanType, start: Timestamp, days: i64) -> Plan {
        let end = start.checked_add((days * 24).hours()).unwrap();
        Plan {
            plan_type,
            survey: Survey::default(),
            schedule: Some(Schedule {
                start_date: start,
                end_date: end,
                notifications: vec![Notification::scheduled(start)],
            }),
        }
    }

    #[test]
    fn test_new_catalog_is_draft() {
        let catalog = Catalog::new("Pulse", Uuid::new_v4(), Timestamp::now());
        assert!(catalog.is_draft);
        assert!(catalog.ensure_draft().is_ok());
        assert_eq!(catalog.wave_count(), 2);
    }

    #[test]
    fn test_assign_recurring_seeds_week_zero() {
        let mut catalog = Catalog::new("Pulse", Uuid::new_v4(), Timestamp::now());
        assert!(!catalog.has_recurring_survey());
        catalog
            .assign_survey(PlanType::Recurring, Survey::default())
            .unwrap();
        assert_eq!(catalog.recurring_plans.len(), 1);
    }

    #[test]
    fn test_published_catalog_rejects_assignment() {
        let mut catalog = Catalog::new("Pulse", Uuid::new_v4(), Timestamp::now());
        catalog.is_draft = false;
        let err = catalog
            .assign_survey(PlanType::Base, Survey::default())
            .unwrap_err();
        assert!(matches!(err, SurveyError::AlreadyPublished { .. }));
    }

    #[test]
    fn test_build_templates_requires_schedules() {
        let mut catalog = Catalog::new("Pulse", Uuid::new_v4(), Timestamp::now());
        assert!(catalog.build_templates().is_err());
        assert!(catalog.ticket_todos.is_empty());
    }

    #[test]
    fn test_build_templates_links_notifications() {
        let start: Timestamp = "2031-03-01T00:00:00Z".parse().unwrap();
        let mut catalog = Catalog::new("Pulse", Uuid::new_v4(), start);
        catalog.base_plan = scheduled(PlanType::Base, start, 2);
        catalog.recurring_plans = vec![scheduled(
            PlanType::Recurring,
            start.checked_add(72.hours()).unwrap(),
            1,
        )];
        let end_start = start.checked_add(240.hours()).unwrap();
        catalog.end_plan = scheduled(PlanType::End, end_start, 1);

        catalog.build_templates().unwrap();

        assert_eq!(catalog.ticket_todos.len(), 3);
        assert_eq!(catalog.start_date, Some(start));
        assert_eq!(catalog.end_date, Some(end_start.checked_add(24.hours()).unwrap()));
        for (plan, template) in catalog.plans().zip(&catalog.ticket_todos) {
            assert_eq!(template.todo_type, plan.plan_type);
            assert_eq!(template.status, TodoStatus::Locked);
            let schedule = plan.schedule.as_ref().unwrap();
            assert!(schedule
                .notifications
                .iter()
                .all(|n| n.todo_id == Some(template.id)));
        }
    }

    #[test]
    fn test_desired_states_follow_the_clock() {
        let start: Timestamp = "2031-03-01T00:00:00Z".parse().unwrap();
        let mut catalog = Catalog::new("Pulse", Uuid::new_v4(), start);
        catalog.base_plan = scheduled(PlanType::Base, start, 1);
        catalog.end_plan = scheduled(PlanType::End, start.checked_add(96.hours()).unwrap(), 1);
        catalog.build_templates().unwrap();

        let noon = start.checked_add(12.hours()).unwrap();
        let states: Vec<_> = catalog
            .desired_todo_states(noon)
            .into_iter()
            .map(|(_, s)| s)
            .collect();
        assert_eq!(states, [TodoStatus::Active, TodoStatus::Locked]);

        let later = start.checked_add(200.hours()).unwrap();
        let states: Vec<_> = catalog
            .desired_todo_states(later)
            .into_iter()
            .map(|(_, s)| s)
            .collect();
        assert_eq!(states, [TodoStatus::Expired, TodoStatus::Expired]);
    }
}
