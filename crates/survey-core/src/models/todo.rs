//! Ticket todo: one wave inside a participant's ticket.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Plan, PlanType, Question, QuestionAnswer, Schedule, TodoEvent, TodoStatus};
use crate::error::{Result, SurveyError};

/// One wave instance, either as catalog template or inside a ticket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TicketTodo {
    pub id: Uuid,

    #[serde(rename = "type")]
    pub todo_type: PlanType,

    #[serde(default)]
    pub status: TodoStatus,

    /// Completion in percent, 0 to 100
    #[serde(default)]
    pub progress: f32,

    pub start_date: Timestamp,

    pub due_date: Timestamp,

    #[serde(default)]
    pub estimated_duration: f32,

    /// Sum of the measured durations of all answered questions
    #[serde(default)]
    pub measured_duration: f32,

    /// Question snapshots in presentation order
    #[serde(default)]
    pub questions: Vec<Question>,

    #[serde(default)]
    pub is_enriched: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enriched_at: Option<Timestamp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<Timestamp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_identifier: Option<String>,
}

impl TicketTodo {
    /// Builds a locked template from a scheduled plan.
    pub fn from_plan(plan: &Plan, schedule: &Schedule) -> Self {
        Self {
            id: Uuid::new_v4(),
            todo_type: plan.plan_type,
            status: TodoStatus::Locked,
            progress: 0.0,
            start_date: schedule.start_date,
            due_date: schedule.end_date,
            estimated_duration: plan.survey.estimated_duration(),
            measured_duration: 0.0,
            questions: plan.survey.flatten_questions(),
            is_enriched: false,
            enriched_at: None,
            submitted_at: None,
            application_identifier: None,
        }
    }

    /// Fires `event` against the transition table.
    ///
    /// Returns the new status, or `None` (leaving the todo untouched) when the
    /// event is illegal in the current state.
    pub fn fire(&mut self, event: TodoEvent) -> Option<TodoStatus> {
        let next = self.status.transition(event)?;
        self.status = next;
        Some(next)
    }

    /// Writes matching answers into the question snapshots and recomputes
    /// the totals. Returns how many questions were written.
    ///
    /// A zero duration never clears the duration of an answered question, so
    /// progress does not decrease.
    pub fn record_answers(
        &mut self,
        answers: &[QuestionAnswer],
        client_id: Option<&str>,
        now: Timestamp,
    ) -> usize {
        let mut written = 0;
        for question in &mut self.questions {
            if let Some(answer) = answers.iter().find(|a| a.question_id == question.id) {
                question.answer = Some(answer.answer.clone());
                // An answered question stays answered
                if answer.measured_duration > 0.0 || !question.is_answered() {
                    question.measured_duration = answer.measured_duration;
                }
                question.answered_at = Some(now);
                question.application_identifier = client_id.map(String::from);
                written += 1;
            }
        }
        self.recompute_totals();
        written
    }

    /// Recomputes `progress` and `measured_duration` from the questions.
    ///
    /// Information questions are left out of progress on both sides of the
    /// ratio. A todo with nothing to answer keeps its progress.
    pub fn recompute_totals(&mut self) {
        let (answerable, answered) = self
            .questions
            .iter()
            .filter(|q| !q.is_information())
            .fold((0usize, 0usize), |(total, done), q| {
                (total + 1, done + usize::from(q.is_answered()))
            });
        if answerable > 0 {
            self.progress = 100.0 * answered as f32 / answerable as f32;
        }

        self.measured_duration = self
            .questions
            .iter()
            .filter(|q| q.is_answered())
            .map(|q| q.measured_duration)
            .sum();
    }

    /// Number of required questions without an answer.
    pub fn unanswered_count(&self) -> usize {
        self.questions
            .iter()
            .filter(|q| !q.is_information() && !q.is_answered())
            .count()
    }

    /// Moves an active, complete todo to `done`.
    ///
    /// Leaves the todo untouched when a required question is unanswered.
    pub fn submit(&mut self, client_id: Option<&str>, now: Timestamp) -> Result<()> {
        let unanswered = self.unanswered_count();
        if unanswered > 0 {
            return Err(SurveyError::SurveyIncomplete {
                todo_id: self.id,
                unanswered,
            });
        }

        if self.fire(TodoEvent::Submit).is_none() {
            return Err(SurveyError::TodoNotFound { id: self.id });
        }

        if let Some(client_id) = client_id.filter(|c| !c.is_empty()) {
            self.submitted_at = Some(now);
            self.application_identifier = Some(client_id.to_string());
        }
        Ok(())
    }

    /// Copies of the questions that already carry an answer.
    pub fn answered_questions(&self) -> Vec<Question> {
        self.questions
            .iter()
            .filter(|q| q.is_answered())
            .cloned()
            .collect()
    }

    /// Replaces this todo with the template's content, keeping its status,
    /// and marks it enriched.
    pub fn enrich_from(&mut self, template: &TicketTodo, now: Timestamp) {
        let status = self.status;
        *self = template.clone();
        self.status = status;
        self.is_enriched = true;
        self.enriched_at = Some(now);
    }

    /// Whether the todo needs a snapshot from its template.
    pub fn needs_enrichment(&self) -> bool {
        self.status == TodoStatus::Active && !self.is_enriched
    }
}
