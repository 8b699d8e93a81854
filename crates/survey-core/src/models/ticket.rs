//! Survey ticket: one participant's instance of a catalog.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    Catalog, Company, Participant, Question, QuestionAnswer, TicketTodo, TodoStatus,
};
use crate::error::{Result, SurveyError};

/// Record of a notification delivered for one of the ticket's todos.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SentNotification {
    pub notification_id: Uuid,
    pub todo_id: Uuid,
    pub sent_at: Timestamp,
}

/// A participant's full record across all waves of one catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SurveyTicket {
    pub id: Uuid,

    pub catalog_id: Uuid,

    /// Company snapshot taken at creation
    pub company: Company,

    /// Participant snapshot taken at creation
    pub participant: Participant,

    /// Bearer credential of the participant
    pub auth_code: String,

    #[serde(default)]
    pub is_auth_code_sent: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_code_sent_at: Option<Timestamp>,

    #[serde(default)]
    pub todos: Vec<TicketTodo>,

    pub is_active: bool,

    #[serde(default)]
    pub start_date: Option<Timestamp>,

    #[serde(default)]
    pub end_date: Option<Timestamp>,

    #[serde(default)]
    pub sent_notifications: Vec<SentNotification>,

    /// Optimistic concurrency token, bumped on every save
    #[serde(default)]
    pub version: u64,

    pub created_at: Timestamp,

    pub updated_at: Timestamp,
}

impl SurveyTicket {
    /// Issues a ticket with locked copies of every catalog template.
    pub fn issue(
        catalog: &Catalog,
        company: Company,
        participant: Participant,
        auth_code: String,
        now: Timestamp,
    ) -> Self {
        let todos = catalog
            .ticket_todos
            .iter()
            .map(|template| TicketTodo {
                status: TodoStatus::Locked,
                ..template.clone()
            })
            .collect();

        Self {
            id: Uuid::new_v4(),
            catalog_id: catalog.id,
            company,
            participant,
            auth_code,
            is_auth_code_sent: false,
            auth_code_sent_at: None,
            todos,
            is_active: catalog.is_active,
            start_date: catalog.start_date,
            end_date: catalog.end_date,
            sent_notifications: Vec::new(),
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Finds a todo in any state.
    pub fn todo(&self, todo_id: Uuid) -> Result<&TicketTodo> {
        self.todos
            .iter()
            .find(|t| t.id == todo_id)
            .ok_or(SurveyError::TodoNotFound { id: todo_id })
    }

    /// Finds a todo that accepts answers.
    ///
    /// Todos in any other state are treated as absent.
    pub fn active_todo_mut(&mut self, todo_id: Uuid) -> Result<&mut TicketTodo> {
        self.todos
            .iter_mut()
            .find(|t| t.id == todo_id && t.status == TodoStatus::Active)
            .ok_or(SurveyError::TodoNotFound { id: todo_id })
    }

    /// Records answers into the active todo `todo_id`.
    pub fn answer_questions(
        &mut self,
        todo_id: Uuid,
        answers: &[QuestionAnswer],
        client_id: Option<&str>,
        now: Timestamp,
    ) -> Result<&TicketTodo> {
        let todo = self.active_todo_mut(todo_id)?;
        let written = todo.record_answers(answers, client_id, now);
        if written < answers.len() {
            log::warn!(
                "Ignored {} answer(s) for questions outside todo {todo_id}",
                answers.len() - written
            );
        }
        Ok(todo)
    }

    /// Submits the active todo `todo_id`.
    pub fn submit_todo(
        &mut self,
        todo_id: Uuid,
        client_id: Option<&str>,
        now: Timestamp,
    ) -> Result<&TicketTodo> {
        let todo = self.active_todo_mut(todo_id)?;
        todo.submit(client_id, now)?;
        Ok(todo)
    }

    /// Already-answered questions of a todo in any state.
    pub fn answered_questions(&self, todo_id: Uuid) -> Result<Vec<Question>> {
        Ok(self.todo(todo_id)?.answered_questions())
    }

    /// Snapshots the catalog templates into active, not yet enriched todos.
    ///
    /// Returns whether anything changed. Fails without touching the ticket
    /// when an active todo has no template.
    pub fn enrich_active_todos(&mut self, catalog: &Catalog, now: Timestamp) -> Result<bool> {
        let mut pending = Vec::new();
        for (index, todo) in self.todos.iter().enumerate() {
            if !todo.needs_enrichment() {
                continue;
            }
            let template = catalog.template(todo.id).ok_or_else(|| {
                log::error!(
                    "Ticket {} holds active todo {} without a template in catalog {}",
                    self.id,
                    todo.id,
                    catalog.id
                );
                SurveyError::TemplateNotFound {
                    todo_id: todo.id,
                    catalog_id: catalog.id,
                }
            })?;
            pending.push((index, template));
        }

        for (index, template) in &pending {
            self.todos[*index].enrich_from(template, now);
        }
        Ok(!pending.is_empty())
    }

    /// Moves todos toward the desired states through the transition table.
    ///
    /// Illegal moves are skipped. Returns whether any todo changed.
    pub fn apply_todo_states(&mut self, states: &[(Uuid, TodoStatus)]) -> bool {
        let mut changed = false;
        for (todo_id, desired) in states {
            let Some(todo) = self.todos.iter_mut().find(|t| t.id == *todo_id) else {
                continue;
            };
            if todo.status == *desired {
                continue;
            }
            let Some(event) = desired.entering_event() else {
                log::warn!(
                    "Ticket {}: cannot move todo {todo_id} from {} back to {desired}",
                    self.id,
                    todo.status
                );
                continue;
            };
            match todo.fire(event) {
                Some(_) => changed = true,
                None => log::warn!(
                    "Ticket {}: skipped illegal move of todo {todo_id} from {} to {desired}",
                    self.id,
                    todo.status
                ),
            }
        }
        changed
    }

    /// Whether `notification_id` was already delivered for `todo_id`.
    pub fn is_notification_sent(&self, notification_id: Uuid, todo_id: Uuid) -> bool {
        self.sent_notifications
            .iter()
            .any(|n| n.notification_id == notification_id && n.todo_id == todo_id)
    }

    /// Records a delivered notification once.
    pub fn mark_notification_sent(&mut self, notification_id: Uuid, todo_id: Uuid, now: Timestamp) {
        if !self.is_notification_sent(notification_id, todo_id) {
            self.sent_notifications.push(SentNotification {
                notification_id,
                todo_id,
                sent_at: now,
            });
        }
    }
}
