//! Compact catalog and ticket summaries for list views.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Catalog, SurveyTicket, TodoStatus};

/// Catalog summary without plan content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogSummary {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub is_draft: bool,
    pub is_active: bool,
    pub is_done: bool,
    pub wave_count: usize,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
}

impl From<&Catalog> for CatalogSummary {
    fn from(catalog: &Catalog) -> Self {
        Self {
            id: catalog.id,
            company_id: catalog.company_id,
            name: catalog.name.clone(),
            is_draft: catalog.is_draft,
            is_active: catalog.is_active,
            is_done: catalog.is_done,
            wave_count: catalog.wave_count(),
            start_date: catalog.start_date,
            end_date: catalog.end_date,
        }
    }
}

/// Ticket summary with per-state todo counts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TicketSummary {
    pub id: Uuid,
    pub participant_email: String,
    pub auth_code: String,
    pub is_active: bool,
    pub total_todos: usize,
    pub done_todos: usize,
    pub active_todos: usize,
}

impl From<&SurveyTicket> for TicketSummary {
    fn from(ticket: &SurveyTicket) -> Self {
        let count = |status: TodoStatus| ticket.todos.iter().filter(|t| t.status == status).count();
        Self {
            id: ticket.id,
            participant_email: ticket.participant.email.clone(),
            auth_code: ticket.auth_code.clone(),
            is_active: ticket.is_active,
            total_todos: ticket.todos.len(),
            done_todos: count(TodoStatus::Done),
            active_todos: count(TodoStatus::Active),
        }
    }
}
