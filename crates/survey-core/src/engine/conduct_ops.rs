//! Answer collection on a participant's active waves.
//!
//! Every mutating call loads the ticket, enriches newly active todos, applies
//! the change to the whole document and saves it with a version check. A
//! concurrent save in between fails with `VersionConflict` and leaves the
//! stored ticket as the other writer left it.

use jiff::Timestamp;

use super::{ticket_ops::load_enriched_ticket, SurveyEngine};
use crate::{
    error::Result,
    models::{Question, QuestionAnswer, TicketTodo},
    params::{AnswerQuestions, SubmitTodo, TodoRef},
};

fn validate_answers(params: &AnswerQuestions) -> Result<Vec<QuestionAnswer>> {
    params
        .answers
        .iter()
        .cloned()
        .map(QuestionAnswer::try_from)
        .collect()
}

impl SurveyEngine {
    /// Records answers into an active todo and returns the updated todo.
    pub async fn answer_questions(&self, params: &AnswerQuestions) -> Result<TicketTodo> {
        let answers = validate_answers(params)?;
        let (ticket_id, todo_id) = (params.ticket_id, params.todo_id);
        let client_id = params.client_id.clone();

        self.with_database(move |db| {
            let mut ticket = load_enriched_ticket(db, ticket_id)?;
            let now = Timestamp::now();
            let todo = ticket
                .answer_questions(todo_id, &answers, client_id.as_deref(), now)?
                .clone();
            db.save_ticket(&mut ticket, now)?;
            Ok(todo)
        })
        .await
    }

    /// Submits an active todo once every required question is answered.
    pub async fn submit_todo(&self, params: &SubmitTodo) -> Result<TicketTodo> {
        let (ticket_id, todo_id) = (params.ticket_id, params.todo_id);
        let client_id = params.client_id.clone();

        self.with_database(move |db| {
            let mut ticket = load_enriched_ticket(db, ticket_id)?;
            let now = Timestamp::now();
            let todo = ticket
                .submit_todo(todo_id, client_id.as_deref(), now)?
                .clone();
            db.save_ticket(&mut ticket, now)?;
            log::info!("Ticket {ticket_id}: submitted todo {todo_id}");
            Ok(todo)
        })
        .await
    }

    /// Records answers and submits the todo in a single save.
    ///
    /// When the submit fails nothing is saved, the answers included.
    pub async fn submit_answers(&self, params: &AnswerQuestions) -> Result<TicketTodo> {
        let answers = validate_answers(params)?;
        let (ticket_id, todo_id) = (params.ticket_id, params.todo_id);
        let client_id = params.client_id.clone();

        self.with_database(move |db| {
            let mut ticket = load_enriched_ticket(db, ticket_id)?;
            let now = Timestamp::now();
            ticket.answer_questions(todo_id, &answers, client_id.as_deref(), now)?;
            let todo = ticket
                .submit_todo(todo_id, client_id.as_deref(), now)?
                .clone();
            db.save_ticket(&mut ticket, now)?;
            log::info!("Ticket {ticket_id}: answered and submitted todo {todo_id}");
            Ok(todo)
        })
        .await
    }

    /// Already-answered questions of a todo in any state.
    pub async fn answered_questions(&self, params: &TodoRef) -> Result<Vec<Question>> {
        let (ticket_id, todo_id) = (params.ticket_id, params.todo_id);
        self.with_database(move |db| {
            let ticket = db
                .get_ticket(ticket_id)?
                .ok_or_else(|| crate::SurveyError::TicketNotFound {
                    id: ticket_id.to_string(),
                })?;
            ticket.answered_questions(todo_id)
        })
        .await
    }
}
