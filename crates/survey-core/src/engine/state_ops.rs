//! Time-based wave state sweeps.
//!
//! A sweep compares each wave window of a catalog with a point in time and
//! publishes the desired todo states on `ticket_mutatestate`. The consumer
//! moves every ticket of the catalog toward those states through the todo
//! transition table, so applying the same message twice changes nothing.

use jiff::Timestamp;
use uuid::Uuid;

use super::{catalog_ops::load_catalog, consumer::drain, ConsumeReport, SurveyEngine};
use crate::{
    db::Database,
    error::{Result, SurveyError},
    params::{Consume, SweepCatalog},
    queue::{
        messages, MessageQueue, PublishOptions, QueueName, TicketStateChangeMessage,
        TodoStateEntry,
    },
};

/// Counts of one applied state change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateChangeReport {
    /// Tickets whose todos moved
    pub tickets_changed: usize,
    /// Tickets switched inactive
    pub tickets_deactivated: usize,
}

fn apply_state_change_in(
    db: &Database,
    message: &TicketStateChangeMessage,
) -> Result<StateChangeReport> {
    let mut catalog = load_catalog(db, message.catalog_id)?;
    let now = Timestamp::now();
    let mut report = StateChangeReport::default();

    if message.todos_changed {
        let states = message.desired_states();
        for mut ticket in db.list_tickets(catalog.id)? {
            if ticket.apply_todo_states(&states) {
                db.save_ticket(&mut ticket, now)?;
                report.tickets_changed += 1;
            }
        }
    }

    if message.should_delete {
        report.tickets_deactivated = db.set_tickets_active(catalog.id, false, now)?;
        if catalog.is_active || !catalog.is_done {
            catalog.is_active = false;
            catalog.is_done = true;
            catalog.updated_at = now;
            db.save_catalog(&catalog)?;
        }
    }

    log::info!(
        "Catalog {}: moved todos of {} ticket(s), deactivated {}",
        catalog.id,
        report.tickets_changed,
        report.tickets_deactivated
    );
    Ok(report)
}

impl SurveyEngine {
    /// Publishes the desired todo states of a catalog at a point in time.
    ///
    /// Once the last wave is over the message also asks for the catalog's
    /// tickets to be deactivated.
    pub async fn sweep_catalog(&self, params: &SweepCatalog) -> Result<TicketStateChangeMessage> {
        let catalog_id = params.catalog_id;
        let at = params.at.unwrap_or_else(Timestamp::now);

        self.with_database(move |db| {
            let catalog = load_catalog(db, catalog_id)?;
            if catalog.is_draft {
                return Err(SurveyError::invalid_input("catalog_id")
                    .with_reason("draft catalogs have no waves to sweep"));
            }

            let todo_states = catalog
                .desired_todo_states(at)
                .into_iter()
                .map(|(todo_id, state)| TodoStateEntry { todo_id, state })
                .collect();
            let message = TicketStateChangeMessage {
                catalog_id,
                should_delete: catalog.end_date.is_some_and(|end| at > end),
                todos_changed: true,
                todo_states,
            };

            db.declare_queue(QueueName::TicketMutateState)?;
            db.publish(
                QueueName::TicketMutateState,
                &messages::to_payload(&message)?,
                PublishOptions::default(),
            )?;
            log::info!("Swept catalog {catalog_id} at {at}");
            Ok(message)
        })
        .await
    }

    /// Applies one state-change message to every ticket of its catalog.
    pub async fn apply_state_change(
        &self,
        message: &TicketStateChangeMessage,
    ) -> Result<StateChangeReport> {
        let message = message.clone();
        self.with_database(move |db| apply_state_change_in(db, &message))
            .await
    }

    /// Drains the state-change queue.
    pub async fn consume_state_changes(&self, params: &Consume) -> Result<ConsumeReport> {
        let limit = params.limit;
        self.with_database(move |db| {
            drain(db, QueueName::TicketMutateState, limit, |db, payload| {
                let message: TicketStateChangeMessage = messages::from_payload(payload)?;
                apply_state_change_in(db, &message).map(|_| ())
            })
        })
        .await
    }

    /// Desired todo states of a catalog at `at`, without publishing.
    pub async fn desired_todo_states(
        &self,
        catalog_id: Uuid,
        at: Timestamp,
    ) -> Result<Vec<TodoStateEntry>> {
        self.with_database(move |db| {
            let catalog = load_catalog(db, catalog_id)?;
            Ok(catalog
                .desired_todo_states(at)
                .into_iter()
                .map(|(todo_id, state)| TodoStateEntry { todo_id, state })
                .collect())
        })
        .await
    }
}
