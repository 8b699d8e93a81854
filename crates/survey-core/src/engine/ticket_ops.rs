//! Ticket creation and access.

use jiff::Timestamp;
use rand::{distr::Alphanumeric, Rng};
use uuid::Uuid;

use super::{catalog_ops::load_catalog, consumer::drain, ConsumeReport, SurveyEngine};
use crate::{
    db::{ticket_queries::TicketInsert, Database},
    display::TicketSummaries,
    error::{Result, SurveyError},
    models::{SurveyTicket, TicketSummary},
    params::{Consume, FindTicket, Id, RecordNotification},
    queue::{messages, QueueName, TicketCreateMessage},
};

/// Length of a participant's auth code.
pub const AUTH_CODE_LENGTH: usize = 6;

/// Generates a random alphanumeric auth code.
pub fn generate_auth_code() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(AUTH_CODE_LENGTH)
        .map(char::from)
        .collect()
}

/// Creates the ticket of one participant unless it already exists.
///
/// Auth-code collisions are retried with fresh codes up to `attempts` times.
pub(crate) fn create_ticket_in(
    db: &mut Database,
    message: &TicketCreateMessage,
    attempts: u32,
) -> Result<SurveyTicket> {
    let catalog = load_catalog(db, message.catalog_id)?;
    if catalog.is_draft {
        return Err(SurveyError::invalid_input("catalog_id")
            .with_reason(format!("catalog {} is not published", catalog.id)));
    }

    let participant =
        db.get_participant(message.participant_id)?
            .ok_or(SurveyError::ParticipantNotFound {
                id: message.participant_id,
            })?;
    if participant.company_id != catalog.company_id {
        return Err(SurveyError::invalid_input("participant_id").with_reason(format!(
            "participant {} does not belong to the catalog's company",
            participant.id
        )));
    }
    if !participant.is_active {
        return Err(SurveyError::invalid_input("participant_id")
            .with_reason(format!("participant {} is inactive", participant.id)));
    }

    let company = db
        .get_company(catalog.company_id)?
        .ok_or(SurveyError::CompanyNotFound {
            id: catalog.company_id,
        })?;

    let now = Timestamp::now();
    let mut ticket = SurveyTicket::issue(
        &catalog,
        company,
        participant,
        generate_auth_code(),
        now,
    );

    for attempt in 1..=attempts {
        match db.insert_ticket(&ticket)? {
            TicketInsert::Inserted(ticket) => {
                log::info!(
                    "Created ticket {} for participant {} in catalog {}",
                    ticket.id,
                    message.participant_id,
                    message.catalog_id
                );
                return Ok(ticket);
            }
            TicketInsert::Existing(existing) => {
                log::debug!(
                    "Ticket for participant {} in catalog {} already exists",
                    message.participant_id,
                    message.catalog_id
                );
                return Ok(existing);
            }
            TicketInsert::AuthCodeTaken => {
                log::warn!("Auth code collision on attempt {attempt}, retrying");
                ticket.auth_code = generate_auth_code();
            }
        }
    }

    log::error!(
        "Gave up creating ticket for participant {} after {attempts} auth code collisions",
        message.participant_id
    );
    Err(SurveyError::DuplicatedAuthCode { attempts })
}

impl SurveyEngine {
    /// Creates the ticket described by a ticket-create work item.
    ///
    /// Idempotent per catalog and participant: an existing ticket is returned
    /// unchanged.
    pub async fn create_ticket(&self, message: &TicketCreateMessage) -> Result<SurveyTicket> {
        let message = *message;
        let attempts = self.auth_code_attempts;
        self.with_database(move |db| create_ticket_in(db, &message, attempts))
            .await
    }

    /// Drains the ticket-create queue.
    pub async fn consume_ticket_creations(&self, params: &Consume) -> Result<ConsumeReport> {
        let limit = params.limit;
        let attempts = self.auth_code_attempts;
        self.with_database(move |db| {
            let report = drain(db, QueueName::TicketCreate, limit, |db, payload| {
                let message: TicketCreateMessage = messages::from_payload(payload)?;
                create_ticket_in(db, &message, attempts).map(|_| ())
            })?;
            log::info!(
                "Ticket creation run: {} received, {} processed, {} rejected, {} deferred",
                report.received,
                report.processed,
                report.rejected,
                report.deferred
            );
            Ok(report)
        })
        .await
    }

    /// Retrieves a ticket by its ID without enrichment.
    pub async fn get_ticket(&self, params: &Id) -> Result<Option<SurveyTicket>> {
        let id = params.id;
        self.with_database(move |db| db.get_ticket(id)).await
    }

    /// Lists the tickets of a catalog.
    pub async fn list_tickets(&self, params: &Id) -> Result<Vec<SurveyTicket>> {
        let catalog_id = params.id;
        self.with_database(move |db| {
            load_catalog(db, catalog_id)?;
            db.list_tickets(catalog_id)
        })
        .await
    }

    /// Lists the tickets of a catalog as summaries for display.
    pub async fn list_tickets_summary(&self, params: &Id) -> Result<TicketSummaries> {
        let tickets = self.list_tickets(params).await?;
        let summaries: Vec<TicketSummary> = tickets.iter().map(Into::into).collect();
        Ok(TicketSummaries(summaries))
    }

    /// Looks up an active ticket by its auth code.
    ///
    /// When an email is given it has to match the participant's.
    pub async fn find_ticket_by_auth_code(&self, params: &FindTicket) -> Result<SurveyTicket> {
        let auth_code = params.auth_code.trim().to_string();
        let email = params.email.clone();
        self.with_database(move |db| {
            let not_found = || SurveyError::TicketNotFound {
                id: auth_code.clone(),
            };
            let ticket = db.find_ticket_by_auth_code(&auth_code)?.ok_or_else(not_found)?;
            match email {
                Some(email) if !ticket.participant.has_email(&email) => Err(not_found()),
                _ => Ok(ticket),
            }
        })
        .await
    }

    /// Loads a ticket for display, snapshotting newly active waves first.
    ///
    /// The ticket is saved only when enrichment changed it.
    pub async fn show_ticket(&self, params: &Id) -> Result<SurveyTicket> {
        let ticket_id = params.id;
        self.with_database(move |db| load_enriched_ticket(db, ticket_id))
            .await
    }

    /// Marks a single ticket active.
    pub async fn activate_ticket(&self, params: &Id) -> Result<()> {
        let ticket_id = params.id;
        self.with_database(move |db| {
            if !db.set_ticket_active(ticket_id, true, Timestamp::now())? {
                return Err(SurveyError::TicketNotFound {
                    id: ticket_id.to_string(),
                });
            }
            log::info!("Activated ticket {ticket_id}");
            Ok(())
        })
        .await
    }

    /// Records that a plan notification was delivered to a ticket's participant.
    ///
    /// The delivery is stored on the ticket and flagged on the catalog plan in
    /// one transaction. Recording the same delivery again changes nothing.
    pub async fn record_notification_sent(
        &self,
        params: &RecordNotification,
    ) -> Result<SurveyTicket> {
        let ticket_id = params.ticket_id;
        let notification_id = params.notification_id;
        self.with_database(move |db| {
            let mut ticket =
                db.get_ticket(ticket_id)?
                    .ok_or_else(|| SurveyError::TicketNotFound {
                        id: ticket_id.to_string(),
                    })?;
            let mut catalog = load_catalog(db, ticket.catalog_id)?;

            let notification = catalog
                .notification(notification_id)
                .ok_or(SurveyError::NotificationNotFound {
                    id: notification_id,
                })?;
            let Some(todo_id) = notification.todo_id else {
                return Err(SurveyError::invalid_input("notification_id").with_reason(format!(
                    "notification {notification_id} belongs to an unpublished catalog"
                )));
            };
            ticket.todo(todo_id)?;

            if ticket.is_notification_sent(notification_id, todo_id) {
                log::debug!("Notification {notification_id} already recorded on ticket {ticket_id}");
                return Ok(ticket);
            }

            let now = Timestamp::now();
            ticket.mark_notification_sent(notification_id, todo_id, now);
            catalog.mark_notification_sent(notification_id, now)?;
            db.save_ticket_with_catalog(&mut ticket, &catalog, now)?;
            log::info!("Recorded notification {notification_id} on ticket {ticket_id}");
            Ok(ticket)
        })
        .await
    }
}

/// Loads a ticket and enriches its active todos, saving when changed.
pub(crate) fn load_enriched_ticket(db: &Database, ticket_id: Uuid) -> Result<SurveyTicket> {
    let mut ticket = db
        .get_ticket(ticket_id)?
        .ok_or_else(|| SurveyError::TicketNotFound {
            id: ticket_id.to_string(),
        })?;
    let catalog = load_catalog(db, ticket.catalog_id)?;

    let now = Timestamp::now();
    if ticket.enrich_active_todos(&catalog, now)? {
        db.save_ticket(&mut ticket, now)?;
        log::debug!("Enriched ticket {ticket_id}");
    }
    Ok(ticket)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_code_shape() {
        let code = generate_auth_code();
        assert_eq!(code.len(), AUTH_CODE_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
