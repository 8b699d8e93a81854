//! Ticket documents with optimistic concurrency.

use jiff::Timestamp;
use rusqlite::{params, ErrorCode, OptionalExtension};
use uuid::Uuid;

use super::{decode, encode};
use crate::{
    error::{DatabaseResultExt, Result, SurveyError},
    models::{Catalog, SurveyTicket},
};

const SELECT_TICKET_SQL: &str = "SELECT document, version FROM tickets WHERE id = ?1";
const SELECT_TICKET_BY_PAIR_SQL: &str =
    "SELECT document, version FROM tickets WHERE catalog_id = ?1 AND participant_id = ?2";
const SELECT_TICKET_BY_CODE_SQL: &str =
    "SELECT document, version FROM tickets WHERE auth_code = ?1 AND is_active = 1";
const SELECT_CATALOG_TICKETS_SQL: &str =
    "SELECT document, version FROM tickets WHERE catalog_id = ?1 ORDER BY created_at, id";
/// Column named by SQLite in a UNIQUE violation of the auth code.
const AUTH_CODE_CONSTRAINT: &str = "tickets.auth_code";
const SELECT_TICKET_VERSION_SQL: &str = "SELECT version FROM tickets WHERE id = ?1";
const INSERT_TICKET_SQL: &str = "INSERT INTO tickets (id, catalog_id, participant_id, auth_code, is_active, version, document, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";
const UPDATE_TICKET_SQL: &str = "UPDATE tickets SET is_active = ?1, version = ?2, document = ?3, updated_at = ?4 WHERE id = ?5 AND version = ?6";
const SET_TICKET_ACTIVE_SQL: &str = "UPDATE tickets SET is_active = ?1, version = version + 1, updated_at = ?3,
     document = json_set(document, '$.is_active', json(?2), '$.updated_at', ?3)
     WHERE id = ?4";
const SET_CATALOG_TICKETS_ACTIVE_SQL: &str = "UPDATE tickets SET is_active = ?1, version = version + 1, updated_at = ?3,
     document = json_set(document, '$.is_active', json(?2), '$.updated_at', ?3)
     WHERE catalog_id = ?4 AND is_active <> ?1";

/// Outcome of an idempotent ticket insert.
#[derive(Debug)]
pub enum TicketInsert {
    /// The ticket was stored
    Inserted(SurveyTicket),
    /// A ticket for the same catalog and participant already exists
    Existing(SurveyTicket),
    /// The auth code is taken by another ticket
    AuthCodeTaken,
}

/// Decodes a ticket row; the version column is authoritative.
fn ticket_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<(String, i64)> {
    Ok((row.get(0)?, row.get(1)?))
}

fn decode_ticket((document, version): (String, i64)) -> Result<SurveyTicket> {
    let mut ticket: SurveyTicket = decode(&document)?;
    ticket.version = u64::try_from(version).unwrap_or_default();
    Ok(ticket)
}

fn json_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

impl super::Database {
    /// Stores `ticket` unless its catalog/participant pair already has one.
    pub fn insert_ticket(&mut self, ticket: &SurveyTicket) -> Result<TicketInsert> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let existing = tx
            .query_row(
                SELECT_TICKET_BY_PAIR_SQL,
                params![
                    ticket.catalog_id.to_string(),
                    ticket.participant.id.to_string()
                ],
                ticket_from_row,
            )
            .optional()
            .db_context("Failed to query ticket")?;
        if let Some(row) = existing {
            return Ok(TicketInsert::Existing(decode_ticket(row)?));
        }

        let inserted = tx.execute(
            INSERT_TICKET_SQL,
            params![
                ticket.id.to_string(),
                ticket.catalog_id.to_string(),
                ticket.participant.id.to_string(),
                ticket.auth_code,
                ticket.is_active,
                ticket.version as i64,
                encode(ticket)?,
                ticket.created_at.to_string(),
                ticket.updated_at.to_string()
            ],
        );
        match inserted {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(e, message))
                if e.code == ErrorCode::ConstraintViolation =>
            {
                if message
                    .as_deref()
                    .is_some_and(|m| m.contains(AUTH_CODE_CONSTRAINT))
                {
                    return Ok(TicketInsert::AuthCodeTaken);
                }

                // Another writer may have stored the pair in the meantime
                let existing = tx
                    .query_row(
                        SELECT_TICKET_BY_PAIR_SQL,
                        params![
                            ticket.catalog_id.to_string(),
                            ticket.participant.id.to_string()
                        ],
                        ticket_from_row,
                    )
                    .optional()
                    .db_context("Failed to query ticket")?;
                return match existing {
                    Some(row) => Ok(TicketInsert::Existing(decode_ticket(row)?)),
                    None => Err(SurveyError::database("Failed to insert ticket")
                        .with_source(rusqlite::Error::SqliteFailure(e, message))),
                };
            }
            Err(e) => return Err(SurveyError::database("Failed to insert ticket").with_source(e)),
        }

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(TicketInsert::Inserted(ticket.clone()))
    }

    /// Retrieves a ticket by its ID.
    pub fn get_ticket(&self, id: Uuid) -> Result<Option<SurveyTicket>> {
        self.connection
            .query_row(SELECT_TICKET_SQL, params![id.to_string()], ticket_from_row)
            .optional()
            .db_context("Failed to query ticket")?
            .map(decode_ticket)
            .transpose()
    }

    /// Retrieves an active ticket by its auth code.
    pub fn find_ticket_by_auth_code(&self, auth_code: &str) -> Result<Option<SurveyTicket>> {
        self.connection
            .query_row(SELECT_TICKET_BY_CODE_SQL, params![auth_code], ticket_from_row)
            .optional()
            .db_context("Failed to query ticket by auth code")?
            .map(decode_ticket)
            .transpose()
    }

    /// Lists every ticket of a catalog.
    pub fn list_tickets(&self, catalog_id: Uuid) -> Result<Vec<SurveyTicket>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_CATALOG_TICKETS_SQL)
            .db_context("Failed to prepare ticket query")?;
        let rows = stmt
            .query_map(params![catalog_id.to_string()], ticket_from_row)
            .db_context("Failed to query tickets")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read tickets")?;
        rows.into_iter().map(decode_ticket).collect()
    }

    /// Replaces the ticket document if nobody saved it since it was loaded.
    ///
    /// On success `ticket.version` is bumped. Fails with `VersionConflict`
    /// when the stored version moved on, leaving `ticket` untouched.
    pub fn save_ticket(&self, ticket: &mut SurveyTicket, now: Timestamp) -> Result<()> {
        let expected = ticket.version;
        let mut updated = ticket.clone();
        updated.version = expected + 1;
        updated.updated_at = now;

        let changed = self
            .connection
            .execute(
                UPDATE_TICKET_SQL,
                params![
                    updated.is_active,
                    updated.version as i64,
                    encode(&updated)?,
                    now.to_string(),
                    updated.id.to_string(),
                    expected as i64
                ],
            )
            .db_context("Failed to save ticket")?;

        if changed == 0 {
            let stored: Option<i64> = self
                .connection
                .query_row(SELECT_TICKET_VERSION_SQL, params![ticket.id.to_string()], |row| {
                    row.get(0)
                })
                .optional()
                .db_context("Failed to query ticket version")?;
            return Err(match stored {
                Some(_) => SurveyError::VersionConflict {
                    id: ticket.id,
                    expected,
                },
                None => SurveyError::TicketNotFound {
                    id: ticket.id.to_string(),
                },
            });
        }

        *ticket = updated;
        Ok(())
    }

    /// Saves a ticket together with its catalog in one transaction.
    ///
    /// Used when a delivery is recorded on both documents. The ticket keeps
    /// its optimistic-concurrency check; nothing is written on conflict.
    pub fn save_ticket_with_catalog(
        &self,
        ticket: &mut SurveyTicket,
        catalog: &Catalog,
        now: Timestamp,
    ) -> Result<()> {
        let tx = self
            .connection
            .unchecked_transaction()
            .db_context("Failed to begin transaction")?;

        let mut updated = ticket.clone();
        self.save_ticket(&mut updated, now)?;
        self.save_catalog(catalog)?;

        tx.commit().db_context("Failed to commit transaction")?;
        *ticket = updated;
        Ok(())
    }

    /// Flips `is_active` of a single ticket in place.
    ///
    /// Returns whether the ticket exists.
    pub fn set_ticket_active(&self, id: Uuid, active: bool, now: Timestamp) -> Result<bool> {
        let changed = self
            .connection
            .execute(
                SET_TICKET_ACTIVE_SQL,
                params![active, json_bool(active), now.to_string(), id.to_string()],
            )
            .db_context("Failed to update ticket")?;
        Ok(changed > 0)
    }

    /// Flips `is_active` of every ticket of a catalog in place.
    ///
    /// Returns the number of tickets that changed.
    pub fn set_tickets_active(&self, catalog_id: Uuid, active: bool, now: Timestamp) -> Result<usize> {
        self.connection
            .execute(
                SET_CATALOG_TICKETS_ACTIVE_SQL,
                params![
                    active,
                    json_bool(active),
                    now.to_string(),
                    catalog_id.to_string()
                ],
            )
            .db_context("Failed to update catalog tickets")
    }
}
