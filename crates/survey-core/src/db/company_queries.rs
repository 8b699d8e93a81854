//! Company and participant documents.

use rusqlite::{params, OptionalExtension};
use uuid::Uuid;

use super::{decode, decode_all, encode};
use crate::{
    error::{DatabaseResultExt, Result},
    models::{Company, Participant},
};

const UPSERT_COMPANY_SQL: &str = "INSERT INTO companies (id, name, document, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)
     ON CONFLICT(id) DO UPDATE SET name = excluded.name, document = excluded.document, updated_at = excluded.updated_at";
const SELECT_COMPANY_SQL: &str = "SELECT document FROM companies WHERE id = ?1";
const UPSERT_PARTICIPANT_SQL: &str = "INSERT INTO participants (id, company_id, email, is_active, document, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
     ON CONFLICT(id) DO UPDATE SET email = excluded.email, is_active = excluded.is_active, document = excluded.document, updated_at = excluded.updated_at";
const SELECT_PARTICIPANT_SQL: &str = "SELECT document FROM participants WHERE id = ?1";
const SELECT_COMPANY_PARTICIPANTS_SQL: &str = "SELECT document FROM participants WHERE company_id = ?1 AND (?2 = 0 OR is_active = 1) ORDER BY created_at, id";

impl super::Database {
    /// Inserts or replaces a company document.
    pub fn save_company(&self, company: &Company) -> Result<()> {
        self.connection
            .execute(
                UPSERT_COMPANY_SQL,
                params![
                    company.id.to_string(),
                    company.name,
                    encode(company)?,
                    company.created_at.to_string(),
                    company.updated_at.to_string()
                ],
            )
            .db_context("Failed to save company")?;
        Ok(())
    }

    /// Retrieves a company by its ID.
    pub fn get_company(&self, id: Uuid) -> Result<Option<Company>> {
        let document: Option<String> = self
            .connection
            .query_row(SELECT_COMPANY_SQL, params![id.to_string()], |row| row.get(0))
            .optional()
            .db_context("Failed to query company")?;
        document.as_deref().map(decode).transpose()
    }

    /// Inserts or replaces a participant document.
    pub fn save_participant(&self, participant: &Participant) -> Result<()> {
        self.connection
            .execute(
                UPSERT_PARTICIPANT_SQL,
                params![
                    participant.id.to_string(),
                    participant.company_id.to_string(),
                    participant.email,
                    participant.is_active,
                    encode(participant)?,
                    participant.created_at.to_string(),
                    participant.updated_at.to_string()
                ],
            )
            .db_context("Failed to save participant")?;
        Ok(())
    }

    /// Retrieves a participant by its ID.
    pub fn get_participant(&self, id: Uuid) -> Result<Option<Participant>> {
        let document: Option<String> = self
            .connection
            .query_row(SELECT_PARTICIPANT_SQL, params![id.to_string()], |row| {
                row.get(0)
            })
            .optional()
            .db_context("Failed to query participant")?;
        document.as_deref().map(decode).transpose()
    }

    /// Lists the participants of a company in creation order.
    pub fn list_participants(&self, company_id: Uuid, active_only: bool) -> Result<Vec<Participant>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_COMPANY_PARTICIPANTS_SQL)
            .db_context("Failed to prepare participant query")?;
        let documents = stmt
            .query_map(params![company_id.to_string(), active_only], |row| row.get(0))
            .db_context("Failed to query participants")?
            .collect::<rusqlite::Result<Vec<String>>>()
            .db_context("Failed to read participants")?;
        decode_all(documents)
    }
}
