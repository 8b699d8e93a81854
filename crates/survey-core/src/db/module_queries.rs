//! Survey module documents and SPSS id registry.

use rusqlite::{params, OptionalExtension};
use uuid::Uuid;

use super::{decode, encode};
use crate::{
    error::{DatabaseResultExt, Result, SurveyError},
    models::{Question, SurveyModule},
};

const UPSERT_MODULE_SQL: &str = "INSERT INTO modules (id, company_id, is_draft, document, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
     ON CONFLICT(id) DO UPDATE SET is_draft = excluded.is_draft, document = excluded.document, updated_at = excluded.updated_at";
const SELECT_MODULE_SQL: &str = "SELECT document FROM modules WHERE id = ?1";
const SELECT_SPSS_OWNER_SQL: &str = "SELECT module_id FROM question_spss_ids WHERE spss_id = ?1";
const INSERT_SPSS_SQL: &str =
    "INSERT INTO question_spss_ids (spss_id, module_id, question_id) VALUES (?1, ?2, ?3)";

impl super::Database {
    /// Inserts or replaces a module document.
    pub fn save_module(&self, module: &SurveyModule) -> Result<()> {
        self.connection
            .execute(
                UPSERT_MODULE_SQL,
                params![
                    module.id.to_string(),
                    module.company_id.to_string(),
                    module.is_draft,
                    encode(module)?,
                    module.created_at.to_string(),
                    module.updated_at.to_string()
                ],
            )
            .db_context("Failed to save module")?;
        Ok(())
    }

    /// Retrieves a module by its ID.
    pub fn get_module(&self, id: Uuid) -> Result<Option<SurveyModule>> {
        let document: Option<String> = self
            .connection
            .query_row(SELECT_MODULE_SQL, params![id.to_string()], |row| row.get(0))
            .optional()
            .db_context("Failed to query module")?;
        document.as_deref().map(decode).transpose()
    }

    /// Saves `module` after `question` was added to it, claiming the
    /// question's SPSS id.
    ///
    /// Fails with `InvalidInput` when another question already uses the id.
    pub fn save_module_with_question(
        &mut self,
        module: &SurveyModule,
        question: &Question,
    ) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let owner: Option<String> = tx
            .query_row(SELECT_SPSS_OWNER_SQL, params![question.spss_id], |row| {
                row.get(0)
            })
            .optional()
            .db_context("Failed to query SPSS id")?;
        if let Some(owner) = owner {
            return Err(SurveyError::invalid_input("spss_id").with_reason(format!(
                "SPSS id '{}' is already used in module {owner}",
                question.spss_id
            )));
        }

        tx.execute(
            INSERT_SPSS_SQL,
            params![
                question.spss_id,
                module.id.to_string(),
                question.id.to_string()
            ],
        )
        .db_context("Failed to register SPSS id")?;
        tx.execute(
            UPSERT_MODULE_SQL,
            params![
                module.id.to_string(),
                module.company_id.to_string(),
                module.is_draft,
                encode(module)?,
                module.created_at.to_string(),
                module.updated_at.to_string()
            ],
        )
        .db_context("Failed to save module")?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(())
    }
}
