//! Catalog documents.

use rusqlite::{params, params_from_iter, OptionalExtension};
use uuid::Uuid;

use super::{decode, decode_all, encode};
use crate::{
    error::{DatabaseResultExt, Result},
    models::{Catalog, CatalogFilter},
};

const UPSERT_CATALOG_SQL: &str = "INSERT INTO catalogs (id, company_id, is_draft, is_active, is_done, document, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
     ON CONFLICT(id) DO UPDATE SET is_draft = excluded.is_draft, is_active = excluded.is_active, is_done = excluded.is_done, document = excluded.document, updated_at = excluded.updated_at";
const SELECT_CATALOG_SQL: &str = "SELECT document FROM catalogs WHERE id = ?1";
const DELETE_CATALOG_SQL: &str = "DELETE FROM catalogs WHERE id = ?1";

impl super::Database {
    /// Inserts or replaces a catalog document.
    pub fn save_catalog(&self, catalog: &Catalog) -> Result<()> {
        self.connection
            .execute(
                UPSERT_CATALOG_SQL,
                params![
                    catalog.id.to_string(),
                    catalog.company_id.to_string(),
                    catalog.is_draft,
                    catalog.is_active,
                    catalog.is_done,
                    encode(catalog)?,
                    catalog.created_at.to_string(),
                    catalog.updated_at.to_string()
                ],
            )
            .db_context("Failed to save catalog")?;
        Ok(())
    }

    /// Retrieves a catalog by its ID.
    pub fn get_catalog(&self, id: Uuid) -> Result<Option<Catalog>> {
        let document: Option<String> = self
            .connection
            .query_row(SELECT_CATALOG_SQL, params![id.to_string()], |row| row.get(0))
            .optional()
            .db_context("Failed to query catalog")?;
        document.as_deref().map(decode).transpose()
    }

    /// Lists catalogs with optional filtering, newest first.
    pub fn list_catalogs(&self, filter: Option<&CatalogFilter>) -> Result<Vec<Catalog>> {
        let mut query = String::from("SELECT document FROM catalogs");
        let mut conditions = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(f) = filter {
            if let Some(company_id) = f.company_id {
                conditions.push("company_id = ?");
                params_vec.push(Box::new(company_id.to_string()));
            }
            if let Some(is_draft) = f.is_draft {
                conditions.push("is_draft = ?");
                params_vec.push(Box::new(is_draft));
            }
        }

        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(" ORDER BY created_at DESC, id");

        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare catalog query")?;
        let documents = stmt
            .query_map(params_from_iter(params_vec.iter()), |row| row.get(0))
            .db_context("Failed to query catalogs")?
            .collect::<rusqlite::Result<Vec<String>>>()
            .db_context("Failed to read catalogs")?;
        decode_all(documents)
    }

    /// Deletes a catalog and, through the foreign key, its tickets.
    ///
    /// Returns whether a catalog was removed.
    pub fn delete_catalog(&self, id: Uuid) -> Result<bool> {
        let removed = self
            .connection
            .execute(DELETE_CATALOG_SQL, params![id.to_string()])
            .db_context("Failed to delete catalog")?;
        Ok(removed > 0)
    }
}
