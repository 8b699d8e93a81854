//! SQLite document store.
//!
//! Each entity is persisted as a JSON document in its own collection table,
//! with a few extracted columns for lookups and uniqueness. A [`Database`]
//! wraps one connection; the engine opens one per operation and drops it when
//! the operation ends.

use std::{path::Path, time::Duration};

use rusqlite::Connection;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{DatabaseResultExt, Result};

pub mod catalog_queries;
pub mod company_queries;
pub mod migrations;
pub mod module_queries;
pub mod ticket_queries;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Creates a new database connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;
        connection
            .busy_timeout(BUSY_TIMEOUT)
            .db_context("Failed to set busy timeout")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }

    pub(crate) fn connection(&self) -> &Connection {
        &self.connection
    }
}

fn encode<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

fn decode<T: DeserializeOwned>(document: &str) -> Result<T> {
    Ok(serde_json::from_str(document)?)
}

/// Decodes every document of a query result.
fn decode_all<T: DeserializeOwned>(documents: Vec<String>) -> Result<Vec<T>> {
    documents.iter().map(|d| decode(d)).collect()
}
