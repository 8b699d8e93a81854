//! Async engine API over the document store and the queues.
//!
//! [`SurveyEngine`] is the entry point for every interface. Each operation
//! opens its own [`Database`] connection on the blocking thread pool, does
//! its work and drops the connection when the closure returns, whether it
//! succeeded or not. No mutable state is shared between operations beyond
//! the database file itself.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  SurveyEngine   │    │  Models         │    │  Database       │
//! │  (catalog_ops,  │───▶│  (schedule,     │───▶│  (documents,    │
//! │   ticket_ops,…) │    │   state, answer)│    │   queues)       │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use survey_core::{params::CreateCompany, SurveyEngineBuilder};
//!
//! # async fn example() -> survey_core::Result<()> {
//! let engine = SurveyEngineBuilder::new()
//!     .with_database_path("surveys.db")
//!     .build()
//!     .await?;
//!
//! let company = engine
//!     .create_company(&CreateCompany {
//!         name: "ACME".to_string(),
//!     })
//!     .await?;
//! println!("{company}");
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use tokio::task;

use crate::{
    db::Database,
    error::{Result, SurveyError},
};

pub mod authoring_ops;
pub mod builder;
pub mod catalog_ops;
pub mod conduct_ops;
pub mod consumer;
pub mod state_ops;
pub mod ticket_ops;


pub use builder::SurveyEngineBuilder;
pub use catalog_ops::PublishOutcome;
pub use consumer::ConsumeReport;

/// Main engine interface.
#[derive(Debug, Clone)]
pub struct SurveyEngine {
    pub(crate) db_path: PathBuf,
    pub(crate) auth_code_attempts: u32,
}

impl SurveyEngine {
    pub(crate) fn new(db_path: PathBuf, auth_code_attempts: u32) -> Self {
        Self {
            db_path,
            auth_code_attempts,
        }
    }

    /// Path of the database file this engine operates on.
    pub fn database_path(&self) -> &std::path::Path {
        &self.db_path
    }

    /// Runs `op` against a fresh connection on the blocking pool.
    pub(crate) async fn with_database<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            op(&mut db)
        })
        .await
        .map_err(|e| SurveyError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}
