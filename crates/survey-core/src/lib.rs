//! Core library for recurring participant surveys.
//!
//! A company authors survey modules, assembles them into a catalog of waves
//! (one base survey, a weekly chain of recurring surveys and one end survey),
//! schedules the waves and publishes the catalog. Publishing fans out one
//! ticket per active participant through a durable queue. Each ticket holds a
//! frozen copy of every wave as a [`models::TicketTodo`], which moves through
//! `locked → active → done | expired` while the participant answers.
//!
//! # Layers
//!
//! - [`schedule`]: window validation and recurring expansion
//! - [`models`]: documents, the todo state machine and answer bookkeeping
//! - [`db`]: SQLite document store
//! - [`queue`]: durable work queues and their message payloads
//! - [`engine`]: the async [`SurveyEngine`] used by every interface
//! - [`display`]: markdown formatting for terminal output
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use survey_core::{
//!     params::{CreateCatalog, CreateCompany, Id},
//!     SurveyEngineBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
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
//! let catalog = engine
//!     .create_catalog(&CreateCatalog {
//!         company_id: company.id,
//!         name: "Quarterly pulse".to_string(),
//!     })
//!     .await?;
//!
//! // ... assign modules and apply settings, then:
//! let outcome = engine.publish_catalog(&Id { id: catalog.id }).await?;
//! println!("{outcome}");
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod display;
pub mod engine;
pub mod error;
pub mod models;
pub mod params;
pub mod queue;
pub mod schedule;

// Re-export commonly used types
pub use db::Database;
pub use display::{
    CatalogSummaries, CreateResult, DeleteResult, OperationStatus, TicketSummaries, UpdateResult,
};
pub use engine::{ConsumeReport, PublishOutcome, SurveyEngine, SurveyEngineBuilder};
pub use error::{ErrorKind, Result, SurveyError};
pub use models::{Catalog, SurveyTicket, TicketTodo, TodoStatus};
pub use queue::{MessageQueue, QueueName};
