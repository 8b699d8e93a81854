//! Data models for catalogs, plans, tickets and their todos.
//!
//! The models are plain serde documents. Each top-level entity (company,
//! participant, module, catalog, ticket) is stored as one JSON document by
//! [`crate::db`]. Display implementations live in [`crate::display::models`].
//!
//! Ownership follows the snapshot rule: a [`Question`] belongs to exactly one
//! [`SurveyModule`] while authoring, and is copied by value into every
//! [`TicketTodo`] built from a plan. After the copy both sides are independent.
//!
//! The wave lifecycle is an explicit state machine on [`TodoStatus`]:
//!
//! ```text
//!   locked ──activate──▶ active ──submit──▶ done
//!      │                   │
//!      └──────expire───────┴──expire──▶ expired
//! ```

pub mod catalog;
pub mod company;
pub mod filters;
pub mod module;
pub mod plan;
pub mod question;
pub mod requests;
pub mod settings;
pub mod status;
pub mod summary;
pub mod ticket;
pub mod todo;

#[cfg(test)]
mod tests;

pub use catalog::Catalog;
pub use company::{Company, Participant, DEFAULT_LANGUAGE};
pub use filters::CatalogFilter;
pub use module::{Survey, SurveyModule};
pub use plan::{Notification, Plan, Schedule, WindowSettings};
pub use question::{Keyboard, KeyboardKey, KeyboardType, LocalizedText, Question};
pub use requests::QuestionAnswer;
pub use settings::{CatalogSettings, RecurringSettings};
pub use status::{PlanType, TodoEvent, TodoStatus, TransportType};
pub use summary::{CatalogSummary, TicketSummary};
pub use ticket::{SentNotification, SurveyTicket};
pub use todo::TicketTodo;
