//! Error types for the survey engine.
//!
//! Every failure the engine can report is a [`SurveyError`]. Callers that need
//! to translate or classify errors use [`SurveyError::kind`] (the coarse
//! taxonomy) and [`SurveyError::code`] (a stable wire code suitable for
//! translation lookups).

use std::fmt;
use std::path::PathBuf;

use jiff::Timestamp;
use thiserror::Error;
use uuid::Uuid;

/// Comprehensive error type for all engine operations.
#[derive(Error, Debug)]
pub enum SurveyError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// The durable queue could not be reached or rejected an operation
    #[error("Queue error: {message}")]
    Queue { message: String },
    /// A mandatory publish found no declared queue to route to
    #[error("Queue '{queue}' is not declared; mandatory message could not be routed")]
    QueueNotRouted { queue: String },

    /// Catalog not found for the given ID
    #[error("Catalog with ID {id} not found")]
    CatalogNotFound { id: Uuid },
    /// Ticket not found for the given ID or credential
    #[error("Ticket {id} not found")]
    TicketNotFound { id: String },
    /// Todo not found, or not addressable in its current state
    #[error("Todo with ID {id} not found")]
    TodoNotFound { id: Uuid },
    /// Plan notification not found for the given ID
    #[error("Notification with ID {id} not found")]
    NotificationNotFound { id: Uuid },
    /// A ticket todo has no matching template on its catalog
    #[error("Todo {todo_id} has no template in catalog {catalog_id}")]
    TemplateNotFound { todo_id: Uuid, catalog_id: Uuid },
    /// Survey module not found for the given ID
    #[error("Module with ID {id} not found")]
    ModuleNotFound { id: Uuid },
    /// Company not found for the given ID
    #[error("Company with ID {id} not found")]
    CompanyNotFound { id: Uuid },
    /// Participant not found for the given ID
    #[error("Participant with ID {id} not found")]
    ParticipantNotFound { id: Uuid },

    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// A window whose start is not strictly before its end
    #[error("Start date {start} is not before end date {end}")]
    StartAfterEnd { start: Timestamp, end: Timestamp },
    /// A window that starts at or before the validation instant
    #[error("Start date {start} is not in the future")]
    StartInPast { start: Timestamp },
    /// A notification scheduled before its window opens
    #[error("Notification at {notification} is before the window start {start}")]
    NotificationBeforeStart {
        notification: Timestamp,
        start: Timestamp,
    },
    /// A notification scheduled after its window closes
    #[error("Notification at {notification} is after the window end {end}")]
    NotificationAfterEnd {
        notification: Timestamp,
        end: Timestamp,
    },
    /// A notification that does not come strictly after its predecessor
    #[error("Notification at {notification} does not follow the previous one at {previous}")]
    NotificationOutOfOrder {
        notification: Timestamp,
        previous: Timestamp,
    },
    /// A window that does not start strictly after the preceding wave
    #[error("Start date {start} does not follow the previous wave ending {previous_end}")]
    StartBeforePreviousEnd {
        start: Timestamp,
        previous_end: Timestamp,
    },
    /// A module that is still a draft cannot be assigned to a catalog
    #[error("Module with ID {id} is still a draft")]
    ModuleIsDraft { id: Uuid },

    /// Catalog is published and its plans can no longer change
    #[error("Catalog with ID {id} is already published")]
    AlreadyPublished { id: Uuid },
    /// Catalog is active or done and cannot be removed
    #[error("Catalog with ID {id} is still active")]
    CatalogStillActive { id: Uuid },
    /// Ticket was modified by someone else since it was loaded
    #[error("Ticket {id} was modified concurrently (expected version {expected})")]
    VersionConflict { id: Uuid, expected: u64 },
    /// Could not find a free auth code within the retry budget
    #[error("Could not generate a unique auth code after {attempts} attempts")]
    DuplicatedAuthCode { attempts: u32 },

    /// Submit attempted while required questions are unanswered
    #[error("Todo {todo_id} has {unanswered} unanswered question(s)")]
    SurveyIncomplete { todo_id: Uuid, unanswered: usize },

    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration and runtime errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Coarse classification of [`SurveyError`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad date ordering or malformed request shape
    Validation,
    /// Entity absent or not addressable in its current state
    NotFound,
    /// Operation not permitted in the entity's current state
    Conflict,
    /// Submit attempted with unanswered required questions
    Incomplete,
    /// Store or queue unavailable
    Upstream,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Incomplete => "incomplete",
            ErrorKind::Upstream => "upstream",
        };
        f.write_str(name)
    }
}

impl SurveyError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Classifies the error.
    pub fn kind(&self) -> ErrorKind {
        use SurveyError::*;
        match self {
            InvalidInput { .. }
            | StartAfterEnd { .. }
            | StartInPast { .. }
            | NotificationBeforeStart { .. }
            | NotificationAfterEnd { .. }
            | NotificationOutOfOrder { .. }
            | StartBeforePreviousEnd { .. }
            | ModuleIsDraft { .. } => ErrorKind::Validation,
            CatalogNotFound { .. }
            | TicketNotFound { .. }
            | TodoNotFound { .. }
            | NotificationNotFound { .. }
            | TemplateNotFound { .. }
            | ModuleNotFound { .. }
            | CompanyNotFound { .. }
            | ParticipantNotFound { .. } => ErrorKind::NotFound,
            AlreadyPublished { .. }
            | CatalogStillActive { .. }
            | VersionConflict { .. }
            | DuplicatedAuthCode { .. } => ErrorKind::Conflict,
            SurveyIncomplete { .. } => ErrorKind::Incomplete,
            Database { .. }
            | Queue { .. }
            | QueueNotRouted { .. }
            | FileSystem { .. }
            | XdgDirectory(_)
            | Serialization { .. }
            | Configuration { .. } => ErrorKind::Upstream,
        }
    }

    /// Stable code for translation and client display.
    pub fn code(&self) -> &'static str {
        use SurveyError::*;
        match self {
            StartAfterEnd { .. } => "sc_startdateafterenddate",
            StartInPast { .. } => "sc_startdateinpast",
            NotificationBeforeStart { .. } => "sc_notificationbeforestart",
            NotificationAfterEnd { .. } => "sc_notificationafterend",
            NotificationOutOfOrder { .. } => "sc_notificationbeforelast",
            StartBeforePreviousEnd { .. } => "sc_startdatebeforeenddate",
            AlreadyPublished { .. } => "sc_alreadypublished",
            CatalogStillActive { .. } => "sc_stillactive",
            ModuleIsDraft { .. } => "module_is_draft",
            ModuleNotFound { .. } => "module_not_found",
            SurveyIncomplete { .. } => "survey_surveyincomplete",
            DuplicatedAuthCode { .. } => "surveytickets_toomanyduplicates",
            VersionConflict { .. } => "surveytickets_versionconflict",
            InvalidInput { .. } => "invalid_input",
            CatalogNotFound { .. }
            | TicketNotFound { .. }
            | TodoNotFound { .. }
            | NotificationNotFound { .. }
            | TemplateNotFound { .. }
            | CompanyNotFound { .. }
            | ParticipantNotFound { .. } => "record_not_found",
            Database { .. } | Serialization { .. } => "db_general_exception",
            Queue { .. } | QueueNotRouted { .. } => "queue_unavailable",
            FileSystem { .. } | XdgDirectory(_) | Configuration { .. } => "configuration",
        }
    }
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> SurveyError {
        SurveyError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> SurveyError {
        SurveyError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| {
            log::error!("{message}: {e}");
            SurveyError::database(message).with_source(e)
        })
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, SurveyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_errors_are_validation() {
        let now = Timestamp::now();
        let err = SurveyError::NotificationOutOfOrder {
            notification: now,
            previous: now,
        };
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.code(), "sc_notificationbeforelast");
    }

    #[test]
    fn test_incomplete_and_conflict_kinds() {
        let incomplete = SurveyError::SurveyIncomplete {
            todo_id: Uuid::nil(),
            unanswered: 2,
        };
        assert_eq!(incomplete.kind(), ErrorKind::Incomplete);
        assert_eq!(incomplete.code(), "survey_surveyincomplete");

        let published = SurveyError::AlreadyPublished { id: Uuid::nil() };
        assert_eq!(published.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_invalid_input_builder() {
        let err = SurveyError::invalid_input("email").with_reason("missing '@'");
        match err {
            SurveyError::InvalidInput { field, reason } => {
                assert_eq!(field, "email");
                assert_eq!(reason, "missing '@'");
            }
            _ => panic!("Expected InvalidInput error"),
        }
    }

    #[test]
    fn test_db_context_maps_to_upstream() {
        let result: std::result::Result<(), rusqlite::Error> =
            Err(rusqlite::Error::QueryReturnedNoRows);
        let err = result.db_context("Failed to load ticket").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Upstream);
        assert!(err.to_string().contains("Failed to load ticket"));
    }

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::NotFound.to_string(), "not_found");
        assert_eq!(ErrorKind::Upstream.to_string(), "upstream");
    }
}
