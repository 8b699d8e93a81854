//! Parameter structures for engine operations.
//!
//! These structures are shared by every interface that drives the engine.
//! They carry no framework-specific derives; interface layers define their
//! own argument structs (clap, HTTP bodies) and convert into these via
//! `From`/`Into`.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │  Core Params    │    │  SurveyEngine   │
//! │  (clap derives) │───▶│ (serde derives) │───▶│   operations    │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! Parameters that need checking before they reach the store expose a
//! `validate()` method returning the cleaned value.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{Result, SurveyError},
    models::{CatalogSettings, Keyboard, LocalizedText, PlanType},
};

/// Generic parameters for operations requiring just an ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Id {
    /// The ID of the resource to operate on
    pub id: Uuid,
}

/// Parameters for creating a company.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCompany {
    pub name: String,
}

impl CreateCompany {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SurveyError::invalid_input("name").with_reason("Company name cannot be empty"));
        }
        Ok(())
    }
}

/// Parameters for adding a participant to a company.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddParticipant {
    pub company_id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Defaults to [`crate::models::DEFAULT_LANGUAGE`]
    pub language: Option<String>,
}

impl AddParticipant {
    /// Validates the email and returns it trimmed.
    pub fn validate(&self) -> Result<String> {
        let email = self.email.trim();
        let valid = email
            .split_once('@')
            .is_some_and(|(local, domain)| {
                !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
                    && !domain.ends_with('.')
            });
        if !valid {
            return Err(SurveyError::invalid_input("email")
                .with_reason(format!("'{email}' is not an email address")));
        }
        Ok(email.to_string())
    }
}

/// Parameters for listing a company's participants.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListParticipants {
    pub company_id: Uuid,
    /// Skip participants that were deactivated
    pub active_only: bool,
}

/// Parameters for creating a survey module.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateModule {
    pub company_id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

impl CreateModule {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SurveyError::invalid_input("name").with_reason("Module name cannot be empty"));
        }
        Ok(())
    }
}

/// Parameters for adding a question to a draft module.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddQuestion {
    pub module_id: Uuid,
    pub spss_id: String,
    pub text: Vec<LocalizedText>,
    pub keyboard: Keyboard,
    pub sort_index: i32,
    pub estimated_duration: f32,
}

/// Parameters for creating a draft catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCatalog {
    pub company_id: Uuid,
    pub name: String,
}

impl CreateCatalog {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SurveyError::invalid_input("name").with_reason("Catalog name cannot be empty"));
        }
        Ok(())
    }
}

/// Parameters for listing catalogs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListCatalogs {
    pub company_id: Option<Uuid>,
    /// Only catalogs still in draft
    pub drafts: bool,
    /// Only published catalogs
    pub published: bool,
}

/// Parameters for assigning modules to one phase of a catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignModules {
    pub catalog_id: Uuid,
    pub plan_type: PlanType,
    /// Modules in presentation order
    pub module_ids: Vec<Uuid>,
}

/// Parameters for applying schedule settings to a catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplySettings {
    pub catalog_id: Uuid,
    pub settings: CatalogSettings,
}

/// Parameters for linking an email template to a catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetEmailTemplate {
    pub catalog_id: Uuid,
    /// `None` unlinks the current template
    pub template_id: Option<Uuid>,
}

/// Parameters for enabling or disabling all tickets of a catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetTicketsActive {
    pub catalog_id: Uuid,
    pub active: bool,
}

/// Parameters for looking up a ticket by its credential.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FindTicket {
    pub auth_code: String,
    /// When given, must match the participant's email
    pub email: Option<String>,
}

/// Addresses one todo of one ticket.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodoRef {
    pub ticket_id: Uuid,
    pub todo_id: Uuid,
}

/// Records that a plan notification reached a ticket's participant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordNotification {
    pub ticket_id: Uuid,
    pub notification_id: Uuid,
}

/// One raw answer as submitted by a client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerQuestion {
    pub question_id: Option<String>,
    pub answer: Option<String>,
    /// Seconds spent on the question
    #[serde(default)]
    pub measured_duration: f32,
}

impl AnswerQuestion {
    /// Checks the answer shape and returns the parsed question id.
    pub fn validate(&self) -> Result<Uuid> {
        let raw_id = self
            .question_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                SurveyError::invalid_input("question_id").with_reason("Question id is required")
            })?;
        let question_id = Uuid::parse_str(raw_id).map_err(|e| {
            SurveyError::invalid_input("question_id").with_reason(format!("'{raw_id}': {e}"))
        })?;

        if self.answer.is_none() {
            return Err(SurveyError::invalid_input("answer")
                .with_reason(format!("Answer for question {question_id} is missing")));
        }
        if !self.measured_duration.is_finite() || self.measured_duration < 0.0 {
            return Err(SurveyError::invalid_input("measured_duration")
                .with_reason("Duration must be a non-negative number"));
        }
        Ok(question_id)
    }
}

/// Parameters for recording answers into an active todo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerQuestions {
    pub ticket_id: Uuid,
    pub todo_id: Uuid,
    pub answers: Vec<AnswerQuestion>,
    /// Application identifier of the answering client
    pub client_id: Option<String>,
}

/// Parameters for submitting an active todo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitTodo {
    pub ticket_id: Uuid,
    pub todo_id: Uuid,
    pub client_id: Option<String>,
}

/// Parameters for a catalog state sweep.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SweepCatalog {
    pub catalog_id: Uuid,
    /// Instant to evaluate the wave windows at, defaults to now
    pub at: Option<Timestamp>,
}

/// Parameters for draining a queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Consume {
    /// Maximum number of deliveries to process
    pub limit: usize,
}

impl Default for Consume {
    fn default() -> Self {
        Self { limit: 100 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_validation() {
        let id = Uuid::new_v4();
        let valid = AnswerQuestion {
            question_id: Some(id.to_string()),
            answer: Some(String::new()),
            measured_duration: 0.5,
        };
        assert_eq!(valid.validate().unwrap(), id);

        let missing_id = AnswerQuestion {
            question_id: None,
            ..valid.clone()
        };
        assert!(missing_id.validate().is_err());

        let bad_id = AnswerQuestion {
            question_id: Some("not-a-uuid".to_string()),
            ..valid.clone()
        };
        assert!(bad_id.validate().is_err());

        let missing_answer = AnswerQuestion {
            answer: None,
            ..valid.clone()
        };
        assert!(missing_answer.validate().is_err());

        let negative = AnswerQuestion {
            measured_duration: -1.0,
            ..valid.clone()
        };
        assert!(negative.validate().is_err());

        let nan = AnswerQuestion {
            measured_duration: f32::NAN,
            ..valid
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_participant_email_validation() {
        let mut params = AddParticipant {
            email: " jane@example.com ".to_string(),
            ..Default::default()
        };
        assert_eq!(params.validate().unwrap(), "jane@example.com");

        for bad in ["jane", "@example.com", "jane@example", "jane@.com"] {
            params.email = bad.to_string();
            assert!(params.validate().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_names_cannot_be_blank() {
        assert!(CreateCompany { name: "  ".into() }.validate().is_err());
        assert!(CreateCatalog {
            company_id: Uuid::nil(),
            name: String::new()
        }
        .validate()
        .is_err());
        assert!(CreateModule {
            name: "Mood".into(),
            ..Default::default()
        }
        .validate()
        .is_ok());
    }
}
