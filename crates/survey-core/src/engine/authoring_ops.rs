//! Company, participant and module authoring.

use jiff::Timestamp;
use uuid::Uuid;

use super::SurveyEngine;
use crate::{
    error::{Result, SurveyError},
    models::{Company, Participant, Question, SurveyModule, DEFAULT_LANGUAGE},
    params::{AddParticipant, AddQuestion, CreateCompany, CreateModule, Id, ListParticipants},
};

impl SurveyEngine {
    /// Creates a company.
    pub async fn create_company(&self, params: &CreateCompany) -> Result<Company> {
        params.validate()?;
        let now = Timestamp::now();
        let company = Company {
            id: Uuid::new_v4(),
            name: params.name.trim().to_string(),
            created_at: now,
            updated_at: now,
        };

        self.with_database(move |db| {
            db.save_company(&company)?;
            Ok(company)
        })
        .await
    }

    /// Retrieves a company by its ID.
    pub async fn get_company(&self, params: &Id) -> Result<Option<Company>> {
        let id = params.id;
        self.with_database(move |db| db.get_company(id)).await
    }

    /// Adds an active participant to a company.
    pub async fn add_participant(&self, params: &AddParticipant) -> Result<Participant> {
        let email = params.validate()?;
        let now = Timestamp::now();
        let participant = Participant {
            id: Uuid::new_v4(),
            company_id: params.company_id,
            email,
            first_name: params.first_name.clone(),
            last_name: params.last_name.clone(),
            language: params
                .language
                .clone()
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        self.with_database(move |db| {
            if db.get_company(participant.company_id)?.is_none() {
                return Err(SurveyError::CompanyNotFound {
                    id: participant.company_id,
                });
            }
            db.save_participant(&participant)?;
            Ok(participant)
        })
        .await
    }

    /// Lists the participants of a company.
    pub async fn list_participants(&self, params: &ListParticipants) -> Result<Vec<Participant>> {
        let (company_id, active_only) = (params.company_id, params.active_only);
        self.with_database(move |db| db.list_participants(company_id, active_only))
            .await
    }

    /// Creates an empty draft module.
    pub async fn create_module(&self, params: &CreateModule) -> Result<SurveyModule> {
        params.validate()?;
        let now = Timestamp::now();
        let module = SurveyModule {
            id: Uuid::new_v4(),
            company_id: params.company_id,
            name: params.name.trim().to_string(),
            description: params.description.clone(),
            questions: Vec::new(),
            estimated_duration: 0.0,
            is_draft: true,
            created_at: now,
            updated_at: now,
        };

        self.with_database(move |db| {
            if db.get_company(module.company_id)?.is_none() {
                return Err(SurveyError::CompanyNotFound {
                    id: module.company_id,
                });
            }
            db.save_module(&module)?;
            Ok(module)
        })
        .await
    }

    /// Adds a validated question to a draft module.
    ///
    /// The SPSS id must not be used by any other question.
    pub async fn add_question(&self, params: &AddQuestion) -> Result<SurveyModule> {
        let question = Question {
            id: Uuid::new_v4(),
            spss_id: params.spss_id.trim().to_string(),
            text: params.text.clone(),
            keyboard: params.keyboard.clone(),
            sort_index: params.sort_index,
            estimated_duration: params.estimated_duration,
            measured_duration: 0.0,
            answer: None,
            answered_at: None,
            application_identifier: None,
        };
        question.validate()?;
        let module_id = params.module_id;

        self.with_database(move |db| {
            let mut module = db
                .get_module(module_id)?
                .ok_or(SurveyError::ModuleNotFound { id: module_id })?;
            if !module.is_draft {
                return Err(SurveyError::invalid_input("module_id")
                    .with_reason("questions can only be added to draft modules"));
            }
            module.insert_question(question.clone());
            module.updated_at = Timestamp::now();
            db.save_module_with_question(&module, &question)?;
            Ok(module)
        })
        .await
    }

    /// Releases a draft module for use in catalogs.
    pub async fn publish_module(&self, params: &Id) -> Result<SurveyModule> {
        let module_id = params.id;
        self.with_database(move |db| {
            let mut module = db
                .get_module(module_id)?
                .ok_or(SurveyError::ModuleNotFound { id: module_id })?;
            if module.questions.is_empty() {
                return Err(SurveyError::invalid_input("module_id")
                    .with_reason("a module needs at least one question"));
            }
            if module.is_draft {
                module.is_draft = false;
                module.updated_at = Timestamp::now();
                db.save_module(&module)?;
                log::info!("Published module {module_id}");
            }
            Ok(module)
        })
        .await
    }

    /// Retrieves a module by its ID.
    pub async fn get_module(&self, params: &Id) -> Result<Option<SurveyModule>> {
        let id = params.id;
        self.with_database(move |db| db.get_module(id)).await
    }
}
