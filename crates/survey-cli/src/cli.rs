//! Command-line argument definitions.
//!
//! Every subcommand has a clap `Args` struct that converts into the matching
//! core parameter type, so the engine never sees clap types:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → SurveyEngine
//! ```
//!
//! Structured inputs (keyboards, schedule settings, answers) are JSON. They
//! can be passed inline or read from a file with a leading `@`.

use std::{fs, path::Path};

use clap::{Args, Subcommand, ValueEnum};
use jiff::Timestamp;
use survey_core::{
    models::{CatalogSettings, Keyboard, LocalizedText, PlanType},
    params::*,
};
use uuid::Uuid;

/// Reads a JSON argument, inline or from `@path`.
pub fn parse_json_arg<T: serde::de::DeserializeOwned>(raw: &str) -> anyhow::Result<T> {
    use anyhow::Context;

    let text = match raw.strip_prefix('@') {
        Some(path) => fs::read_to_string(Path::new(path))
            .with_context(|| format!("Failed to read {path}"))?,
        None => raw.to_string(),
    };
    serde_json::from_str(&text).context("Invalid JSON argument")
}

/// Parses `lang=text` pairs such as `de=Wie geht es dir?`.
fn parse_localized(raw: &str) -> Result<LocalizedText, String> {
    let (language, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected LANG=TEXT, got '{raw}'"))?;
    let language = language.trim();
    if language.is_empty() {
        return Err(format!("missing language in '{raw}'"));
    }
    Ok(LocalizedText::new(language, value))
}

// ============================================================================
// Companies and participants
// ============================================================================

#[derive(Args)]
pub struct CreateCompanyArgs {
    /// Display name of the company
    pub name: String,
}

impl From<CreateCompanyArgs> for CreateCompany {
    fn from(val: CreateCompanyArgs) -> Self {
        CreateCompany { name: val.name }
    }
}

#[derive(Args)]
pub struct ShowArgs {
    /// ID of the resource
    pub id: Uuid,
}

impl From<ShowArgs> for Id {
    fn from(val: ShowArgs) -> Self {
        Id { id: val.id }
    }
}

#[derive(Subcommand)]
pub enum CompanyCommands {
    /// Create a company
    #[command(alias = "c")]
    Create(CreateCompanyArgs),
    /// Show a company
    #[command(alias = "s")]
    Show(ShowArgs),
}

#[derive(Args)]
pub struct AddParticipantArgs {
    /// Company the participant belongs to
    pub company_id: Uuid,
    /// Email address, also used to look up tickets
    pub email: String,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    /// Preferred language code
    #[arg(long)]
    pub language: Option<String>,
}

impl From<AddParticipantArgs> for AddParticipant {
    fn from(val: AddParticipantArgs) -> Self {
        AddParticipant {
            company_id: val.company_id,
            email: val.email,
            first_name: val.first_name,
            last_name: val.last_name,
            language: val.language,
        }
    }
}

#[derive(Args)]
pub struct ListParticipantsArgs {
    pub company_id: Uuid,
    /// Hide deactivated participants
    #[arg(long)]
    pub active_only: bool,
}

impl From<ListParticipantsArgs> for ListParticipants {
    fn from(val: ListParticipantsArgs) -> Self {
        ListParticipants {
            company_id: val.company_id,
            active_only: val.active_only,
        }
    }
}

#[derive(Subcommand)]
pub enum ParticipantCommands {
    /// Add a participant to a company
    #[command(alias = "a")]
    Add(AddParticipantArgs),
    /// List a company's participants
    #[command(aliases = ["l", "ls"])]
    List(ListParticipantsArgs),
}

// ============================================================================
// Modules
// ============================================================================

#[derive(Args)]
pub struct CreateModuleArgs {
    pub company_id: Uuid,
    pub name: String,
    #[arg(short, long)]
    pub description: Option<String>,
}

impl From<CreateModuleArgs> for CreateModule {
    fn from(val: CreateModuleArgs) -> Self {
        CreateModule {
            company_id: val.company_id,
            name: val.name,
            description: val.description,
        }
    }
}

/// Add a question to a draft module
#[derive(Args)]
pub struct AddQuestionArgs {
    pub module_id: Uuid,
    /// Export identifier, unique across all modules
    pub spss_id: String,
    /// Question text as LANG=TEXT, repeatable
    #[arg(long = "text", required = true, value_parser = parse_localized)]
    pub text: Vec<LocalizedText>,
    /// Keyboard definition as JSON, or @FILE
    #[arg(long)]
    pub keyboard: String,
    /// Position within the module
    #[arg(long, default_value_t = 0)]
    pub sort_index: i32,
    /// Expected answering time in seconds
    #[arg(long, default_value_t = 10.0)]
    pub estimated_duration: f32,
}

impl AddQuestionArgs {
    pub fn into_params(self) -> anyhow::Result<AddQuestion> {
        let keyboard: Keyboard = parse_json_arg(&self.keyboard)?;
        Ok(AddQuestion {
            module_id: self.module_id,
            spss_id: self.spss_id,
            text: self.text,
            keyboard,
            sort_index: self.sort_index,
            estimated_duration: self.estimated_duration,
        })
    }
}

#[derive(Subcommand)]
pub enum ModuleCommands {
    /// Create a draft module
    #[command(alias = "c")]
    Create(CreateModuleArgs),
    /// Add a question to a draft module
    #[command(alias = "q")]
    AddQuestion(AddQuestionArgs),
    /// Publish a module so catalogs can use it
    #[command(alias = "p")]
    Publish(ShowArgs),
    /// Show a module with its questions
    #[command(alias = "s")]
    Show(ShowArgs),
}

// ============================================================================
// Catalogs
// ============================================================================

#[derive(Args)]
pub struct CreateCatalogArgs {
    pub company_id: Uuid,
    pub name: String,
}

impl From<CreateCatalogArgs> for CreateCatalog {
    fn from(val: CreateCatalogArgs) -> Self {
        CreateCatalog {
            company_id: val.company_id,
            name: val.name,
        }
    }
}

#[derive(Args)]
pub struct ListCatalogsArgs {
    /// Only catalogs of this company
    #[arg(long)]
    pub company: Option<Uuid>,
    /// Only draft catalogs
    #[arg(long, conflicts_with = "published")]
    pub drafts: bool,
    /// Only published catalogs
    #[arg(long)]
    pub published: bool,
}

impl From<ListCatalogsArgs> for ListCatalogs {
    fn from(val: ListCatalogsArgs) -> Self {
        ListCatalogs {
            company_id: val.company,
            drafts: val.drafts,
            published: val.published,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum PlanTypeArg {
    /// The opening wave
    Base,
    /// The weekly waves
    Recurring,
    /// The closing wave
    End,
}

impl std::fmt::Display for PlanTypeArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanTypeArg::Base => write!(f, "base"),
            PlanTypeArg::Recurring => write!(f, "recurring"),
            PlanTypeArg::End => write!(f, "end"),
        }
    }
}

impl From<PlanTypeArg> for PlanType {
    fn from(val: PlanTypeArg) -> Self {
        match val {
            PlanTypeArg::Base => PlanType::Base,
            PlanTypeArg::Recurring => PlanType::Recurring,
            PlanTypeArg::End => PlanType::End,
        }
    }
}

#[derive(Args)]
pub struct AssignModulesArgs {
    pub catalog_id: Uuid,
    /// Phase to assign the modules to
    #[arg(value_enum)]
    pub plan_type: PlanTypeArg,
    /// Published modules in presentation order
    #[arg(required = true)]
    pub module_ids: Vec<Uuid>,
}

impl From<AssignModulesArgs> for AssignModules {
    fn from(val: AssignModulesArgs) -> Self {
        AssignModules {
            catalog_id: val.catalog_id,
            plan_type: val.plan_type.into(),
            module_ids: val.module_ids,
        }
    }
}

#[derive(Args)]
pub struct ApplySettingsArgs {
    pub catalog_id: Uuid,
    /// Schedule settings as JSON, or @FILE
    pub settings: String,
}

impl ApplySettingsArgs {
    pub fn into_params(self) -> anyhow::Result<ApplySettings> {
        let settings: CatalogSettings = parse_json_arg(&self.settings)?;
        Ok(ApplySettings {
            catalog_id: self.catalog_id,
            settings,
        })
    }
}

#[derive(Args)]
pub struct EmailTemplateArgs {
    pub catalog_id: Uuid,
    /// Template to link; omit to unlink
    pub template_id: Option<Uuid>,
}

impl From<EmailTemplateArgs> for SetEmailTemplate {
    fn from(val: EmailTemplateArgs) -> Self {
        SetEmailTemplate {
            catalog_id: val.catalog_id,
            template_id: val.template_id,
        }
    }
}

#[derive(Args)]
pub struct SweepArgs {
    pub catalog_id: Uuid,
    /// Evaluate windows at this RFC 3339 instant instead of now
    #[arg(long)]
    pub at: Option<Timestamp>,
    /// Print the desired todo states without queueing a change
    #[arg(long)]
    pub dry_run: bool,
}

impl From<&SweepArgs> for SweepCatalog {
    fn from(val: &SweepArgs) -> Self {
        SweepCatalog {
            catalog_id: val.catalog_id,
            at: val.at,
        }
    }
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// Create a draft catalog
    #[command(alias = "c")]
    Create(CreateCatalogArgs),
    /// List catalogs
    #[command(aliases = ["l", "ls"])]
    List(ListCatalogsArgs),
    /// Show a catalog with its waves
    #[command(alias = "s")]
    Show(ShowArgs),
    /// Assign modules to one phase of a draft catalog
    #[command(alias = "a")]
    Assign(AssignModulesArgs),
    /// Apply schedule settings to a draft catalog
    Settings(ApplySettingsArgs),
    /// Link or unlink the notification email template
    EmailTemplate(EmailTemplateArgs),
    /// Publish a catalog and queue one ticket per active participant
    #[command(alias = "p")]
    Publish(ShowArgs),
    /// Enable every ticket of a published catalog
    Activate(ShowArgs),
    /// Disable every ticket and close the catalog
    Deactivate(ShowArgs),
    /// Queue a todo state update for the current time
    Sweep(SweepArgs),
    /// Delete an inactive catalog and its tickets
    #[command(alias = "d")]
    Delete(ShowArgs),
}

// ============================================================================
// Tickets
// ============================================================================

#[derive(Args)]
pub struct FindTicketArgs {
    /// Six character credential
    pub auth_code: String,
    /// Email of the participant, compared case-insensitively
    #[arg(long)]
    pub email: Option<String>,
}

impl From<FindTicketArgs> for FindTicket {
    fn from(val: FindTicketArgs) -> Self {
        FindTicket {
            auth_code: val.auth_code,
            email: val.email,
        }
    }
}

#[derive(Args)]
pub struct NotificationSentArgs {
    /// ID of the ticket
    pub ticket_id: Uuid,
    /// ID of the delivered plan notification
    pub notification_id: Uuid,
}

impl From<NotificationSentArgs> for RecordNotification {
    fn from(val: NotificationSentArgs) -> Self {
        RecordNotification {
            ticket_id: val.ticket_id,
            notification_id: val.notification_id,
        }
    }
}

#[derive(Subcommand)]
pub enum TicketCommands {
    /// List the tickets of a catalog
    #[command(aliases = ["l", "ls"])]
    List(ShowArgs),
    /// Show a ticket with its current todo states
    #[command(alias = "s")]
    Show(ShowArgs),
    /// Look up an active ticket by credential
    #[command(alias = "f")]
    Find(FindTicketArgs),
    /// Enable a single ticket
    Activate(ShowArgs),
    /// Record that a notification reached the ticket's participant
    NotificationSent(NotificationSentArgs),
}

// ============================================================================
// Answering
// ============================================================================

#[derive(Args)]
pub struct TodoArgs {
    pub ticket_id: Uuid,
    pub todo_id: Uuid,
}

impl From<TodoArgs> for TodoRef {
    fn from(val: TodoArgs) -> Self {
        TodoRef {
            ticket_id: val.ticket_id,
            todo_id: val.todo_id,
        }
    }
}

#[derive(Args)]
pub struct AnswerArgs {
    pub ticket_id: Uuid,
    pub todo_id: Uuid,
    /// Answers as a JSON array of {question_id, answer, measured_duration},
    /// or @FILE
    pub answers: String,
    /// Submit the todo in the same step
    #[arg(long)]
    pub submit: bool,
    /// Identifier of the answering application
    #[arg(long, env = "SLSURVEY_CLIENT_ID")]
    pub client_id: Option<String>,
}

impl AnswerArgs {
    pub fn into_params(self) -> anyhow::Result<AnswerQuestions> {
        let answers: Vec<AnswerQuestion> = parse_json_arg(&self.answers)?;
        Ok(AnswerQuestions {
            ticket_id: self.ticket_id,
            todo_id: self.todo_id,
            answers,
            client_id: self.client_id,
        })
    }
}

#[derive(Args)]
pub struct SubmitArgs {
    pub ticket_id: Uuid,
    pub todo_id: Uuid,
    #[arg(long, env = "SLSURVEY_CLIENT_ID")]
    pub client_id: Option<String>,
}

impl From<SubmitArgs> for SubmitTodo {
    fn from(val: SubmitArgs) -> Self {
        SubmitTodo {
            ticket_id: val.ticket_id,
            todo_id: val.todo_id,
            client_id: val.client_id,
        }
    }
}

#[derive(Subcommand)]
pub enum ConductCommands {
    /// Record answers into an active wave
    #[command(alias = "a")]
    Answer(AnswerArgs),
    /// Submit a fully answered wave
    #[command(alias = "s")]
    Submit(SubmitArgs),
    /// Show the answered questions of a wave
    Answered(TodoArgs),
}

// ============================================================================
// Queues
// ============================================================================

#[derive(Args)]
pub struct ConsumeArgs {
    /// Maximum number of messages to process
    #[arg(long, default_value_t = Consume::default().limit)]
    pub limit: usize,
}

impl From<ConsumeArgs> for Consume {
    fn from(val: ConsumeArgs) -> Self {
        Consume { limit: val.limit }
    }
}

#[derive(Subcommand)]
pub enum ConsumeCommands {
    /// Create queued tickets
    Tickets(ConsumeArgs),
    /// Apply queued todo state changes
    States(ConsumeArgs),
}
