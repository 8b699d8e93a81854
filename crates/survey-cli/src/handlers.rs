//! Command handlers: run an engine operation, render its markdown.

use anyhow::{Context, Result};
use survey_core::{
    display::{Participants, Questions},
    params::{ListCatalogs, SetTicketsActive, SweepCatalog},
    CreateResult, DeleteResult, OperationStatus, SurveyEngine, UpdateResult,
};

use crate::{
    cli::{
        CatalogCommands, CompanyCommands, ConductCommands, ConsumeCommands, ModuleCommands,
        ParticipantCommands, SweepArgs, TicketCommands,
    },
    renderer::TerminalRenderer,
};

pub struct Cli {
    engine: SurveyEngine,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(engine: SurveyEngine, renderer: TerminalRenderer) -> Self {
        Self { engine, renderer }
    }

    fn show(&self, value: impl std::fmt::Display) -> Result<()> {
        self.renderer.render(&value.to_string())
    }

    pub async fn handle_company_command(&self, command: CompanyCommands) -> Result<()> {
        match command {
            CompanyCommands::Create(args) => {
                let company = self
                    .engine
                    .create_company(&args.into())
                    .await
                    .context("Failed to create company")?;
                self.show(CreateResult::new(company))
            }
            CompanyCommands::Show(args) => {
                let id = args.id;
                match self.engine.get_company(&args.into()).await? {
                    Some(company) => self.show(company),
                    None => self.show(OperationStatus::failure(format!(
                        "Company with ID {id} not found."
                    ))),
                }
            }
        }
    }

    pub async fn handle_participant_command(&self, command: ParticipantCommands) -> Result<()> {
        match command {
            ParticipantCommands::Add(args) => {
                let participant = self
                    .engine
                    .add_participant(&args.into())
                    .await
                    .context("Failed to add participant")?;
                self.show(CreateResult::new(participant))
            }
            ParticipantCommands::List(args) => {
                let participants = self.engine.list_participants(&args.into()).await?;
                self.show(Participants(participants))
            }
        }
    }

    pub async fn handle_module_command(&self, command: ModuleCommands) -> Result<()> {
        match command {
            ModuleCommands::Create(args) => {
                let module = self
                    .engine
                    .create_module(&args.into())
                    .await
                    .context("Failed to create module")?;
                self.show(CreateResult::new(module))
            }
            ModuleCommands::AddQuestion(args) => {
                let spss_id = args.spss_id.clone();
                let module = self
                    .engine
                    .add_question(&args.into_params()?)
                    .await
                    .with_context(|| format!("Failed to add question {spss_id}"))?;
                self.show(UpdateResult::with_changes(
                    module,
                    vec![format!("Added question {spss_id}")],
                ))
            }
            ModuleCommands::Publish(args) => {
                let module = self.engine.publish_module(&args.into()).await?;
                self.show(UpdateResult::with_changes(
                    module,
                    vec!["Published".to_string()],
                ))
            }
            ModuleCommands::Show(args) => {
                let id = args.id;
                match self.engine.get_module(&args.into()).await? {
                    Some(module) => self.show(module),
                    None => self.show(OperationStatus::failure(format!(
                        "Module with ID {id} not found."
                    ))),
                }
            }
        }
    }

    pub async fn handle_catalog_command(&self, command: CatalogCommands) -> Result<()> {
        match command {
            CatalogCommands::Create(args) => {
                let catalog = self
                    .engine
                    .create_catalog(&args.into())
                    .await
                    .context("Failed to create catalog")?;
                self.show(CreateResult::new(catalog))
            }
            CatalogCommands::List(args) => self.list_catalogs(&args.into()).await,
            CatalogCommands::Show(args) => {
                let id = args.id;
                match self.engine.get_catalog(&args.into()).await? {
                    Some(catalog) => self.show(catalog),
                    None => self.show(OperationStatus::failure(format!(
                        "Catalog with ID {id} not found."
                    ))),
                }
            }
            CatalogCommands::Assign(args) => {
                let change = format!(
                    "Assigned {} module(s) to {}",
                    args.module_ids.len(),
                    args.plan_type
                );
                let catalog = self.engine.assign_modules(&args.into()).await?;
                self.show(UpdateResult::with_changes(catalog, vec![change]))
            }
            CatalogCommands::Settings(args) => {
                let catalog = self.engine.apply_settings(&args.into_params()?).await?;
                self.show(UpdateResult::with_changes(
                    catalog,
                    vec!["Applied schedule settings".to_string()],
                ))
            }
            CatalogCommands::EmailTemplate(args) => {
                let catalog = self.engine.set_email_template(&args.into()).await?;
                self.show(UpdateResult::new(catalog))
            }
            CatalogCommands::Publish(args) => {
                let outcome = self
                    .engine
                    .publish_catalog(&args.into())
                    .await
                    .context("Failed to publish catalog")?;
                self.show(outcome)
            }
            CatalogCommands::Activate(args) => self.set_tickets_active(args.id, true).await,
            CatalogCommands::Deactivate(args) => self.set_tickets_active(args.id, false).await,
            CatalogCommands::Sweep(args) => self.sweep(&args).await,
            CatalogCommands::Delete(args) => {
                let catalog = self.engine.delete_catalog(&args.into()).await?;
                self.show(DeleteResult::new(catalog))
            }
        }
    }

    pub async fn list_catalogs(&self, params: &ListCatalogs) -> Result<()> {
        let summaries = self.engine.list_catalogs_summary(params).await?;
        self.show(summaries)
    }

    async fn set_tickets_active(&self, catalog_id: uuid::Uuid, active: bool) -> Result<()> {
        let changed = self
            .engine
            .set_catalog_tickets_active(&SetTicketsActive { catalog_id, active })
            .await?;
        let verb = if active { "Activated" } else { "Deactivated" };
        self.show(OperationStatus::success(format!(
            "{verb} {changed} ticket(s) of catalog {catalog_id}."
        )))
    }

    async fn sweep(&self, args: &SweepArgs) -> Result<()> {
        if args.dry_run {
            let at = args.at.unwrap_or_else(jiff::Timestamp::now);
            let states = self
                .engine
                .desired_todo_states(args.catalog_id, at)
                .await?;
            let mut output = format!("## Desired states at {at}\n\n");
            for entry in &states {
                output.push_str(&format!("- {}: {}\n", entry.todo_id, entry.state.with_icon()));
            }
            return self.renderer.render(&output);
        }

        let message = self.engine.sweep_catalog(&SweepCatalog::from(args)).await?;
        self.show(message)
    }

    pub async fn handle_ticket_command(&self, command: TicketCommands) -> Result<()> {
        match command {
            TicketCommands::List(args) => {
                let tickets = self.engine.list_tickets_summary(&args.into()).await?;
                self.show(tickets)
            }
            TicketCommands::Show(args) => {
                let ticket = self.engine.show_ticket(&args.into()).await?;
                self.show(ticket)
            }
            TicketCommands::Find(args) => {
                let ticket = self.engine.find_ticket_by_auth_code(&args.into()).await?;
                self.show(ticket)
            }
            TicketCommands::Activate(args) => {
                let id = args.id;
                self.engine.activate_ticket(&args.into()).await?;
                self.show(OperationStatus::success(format!("Activated ticket {id}.")))
            }
            TicketCommands::NotificationSent(args) => {
                let notification_id = args.notification_id;
                let ticket = self
                    .engine
                    .record_notification_sent(&args.into())
                    .await
                    .context("Failed to record notification")?;
                self.show(OperationStatus::success(format!(
                    "Recorded notification {notification_id} on ticket {}.",
                    ticket.id
                )))
            }
        }
    }

    pub async fn handle_conduct_command(&self, command: ConductCommands) -> Result<()> {
        match command {
            ConductCommands::Answer(args) => {
                let submit = args.submit;
                let params = args.into_params()?;
                let count = params.answers.len();
                let todo = if submit {
                    self.engine.submit_answers(&params).await?
                } else {
                    self.engine.answer_questions(&params).await?
                };
                let mut changes = vec![format!("Recorded {count} answer(s)")];
                if submit {
                    changes.push("Submitted".to_string());
                }
                self.show(UpdateResult::with_changes(todo, changes))
            }
            ConductCommands::Submit(args) => {
                let todo = self.engine.submit_todo(&args.into()).await?;
                self.show(UpdateResult::with_changes(
                    todo,
                    vec!["Submitted".to_string()],
                ))
            }
            ConductCommands::Answered(args) => {
                let questions = self.engine.answered_questions(&args.into()).await?;
                self.show(Questions(questions))
            }
        }
    }

    pub async fn handle_consume_command(&self, command: ConsumeCommands) -> Result<()> {
        let report = match command {
            ConsumeCommands::Tickets(args) => {
                self.engine.consume_ticket_creations(&args.into()).await?
            }
            ConsumeCommands::States(args) => self.engine.consume_state_changes(&args.into()).await?,
        };
        self.show(report)
    }
}
