//! slsurvey command-line application.

mod args;
mod cli;
mod handlers;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use handlers::Cli;
use log::info;
use renderer::TerminalRenderer;
use survey_core::{params::ListCatalogs, SurveyEngineBuilder};
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        command,
    } = Args::parse();

    let mut builder = SurveyEngineBuilder::new();
    if let Some(path) = database_file {
        builder = builder.with_database_path(path);
    }
    let engine = builder
        .build()
        .await
        .context("Failed to initialize survey engine")?;

    let cli = Cli::new(engine, TerminalRenderer::new(!no_color));

    info!("slsurvey started");

    match command {
        Some(Company { command }) => cli.handle_company_command(command).await,
        Some(Participant { command }) => cli.handle_participant_command(command).await,
        Some(Module { command }) => cli.handle_module_command(command).await,
        Some(Catalog { command }) => cli.handle_catalog_command(command).await,
        Some(Ticket { command }) => cli.handle_ticket_command(command).await,
        Some(Conduct { command }) => cli.handle_conduct_command(command).await,
        Some(Consume { command }) => cli.handle_consume_command(command).await,
        None => cli.list_catalogs(&ListCatalogs::default()).await,
    }
}
