use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{
    CatalogCommands, CompanyCommands, ConductCommands, ConsumeCommands, ModuleCommands,
    ParticipantCommands, TicketCommands,
};

/// Recurring survey administration and answering from the command line
///
/// Author modules, schedule catalogs of survey waves, publish them to a
/// company's participants and collect answers. Queued work (ticket creation,
/// wave state changes) is processed with the `consume` commands.
#[derive(Parser)]
#[command(version, about, name = "slsurvey")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/slsurvey/slsurvey.db
    #[arg(long, global = true, env = "SLSURVEY_DATABASE_FILE")]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage companies
    Company {
        #[command(subcommand)]
        command: CompanyCommands,
    },
    /// Manage a company's participants
    #[command(alias = "p")]
    Participant {
        #[command(subcommand)]
        command: ParticipantCommands,
    },
    /// Author survey modules and their questions
    #[command(alias = "m")]
    Module {
        #[command(subcommand)]
        command: ModuleCommands,
    },
    /// Assemble, schedule and publish catalogs
    #[command(alias = "c")]
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
    /// Inspect participant tickets
    #[command(alias = "t")]
    Ticket {
        #[command(subcommand)]
        command: TicketCommands,
    },
    /// Answer and submit survey waves
    Conduct {
        #[command(subcommand)]
        command: ConductCommands,
    },
    /// Process queued work
    Consume {
        #[command(subcommand)]
        command: ConsumeCommands,
    },
}
