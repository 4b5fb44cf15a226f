//! entreno: command line interface for the Entreno training log.
//!
//! Reads and writes the same JSON data directory as the app
//! (`~/.entreno/data/`), so everything here operates on live user data.
//!
//! ## Subcommands
//!
//! - `types` / `template`: inspect session types and their templates
//! - `sessions`: list, show, and delete saved sessions
//! - `weight`: body weight records
//! - `routines`: list, import, and export routines
//! - `export`: CSV export of a date range
//! - `catalog`: search the built-in exercise catalog
//! - `clear-data`: wipe the data directory

mod commands;
mod logging;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "entreno")]
#[command(about = "Personal strength-training log")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the selectable session types
    Types,

    /// Show the template a session type resolves to
    Template {
        /// Session type name (e.g. Push, Pull, Piernas)
        name: String,
    },

    /// Saved sessions
    Sessions {
        #[command(subcommand)]
        command: SessionCommands,
    },

    /// Body weight records
    Weight {
        #[command(subcommand)]
        command: WeightCommands,
    },

    /// Training routines
    Routines {
        #[command(subcommand)]
        command: RoutineCommands,
    },

    /// Export logged sessions as CSV
    Export {
        /// Start of the date range (YYYY-MM-DD, inclusive)
        #[arg(long)]
        from: String,

        /// End of the date range (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: String,

        /// Output file (defaults to ~/.entreno/exports/)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Search the built-in exercise catalog (accent-insensitive)
    Catalog {
        /// Search text
        query: String,
    },

    /// Delete all stored data
    ClearData {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum SessionCommands {
    /// List all saved sessions
    List,
    /// Show one session in full
    Show { id: String },
    /// Delete a session by id
    Delete { id: String },
}

#[derive(Subcommand)]
enum WeightCommands {
    /// Record a body weight
    Add {
        /// Weight in kilograms
        kg: f64,
        /// Date of the measurement (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
    /// List body weight records, newest first
    List,
    /// Delete a record by id
    Delete { id: String },
}

#[derive(Subcommand)]
enum RoutineCommands {
    /// List routines (seeding the defaults if missing)
    List,
    /// Import a routine from a JSON file
    Import { file: PathBuf },
    /// Export a routine as JSON
    Export {
        id: String,
        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() {
    let _logging_guard = logging::init();
    let cli = Cli::parse();
    let store = commands::open_store();

    let result = match cli.command {
        Commands::Types => commands::types(&store),
        Commands::Template { name } => commands::template(&store, &name),
        Commands::Sessions { command } => match command {
            SessionCommands::List => commands::sessions_list(&store),
            SessionCommands::Show { id } => commands::sessions_show(&store, &id),
            SessionCommands::Delete { id } => commands::sessions_delete(&store, &id),
        },
        Commands::Weight { command } => match command {
            WeightCommands::Add { kg, date } => {
                commands::weight_add(&store, kg, date.as_deref())
            }
            WeightCommands::List => commands::weight_list(&store),
            WeightCommands::Delete { id } => commands::weight_delete(&store, &id),
        },
        Commands::Routines { command } => match command {
            RoutineCommands::List => commands::routines_list(&store),
            RoutineCommands::Import { file } => commands::routines_import(&store, &file),
            RoutineCommands::Export { id, out } => commands::routines_export(&store, &id, out),
        },
        Commands::Export { from, to, out } => commands::export_csv(&store, &from, &to, out),
        Commands::Catalog { query } => commands::catalog_search(&query),
        Commands::ClearData { yes } => commands::clear_data(&store, yes),
    };

    if let Err(message) = result {
        tracing::error!(error = %message, "command failed");
        eprintln!("error: {}", message);
        std::process::exit(1);
    }
}
