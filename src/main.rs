use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "questline")]
#[command(about = "Player progression and reward ledger")]
#[command(version)]
struct Cli {
    /// Path to the ledger database (defaults to ~/.questline/ledger.db)
    #[arg(short, long, global = true)]
    db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the ledger with demo players, levels, boosts and prizes
    Seed {
        /// Number of demo players to create
        #[arg(long, default_value_t = 50)]
        players: usize,

        /// Number of levels (one prize is attached to each)
        #[arg(long, default_value_t = 10)]
        levels: usize,
    },

    /// Show one player's points, boosts, levels and prizes
    Show {
        /// Player id to display
        player_id: String,
    },

    /// Export player level progress to a CSV file
    Export {
        /// Output file path
        #[arg(short, long, default_value = "player_levels_export.csv")]
        out: PathBuf,
    },

    /// Delete all ledger data, keeping the schema
    Reset,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let ledger = match cli.db {
        Some(path) => questline::LedgerManager::with_path(&path)?,
        None => questline::LedgerManager::new()?,
    };

    match cli.command {
        Commands::Seed { players, levels } => {
            cli::seed::seed_command(&ledger, players, levels)?;
        }
        Commands::Show { player_id } => {
            cli::show::show_command(&ledger, &player_id)?;
        }
        Commands::Export { out } => {
            cli::export::export_command(&ledger, &out)?;
        }
        Commands::Reset => {
            ledger.reset_all()?;
            println!("Ledger reset.");
        }
    }

    Ok(())
}
