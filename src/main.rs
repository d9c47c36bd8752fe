mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use clubledger::config::AppConfig;
use clubledger::utils::ExportFormat;

#[derive(Parser)]
#[command(name = "clubledger")]
#[command(about = "Season, rival and stadium records for one football club")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List loaded seasons with their record
    Seasons,
    /// Results and summary of one season
    Season {
        season: i32,
        /// Also list goal scorers
        #[arg(long)]
        goals: bool,
    },
    /// Head-to-head record against a rival
    Rival { name: String },
    /// Every opponent in the archive
    Rivals,
    /// Stadium markers and per-stadium record for one season
    Stadiums { season: i32 },
    /// Matches under combined filters
    Filter {
        #[command(flatten)]
        filter: cli::FilterArgs,
    },
    /// Write filtered matches to a CSV or JSON file
    Export {
        #[command(flatten)]
        filter: cli::FilterArgs,
        /// csv or json
        #[arg(long, default_value = "csv")]
        format: ExportFormat,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Download season files from OpenLigaDB
    Sync {
        #[arg(long)]
        from: Option<i32>,
        #[arg(long)]
        to: Option<i32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = AppConfig::from_env();

    let cli = Cli::parse();

    if let Some(Commands::Sync { from, to }) = &cli.command {
        return cli::sync(&config, *from, *to).await;
    }

    let archive = cli::open_archive(&config).await?;

    match cli.command {
        Some(Commands::Season { season, goals }) => cli::show_season(&archive, season, goals)?,
        Some(Commands::Rival { name }) => cli::show_rival(&archive, &name)?,
        Some(Commands::Rivals) => cli::show_rivals(&archive)?,
        Some(Commands::Stadiums { season }) => cli::show_stadiums(&archive, season)?,
        Some(Commands::Filter { filter }) => cli::show_filtered(&archive, &filter)?,
        Some(Commands::Export {
            filter,
            format,
            output,
        }) => cli::export(&archive, &filter, format, &output)?,
        Some(Commands::Seasons) | Some(Commands::Sync { .. }) | None => {
            cli::show_seasons(&archive)?
        }
    }

    Ok(())
}
