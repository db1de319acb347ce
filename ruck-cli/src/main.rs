///! ruck: operator CLI for the rugby lineup ingestion core.
///!
///! `ruck lineups` runs the full pipeline for one match and prints the
///! rosters; `ruck events` lists a league's scoreboard for one date so
///! operators can discover event ids worth ingesting.

use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::info;

use ruck_core::{IngestConfig, Ingestor, MatchLineups, ScoreboardEvent, TeamLineup};

#[derive(Parser)]
#[command(name = "ruck", about = "Rugby lineup ingestion from public match pages")]
struct Cli {
    /// Path to the TOML configuration file. Missing file means defaults.
    #[arg(long, default_value = "ruck.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch, extract, and print the lineups for one match
    Lineups {
        /// Competition id, e.g. 289234 for internationals
        #[arg(long)]
        league_id: u32,

        /// Event id as listed on the scoreboard, e.g. 602480
        #[arg(long)]
        event_id: String,

        /// Also write the result to FILE as pretty-printed JSON
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// List a league's scoreboard events for one date
    Events {
        /// Competition id, e.g. 289234 for internationals
        #[arg(long)]
        league_id: u32,

        /// Matchday to list, YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = IngestConfig::load_or_default(&cli.config);
    let ingestor = Ingestor::new(config).context("Failed to build ingestor")?;

    match cli.command {
        Command::Lineups {
            league_id,
            event_id,
            out,
        } => {
            let lineups = ingestor.match_lineups(league_id, &event_id).await?;
            print_lineups(&lineups);

            if let Some(path) = out {
                let json = serde_json::to_string_pretty(&lineups)?;
                std::fs::write(&path, json)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                info!("Wrote lineups JSON to {}", path.display());
            }
        }
        Command::Events { league_id, date } => {
            let events = ingestor.scoreboard(league_id, date).await?;
            print_events(&events, date);
        }
    }

    Ok(())
}

fn print_lineups(lineups: &MatchLineups) {
    println!("{}", "=".repeat(80));
    println!(
        "Lineups for event {} (league {})",
        lineups.event_id, lineups.league_id
    );
    println!("{}", "=".repeat(80));

    if lineups.is_empty() {
        println!("(No lineup rows found. Some fixtures have no published lineups yet.)");
        return;
    }

    for team in lineups.teams_in_order() {
        print_team(team);
    }
}

fn print_team(team: &TeamLineup) {
    println!("\n{} ({})", team.display_name, team.abbreviation);
    println!("{}", "-".repeat(80));

    if team.starters.is_empty() {
        println!("Starters: (none)");
    } else {
        println!("Starters (XV):");
        for player in &team.starters {
            println!("  - {:>2}  {}  ({})", player.jersey, player.name, player.position);
        }
    }

    if team.replacements.is_empty() {
        println!("\nReplacements: (none)");
    } else {
        println!("\nReplacements:");
        for player in &team.replacements {
            println!("  - {:>2}  {}  ({})", player.jersey, player.name, player.position);
        }
    }
}

fn print_events(events: &[ScoreboardEvent], date: NaiveDate) {
    if events.is_empty() {
        println!("No events on {}", date);
        return;
    }

    println!("Events on {}:", date);
    for event in events {
        println!("  {}  {}  {}", event.id, event.date, event.name);
    }
}
