use anyhow::Result;
use clap::{Parser, Subcommand};
use scout::cli::commands;

#[derive(Parser)]
#[command(name = "scout")]
#[command(
  about = "Scout - semantic competitive-research cache\nReuses cached SERP analysis for similar topics instead of re-querying paid search APIs"
)]
#[command(version)]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Analyze a topic: cache-adapted when a similar topic exists,
  /// fresh API research otherwise
  Analyze {
    /// The topic to research
    topic: String,
    /// Minimum similarity for reusing cached research (0.0-1.0)
    #[arg(short, long)]
    threshold: Option<f32>,
    /// Skip the cache read and fetch fresh results
    #[arg(long)]
    fresh: bool,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
  },
  /// Check what the cache would reuse for a topic, without fetching
  Lookup {
    /// The topic to probe
    topic: String,
    /// Minimum similarity for a hit (0.0-1.0)
    #[arg(short, long)]
    threshold: Option<f32>,
  },
  /// Show trending news items for a topic
  Trending {
    /// The topic to look up
    topic: String,
  },
  /// Show cache statistics
  Stats,
  /// Delete every cached analysis
  Clear {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    force: bool,
  },
}

async fn handle(command: Command) -> Result<()> {
  match command {
    Command::Analyze { topic, threshold, fresh, json } => {
      commands::analyze(&topic, threshold, fresh, json).await
    }
    Command::Lookup { topic, threshold } => commands::lookup(&topic, threshold).await,
    Command::Trending { topic } => commands::trending(&topic).await,
    Command::Stats => commands::stats().await,
    Command::Clear { force } => commands::clear(force).await,
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  handle(cli.command).await?;
  Ok(())
}
