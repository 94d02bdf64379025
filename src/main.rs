mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use marketsearch::{Facet, FilterRequest, SortBy, config::Config};
use tracing_subscriber::EnvFilter;

use crate::commands::search::SearchOptions;

#[derive(Parser)]
#[command(name = "marketsearch", version, about = "Search marketplace listings")]
struct Cli {
   /// Config file (defaults to ~/.marketsearch/config.toml)
   #[arg(long, global = true, env = "MARKETSEARCH_CONFIG")]
   config: Option<PathBuf>,

   /// Serve documents from a local JSON fixture instead of the backend
   #[arg(long, global = true)]
   fixture: Option<PathBuf>,

   #[command(subcommand)]
   command: Command,
}

#[derive(Subcommand)]
enum Command {
   /// Search active listings
   Search {
      /// Free-text term matched against listing titles
      #[arg(default_value = "")]
      term: String,

      #[arg(long, default_value = "All")]
      category: Facet,

      #[arg(long, default_value = "All")]
      condition: Facet,

      #[arg(long)]
      min_price: Option<f64>,

      #[arg(long)]
      max_price: Option<f64>,

      /// recent, priceAsc or priceDesc
      #[arg(long, default_value = "recent")]
      sort: SortBy,

      #[arg(long)]
      json: bool,

      #[arg(long)]
      plain: bool,
   },

   /// Show a single listing
   Show {
      id: String,

      #[arg(long)]
      json: bool,
   },

   /// List or clear recent search terms
   Recent {
      #[arg(long)]
      clear: bool,

      #[arg(long)]
      json: bool,
   },
}

fn init_tracing() {
   let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
   tracing_subscriber::fmt()
      .with_env_filter(filter)
      .with_writer(std::io::stderr)
      .init();
}

#[tokio::main]
async fn main() -> Result<()> {
   init_tracing();
   let cli = Cli::parse();

   let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
   let engine = commands::engine(&config, cli.fixture.as_deref())?;

   match cli.command {
      Command::Search {
         term,
         category,
         condition,
         min_price,
         max_price,
         sort,
         json,
         plain,
      } => {
         let request = FilterRequest {
            term,
            category,
            min_price,
            max_price,
            condition,
            sort_by: sort,
         };
         commands::search::execute(&engine, request, SearchOptions { json, plain }).await
      },
      Command::Show { id, json } => commands::show::execute(&engine, &id, json).await,
      Command::Recent { clear, json } => commands::recent::execute(&engine, clear, json).await,
   }
}
