//! linkpulse service and command-line entry point.
//!
//! # Usage
//!
//! ```bash
//! # Run the HTTP server, click workers and availability monitor
//! linkpulse serve
//!
//! # Shorten a URL without going through the API
//! linkpulse create --url https://example.com/some/long/path
//!
//! # Show click total for a short code
//! linkpulse stats --code aB3xYz
//!
//! # Apply database migrations
//! linkpulse migrate
//! ```
//!
//! Configuration is read from the environment (and `.env`); see
//! [`linkpulse::config`].

use linkpulse::api::dto::links::CreateLinkRequest;
use linkpulse::application::services::{LinkService, StatsService};
use linkpulse::config::{self, Config};
use linkpulse::infrastructure::persistence::{PgClickRepository, PgLinkRepository};
use linkpulse::{server, telemetry};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::sync::Arc;
use validator::Validate;

/// Link shortener with click analytics and availability monitoring.
#[derive(Parser)]
#[command(name = "linkpulse")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Create a short link
    Create {
        /// URL to shorten
        #[arg(short, long)]
        url: String,
    },

    /// Show click statistics for a short code
    Stats {
        /// Short code to look up
        #[arg(short, long)]
        code: String,
    },

    /// Apply pending database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Invalid configuration")?;
    telemetry::init(&config.log_level, &config.log_format)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            config.print_summary();
            server::run(config).await
        }
        Commands::Create { url } => create_link(&config, url).await,
        Commands::Stats { code } => show_stats(&config, &code).await,
        Commands::Migrate => migrate(&config).await,
    }
}

async fn create_link(config: &Config, long_url: String) -> Result<()> {
    let request = CreateLinkRequest { long_url };
    if let Err(e) = request.validate() {
        println!("{} {}", "Invalid URL:".red().bold(), e);
        anyhow::bail!("URL validation failed");
    }

    let pool = Arc::new(server::connect(config).await?);
    let service = LinkService::new(Arc::new(PgLinkRepository::new(pool.clone())));

    let link = service
        .create_link(&request.long_url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create link: {}", e))?;

    println!("{}", "Short link created".green().bold());
    println!();
    println!("  Code:      {}", link.short_code.bright_yellow().bold());
    println!("  Target:    {}", link.long_url.cyan());
    println!(
        "  Short URL: {}",
        service
            .get_short_url(&config.base_url, &link.short_code)
            .bright_white()
    );
    println!();

    pool.close().await;
    Ok(())
}

async fn show_stats(config: &Config, code: &str) -> Result<()> {
    let pool = Arc::new(server::connect(config).await?);
    let service = StatsService::new(
        Arc::new(PgLinkRepository::new(pool.clone())),
        Arc::new(PgClickRepository::new(pool.clone())),
    );

    let stats = service
        .get_link_stats(code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load statistics for '{}': {}", code, e))?;

    println!("{}", "Link statistics".bright_blue().bold());
    println!();
    println!("  Code:    {}", stats.link.short_code.bright_yellow());
    println!("  Target:  {}", stats.link.long_url.cyan());
    println!(
        "  Created: {}",
        stats
            .link
            .created_at
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .bright_black()
    );
    println!(
        "  Clicks:  {}",
        stats.total_clicks.to_string().bright_white().bold()
    );
    println!();

    pool.close().await;
    Ok(())
}

async fn migrate(config: &Config) -> Result<()> {
    let pool = server::connect(config).await?;
    server::run_migrations(&pool).await?;
    pool.close().await;

    println!("{}", "Migrations applied".green().bold());
    Ok(())
}
