//! CLI administration tool for tiny-shortener.
//!
//! Inspects and resets the state the service keeps in Redis without going
//! through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Show the remaining quota of a client
//! cargo run --bin admin -- quota show 203.0.113.9
//!
//! # Reset a client's quota
//! cargo run --bin admin -- quota reset 203.0.113.9
//!
//! # Show where a short code points
//! cargo run --bin admin -- link show abc123
//!
//! # Check store connection
//! cargo run --bin admin -- store check
//! ```
//!
//! # Environment Variables
//!
//! - `REDIS_URL` or `REDIS_HOST` / `REDIS_PORT` / `REDIS_PASSWORD` / `REDIS_DB` (required)
//! - `API_QUOTA`: used to show the quota a fresh client starts with

use tiny_shortener::config::{Config, mask_connection_string};
use tiny_shortener::domain::entities::{link_key, quota_key};
use tiny_shortener::domain::repositories::{KeyValueStore, StoreConnector};
use tiny_shortener::error::minutes_ceil;
use tiny_shortener::infrastructure::store::RedisConnector;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::time::Duration;

/// CLI tool for managing tiny-shortener.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Inspect or reset per-client quotas
    Quota {
        #[command(subcommand)]
        action: QuotaAction,
    },

    /// Inspect short links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Store operations
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
}

#[derive(Subcommand)]
enum QuotaAction {
    /// Show remaining calls and time to reset
    Show {
        /// Client identity (IP address)
        client: String,
    },

    /// Delete a client's counter so the next call starts a fresh window
    Reset {
        /// Client identity (IP address)
        client: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum LinkAction {
    /// Show the destination and remaining lifetime of a short code
    Show {
        /// Short code
        code: String,
    },
}

#[derive(Subcommand)]
enum StoreAction {
    /// Check store connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    let redis_url = config
        .redis_url
        .clone()
        .context("REDIS_URL or REDIS_HOST must be set")?;

    let connector = RedisConnector::connect(&redis_url)
        .await
        .with_context(|| format!("Failed to connect to {}", mask_connection_string(&redis_url)))?;

    match cli.command {
        Commands::Quota { action } => handle_quota_action(action, &connector, &config).await?,
        Commands::Link { action } => handle_link_action(action, &connector).await?,
        Commands::Store { action } => handle_store_action(action, &connector).await?,
    }

    Ok(())
}

async fn acquire(connector: &RedisConnector) -> Result<Box<dyn KeyValueStore>> {
    connector
        .acquire()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to acquire store handle: {}", e))
}

/// Dispatches quota commands.
async fn handle_quota_action(
    action: QuotaAction,
    connector: &RedisConnector,
    config: &Config,
) -> Result<()> {
    let store = acquire(connector).await?;

    match action {
        QuotaAction::Show { client } => show_quota(store.as_ref(), &client, config.api_quota).await,
        QuotaAction::Reset { client, yes } => reset_quota(store.as_ref(), &client, yes).await,
    }
}

/// Prints the counter for `client`.
///
/// # Output Format
///
/// ```text
/// 📊 Quota for 203.0.113.9
///
///   Remaining: 42
///   Resets in: 17 min
/// ```
async fn show_quota(store: &dyn KeyValueStore, client: &str, quota: i64) -> Result<()> {
    println!(
        "{} {}",
        "📊 Quota for".bright_blue().bold(),
        client.cyan().bold()
    );
    println!();

    let key = quota_key(client);
    let value = store
        .get(&key)
        .await
        .map_err(|e| anyhow::anyhow!("Store error: {}", e))?;

    let Some(value) = value else {
        println!("  {}", "No active window".yellow());
        println!(
            "  Next call starts with: {}",
            quota.to_string().bright_green().bold()
        );
        println!();
        return Ok(());
    };

    let ttl = store
        .ttl(&key)
        .await
        .map_err(|e| anyhow::anyhow!("Store error: {}", e))?;

    let remaining = match value.parse::<i64>() {
        Ok(n) if n > 0 => n.to_string().bright_green().bold(),
        Ok(n) => n.to_string().red().bold(),
        Err(_) => format!("{} (not an integer)", value).red().bold(),
    };

    println!("  Remaining: {}", remaining);
    println!("  Resets in: {}", format_ttl(ttl).bright_white());
    println!();

    Ok(())
}

/// Deletes the counter for `client` after confirmation (default: No).
async fn reset_quota(store: &dyn KeyValueStore, client: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "🔄 Reset Quota".bright_blue().bold());
    println!();
    println!("  Client: {}", client.cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Reset this client's quota?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let deleted = store
        .delete(&quota_key(client))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to reset quota: {}", e))?;

    println!();
    if deleted {
        println!("{}", "✅ Quota reset successfully!".green().bold());
    } else {
        println!("{}", "⚠️  No counter found for this client".yellow());
    }
    println!();

    Ok(())
}

/// Dispatches link commands.
async fn handle_link_action(action: LinkAction, connector: &RedisConnector) -> Result<()> {
    let store = acquire(connector).await?;

    match action {
        LinkAction::Show { code } => {
            println!("{} {}", "🔗 Link".bright_blue().bold(), code.cyan().bold());
            println!();

            let key = link_key(&code);
            let target = store
                .get(&key)
                .await
                .map_err(|e| anyhow::anyhow!("Store error: {}", e))?;

            let Some(target) = target else {
                println!("  {}", "Not found or expired".yellow());
                println!();
                return Ok(());
            };

            let ttl = store
                .ttl(&key)
                .await
                .map_err(|e| anyhow::anyhow!("Store error: {}", e))?;

            println!("  Target:     {}", target.bright_white());
            println!("  Expires in: {}", format_ttl(ttl).bright_white());
            println!();
        }
    }

    Ok(())
}

/// Handles store diagnostic commands.
async fn handle_store_action(action: StoreAction, connector: &RedisConnector) -> Result<()> {
    match action {
        StoreAction::Check => {
            println!("{}", "🔍 Checking store connection...".bright_blue());

            if !connector.health_check().await {
                anyhow::bail!("Store did not answer PING");
            }

            println!(
                "{} ({})",
                "✅ Store connection OK".green().bold(),
                connector.backend()
            );
        }
    }

    Ok(())
}

fn format_ttl(ttl: Option<Duration>) -> String {
    match ttl {
        Some(ttl) if ttl >= Duration::from_secs(3600) => {
            format!("{}h {}min", ttl.as_secs() / 3600, (ttl.as_secs() % 3600) / 60)
        }
        Some(ttl) => format!("{} min", minutes_ceil(ttl)),
        None => "no expiry".to_string(),
    }
}
