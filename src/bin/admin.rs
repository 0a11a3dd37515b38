//! CLI administration tool for snipurl.
//!
//! Provides commands for creating, inspecting and removing mappings without
//! going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL
//! cargo run --bin admin -- shorten https://example.com/some/long/path
//!
//! # Look up a code
//! cargo run --bin admin -- resolve aZ3kP9
//!
//! # Delete a mapping (also evicts it from Redis)
//! cargo run --bin admin -- delete aZ3kP9
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_*` components (required): PostgreSQL connection
//! - `REDIS_URL` or `REDIS_*` components (optional): cache to invalidate on delete
//!
//! All other server settings (`CODE_LENGTH`, `SHORTEN_*`, `CACHE_TTL_SECONDS`,
//! `BASE_URL`) are read and validated the same way the server does.

use snipurl::api::dto::shorten::ShortenRequest;
use snipurl::application::services::MappingService;
use snipurl::config::{self, Config, mask_connection_string};
use snipurl::domain::errors::CoreError;
use snipurl::infrastructure::cache::{CacheService, NullCache, RedisCache};
use snipurl::infrastructure::persistence::PgMappingRepository;
use snipurl::utils::code_generator::RandomCodeGenerator;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing snipurl.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Create a short code for a URL
    Shorten {
        /// The URL to shorten
        url: String,
    },

    /// Show the mapping stored under a code
    Resolve {
        code: String,
    },

    /// Delete the mapping stored under a code
    Delete {
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Invalid configuration")?;

    let pool = PgPool::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    let repo = Arc::new(PgMappingRepository::new(Arc::new(pool.clone())));

    match cli.command {
        Commands::Shorten { url } => shorten(repo, &config, &url).await?,
        Commands::Resolve { code } => resolve(repo, &config, &code).await?,
        Commands::Delete { code, yes } => delete(repo, &config, &code, yes).await?,
        Commands::Stats => handle_stats(repo).await?,
        Commands::Db { action } => handle_db_action(action, &pool, &config.database_url).await?,
    }

    Ok(())
}

fn service(
    repo: Arc<PgMappingRepository>,
    config: &Config,
) -> Result<MappingService<PgMappingRepository, RandomCodeGenerator>> {
    let generator = RandomCodeGenerator::new(config.code_length)
        .with_context(|| format!("Invalid CODE_LENGTH: {}", config.code_length))?;

    Ok(MappingService::new(
        repo,
        Arc::new(generator),
        Arc::new(NullCache),
        config.retry_policy(),
    ))
}

/// Connects to Redis if configured. Failures are reported and ignored.
async fn optional_cache(config: &Config) -> Option<Arc<dyn CacheService>> {
    let redis_url = config.redis_url.as_deref()?;

    match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
        Ok(cache) => Some(Arc::new(cache)),
        Err(e) => {
            println!("{} {}", "⚠️  Redis unavailable:".yellow(), e);
            None
        }
    }
}

/// Allocates a code through the same service the HTTP API uses.
async fn shorten(repo: Arc<PgMappingRepository>, config: &Config, url: &str) -> Result<()> {
    println!("{}", "✂️  Shorten URL".bright_blue().bold());
    println!();

    let request = ShortenRequest::new(url);
    let problems = request.validation_messages();
    if !problems.is_empty() {
        println!("{}", "❌ Invalid URL".red().bold());
        for problem in &problems {
            println!("  - {}", problem);
        }
        anyhow::bail!("URL rejected: {}", problems.join("; "));
    }

    let mapping = service(repo, config)?
        .shorten(&request.original_url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to shorten URL: {}", e))?;

    println!("{}", "✅ Mapping created".green().bold());
    println!("  Code:      {}", mapping.code.bright_yellow().bold());
    println!("  Short URL: {}", mapping.short_url(&config.base_url).cyan());
    println!("  Original:  {}", mapping.original_url);
    println!();

    Ok(())
}

async fn resolve(repo: Arc<PgMappingRepository>, config: &Config, code: &str) -> Result<()> {
    match service(repo, config)?.find(code).await {
        Ok(mapping) => {
            println!("{}", "🔗 Mapping".bright_blue().bold());
            println!();
            println!("  ID:       {}", mapping.id.to_string().bright_black());
            println!("  Code:     {}", mapping.code.cyan());
            println!("  Original: {}", mapping.original_url);
            println!(
                "  Created:  {}",
                mapping
                    .created_at
                    .format("%Y-%m-%d %H:%M")
                    .to_string()
                    .bright_black()
            );
            println!();
        }
        Err(CoreError::NotFound { .. }) => {
            println!("{} {}", "❌ No mapping for code".red(), code.bold());
        }
        Err(e) => return Err(anyhow::anyhow!("Database error: {}", e)),
    }

    Ok(())
}

/// Deletes a mapping after confirmation and evicts it from the cache.
///
/// Deletion is the only way a mapping ever changes, so the cache entry must
/// go too or redirects would keep working until the TTL expires.
async fn delete(
    repo: Arc<PgMappingRepository>,
    config: &Config,
    code: &str,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🗑️  Delete Mapping".bright_blue().bold());
    println!();

    println!("  Code: {}", code.cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this mapping?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let deleted = repo
        .delete_by_code(code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete mapping: {}", e))?;

    if !deleted {
        println!("{}", "⚠️  No mapping found for this code".yellow());
        return Ok(());
    }

    if let Some(cache) = optional_cache(config).await
        && let Err(e) = cache.invalidate(code).await
    {
        println!("{} {}", "⚠️  Failed to evict cache entry:".yellow(), e);
    }

    println!("{}", "✅ Mapping deleted".green().bold());
    println!();

    Ok(())
}

/// Displays the number of stored mappings.
async fn handle_stats(repo: Arc<PgMappingRepository>) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let count = repo
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count mappings: {}", e))?;

    println!("  Mappings: {}", count.to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Dispatches database commands.
async fn handle_db_action(action: DbAction, pool: &PgPool, database_url: &str) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await
                .context("Database query failed")?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  URL:     {}", mask_connection_string(database_url).bright_black());
            println!("  Version: {}", version.bright_black());
            println!();
        }
    }

    Ok(())
}
