//! CLI administration tool for urlgate.
//!
//! Manages API-key owners and their plan tiers directly in the database.
//!
//! # Usage
//!
//! ```bash
//! # Register an owner and print its new API key
//! cargo run --bin admin -- owner create --name "Acme" --tier enterprise
//!
//! # List owners
//! cargo run --bin admin -- owner list
//!
//! # Change an owner's tier
//! cargo run --bin admin -- owner set-tier 3 hobby
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `API_KEY_SIGNING_SECRET` (required for `owner create`): must match the server's

use urlgate::application::services::IdentityService;
use urlgate::domain::entities::PlanTier;
use urlgate::error::AppError;
use urlgate::infrastructure::persistence::PgOwnerRepository;
use urlgate::utils::code_generator::generate_code;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

const API_KEY_LENGTH: usize = 48;

/// CLI tool for managing urlgate.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage API-key owners
    Owner {
        #[command(subcommand)]
        action: OwnerAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum OwnerAction {
    /// Register an owner and issue its API key
    Create {
        /// Owner name (e.g., "Acme Corp")
        #[arg(short, long)]
        name: Option<String>,

        /// Plan tier: free, hobby or enterprise
        #[arg(short, long, default_value = "free")]
        tier: PlanTier,

        /// Custom API key (optional, auto-generated if not provided)
        #[arg(short, long)]
        key: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all owners
    List,

    /// Change an owner's plan tier
    SetTier { id: i64, tier: PlanTier },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Owner { action } => handle_owner_action(action, &pool).await?,
        Commands::Db {
            action: DbAction::Check,
        } => check_db(&pool).await?,
    }

    Ok(())
}

async fn handle_owner_action(action: OwnerAction, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgOwnerRepository::new(Arc::new(pool.clone())));

    match action {
        OwnerAction::Create {
            name,
            tier,
            key,
            yes,
        } => create_owner(repo, name, tier, key, yes).await,
        OwnerAction::List => list_owners(&repo).await,
        OwnerAction::SetTier { id, tier } => set_tier(&repo, id, tier).await,
    }
}

/// Registers an owner with interactive prompts.
///
/// Only the HMAC digest of the key is stored; the raw key is shown once.
async fn create_owner(
    repo: Arc<PgOwnerRepository>,
    name: Option<String>,
    tier: PlanTier,
    key: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔑 Register Owner".bright_blue().bold());
    println!();

    let secret =
        std::env::var("API_KEY_SIGNING_SECRET").context("API_KEY_SIGNING_SECRET must be set")?;

    let owner_name = match name {
        Some(n) => n,
        None => Input::new().with_prompt("Owner name").interact_text()?,
    };

    let api_key = match key {
        Some(k) => {
            println!("{}", "⚠️  Using provided API key".yellow());
            k
        }
        None => generate_code(API_KEY_LENGTH),
    };

    println!("{}", "Owner details:".bright_white().bold());
    println!("  Name:    {}", owner_name.cyan());
    println!("  Tier:    {}", tier.as_str().cyan());
    println!("  API key: {}", api_key.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "⚠️  IMPORTANT: Save this key now! It cannot be shown again."
            .red()
            .bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Register this owner?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let identity = IdentityService::new(repo.clone(), secret);
    let key_hash = identity
        .hash_key(&api_key)
        .map_err(|e| anyhow::anyhow!("Failed to hash API key: {}", e))?;

    let owner = match repo.create(&owner_name, &key_hash, tier).await {
        Ok(owner) => owner,
        Err(AppError::CodeTaken { .. }) => anyhow::bail!("This API key is already registered"),
        Err(e) => anyhow::bail!("Failed to register owner: {}", e),
    };

    println!();
    println!(
        "{} (id {})",
        "✅ Owner registered".green().bold(),
        owner.id.to_string().bright_white()
    );
    println!();
    println!("{}", "Example:".bright_white());
    println!(
        "  curl -H \"X-API-KEY: {}\" -H \"Content-Type: application/json\" \\",
        api_key.bright_yellow()
    );
    println!(
        "       -d '{{\"original_url\":\"https://example.com\"}}' http://localhost:3000/api/urls/shorten"
    );
    println!();

    Ok(())
}

async fn list_owners(repo: &PgOwnerRepository) -> Result<()> {
    println!("{}", "📋 Owners".bright_blue().bold());
    println!();

    let owners = repo
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list owners: {}", e))?;

    if owners.is_empty() {
        println!("{}", "  No owners found".yellow());
        println!();
        println!(
            "  Create one with: {} admin -- owner create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<5} {:<30} {:<12} {:<20}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Tier".bright_white().bold(),
        "Created".bright_white().bold()
    );
    println!("  {}", "─".repeat(70).bright_black());

    for owner in &owners {
        let tier = match owner.tier {
            PlanTier::Enterprise => owner.tier.as_str().green(),
            PlanTier::Hobby => owner.tier.as_str().cyan(),
            PlanTier::Free => owner.tier.as_str().normal(),
        };

        println!(
            "  {:<5} {:<30} {:<12} {}",
            owner.id.to_string().bright_black(),
            owner.name.cyan(),
            tier,
            owner
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }

    println!();
    println!(
        "  Total: {}",
        owners.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn set_tier(repo: &PgOwnerRepository, id: i64, tier: PlanTier) -> Result<()> {
    let updated = repo
        .set_tier(id, tier)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to update tier: {}", e))?;

    if !updated {
        anyhow::bail!("Owner {} not found", id);
    }

    println!(
        "{} owner {} is now {}",
        "✅".green(),
        id.to_string().bright_white(),
        tier.as_str().cyan().bold()
    );
    println!(
        "{}",
        "   Plan rate limits follow PLAN_API_KEYS; update it too if the key is listed there."
            .bright_black()
    );

    Ok(())
}

async fn check_db(pool: &PgPool) -> Result<()> {
    println!("{}", "🔍 Checking database connection...".bright_blue());

    let version: String = sqlx::query_scalar("SELECT version()")
        .fetch_one(pool)
        .await
        .context("Database query failed")?;

    let owners: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM owners")
        .fetch_one(pool)
        .await
        .context("Owners table missing, run the server once to apply migrations")?;

    println!("{}", "✅ Database connection OK".green().bold());
    println!("  {}", version.bright_black());
    println!("  Owners: {}", owners.to_string().bright_white());

    Ok(())
}
