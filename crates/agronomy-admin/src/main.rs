use anyhow::{Context, Result};
use agronomy_core::config::AppConfig;
use agronomy_core::db;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(author, version, about = "Crop recommendation administrative tooling", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the model artifacts and check them against the crop label table
    CheckModels(CheckModelsArgs),
    /// Create a user account
    CreateUser(CreateUserArgs),
    /// Show the most recent stored predictions
    RecentPredictions(RecentPredictionsArgs),
}

#[derive(Args, Debug, Default)]
struct CheckModelsArgs {
    /// Directory holding the three artifact files (overrides AGRONOMY_MODEL_DIR)
    #[arg(long)]
    model_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CreateUserArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
    /// Skip running migrations before inserting
    #[arg(long)]
    skip_migrations: bool,
}

#[derive(Args, Debug)]
struct RecentPredictionsArgs {
    #[arg(long, default_value_t = 20)]
    limit: i64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::load()?;

    match cli.command {
        Command::CheckModels(args) => {
            if let Some(dir) = args.model_dir {
                config.model_dir = dir;
            }
            commands::models::check_models(&config)
        }
        Command::CreateUser(args) => {
            let pool = connect_pool(&config).await?;
            if !args.skip_migrations {
                db::run_migrations(&pool).await?;
            }
            commands::users::create_user(&pool, &args.email, &args.password).await
        }
        Command::RecentPredictions(args) => {
            let pool = connect_pool(&config).await?;
            commands::predictions::show_recent(&pool, args.limit).await
        }
    }
}

async fn connect_pool(config: &AppConfig) -> Result<db::DbPool> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL (or AGRONOMY_DATABASE_URL) must be set")?;
    db::connect_with(database_url, config.max_connections).await
}
