use std::net::SocketAddr;
use std::path::PathBuf;

use agronomy::web::{self, AppState};
use agronomy_core::config::AppConfig;
use agronomy_core::{db, FeatureVector, PredictionPipeline};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Crop recommendation server and CLI", long_about = None)]
struct Cli {
    /// Directory holding normalizer.json, standardizer.json and classifier.json
    #[arg(long, global = true)]
    model_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the web server
    Serve(ServeArgs),
    /// Run database migrations
    Migrate,
    /// Print the recommendation for one set of measurements
    Predict(PredictArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Address to listen on (overrides AGRONOMY_BIND)
    #[arg(long)]
    bind: Option<SocketAddr>,
    /// Run without a database even if one is configured
    #[arg(long)]
    stateless: bool,
}

#[derive(Args, Debug)]
struct PredictArgs {
    #[arg(long)]
    nitrogen: f64,
    #[arg(long)]
    phosphorus: f64,
    #[arg(long)]
    potassium: f64,
    #[arg(long)]
    temperature: f64,
    #[arg(long)]
    humidity: f64,
    #[arg(long)]
    ph: f64,
    #[arg(long)]
    rainfall: f64,
    /// Print the full prediction as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::load()?;
    if let Some(dir) = cli.model_dir {
        config.model_dir = dir;
    }

    match cli.command {
        Command::Serve(args) => {
            if let Some(bind) = args.bind {
                config.bind = bind;
            }
            let pipeline = load_pipeline(&config)?;
            let pool = if args.stateless {
                info!("Running without a database");
                None
            } else {
                match &config.database_url {
                    Some(url) => {
                        let pool = db::connect_with(url, config.max_connections).await?;
                        db::run_migrations(&pool).await?;
                        Some(pool)
                    }
                    None => {
                        warn!("No DATABASE_URL configured; accounts, contact and history are disabled");
                        None
                    }
                }
            };
            web::serve(AppState::new(pipeline, pool), config.bind).await
        }
        Command::Migrate => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL (or AGRONOMY_DATABASE_URL) must be set")?;
            let pool = db::connect_with(url, config.max_connections).await?;
            db::run_migrations(&pool).await?;
            info!("Database migrations applied");
            Ok(())
        }
        Command::Predict(args) => {
            let pipeline = load_pipeline(&config)?;
            let features = FeatureVector::new([
                args.nitrogen,
                args.phosphorus,
                args.potassium,
                args.temperature,
                args.humidity,
                args.ph,
                args.rainfall,
            ])?;
            let prediction = pipeline.predict_features(features)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&prediction)?);
            } else {
                println!("{}", prediction.message);
            }
            Ok(())
        }
    }
}

fn load_pipeline(config: &AppConfig) -> Result<PredictionPipeline> {
    let paths = config.artifact_paths();
    let pipeline = PredictionPipeline::load(&paths).with_context(|| {
        format!(
            "failed to load model artifacts ({}, {}, {})",
            paths.normalizer.display(),
            paths.standardizer.display(),
            paths.classifier.display()
        )
    })?;

    let unmapped = pipeline.unmapped_classes();
    if !unmapped.is_empty() {
        warn!(
            ?unmapped,
            "Classifier declares classes without a crop name; they will get the fallback message"
        );
    }
    info!(classifier = pipeline.classifier_name(), "Model artifacts loaded");
    Ok(pipeline)
}
