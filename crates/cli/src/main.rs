use std::path::PathBuf;
use std::process::ExitCode;

use aidd_bootstrap::{verify, Bootstrapper, SEED};
use aidd_db::{DbError, MongoInspector, MongoProvisioner};
use aidd_kernel::settings::Settings;
use anyhow::Context;
use clap::{Parser, Subcommand};

/// Initialize the ai_driven_development MongoDB database.
#[derive(Debug, Parser)]
#[command(name = "aidd-init", version)]
struct Cli {
    /// Directory holding base.toml and <env>.toml
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the database, its collections and the admin user (default)
    Run,
    /// Check the bootstrapped state without writing anything
    Verify {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the steps a run applies, without connecting
    Plan,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Run) {
        Command::Plan => {
            for (index, step) in SEED.steps().iter().enumerate() {
                println!("{}. {step}", index + 1);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Run => {
            let settings = load_settings(cli.config_dir)?;
            let client = aidd_db::connect(&settings.database)
                .await
                .context("failed to connect to mongodb")?;

            let result = Bootstrapper::new(MongoProvisioner::new(client))
                .run(&SEED)
                .await;
            if let Err(err) = &result {
                if DbError::find(err).is_some_and(DbError::is_already_exists) {
                    tracing::warn!(
                        database = SEED.database,
                        "database appears to be initialized already"
                    );
                }
            }
            let outcome = result?;

            tracing::info!(applied = outcome.applied, "aidd-init finished");
            Ok(ExitCode::SUCCESS)
        }
        Command::Verify { json } => {
            let settings = load_settings(cli.config_dir)?;
            let client = aidd_db::connect(&settings.database)
                .await
                .context("failed to connect to mongodb")?;

            let report = verify(&SEED, &MongoInspector::new(client)).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for line in report.lines() {
                    println!("{line}");
                }
            }

            if report.is_satisfied() {
                Ok(ExitCode::SUCCESS)
            } else {
                tracing::warn!(database = SEED.database, "bootstrap state incomplete");
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

fn load_settings(config_dir: Option<PathBuf>) -> anyhow::Result<Settings> {
    let settings = Settings::load(config_dir.as_deref())
        .with_context(|| "failed to load aidd-init settings")?;
    aidd_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        app_name = %settings.database.app_name,
        "aidd-init starting"
    );
    Ok(settings)
}
