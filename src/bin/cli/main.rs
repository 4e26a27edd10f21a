//! Cofrinho CLI
//!
//! Usage:
//!   cofrinho-cli login -e EMAIL -p PASSWORD   Sign in
//!   cofrinho-cli dashboard                    Monthly summary and insights
//!   cofrinho-cli reports --year 2024          Yearly report
//!   cofrinho-cli expenses add --amount ...    Record an expense

mod cli;
mod commands;
mod render;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::*;
use cofrinho::models::RegisterPayload;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (warn)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let session = commands::open_session(&cli)?;

    match cli.command {
        Commands::Login { email, password } => {
            commands::cmd_login(&session, &email, &password).await
        }
        Commands::Register {
            email,
            password,
            full_name,
        } => {
            commands::cmd_register(
                &session,
                RegisterPayload {
                    email,
                    password,
                    full_name,
                },
            )
            .await
        }
        Commands::Logout => commands::cmd_logout(&session).await,
        Commands::Whoami => commands::cmd_whoami(&session).await,
        Commands::Dashboard => commands::cmd_dashboard(&session).await,
        Commands::Reports { year, month } => commands::cmd_reports(&session, year, month).await,
        Commands::Incomes { action } => commands::cmd_incomes(&session, action).await,
        Commands::Expenses { action } => commands::cmd_expenses(&session, action).await,
        Commands::Categories { action } => commands::cmd_categories(&session, action).await,
        Commands::Piggy { action } => commands::cmd_piggy(&session, action).await,
    }
}
