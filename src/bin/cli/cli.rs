//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use cofrinho::constants::DEFAULT_API_URL;
use cofrinho::models::Recurrence;

/// Cofrinho - personal finances from the terminal
#[derive(Parser)]
#[command(name = "cofrinho")]
#[command(about = "Track incomes, expenses and piggy banks", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Base URL of the Cofrinho server
    #[arg(long, env = "COFRINHO_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// Where the session token is kept (defaults to the user config dir)
    #[arg(long, env = "COFRINHO_TOKEN_FILE", global = true)]
    pub token_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session token
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },

    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
        /// Full name shown in the app
        #[arg(short = 'n', long)]
        full_name: String,
    },

    /// Revoke the session and forget the token
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Monthly summary, charts and insights
    Dashboard,

    /// Yearly report with category ranking
    Reports {
        /// Year to report on (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Reference month 1-12 (defaults to the current month)
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=12))]
        month: Option<u8>,
    },

    /// Manage income sources
    Incomes {
        #[command(subcommand)]
        action: Option<IncomesAction>,
    },

    /// Manage expenses
    Expenses {
        #[command(subcommand)]
        action: Option<ExpensesAction>,
    },

    /// Manage expense categories
    Categories {
        #[command(subcommand)]
        action: Option<CategoriesAction>,
    },

    /// Manage piggy banks and their deposits/withdrawals
    Piggy {
        #[command(subcommand)]
        action: Option<PiggyAction>,
    },
}

#[derive(Args)]
pub struct IncomeArgs {
    /// Income name (e.g. "Salário")
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub amount: f64,
    /// monthly, weekly or yearly
    #[arg(long, default_value = "monthly")]
    pub recurrence: Recurrence,
    /// Day of the month the income arrives
    #[arg(long)]
    pub receive_date: i64,
}

#[derive(Subcommand)]
pub enum IncomesAction {
    /// List incomes (default)
    List,
    Add(IncomeArgs),
    Edit {
        id: i64,
        #[command(flatten)]
        income: IncomeArgs,
    },
    Delete { id: i64 },
}

#[derive(Args)]
pub struct ExpenseArgs {
    #[arg(long)]
    pub amount: f64,
    /// Category id
    #[arg(long)]
    pub category: i64,
    #[arg(long)]
    pub description: String,
    /// YYYY-MM-DD
    #[arg(long)]
    pub date: String,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Subcommand)]
pub enum ExpensesAction {
    /// List expenses (default)
    List,
    Add(ExpenseArgs),
    Edit {
        id: i64,
        #[command(flatten)]
        expense: ExpenseArgs,
    },
    Delete { id: i64 },
}

#[derive(Args)]
pub struct CategoryArgs {
    #[arg(long)]
    pub name: String,
    /// Hex colour such as #FF7A00
    #[arg(long)]
    pub color: String,
    #[arg(long, default_value = "tag")]
    pub icon: String,
}

#[derive(Subcommand)]
pub enum CategoriesAction {
    /// List categories (default)
    List,
    Add(CategoryArgs),
    Edit {
        id: i64,
        #[command(flatten)]
        category: CategoryArgs,
    },
    /// Delete a category; its expenses become uncategorized
    Delete { id: i64 },
}

#[derive(Args)]
pub struct PiggyArgs {
    #[arg(long)]
    pub name: String,
    /// What the savings are for
    #[arg(long, default_value = "")]
    pub goal: String,
    #[arg(long, default_value = "")]
    pub bank: String,
}

#[derive(Args)]
pub struct MovementArgs {
    /// Piggy bank id
    pub id: i64,
    #[arg(long)]
    pub amount: f64,
    #[arg(long)]
    pub description: Option<String>,
    /// YYYY-MM-DD, defaults to today
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Subcommand)]
pub enum PiggyAction {
    /// List piggy banks (default)
    List,
    Add(PiggyArgs),
    Edit {
        id: i64,
        #[command(flatten)]
        piggy: PiggyArgs,
    },
    Delete { id: i64 },
    /// Put money into a piggy bank
    Deposit(MovementArgs),
    /// Take money out of a piggy bank
    Withdraw(MovementArgs),
    /// Show the transaction history of a piggy bank
    History { id: i64 },
}
