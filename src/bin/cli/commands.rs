//! CLI command implementations
//!
//! Every command opens the session from the persisted token, then drives
//! the matching view model and renders its snapshot.

use anyhow::{Context, Result, bail};

use cofrinho::client::session::SessionState;
use cofrinho::client::{
    ApiClient, DashboardView, ExpensesView, FileTokenStore, IncomesView, PiggyBanksView,
    ReportsView, SessionContext,
};
use cofrinho::models::{
    CategoryPayload, ExpensePayload, IncomePayload, PiggyBankPayload, PiggyTransactionPayload,
    RegisterPayload, TransactionType,
};

use crate::cli::*;
use crate::render;

pub type Session = SessionContext<FileTokenStore>;

pub fn open_session(cli: &Cli) -> Result<Session> {
    let token_path = match &cli.token_file {
        Some(path) => path.clone(),
        None => FileTokenStore::default_path()
            .context("No config directory found; pass --token-file")?,
    };
    tracing::debug!(api_url = %cli.api_url, token_file = %token_path.display(), "opening session");
    Ok(SessionContext::new(
        ApiClient::new(cli.api_url.clone()),
        FileTokenStore::new(token_path),
    ))
}

async fn require_login(session: &Session) -> Result<ApiClient> {
    match session.init().await {
        SessionState::Authenticated(_) => Ok(session.api().clone()),
        SessionState::Anonymous => bail!("Not logged in. Run `cofrinho-cli login` first."),
    }
}

pub async fn cmd_login(session: &Session, email: &str, password: &str) -> Result<()> {
    let user = session.login(email, password).await?;
    println!("Olá, {}! Sessão iniciada.", user.full_name);
    Ok(())
}

pub async fn cmd_register(session: &Session, payload: RegisterPayload) -> Result<()> {
    let user = session.register(&payload).await?;
    println!("Conta criada para {} ({}).", user.full_name, user.email);
    Ok(())
}

pub async fn cmd_logout(session: &Session) -> Result<()> {
    session.init().await;
    session.logout().await;
    println!("Sessão encerrada.");
    Ok(())
}

pub async fn cmd_whoami(session: &Session) -> Result<()> {
    match session.init().await {
        SessionState::Authenticated(user) => {
            println!("{} <{}> (id {})", user.full_name, user.email, user.id);
        }
        SessionState::Anonymous => println!("Not logged in."),
    }
    Ok(())
}

pub async fn cmd_dashboard(session: &Session) -> Result<()> {
    let view = DashboardView::new(require_login(session).await?);
    if !view.refresh().await {
        bail!("Could not load the dashboard");
    }
    render::print_dashboard(&view.snapshot().await);
    Ok(())
}

pub async fn cmd_reports(session: &Session, year: Option<i32>, month: Option<u8>) -> Result<()> {
    let view = ReportsView::new(require_login(session).await?);
    let today = cofrinho::client::views::today();
    let year = year.unwrap_or_else(|| today.year());
    let month = month.map(|m| m - 1).unwrap_or(u8::from(today.month()) - 1);
    if !view.refresh_for(year, month).await {
        bail!("Could not load the reports for {}", year);
    }
    render::print_reports(&view.snapshot().await);
    Ok(())
}

pub async fn cmd_incomes(session: &Session, action: Option<IncomesAction>) -> Result<()> {
    let view = IncomesView::new(require_login(session).await?);
    match action {
        None | Some(IncomesAction::List) => {
            view.refresh().await;
        }
        Some(IncomesAction::Add(args)) => {
            let income = view.create(&income_payload(args)).await?;
            println!("Receita #{} criada.", income.id);
        }
        Some(IncomesAction::Edit { id, income }) => {
            view.update(id, &income_payload(income)).await?;
            println!("Receita #{} atualizada.", id);
        }
        Some(IncomesAction::Delete { id }) => {
            view.delete(id).await?;
            println!("Receita #{} removida.", id);
        }
    }
    render::print_incomes(&view.snapshot().await);
    Ok(())
}

fn income_payload(args: IncomeArgs) -> IncomePayload {
    IncomePayload {
        name: args.name,
        amount: args.amount,
        recurrence: args.recurrence,
        receive_date: args.receive_date,
    }
}

pub async fn cmd_expenses(session: &Session, action: Option<ExpensesAction>) -> Result<()> {
    let view = ExpensesView::new(require_login(session).await?);
    match action {
        None | Some(ExpensesAction::List) => {
            view.refresh().await;
        }
        Some(ExpensesAction::Add(args)) => {
            let expense = view.create_expense(&expense_payload(args)).await?;
            println!("Despesa #{} criada.", expense.id);
        }
        Some(ExpensesAction::Edit { id, expense }) => {
            view.update_expense(id, &expense_payload(expense)).await?;
            println!("Despesa #{} atualizada.", id);
        }
        Some(ExpensesAction::Delete { id }) => {
            view.delete_expense(id).await?;
            println!("Despesa #{} removida.", id);
        }
    }
    render::print_expenses(&view.snapshot().await);
    Ok(())
}

fn expense_payload(args: ExpenseArgs) -> ExpensePayload {
    ExpensePayload {
        amount: args.amount,
        category_id: args.category,
        description: args.description,
        date: args.date,
        notes: args.notes,
    }
}

pub async fn cmd_categories(session: &Session, action: Option<CategoriesAction>) -> Result<()> {
    let view = ExpensesView::new(require_login(session).await?);
    match action {
        None | Some(CategoriesAction::List) => {
            view.refresh().await;
        }
        Some(CategoriesAction::Add(args)) => {
            let category = view.create_category(&category_payload(args)).await?;
            println!("Categoria #{} criada.", category.id);
        }
        Some(CategoriesAction::Edit { id, category }) => {
            view.update_category(id, &category_payload(category)).await?;
            println!("Categoria #{} atualizada.", id);
        }
        Some(CategoriesAction::Delete { id }) => {
            view.delete_category(id).await?;
            println!("Categoria #{} removida.", id);
        }
    }
    render::print_categories(&view.snapshot().await.categories);
    Ok(())
}

fn category_payload(args: CategoryArgs) -> CategoryPayload {
    CategoryPayload {
        name: args.name,
        color: args.color,
        icon: args.icon,
    }
}

pub async fn cmd_piggy(session: &Session, action: Option<PiggyAction>) -> Result<()> {
    let view = PiggyBanksView::new(require_login(session).await?);
    match action {
        None | Some(PiggyAction::List) => {
            view.refresh().await;
        }
        Some(PiggyAction::Add(args)) => {
            let bank = view.create(&piggy_payload(args)).await?;
            println!("Porquinho #{} criado.", bank.id);
        }
        Some(PiggyAction::Edit { id, piggy }) => {
            view.update(id, &piggy_payload(piggy)).await?;
            println!("Porquinho #{} atualizado.", id);
        }
        Some(PiggyAction::Delete { id }) => {
            view.delete(id).await?;
            println!("Porquinho #{} removido.", id);
        }
        Some(PiggyAction::Deposit(args)) => {
            view.record_transaction(&movement_payload(args, TransactionType::Deposit))
                .await?;
            println!("Depósito registrado.");
        }
        Some(PiggyAction::Withdraw(args)) => {
            view.record_transaction(&movement_payload(args, TransactionType::Withdrawal))
                .await?;
            println!("Retirada registrada.");
        }
        Some(PiggyAction::History { id }) => {
            view.refresh().await;
            let snapshot = view.snapshot().await;
            let bank = snapshot
                .piggy_banks
                .iter()
                .find(|bank| bank.id == id)
                .with_context(|| format!("Piggy bank #{} not found", id))?;
            render::print_history(&bank.name, snapshot.history(id));
            return Ok(());
        }
    }
    render::print_piggy_banks(&view.snapshot().await);
    Ok(())
}

fn piggy_payload(args: PiggyArgs) -> PiggyBankPayload {
    PiggyBankPayload {
        name: args.name,
        goal: args.goal,
        bank: args.bank,
    }
}

fn movement_payload(args: MovementArgs, kind: TransactionType) -> PiggyTransactionPayload {
    PiggyTransactionPayload {
        piggy_bank_id: args.id,
        amount: args.amount,
        kind,
        description: args.description,
        date: args.date,
    }
}
