//! Per-screen view models.
//!
//! Each view owns the last snapshot it committed. `refresh` fetches every
//! list the screen needs, aggregates, and commits through a
//! [`RefreshSequencer`] so a slow, stale fetch never overwrites a newer one.
//! A failed fetch is logged and the previous snapshot stays in place.
//!
//! Mutations follow mutate-then-refresh: call the API, and on success
//! re-fetch everything. Nothing is patched locally and a failed mutation
//! leaves the snapshot untouched.

use std::collections::BTreeMap;

use time::{Date, OffsetDateTime};
use tokio::sync::RwLock;

use crate::aggregate::{
    filter_by_month, monthly_buckets, month_range, percent_of, sum_by_category, top_categories,
    total_of,
};
use crate::charts::{
    BalancePoint, MonthlyBar, PieSlice, balance_series, bar_series, buckets_from_comparison,
    pie_slices,
};
use crate::client::api::ApiClient;
use crate::client::error::Result;
use crate::client::refresh::RefreshSequencer;
use crate::constants::{RANKING_SIZE, RECENT_ITEMS, UNCATEGORIZED_LABEL};
use crate::format::month_name;
use crate::insights::{Insight, InsightInput, InsightVariant, generate_insights};
use crate::models::{
    CategoryPayload, CategoryTotal, Expense, ExpenseCategory, ExpensePayload, Income,
    IncomePayload, PiggyBank, PiggyBankPayload, PiggyTransaction, PiggyTransactionPayload,
    YearlyComparisonEntry,
};

/// Today's date in the local offset, UTC when the offset is unknown.
pub fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

fn zero_based_month(date: Date) -> u8 {
    u8::from(date.month()) - 1
}

/// Display name of an expense's category, `Sem categoria` when the
/// referenced category no longer exists.
pub fn category_label(expense: &Expense, categories: &[ExpenseCategory]) -> String {
    categories
        .iter()
        .find(|category| category.id == expense.category_id)
        .map(|category| category.name.clone())
        .or_else(|| expense.category_name.clone())
        .unwrap_or_else(|| UNCATEGORIZED_LABEL.to_string())
}

fn logged<T>(action: &str, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        tracing::warn!(action, error = %e, "mutation failed");
    }
    result
}

/// An expense with its category label resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRow {
    pub expense: Expense,
    pub category: String,
}

fn expense_rows(expenses: &[Expense], categories: &[ExpenseCategory]) -> Vec<ExpenseRow> {
    expenses
        .iter()
        .map(|expense| ExpenseRow {
            expense: expense.clone(),
            category: category_label(expense, categories),
        })
        .collect()
}

// Dashboard

#[derive(Debug, Clone, Default)]
pub struct DashboardSnapshot {
    pub year: i32,
    /// 0 = January
    pub month: u8,
    pub total_income: f64,
    pub month_expenses: f64,
    pub balance: f64,
    pub total_savings: f64,
    pub expense_slices: Vec<PieSlice>,
    pub monthly_bars: Vec<MonthlyBar>,
    pub insights: Vec<Insight>,
    pub recent_incomes: Vec<Income>,
    pub recent_expenses: Vec<ExpenseRow>,
}

/// Aggregates the dashboard for the month containing `today`. Income has no
/// date, so the income total is the monthly figure for every month.
pub fn build_dashboard(
    today: Date,
    incomes: &[Income],
    expenses: &[Expense],
    categories: &[ExpenseCategory],
    piggy_banks: &[PiggyBank],
) -> DashboardSnapshot {
    let year = today.year();
    let month = zero_based_month(today);

    let total_income = total_of(incomes, |income| income.amount);
    let this_month = filter_by_month(expenses, year, month);
    let month_expenses = total_of(&this_month, |expense| expense.amount);
    let total_savings = total_of(piggy_banks, |bank| bank.balance);
    let month_totals = sum_by_category(&this_month, categories);

    let insights = generate_insights(&InsightInput {
        variant: InsightVariant::Dashboard,
        income_records: incomes.len(),
        total_income,
        total_expenses: month_expenses,
        category_totals: &month_totals,
        total_savings,
        previous_month_expenses: None,
        period_label: None,
    });

    let mut recent_incomes = incomes.to_vec();
    recent_incomes.sort_by(|a, b| b.id.cmp(&a.id));
    recent_incomes.truncate(RECENT_ITEMS);

    let mut recent_expenses = expenses.to_vec();
    recent_expenses.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    recent_expenses.truncate(RECENT_ITEMS);

    DashboardSnapshot {
        year,
        month,
        total_income,
        month_expenses,
        balance: total_income - month_expenses,
        total_savings,
        expense_slices: pie_slices(&month_totals),
        monthly_bars: bar_series(&monthly_buckets(expenses, year, total_income)),
        insights,
        recent_incomes,
        recent_expenses: expense_rows(&recent_expenses, categories),
    }
}

pub struct DashboardView {
    api: ApiClient,
    sequencer: RefreshSequencer,
    snapshot: RwLock<DashboardSnapshot>,
}

impl DashboardView {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            sequencer: RefreshSequencer::new(),
            snapshot: RwLock::new(DashboardSnapshot::default()),
        }
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.snapshot.read().await.clone()
    }

    pub async fn refresh(&self) -> bool {
        self.refresh_on(today()).await
    }

    /// Returns whether a new snapshot was committed.
    pub async fn refresh_on(&self, today: Date) -> bool {
        let ticket = self.sequencer.issue();
        let fetched = tokio::try_join!(
            self.api.list_incomes(),
            self.api.list_expenses(),
            self.api.list_categories(),
            self.api.list_piggy_banks(),
        );

        match fetched {
            Ok((incomes, expenses, categories, piggy_banks)) => {
                let snapshot =
                    build_dashboard(today, &incomes, &expenses, &categories, &piggy_banks);
                self.sequencer
                    .commit(ticket, &self.snapshot, snapshot)
                    .await
            }
            Err(e) => {
                tracing::warn!(error = %e, "dashboard refresh failed");
                false
            }
        }
    }
}

// Reports

#[derive(Debug, Clone, PartialEq)]
pub struct RankedCategory {
    pub name: String,
    pub value: f64,
    pub color: String,
    /// Share of the reference month's income, `None` without income.
    pub share_of_income: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct ReportsSnapshot {
    pub year: i32,
    /// Reference month, 0 = January
    pub month: u8,
    pub monthly_bars: Vec<MonthlyBar>,
    pub balance_line: Vec<BalancePoint>,
    pub annual_income: f64,
    pub annual_expenses: f64,
    pub annual_balance: f64,
    pub category_slices: Vec<PieSlice>,
    pub ranking: Vec<RankedCategory>,
    pub insights: Vec<Insight>,
}

/// Aggregates the reports screen from the server's yearly comparison and
/// the reference month's per-category totals.
pub fn build_reports(
    year: i32,
    month: u8,
    comparison: &[YearlyComparisonEntry],
    month_categories: &[CategoryTotal],
) -> ReportsSnapshot {
    let buckets = buckets_from_comparison(comparison);
    let annual_income = total_of(&buckets, |bucket| bucket.income);
    let annual_expenses = total_of(&buckets, |bucket| bucket.expenses);

    let (month_income, month_expenses) = buckets
        .get(month as usize)
        .map(|bucket| (bucket.income, bucket.expenses))
        .unwrap_or((0.0, 0.0));
    let previous_month_expenses = (month as usize)
        .checked_sub(1)
        .and_then(|previous| buckets.get(previous))
        .map(|bucket| bucket.expenses);

    let ranking = top_categories(month_categories, RANKING_SIZE)
        .into_iter()
        .map(|total| RankedCategory {
            share_of_income: percent_of(total.value, month_income),
            name: total.name,
            value: total.value,
            color: total.color,
        })
        .collect();

    let chart_totals: Vec<CategoryTotal> = month_categories
        .iter()
        .filter(|total| total.value > 0.0)
        .cloned()
        .collect();

    let insights = generate_insights(&InsightInput {
        variant: InsightVariant::Reports,
        income_records: buckets.iter().filter(|bucket| bucket.income > 0.0).count(),
        total_income: month_income,
        total_expenses: month_expenses,
        category_totals: &chart_totals,
        total_savings: 0.0,
        previous_month_expenses,
        period_label: month_name(month),
    });

    ReportsSnapshot {
        year,
        month,
        monthly_bars: bar_series(&buckets),
        balance_line: balance_series(&buckets),
        annual_income,
        annual_expenses,
        annual_balance: annual_income - annual_expenses,
        category_slices: pie_slices(&chart_totals),
        ranking,
        insights,
    }
}

pub struct ReportsView {
    api: ApiClient,
    sequencer: RefreshSequencer,
    snapshot: RwLock<ReportsSnapshot>,
}

impl ReportsView {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            sequencer: RefreshSequencer::new(),
            snapshot: RwLock::new(ReportsSnapshot::default()),
        }
    }

    pub async fn snapshot(&self) -> ReportsSnapshot {
        self.snapshot.read().await.clone()
    }

    /// Loads `year` with the current calendar month as reference month.
    pub async fn refresh(&self, year: i32) -> bool {
        self.refresh_for(year, zero_based_month(today())).await
    }

    pub async fn refresh_for(&self, year: i32, month: u8) -> bool {
        let ticket = self.sequencer.issue();
        let Some((start, end)) = month_range(year, month) else {
            tracing::warn!(year, month, "invalid report period");
            return false;
        };

        let fetched = tokio::try_join!(
            self.api.yearly_comparison(year),
            self.api.expenses_by_category(&start, &end),
        );

        match fetched {
            Ok((comparison, month_categories)) => {
                let snapshot = build_reports(year, month, &comparison, &month_categories);
                self.sequencer
                    .commit(ticket, &self.snapshot, snapshot)
                    .await
            }
            Err(e) => {
                tracing::warn!(error = %e, year, "reports refresh failed");
                false
            }
        }
    }
}

// Incomes

#[derive(Debug, Clone, Default)]
pub struct IncomesSnapshot {
    pub incomes: Vec<Income>,
    pub total_income: f64,
}

pub struct IncomesView {
    api: ApiClient,
    sequencer: RefreshSequencer,
    snapshot: RwLock<IncomesSnapshot>,
}

impl IncomesView {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            sequencer: RefreshSequencer::new(),
            snapshot: RwLock::new(IncomesSnapshot::default()),
        }
    }

    pub async fn snapshot(&self) -> IncomesSnapshot {
        self.snapshot.read().await.clone()
    }

    pub async fn refresh(&self) -> bool {
        let ticket = self.sequencer.issue();
        match self.api.list_incomes().await {
            Ok(incomes) => {
                let snapshot = IncomesSnapshot {
                    total_income: total_of(&incomes, |income| income.amount),
                    incomes,
                };
                self.sequencer
                    .commit(ticket, &self.snapshot, snapshot)
                    .await
            }
            Err(e) => {
                tracing::warn!(error = %e, "incomes refresh failed");
                false
            }
        }
    }

    pub async fn create(&self, payload: &IncomePayload) -> Result<Income> {
        let income = logged("create income", self.api.create_income(payload).await)?;
        self.refresh().await;
        Ok(income)
    }

    pub async fn update(&self, id: i64, payload: &IncomePayload) -> Result<Income> {
        let income = logged("update income", self.api.update_income(id, payload).await)?;
        self.refresh().await;
        Ok(income)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        logged("delete income", self.api.delete_income(id).await)?;
        self.refresh().await;
        Ok(())
    }
}

// Expenses and categories

#[derive(Debug, Clone, Default)]
pub struct ExpensesSnapshot {
    pub expenses: Vec<ExpenseRow>,
    pub categories: Vec<ExpenseCategory>,
    pub total_expenses: f64,
}

pub struct ExpensesView {
    api: ApiClient,
    sequencer: RefreshSequencer,
    snapshot: RwLock<ExpensesSnapshot>,
}

impl ExpensesView {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            sequencer: RefreshSequencer::new(),
            snapshot: RwLock::new(ExpensesSnapshot::default()),
        }
    }

    pub async fn snapshot(&self) -> ExpensesSnapshot {
        self.snapshot.read().await.clone()
    }

    pub async fn refresh(&self) -> bool {
        let ticket = self.sequencer.issue();
        let fetched = tokio::try_join!(self.api.list_expenses(), self.api.list_categories());

        match fetched {
            Ok((expenses, categories)) => {
                let snapshot = ExpensesSnapshot {
                    total_expenses: total_of(&expenses, |expense| expense.amount),
                    expenses: expense_rows(&expenses, &categories),
                    categories,
                };
                self.sequencer
                    .commit(ticket, &self.snapshot, snapshot)
                    .await
            }
            Err(e) => {
                tracing::warn!(error = %e, "expenses refresh failed");
                false
            }
        }
    }

    pub async fn create_expense(&self, payload: &ExpensePayload) -> Result<Expense> {
        let expense = logged("create expense", self.api.create_expense(payload).await)?;
        self.refresh().await;
        Ok(expense)
    }

    pub async fn update_expense(&self, id: i64, payload: &ExpensePayload) -> Result<Expense> {
        let expense = logged("update expense", self.api.update_expense(id, payload).await)?;
        self.refresh().await;
        Ok(expense)
    }

    pub async fn delete_expense(&self, id: i64) -> Result<()> {
        logged("delete expense", self.api.delete_expense(id).await)?;
        self.refresh().await;
        Ok(())
    }

    pub async fn create_category(&self, payload: &CategoryPayload) -> Result<ExpenseCategory> {
        let category = logged("create category", self.api.create_category(payload).await)?;
        self.refresh().await;
        Ok(category)
    }

    pub async fn update_category(
        &self,
        id: i64,
        payload: &CategoryPayload,
    ) -> Result<ExpenseCategory> {
        let category = logged(
            "update category",
            self.api.update_category(id, payload).await,
        )?;
        self.refresh().await;
        Ok(category)
    }

    pub async fn delete_category(&self, id: i64) -> Result<()> {
        logged("delete category", self.api.delete_category(id).await)?;
        self.refresh().await;
        Ok(())
    }
}

// Piggy banks

#[derive(Debug, Clone, Default)]
pub struct PiggyBanksSnapshot {
    pub piggy_banks: Vec<PiggyBank>,
    pub total_savings: f64,
    /// Transaction history keyed by piggy bank id.
    pub transactions: BTreeMap<i64, Vec<PiggyTransaction>>,
}

impl PiggyBanksSnapshot {
    pub fn history(&self, piggy_bank_id: i64) -> &[PiggyTransaction] {
        self.transactions
            .get(&piggy_bank_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

pub struct PiggyBanksView {
    api: ApiClient,
    sequencer: RefreshSequencer,
    snapshot: RwLock<PiggyBanksSnapshot>,
}

impl PiggyBanksView {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            sequencer: RefreshSequencer::new(),
            snapshot: RwLock::new(PiggyBanksSnapshot::default()),
        }
    }

    pub async fn snapshot(&self) -> PiggyBanksSnapshot {
        self.snapshot.read().await.clone()
    }

    /// A bank whose history cannot be fetched shows an empty history.
    pub async fn refresh(&self) -> bool {
        let ticket = self.sequencer.issue();
        let piggy_banks = match self.api.list_piggy_banks().await {
            Ok(piggy_banks) => piggy_banks,
            Err(e) => {
                tracing::warn!(error = %e, "piggy banks refresh failed");
                return false;
            }
        };

        let mut transactions = BTreeMap::new();
        for bank in &piggy_banks {
            let history = match self.api.list_transactions(bank.id).await {
                Ok(history) => history,
                Err(e) => {
                    tracing::debug!(piggy_bank_id = bank.id, error = %e, "history unavailable");
                    Vec::new()
                }
            };
            transactions.insert(bank.id, history);
        }

        let snapshot = PiggyBanksSnapshot {
            total_savings: total_of(&piggy_banks, |bank| bank.balance),
            piggy_banks,
            transactions,
        };
        self.sequencer
            .commit(ticket, &self.snapshot, snapshot)
            .await
    }

    pub async fn create(&self, payload: &PiggyBankPayload) -> Result<PiggyBank> {
        let bank = logged("create piggy bank", self.api.create_piggy_bank(payload).await)?;
        self.refresh().await;
        Ok(bank)
    }

    pub async fn update(&self, id: i64, payload: &PiggyBankPayload) -> Result<PiggyBank> {
        let bank = logged(
            "update piggy bank",
            self.api.update_piggy_bank(id, payload).await,
        )?;
        self.refresh().await;
        Ok(bank)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        logged("delete piggy bank", self.api.delete_piggy_bank(id).await)?;
        self.refresh().await;
        Ok(())
    }

    pub async fn record_transaction(
        &self,
        payload: &PiggyTransactionPayload,
    ) -> Result<PiggyTransaction> {
        let transaction = logged(
            "record piggy transaction",
            self.api.create_transaction(payload).await,
        )?;
        self.refresh().await;
        Ok(transaction)
    }
}
