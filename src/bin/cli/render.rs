//! Terminal rendering of view snapshots.

use cofrinho::charts::{BalancePoint, MonthlyBar, PieSlice};
use cofrinho::client::views::{
    DashboardSnapshot, ExpenseRow, ExpensesSnapshot, IncomesSnapshot, PiggyBanksSnapshot,
    ReportsSnapshot,
};
use cofrinho::format::{format_currency, format_percent, month_name, recurrence_label};
use cofrinho::insights::{Insight, InsightTone};
use cofrinho::models::{ExpenseCategory, Income, PiggyTransaction, TransactionType};

const BAR_WIDTH: f64 = 30.0;

fn header(title: &str) {
    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│ {:<39} │", title);
    println!("╰─────────────────────────────────────────╯");
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let width = ((value / max) * BAR_WIDTH).round().max(1.0) as usize;
    "█".repeat(width)
}

fn tone_icon(tone: InsightTone) -> &'static str {
    match tone {
        InsightTone::Alert => "⚠️ ",
        InsightTone::Positive => "✅",
        InsightTone::Trend => "📈",
        InsightTone::Tip => "💡",
    }
}

pub fn print_insights(insights: &[Insight]) {
    println!();
    println!("  Insights");
    if insights.is_empty() {
        println!("    (nenhum insight no momento)");
    }
    for insight in insights {
        println!("    {} {}", tone_icon(insight.tone()), insight.text);
    }
}

fn print_pie(slices: &[PieSlice]) {
    let total: f64 = slices.iter().fold(0.0, |sum, slice| sum + slice.value);
    let max = slices.iter().fold(0.0_f64, |m, slice| m.max(slice.value));
    if slices.is_empty() {
        println!("    (sem despesas no período)");
    }
    for slice in slices {
        let share = if total > 0.0 { slice.value / total * 100.0 } else { 0.0 };
        println!(
            "    {:<18} {:>14} {:>6}%  {}",
            slice.name,
            format_currency(slice.value),
            format_percent(share),
            bar(slice.value, max)
        );
    }
}

fn print_bars(bars: &[MonthlyBar]) {
    let max = bars
        .iter()
        .fold(0.0_f64, |m, b| m.max(b.receitas).max(b.despesas));
    for b in bars {
        println!(
            "    {}  + {:<30} {}",
            b.month,
            bar(b.receitas, max),
            format_currency(b.receitas)
        );
        println!(
            "         - {:<30} {}",
            bar(b.despesas, max),
            format_currency(b.despesas)
        );
    }
}

fn print_balance_line(points: &[BalancePoint]) {
    for point in points {
        println!("    {}  {:>14}", point.month, format_currency(point.saldo));
    }
}

fn print_income_line(income: &Income) {
    println!(
        "    #{:<4} {:<24} {:>14}  {:<8} dia {}",
        income.id,
        income.name,
        format_currency(income.amount),
        recurrence_label(income.recurrence),
        income.receive_date
    );
}

fn print_expense_line(row: &ExpenseRow) {
    println!(
        "    #{:<4} {}  {:<24} {:<16} {:>14}",
        row.expense.id,
        row.expense.date,
        row.expense.description,
        row.category,
        format_currency(row.expense.amount)
    );
}

pub fn print_dashboard(snapshot: &DashboardSnapshot) {
    header(&format!(
        "💰 Dashboard - {} de {}",
        month_name(snapshot.month).unwrap_or_default(),
        snapshot.year
    ));
    println!();
    println!("  Receitas     {:>16}  (total mensal)", format_currency(snapshot.total_income));
    println!("  Despesas     {:>16}  (este mês)", format_currency(snapshot.month_expenses));
    println!("  Saldo        {:>16}", format_currency(snapshot.balance));
    println!("  Porquinhos   {:>16}  (total guardado)", format_currency(snapshot.total_savings));

    println!();
    println!("  Despesas por categoria");
    print_pie(&snapshot.expense_slices);

    println!();
    println!("  Evolução mensal");
    print_bars(&snapshot.monthly_bars);

    print_insights(&snapshot.insights);

    println!();
    println!("  Receitas recentes");
    if snapshot.recent_incomes.is_empty() {
        println!("    Nenhuma receita cadastrada");
    }
    snapshot.recent_incomes.iter().for_each(print_income_line);

    println!();
    println!("  Despesas recentes");
    if snapshot.recent_expenses.is_empty() {
        println!("    Nenhuma despesa cadastrada");
    }
    snapshot.recent_expenses.iter().for_each(print_expense_line);
    println!();
}

pub fn print_reports(snapshot: &ReportsSnapshot) {
    header(&format!("📊 Relatórios - {}", snapshot.year));
    println!();
    println!("  Receita anual   {:>16}", format_currency(snapshot.annual_income));
    println!("  Despesa anual   {:>16}", format_currency(snapshot.annual_expenses));
    println!("  Saldo anual     {:>16}", format_currency(snapshot.annual_balance));

    println!();
    println!("  Receitas x Despesas");
    print_bars(&snapshot.monthly_bars);

    println!();
    println!("  Saldo mensal");
    print_balance_line(&snapshot.balance_line);

    println!();
    println!("  Despesas por categoria - {}", month_name(snapshot.month).unwrap_or_default());
    print_pie(&snapshot.category_slices);

    println!();
    println!("  Top categorias");
    for (position, entry) in snapshot.ranking.iter().enumerate() {
        let share = entry
            .share_of_income
            .map(|p| format!("{}% da renda", format_percent(p)))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "    {}. {:<18} {:>14}  {}",
            position + 1,
            entry.name,
            format_currency(entry.value),
            share
        );
    }

    print_insights(&snapshot.insights);
    println!();
}

pub fn print_incomes(snapshot: &IncomesSnapshot) {
    header("Receitas");
    if snapshot.incomes.is_empty() {
        println!("    Nenhuma receita cadastrada");
    }
    snapshot.incomes.iter().for_each(print_income_line);
    println!();
    println!("  Total mensal: {}", format_currency(snapshot.total_income));
    println!();
}

pub fn print_expenses(snapshot: &ExpensesSnapshot) {
    header("Despesas");
    if snapshot.expenses.is_empty() {
        println!("    Nenhuma despesa cadastrada");
    }
    snapshot.expenses.iter().for_each(print_expense_line);
    println!();
    println!("  Total: {}", format_currency(snapshot.total_expenses));
    println!();
}

pub fn print_categories(categories: &[ExpenseCategory]) {
    header("Categorias");
    if categories.is_empty() {
        println!("    Nenhuma categoria cadastrada");
    }
    for category in categories {
        println!(
            "    #{:<4} {:<24} {:<8} {}",
            category.id, category.name, category.color, category.icon
        );
    }
    println!();
}

pub fn print_piggy_banks(snapshot: &PiggyBanksSnapshot) {
    header("🐷 Porquinhos");
    if snapshot.piggy_banks.is_empty() {
        println!("    Nenhum porquinho cadastrado");
    }
    for bank in &snapshot.piggy_banks {
        println!(
            "    #{:<4} {:<20} {:>14}  {} {}",
            bank.id,
            bank.name,
            format_currency(bank.balance),
            bank.bank,
            if bank.goal.is_empty() {
                String::new()
            } else {
                format!("({})", bank.goal)
            }
        );
    }
    println!();
    println!("  Total guardado: {}", format_currency(snapshot.total_savings));
    println!();
}

pub fn print_history(name: &str, history: &[PiggyTransaction]) {
    header(&format!("Histórico - {}", name));
    if history.is_empty() {
        println!("    Nenhuma movimentação");
    }
    for transaction in history {
        let sign = match transaction.kind {
            TransactionType::Deposit => "+",
            TransactionType::Withdrawal => "-",
        };
        println!(
            "    {}  {}{:>14}  {}",
            transaction.date,
            sign,
            format_currency(transaction.amount),
            transaction.description.as_deref().unwrap_or("")
        );
    }
    println!();
}
