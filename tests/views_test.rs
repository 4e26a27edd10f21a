use cofrinho::client::views::{build_dashboard, build_reports, category_label};
use cofrinho::insights::InsightKind;
use cofrinho::models::*;
use time::macros::date;

fn category(id: i64, name: &str) -> ExpenseCategory {
    ExpenseCategory {
        id,
        name: name.to_string(),
        color: "#000000".to_string(),
        icon: "tag".to_string(),
    }
}

fn expense(id: i64, category_id: i64, amount: f64, date: &str) -> Expense {
    Expense {
        id,
        category_id,
        category_name: None,
        category_color: None,
        category_icon: None,
        amount,
        description: format!("gasto {id}"),
        date: date.to_string(),
        notes: None,
    }
}

fn income(id: i64, amount: f64) -> Income {
    Income {
        id,
        name: format!("renda {id}"),
        amount,
        recurrence: Recurrence::Monthly,
        receive_date: 5,
    }
}

#[test]
fn empty_dashboard_asks_for_income() {
    let snapshot = build_dashboard(date!(2024 - 07 - 01), &[], &[], &[], &[]);
    assert_eq!(snapshot.month, 6);
    assert_eq!(snapshot.total_income, 0.0);
    assert_eq!(snapshot.balance, 0.0);
    assert!(snapshot.expense_slices.is_empty());
    assert_eq!(snapshot.monthly_bars.len(), 12);
    let kinds: Vec<InsightKind> = snapshot.insights.iter().map(|i| i.kind).collect();
    assert_eq!(kinds, vec![InsightKind::Onboarding]);
}

#[test]
fn dashboard_recent_lists_are_newest_first_and_capped() {
    let incomes: Vec<Income> = (1..=7).map(|id| income(id, 100.0)).collect();
    let expenses: Vec<Expense> = (1..=7)
        .map(|id| expense(id, 1, 10.0, &format!("2024-07-0{id}")))
        .collect();

    let snapshot = build_dashboard(
        date!(2024 - 07 - 20),
        &incomes,
        &expenses,
        &[category(1, "Mercado")],
        &[],
    );

    let income_ids: Vec<i64> = snapshot.recent_incomes.iter().map(|i| i.id).collect();
    assert_eq!(income_ids, vec![7, 6, 5, 4, 3]);
    let expense_ids: Vec<i64> = snapshot
        .recent_expenses
        .iter()
        .map(|row| row.expense.id)
        .collect();
    assert_eq!(expense_ids, vec![7, 6, 5, 4, 3]);
    assert_eq!(snapshot.total_income, 700.0);
    assert_eq!(snapshot.month_expenses, 70.0);
}

#[test]
fn dashboard_overspending_is_flagged() {
    let snapshot = build_dashboard(
        date!(2024 - 07 - 20),
        &[income(1, 1000.0)],
        &[expense(1, 1, 1500.0, "2024-07-02")],
        &[category(1, "Aluguel")],
        &[],
    );
    assert_eq!(snapshot.balance, -500.0);
    assert!(
        snapshot
            .insights
            .iter()
            .any(|i| i.kind == InsightKind::OverspendingWarning)
    );
}

#[test]
fn reports_for_january_skip_month_over_month() {
    let comparison: Vec<YearlyComparisonEntry> = (1..=12)
        .map(|month| YearlyComparisonEntry {
            month,
            incomes: 2000.0,
            expenses: if month == 1 { 500.0 } else { 0.0 },
        })
        .collect();
    let totals = vec![CategoryTotal {
        name: "Mercado".to_string(),
        value: 500.0,
        color: "#FF0000".to_string(),
    }];

    let snapshot = build_reports(2024, 0, &comparison, &totals);
    assert_eq!(snapshot.annual_income, 24000.0);
    assert_eq!(snapshot.annual_expenses, 500.0);
    assert!(snapshot.insights.iter().all(|i| !matches!(
        i.kind,
        InsightKind::SpendingIncrease | InsightKind::SpendingDecrease
    )));
    assert_eq!(snapshot.ranking[0].share_of_income, Some(25.0));
}

#[test]
fn reports_without_income_have_no_share() {
    let comparison: Vec<YearlyComparisonEntry> = (1..=12)
        .map(|month| YearlyComparisonEntry {
            month,
            incomes: 0.0,
            expenses: 100.0,
        })
        .collect();
    let totals = vec![
        CategoryTotal {
            name: "Lazer".to_string(),
            value: 100.0,
            color: "#00FF00".to_string(),
        },
        CategoryTotal {
            name: "Vazio".to_string(),
            value: 0.0,
            color: "#0000FF".to_string(),
        },
    ];

    let snapshot = build_reports(2024, 5, &comparison, &totals);
    assert_eq!(snapshot.ranking[0].share_of_income, None);
    assert_eq!(snapshot.category_slices.len(), 1);
    assert_eq!(snapshot.insights[0].kind, InsightKind::Onboarding);
    assert_eq!(snapshot.annual_balance, -1200.0);
}

#[test]
fn category_label_prefers_live_category() {
    let mut orphan = expense(1, 99, 10.0, "2024-01-01");
    assert_eq!(category_label(&orphan, &[category(1, "Casa")]), "Sem categoria");

    orphan.category_name = Some("Antiga".to_string());
    assert_eq!(category_label(&orphan, &[]), "Antiga");

    let live = expense(2, 1, 10.0, "2024-01-01");
    assert_eq!(category_label(&live, &[category(1, "Casa")]), "Casa");
}
